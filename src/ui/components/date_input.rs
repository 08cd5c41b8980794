use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;

/// Segment of a `dd/mm/yyyy` date currently receiving digits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DatePart {
    Day,
    Month,
    Year,
}

impl DatePart {
    fn width(self) -> usize {
        match self {
            DatePart::Day | DatePart::Month => 2,
            DatePart::Year => 4,
        }
    }

    fn next(self) -> Self {
        match self {
            DatePart::Day => DatePart::Month,
            DatePart::Month => DatePart::Year,
            DatePart::Year => DatePart::Day,
        }
    }

    fn previous(self) -> Self {
        match self {
            DatePart::Day => DatePart::Year,
            DatePart::Month => DatePart::Day,
            DatePart::Year => DatePart::Month,
        }
    }
}

/// Keyboard date entry, one segment at a time.
///
/// Segments are kept separately while typing and only combined by
/// [`DateInputState::commit`], so a day can be typed before the month it
/// belongs to.
pub struct DateInputState {
    pub editing: bool,
    pub part: DatePart,
    day: u32,
    month: u32,
    year: i32,
    digits: String,
}

impl DateInputState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            editing: false,
            part: DatePart::Day,
            day: date.day(),
            month: date.month(),
            year: date.year(),
            digits: String::new(),
        }
    }

    pub fn begin(&mut self) {
        self.editing = true;
        self.part = DatePart::Day;
        self.digits.clear();
    }

    pub fn finish(&mut self) {
        self.editing = false;
        self.digits.clear();
    }

    /// The typed segments as a calendar date, if they form one.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Take any half-typed segment and return the resulting date.
    pub fn commit(&mut self) -> Option<NaiveDate> {
        if !self.digits.is_empty() {
            self.commit_part();
        }
        self.date()
    }

    pub fn handle_input(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.digits.push(c);
                if self.digits.len() == self.part.width() {
                    self.commit_part();
                    self.part = self.part.next();
                }
            }
            KeyCode::Backspace => {
                self.digits.pop();
            }
            KeyCode::Right => {
                self.digits.clear();
                self.part = self.part.next();
            }
            KeyCode::Left => {
                self.digits.clear();
                self.part = self.part.previous();
            }
            _ => {}
        }
    }

    // Out-of-range segment values are dropped and the previous value kept.
    fn commit_part(&mut self) {
        let typed = std::mem::take(&mut self.digits);
        let Ok(value) = typed.parse::<u32>() else {
            return;
        };

        match self.part {
            DatePart::Day if (1..=31).contains(&value) => self.day = value,
            DatePart::Month if (1..=12).contains(&value) => self.month = value,
            DatePart::Year if (1900..=2100).contains(&value) => self.year = value as i32,
            _ => {}
        }
    }

    /// `dd/mm/yyyy`, with the active segment bracketed while editing.
    pub fn display(&self) -> String {
        let day = format!("{:02}", self.day);
        let month = format!("{:02}", self.month);
        let year = format!("{:04}", self.year);
        if !self.editing {
            return format!("{}/{}/{}", day, month, year);
        }

        let mark = |part: DatePart, value: &str| {
            if part != self.part {
                value.to_string()
            } else if self.digits.is_empty() {
                format!("[{}]", value)
            } else {
                format!("[{}_]", self.digits)
            }
        };
        format!(
            "{}/{}/{}",
            mark(DatePart::Day, &day),
            mark(DatePart::Month, &month),
            mark(DatePart::Year, &year)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn type_digits(state: &mut DateInputState, digits: &str) {
        for c in digits.chars() {
            state.handle_input(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_full_date() {
        let mut state = DateInputState::new(date(2024, 1, 1));
        state.begin();
        type_digits(&mut state, "15082025");
        assert_eq!(state.commit(), Some(date(2025, 8, 15)));
        assert_eq!(state.part, DatePart::Day);
    }

    #[test]
    fn test_day_past_end_of_current_month() {
        let mut state = DateInputState::new(date(2024, 2, 10));
        state.begin();
        type_digits(&mut state, "31122025");
        assert_eq!(state.commit(), Some(date(2025, 12, 31)));
    }

    #[test]
    fn test_ignored_when_not_editing() {
        let mut state = DateInputState::new(date(2024, 1, 1));
        type_digits(&mut state, "15");
        assert_eq!(state.date(), Some(date(2024, 1, 1)));
    }

    #[test]
    fn test_impossible_date_is_not_committed() {
        let mut state = DateInputState::new(date(2023, 1, 31));
        state.begin();
        state.handle_input(KeyCode::Right);
        type_digits(&mut state, "02");
        assert_eq!(state.commit(), None);

        state.handle_input(KeyCode::Left);
        state.handle_input(KeyCode::Left);
        type_digits(&mut state, "28");
        assert_eq!(state.commit(), Some(date(2023, 2, 28)));
    }

    #[test]
    fn test_out_of_range_segments_are_ignored() {
        let mut state = DateInputState::new(date(2024, 2, 29));
        state.begin();
        type_digits(&mut state, "45");
        assert_eq!(state.part, DatePart::Month);
        type_digits(&mut state, "13");
        assert_eq!(state.part, DatePart::Year);
        type_digits(&mut state, "1800");
        assert_eq!(state.commit(), Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_commit_takes_partial_segment() {
        let mut state = DateInputState::new(date(2024, 4, 11));
        state.begin();
        state.handle_input(KeyCode::Char('5'));
        assert_eq!(state.commit(), Some(date(2024, 4, 5)));
    }

    #[test]
    fn test_display() {
        let mut state = DateInputState::new(date(2024, 4, 1));
        assert_eq!(state.display(), "01/04/2024");
        state.begin();
        assert_eq!(state.display(), "[01]/04/2024");
        state.handle_input(KeyCode::Char('2'));
        assert_eq!(state.display(), "[2_]/04/2024");
        state.handle_input(KeyCode::Backspace);
        state.finish();
        assert_eq!(state.display(), "01/04/2024");
    }
}
