use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::error::Result;
use crate::form::{parse_amount, parse_quantity, FormCommand, ItemUpdate};
use crate::models::{CompanyProfile, InvoiceData, LineItem};
use crate::render::{self, RenderOptions};
use crate::ui::components::date_input::DateInputState;

// Fields of the form, top to bottom
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvoiceField {
    CompanyAddress,
    InvoiceNumber,
    InvoiceDetails,
    InvoiceDate,
    RecipientName,
    RecipientAddress,
    StateCode,
    PlaceOfDelivery,
    LineItems,
}

const FIELDS: [InvoiceField; 9] = [
    InvoiceField::CompanyAddress,
    InvoiceField::InvoiceNumber,
    InvoiceField::InvoiceDetails,
    InvoiceField::InvoiceDate,
    InvoiceField::RecipientName,
    InvoiceField::RecipientAddress,
    InvoiceField::StateCode,
    InvoiceField::PlaceOfDelivery,
    InvoiceField::LineItems,
];

impl InvoiceField {
    fn label(self) -> &'static str {
        match self {
            InvoiceField::CompanyAddress => "Company Address",
            InvoiceField::InvoiceNumber => "Invoice Number",
            InvoiceField::InvoiceDetails => "Invoice Details",
            InvoiceField::InvoiceDate => "Invoice Date",
            InvoiceField::RecipientName => "Recipient Name",
            InvoiceField::RecipientAddress => "Address",
            InvoiceField::StateCode => "State/Code",
            InvoiceField::PlaceOfDelivery => "Place of Delivery",
            InvoiceField::LineItems => "Invoice Items",
        }
    }

    fn is_multiline(self) -> bool {
        matches!(
            self,
            InvoiceField::CompanyAddress | InvoiceField::RecipientAddress
        )
    }

    fn text_value(self, data: &InvoiceData) -> &str {
        match self {
            InvoiceField::CompanyAddress => &data.company_address,
            InvoiceField::InvoiceNumber => &data.invoice_number,
            InvoiceField::InvoiceDetails => &data.invoice_details,
            InvoiceField::RecipientName => &data.recipient_name,
            InvoiceField::RecipientAddress => &data.recipient_address,
            InvoiceField::StateCode => &data.state_code,
            InvoiceField::PlaceOfDelivery => &data.place_of_delivery,
            InvoiceField::InvoiceDate | InvoiceField::LineItems => "",
        }
    }

    fn command(self, value: String) -> Option<FormCommand> {
        match self {
            InvoiceField::CompanyAddress => Some(FormCommand::SetCompanyAddress(value)),
            InvoiceField::InvoiceNumber => Some(FormCommand::SetInvoiceNumber(value)),
            InvoiceField::InvoiceDetails => Some(FormCommand::SetInvoiceDetails(value)),
            InvoiceField::RecipientName => Some(FormCommand::SetRecipientName(value)),
            InvoiceField::RecipientAddress => Some(FormCommand::SetRecipientAddress(value)),
            InvoiceField::StateCode => Some(FormCommand::SetStateCode(value)),
            InvoiceField::PlaceOfDelivery => Some(FormCommand::SetPlaceOfDelivery(value)),
            InvoiceField::InvoiceDate | InvoiceField::LineItems => None,
        }
    }
}

// Represents a field being edited on a line item
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineItemField {
    Description,
    UnitPrice,
    Quantity,
    TaxRate,
    TaxType,
}

impl LineItemField {
    fn label(self) -> &'static str {
        match self {
            LineItemField::Description => "Description",
            LineItemField::UnitPrice => "Unit Price",
            LineItemField::Quantity => "Quantity",
            LineItemField::TaxRate => "Tax Rate (%)",
            LineItemField::TaxType => "Tax Type",
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            LineItemField::Description => Some(LineItemField::UnitPrice),
            LineItemField::UnitPrice => Some(LineItemField::Quantity),
            LineItemField::Quantity => Some(LineItemField::TaxRate),
            LineItemField::TaxRate => Some(LineItemField::TaxType),
            LineItemField::TaxType => None,
        }
    }

    fn value(self, item: &LineItem) -> String {
        match self {
            LineItemField::Description => item.description.clone(),
            LineItemField::UnitPrice => item.unit_price.to_string(),
            LineItemField::Quantity => item.quantity.to_string(),
            LineItemField::TaxRate => item.tax_rate.to_string(),
            LineItemField::TaxType => item.tax_type.to_string(),
        }
    }

    fn update(self, input: &str) -> Option<ItemUpdate> {
        match self {
            LineItemField::Description => Some(ItemUpdate::Description(input.to_string())),
            LineItemField::UnitPrice => Some(ItemUpdate::UnitPrice(parse_amount(input))),
            LineItemField::Quantity => Some(ItemUpdate::Quantity(parse_quantity(input))),
            LineItemField::TaxRate => Some(ItemUpdate::TaxRate(parse_amount(input))),
            LineItemField::TaxType => None,
        }
    }
}

/// Requests the form hands back to the application loop, which owns I/O.
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    Quit,
    ExportPdf,
    Print,
    LoadLogo(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

pub struct InvoiceFormState {
    data: InvoiceData,
    company: CompanyProfile,
    options: RenderOptions,
    current_field: InvoiceField,
    editing: bool,
    active_input: String,
    line_items_list_state: ListState,
    editing_line_item: Option<(u64, LineItemField)>,
    date_state: DateInputState,
    logo_prompt: bool,
    preview_scroll: u16,
    notice: Option<Notice>,
}

impl InvoiceFormState {
    pub fn new(data: InvoiceData, company: CompanyProfile, options: RenderOptions) -> Self {
        let mut line_items_list_state = ListState::default();
        if !data.items.is_empty() {
            line_items_list_state.select(Some(0));
        }
        let date_state = DateInputState::new(data.invoice_date);

        Self {
            data,
            company,
            options,
            current_field: InvoiceField::CompanyAddress,
            editing: false,
            active_input: String::new(),
            line_items_list_state,
            editing_line_item: None,
            date_state,
            logo_prompt: false,
            preview_scroll: 0,
            notice: None,
        }
    }

    pub fn data(&self) -> &InvoiceData {
        &self.data
    }

    pub fn dispatch(&mut self, command: FormCommand) {
        match &command {
            FormCommand::SetLogo(logo) => debug!(mime = %logo.mime, size = logo.size, "logo set"),
            other => debug!(command = ?other, "form command"),
        }
        self.data = self.data.clone().apply(command);
    }

    pub fn set_notice(&mut self, text: impl Into<String>, is_error: bool) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error,
        });
    }

    /// The document as exported: logo embedded.
    pub fn document(&self) -> Result<String> {
        render::render_markdown(&self.data, &self.company, &self.options)
    }

    fn preview_text(&self) -> String {
        let options = RenderOptions {
            embed_logo: false,
            ..self.options.clone()
        };
        match render::render_markdown(&self.data, &self.company, &options) {
            Ok(text) => text,
            Err(e) => format!("Preview unavailable: {}", e),
        }
    }

    fn selected_item_id(&self) -> Option<u64> {
        self.line_items_list_state
            .selected()
            .and_then(|i| self.data.items.get(i))
            .map(|item| item.id)
    }

    fn next_field(&mut self) {
        let index = FIELDS.iter().position(|f| *f == self.current_field).unwrap_or(0);
        self.current_field = FIELDS[(index + 1) % FIELDS.len()];
    }

    fn previous_field(&mut self) {
        let index = FIELDS.iter().position(|f| *f == self.current_field).unwrap_or(0);
        self.current_field = FIELDS[(index + FIELDS.len() - 1) % FIELDS.len()];
    }

    fn begin_editing(&mut self) {
        self.editing = true;
        match self.current_field {
            InvoiceField::InvoiceDate => {
                self.date_state = DateInputState::new(self.data.invoice_date);
                self.date_state.begin();
            }
            InvoiceField::LineItems => {
                if self.line_items_list_state.selected().is_none() && !self.data.items.is_empty() {
                    self.line_items_list_state.select(Some(0));
                }
            }
            field => {
                self.active_input = field.text_value(&self.data).to_string();
            }
        }
    }

    fn stop_editing(&mut self) {
        self.editing = false;
        self.active_input.clear();
        self.editing_line_item = None;
        self.date_state.finish();
    }

    fn edit_item_field(&mut self, id: u64, field: LineItemField) {
        self.active_input = self
            .data
            .item(id)
            .map(|item| field.value(item))
            .unwrap_or_default();
        self.editing_line_item = Some((id, field));
    }

    fn add_line_item(&mut self) {
        self.dispatch(FormCommand::AddItem);
        let last = self.data.items.len() - 1;
        self.line_items_list_state.select(Some(last));
        let id = self.data.items[last].id;
        self.edit_item_field(id, LineItemField::Description);
    }

    fn delete_line_item(&mut self) {
        let Some(id) = self.selected_item_id() else {
            return;
        };
        if self.data.items.len() <= 1 {
            self.set_notice("An invoice needs at least one item", true);
            return;
        }
        self.dispatch(FormCommand::RemoveItem(id));

        let selected = self.line_items_list_state.selected().unwrap_or(0);
        let len = self.data.items.len();
        self.line_items_list_state.select(Some(selected.min(len - 1)));
    }

    fn select_item(&mut self, forward: bool) {
        let len = self.data.items.len();
        if len == 0 {
            return;
        }
        let i = match self.line_items_list_state.selected() {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        self.line_items_list_state.select(Some(i));
    }

    fn handle_navigation(&mut self, key: KeyEvent) -> Option<FormAction> {
        match key.code {
            KeyCode::Up => self.previous_field(),
            KeyCode::Down | KeyCode::Tab => self.next_field(),
            KeyCode::Enter => self.begin_editing(),
            KeyCode::PageDown => self.preview_scroll = self.preview_scroll.saturating_add(10),
            KeyCode::PageUp => self.preview_scroll = self.preview_scroll.saturating_sub(10),
            KeyCode::Char('a') => {
                self.current_field = InvoiceField::LineItems;
                self.editing = true;
                self.add_line_item();
            }
            KeyCode::Char('d') => self.delete_line_item(),
            KeyCode::Char('x') => return Some(FormAction::ExportPdf),
            KeyCode::Char('p') => return Some(FormAction::Print),
            KeyCode::Char('l') => {
                self.logo_prompt = true;
                self.active_input.clear();
            }
            KeyCode::Char('r') if self.data.company_logo.is_some() => {
                self.dispatch(FormCommand::RemoveLogo);
                self.set_notice("Logo removed", false);
            }
            KeyCode::Char('q') | KeyCode::Esc => return Some(FormAction::Quit),
            _ => {}
        }
        None
    }

    fn handle_logo_prompt(&mut self, key: KeyEvent) -> Option<FormAction> {
        match key.code {
            KeyCode::Enter => {
                self.logo_prompt = false;
                let path = std::mem::take(&mut self.active_input);
                let path = path.trim();
                if !path.is_empty() {
                    return Some(FormAction::LoadLogo(PathBuf::from(path)));
                }
            }
            KeyCode::Esc => {
                self.logo_prompt = false;
                self.active_input.clear();
            }
            KeyCode::Char(c) => self.active_input.push(c),
            KeyCode::Backspace => {
                self.active_input.pop();
            }
            _ => {}
        }
        None
    }

    fn handle_text_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter
                if self.current_field.is_multiline() && key.modifiers.contains(KeyModifiers::ALT) =>
            {
                self.active_input.push('\n');
            }
            KeyCode::Enter => {
                let value = std::mem::take(&mut self.active_input);
                if let Some(command) = self.current_field.command(value) {
                    self.dispatch(command);
                }
                self.stop_editing();
            }
            KeyCode::Esc => self.stop_editing(),
            KeyCode::Char(c) => self.active_input.push(c),
            KeyCode::Backspace => {
                self.active_input.pop();
            }
            _ => {}
        }
    }

    fn handle_date_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => match self.date_state.commit() {
                Some(date) => {
                    self.dispatch(FormCommand::SetInvoiceDate(date));
                    self.stop_editing();
                }
                None => self.set_notice("Not a valid date, fix the day, month or year", true),
            },
            KeyCode::Esc => {
                self.date_state = DateInputState::new(self.data.invoice_date);
                self.stop_editing();
            }
            code => self.date_state.handle_input(code),
        }
    }

    fn handle_line_items_key(&mut self, key: KeyEvent) {
        if let Some((id, field)) = self.editing_line_item {
            self.handle_line_item_field_key(id, field, key);
            return;
        }

        match key.code {
            KeyCode::Up => self.select_item(false),
            KeyCode::Down => self.select_item(true),
            KeyCode::Char('a') => self.add_line_item(),
            KeyCode::Char('d') => self.delete_line_item(),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = self.selected_item_id() {
                    self.edit_item_field(id, LineItemField::Description);
                }
            }
            KeyCode::Esc => self.stop_editing(),
            _ => {}
        }
    }

    fn handle_line_item_field_key(&mut self, id: u64, field: LineItemField, key: KeyEvent) {
        if field == LineItemField::TaxType {
            match key.code {
                KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                    if let Some(item) = self.data.item(id) {
                        let next = item.tax_type.next();
                        self.dispatch(FormCommand::UpdateItem(id, ItemUpdate::TaxType(next)));
                    }
                }
                KeyCode::Enter | KeyCode::Tab | KeyCode::Esc => {
                    self.editing_line_item = None;
                    self.active_input.clear();
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Enter | KeyCode::Tab => {
                let input = std::mem::take(&mut self.active_input);
                if let Some(update) = field.update(&input) {
                    self.dispatch(FormCommand::UpdateItem(id, update));
                }
                match field.next() {
                    Some(next) => self.edit_item_field(id, next),
                    None => self.editing_line_item = None,
                }
            }
            KeyCode::Esc => {
                self.editing_line_item = None;
                self.active_input.clear();
            }
            KeyCode::Char(c) => self.active_input.push(c),
            KeyCode::Backspace => {
                self.active_input.pop();
            }
            _ => {}
        }
    }

    fn help_text(&self) -> &'static str {
        if self.logo_prompt {
            return "Type the logo file path | Enter - Load | Esc - Cancel";
        }
        match (self.editing, self.current_field) {
            (false, _) => {
                "Enter - Edit | Up/Down - Navigate | a - Add item | d - Delete item | x - Export PDF | p - Print | l - Logo | r - Remove logo | PgUp/PgDn - Scroll preview | q - Quit"
            }
            (true, InvoiceField::InvoiceDate) => {
                "Digits - Type dd/mm/yyyy | Left/Right - Switch part | Enter - Save | Esc - Cancel"
            }
            (true, InvoiceField::LineItems) => match self.editing_line_item {
                Some((_, LineItemField::TaxType)) => {
                    "Left/Right/Space - Change tax type | Enter - Done"
                }
                Some(_) => "Enter/Tab - Next field | Esc - Cancel editing",
                None => "a - Add item | e - Edit selected | d - Delete selected | Up/Down - Select | Esc - Done",
            },
            (true, field) if field.is_multiline() => {
                "Enter - Save | Alt+Enter - New line | Esc - Cancel"
            }
            (true, _) => "Enter - Save | Esc - Cancel",
        }
    }
}

/// Route one key press. Pure with respect to the outside world: anything
/// needing I/O comes back as a [`FormAction`].
pub fn handle_input(state: &mut InvoiceFormState, key: KeyEvent) -> Option<FormAction> {
    state.notice = None;

    if state.logo_prompt {
        return state.handle_logo_prompt(key);
    }
    if !state.editing {
        return state.handle_navigation(key);
    }

    match state.current_field {
        InvoiceField::InvoiceDate => state.handle_date_key(key),
        InvoiceField::LineItems => state.handle_line_items_key(key),
        _ => state.handle_text_key(key),
    }
    None
}

pub fn render_invoice_form<B: Backend>(frame: &mut Frame<B>, state: &mut InvoiceFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3), // Title
                Constraint::Min(12),   // Form and preview
                Constraint::Length(3), // Help / notice
            ]
            .as_ref(),
        )
        .split(frame.size());

    let title = Paragraph::new("Invoice Maker")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(chunks[1]);

    render_form(frame, state, body[0]);
    render_preview(frame, state, body[1]);
    render_status(frame, state, chunks[2]);
}

fn field_style(state: &InvoiceFormState, field: InvoiceField) -> Style {
    if state.current_field == field {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn render_form<B: Backend>(frame: &mut Frame<B>, state: &mut InvoiceFormState, area: Rect) {
    let mut lines = Vec::with_capacity(FIELDS.len());
    for field in FIELDS.iter().copied().filter(|f| *f != InvoiceField::LineItems) {
        let active = state.editing && state.current_field == field;
        let value = match field {
            InvoiceField::InvoiceDate if active => state.date_state.display(),
            InvoiceField::InvoiceDate => state.data.invoice_date.format("%d/%m/%Y").to_string(),
            _ if active => format!("{}|", state.active_input.replace('\n', " / ")),
            _ => field.text_value(&state.data).replace('\n', " / "),
        };
        lines.push(Spans::from(vec![
            Span::styled(format!("{}: ", field.label()), field_style(state, field)),
            Span::raw(value),
        ]));
    }

    if state.logo_prompt {
        lines.push(Spans::from(vec![
            Span::styled("Logo path: ", Style::default().fg(Color::Yellow)),
            Span::raw(format!("{}|", state.active_input)),
        ]));
    } else if let Some(logo) = &state.data.company_logo {
        lines.push(Spans::from(format!("Logo: {} ({} bytes)", logo.mime, logo.size)));
    }

    let form_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(lines.len() as u16 + 2), // Text fields inside borders
                Constraint::Min(6),                         // Line items
            ]
            .as_ref(),
        )
        .split(area);

    let fields = Paragraph::new(lines).block(Block::default().title("Invoice").borders(Borders::ALL));
    frame.render_widget(fields, form_chunks[0]);

    let title = match state.editing_line_item {
        Some((id, field)) => {
            let value = if field == LineItemField::TaxType {
                state.data.item(id).map(|item| item.tax_type.to_string()).unwrap_or_default()
            } else {
                format!("{}|", state.active_input)
            };
            format!("{} (editing {}): {}", InvoiceField::LineItems.label(), field.label(), value)
        }
        None if state.current_field == InvoiceField::LineItems => {
            format!("{} (selected)", InvoiceField::LineItems.label())
        }
        None => InvoiceField::LineItems.label().to_string(),
    };

    let totals = state.data.totals();
    let mut items: Vec<ListItem> = state
        .data
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let description = if item.description.is_empty() { "Service" } else { item.description.as_str() };
            ListItem::new(format!(
                "{}. {}: {:.2} x {} @ {}% {} = {:.2}",
                index + 1,
                description,
                item.unit_price,
                item.quantity,
                item.tax_rate,
                item.tax_type,
                item.line_grand_total()
            ))
        })
        .collect();
    items.push(ListItem::new(format!(
        "Subtotal {:.2} | Tax {:.2} | Total {:.2}",
        totals.subtotal(),
        totals.total_tax(),
        totals.grand_total()
    )));

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .style(field_style(state, InvoiceField::LineItems)),
        )
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD));

    frame.render_stateful_widget(list, form_chunks[1], &mut state.line_items_list_state);
}

fn render_preview<B: Backend>(frame: &mut Frame<B>, state: &InvoiceFormState, area: Rect) {
    let preview = Paragraph::new(state.preview_text())
        .wrap(Wrap { trim: false })
        .scroll((state.preview_scroll, 0))
        .block(Block::default().title("Preview").borders(Borders::ALL));
    frame.render_widget(preview, area);
}

fn render_status<B: Backend>(frame: &mut Frame<B>, state: &InvoiceFormState, area: Rect) {
    let status = match &state.notice {
        Some(notice) => {
            let color = if notice.is_error { Color::Red } else { Color::Green };
            Paragraph::new(notice.text.clone()).style(Style::default().fg(color))
        }
        None => Paragraph::new(state.help_text()).style(Style::default().fg(Color::Gray)),
    };
    frame.render_widget(status.block(Block::default().borders(Borders::ALL)), area);
}
