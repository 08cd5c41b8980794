use crate::error::{InvoiceError, Result};

const ONES: [&str; 20] = [
    "", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Short-scale names for each group of three digits, least significant first.
const SCALES: [&str; 5] = ["", "thousand", "million", "billion", "trillion"];

/// Name of the 1/100 unit appended after "and".
pub const DEFAULT_SUBUNIT: &str = "paise";

/// Largest whole-unit value with a scale word available.
pub const MAX_WHOLE_UNITS: u64 = 999_999_999_999_999;

/// Spell `amount` in English words with [`DEFAULT_SUBUNIT`] for the
/// fractional part.
///
/// ```text
/// 1234.56  -> "one thousand two hundred thirty four and fifty six paise"
/// -5       -> "minus five"
/// 0        -> "zero"
/// ```
pub fn amount_to_words(amount: f64) -> Result<String> {
    amount_to_words_with_subunit(amount, DEFAULT_SUBUNIT)
}

/// Spell `amount` in English words, naming the fractional part `subunit`.
///
/// The amount is scaled to subunits with `f64::round`, which rounds halves
/// away from zero. The rounding sees the binary product, so `0.125` becomes 13
/// subunits while `1.005` (stored just below 1.005) becomes 100.
///
/// Fails on NaN and infinities, and on amounts whose whole part exceeds
/// [`MAX_WHOLE_UNITS`].
pub fn amount_to_words_with_subunit(amount: f64, subunit: &str) -> Result<String> {
    if !amount.is_finite() {
        return Err(InvoiceError::NonFiniteAmount(amount));
    }
    if amount == 0.0 {
        return Ok("zero".to_string());
    }
    if amount < 0.0 {
        let positive = amount_to_words_with_subunit(-amount, subunit)?;
        return Ok(format!("minus {}", positive));
    }

    let scaled = (amount * 100.0).round();
    if scaled >= ((MAX_WHOLE_UNITS + 1) * 100) as f64 {
        return Err(InvoiceError::AmountOutOfRange {
            amount,
            max: MAX_WHOLE_UNITS,
        });
    }

    let total_subunits = scaled as u64;
    let units = total_subunits / 100;
    let subunits = total_subunits % 100;

    let mut words = whole_units_to_words(units);
    if subunits > 0 {
        words.push_str(" and ");
        words.push_str(&hundreds_to_words(subunits));
        words.push(' ');
        words.push_str(subunit);
    }

    Ok(words.trim().to_string())
}

fn whole_units_to_words(units: u64) -> String {
    if units == 0 {
        return "zero".to_string();
    }

    let mut groups = Vec::with_capacity(SCALES.len());
    let mut remaining = units;
    for scale in SCALES {
        if remaining == 0 {
            break;
        }
        let chunk = remaining % 1000;
        // Zero chunks are skipped entirely: never "zero thousand".
        if chunk != 0 {
            let chunk_words = hundreds_to_words(chunk);
            if scale.is_empty() {
                groups.push(chunk_words);
            } else {
                groups.push(format!("{} {}", chunk_words, scale));
            }
        }
        remaining /= 1000;
    }

    groups.reverse();
    groups.join(" ")
}

/// 1..=999 to words. Zero yields an empty string; callers never ask for it.
fn hundreds_to_words(mut n: u64) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(4);

    if n > 99 {
        parts.push(ONES[(n / 100) as usize]);
        parts.push("hundred");
        n %= 100;
    }
    if n > 19 {
        parts.push(TENS[(n / 10) as usize]);
        n %= 10;
    }
    if n > 0 {
        parts.push(ONES[n as usize]);
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::compute_totals;
    use crate::models::{LineItem, TaxType};

    fn words(amount: f64) -> String {
        amount_to_words(amount).unwrap()
    }

    #[test]
    fn test_zero() {
        assert_eq!(words(0.0), "zero");
        assert_eq!(words(-0.0), "zero");
    }

    #[test]
    fn test_round_numbers() {
        assert_eq!(words(100.0), "one hundred");
        assert_eq!(words(1000.0), "one thousand");
        assert_eq!(words(1_000_000.0), "one million");
        assert_eq!(words(2_000_000_000_000.0), "two trillion");
    }

    #[test]
    fn test_teens_and_tens() {
        assert_eq!(words(7.0), "seven");
        assert_eq!(words(13.0), "thirteen");
        assert_eq!(words(19.0), "nineteen");
        assert_eq!(words(20.0), "twenty");
        assert_eq!(words(45.0), "forty five");
        assert_eq!(words(110.0), "one hundred ten");
        assert_eq!(words(999.0), "nine hundred ninety nine");
    }

    #[test]
    fn test_units_and_subunits() {
        assert_eq!(
            words(1234.56),
            "one thousand two hundred thirty four and fifty six paise"
        );
        assert_eq!(words(0.5), "zero and fifty paise");
        assert_eq!(words(12.07), "twelve and seven paise");
    }

    #[test]
    fn test_negative_amounts_are_prefixed() {
        assert_eq!(words(-5.0), format!("minus {}", words(5.0)));
        assert_eq!(words(-5.0), "minus five");
        assert_eq!(words(-1234.56), format!("minus {}", words(1234.56)));
    }

    #[test]
    fn test_zero_chunks_are_skipped() {
        assert_eq!(words(1_000_000_001.0), "one billion one");
        assert_eq!(words(1_000_001_000.0), "one billion one thousand");
        assert_eq!(words(5_000_000_020.0), "five billion twenty");
    }

    #[test]
    fn test_every_scale_tier() {
        assert_eq!(
            words(123_456_789_012_345.0),
            "one hundred twenty three trillion four hundred fifty six billion \
             seven hundred eighty nine million twelve thousand three hundred forty five"
        );
        assert_eq!(words(123_000_000_000_000.0), "one hundred twenty three trillion");
    }

    /// Western short-scale grouping is paired with the "paise" subunit.
    /// Kept deliberately: 100000 is never spelled "one lakh".
    #[test]
    fn test_short_scale_grouping_with_paise_subunit() {
        assert_eq!(words(100_000.0), "one hundred thousand");
        assert_eq!(words(10_000_000.0), "ten million");
        assert_eq!(words(100_000.25), "one hundred thousand and twenty five paise");
    }

    #[test]
    fn test_custom_subunit() {
        assert_eq!(
            amount_to_words_with_subunit(3.99, "cents").unwrap(),
            "three and ninety nine cents"
        );
        assert_eq!(amount_to_words_with_subunit(3.0, "cents").unwrap(), "three");
    }

    /// Rounding policy: halves round away from zero, applied to the binary
    /// value of `amount * 100`.
    #[test]
    fn test_half_subunit_boundary() {
        // 0.125 and 0.005 scale to exact halves and round up.
        assert_eq!(words(0.125), "zero and thirteen paise");
        assert_eq!(words(0.005), "zero and one paise");
        // Symmetric for negatives: the sign is stripped before rounding.
        assert_eq!(words(-0.125), "minus zero and thirteen paise");
        // 1.005 is stored just below the half and its product stays below it.
        assert_eq!(words(1.005), "one");
        assert_eq!(words(1.015), "one and one paise");
        // A remainder that rounds to 100 subunits carries into the units.
        assert_eq!(words(9.999), "ten");
    }

    #[test]
    fn test_below_half_subunit_is_zero() {
        assert_eq!(words(0.004), "zero");
        assert_eq!(words(-0.004), "minus zero");
    }

    #[test]
    fn test_non_finite_amounts_fail() {
        assert!(matches!(
            amount_to_words(f64::NAN),
            Err(InvoiceError::NonFiniteAmount(_))
        ));
        assert!(matches!(
            amount_to_words(f64::INFINITY),
            Err(InvoiceError::NonFiniteAmount(_))
        ));
        assert!(matches!(
            amount_to_words(f64::NEG_INFINITY),
            Err(InvoiceError::NonFiniteAmount(_))
        ));
    }

    #[test]
    fn test_beyond_trillions_fails() {
        let err = amount_to_words(1e15).unwrap_err();
        assert!(matches!(
            err,
            InvoiceError::AmountOutOfRange { max: MAX_WHOLE_UNITS, .. }
        ));
        assert!(amount_to_words(-2e15).is_err());
    }

    #[test]
    fn test_is_deterministic() {
        assert_eq!(words(98_765.43), words(98_765.43));
    }

    #[test]
    fn test_no_stray_whitespace() {
        for amount in [1.0, 20.0, 100.0, 101.0, 120.0, 1000.01, 1_000_000.1] {
            let spelled = words(amount);
            assert_eq!(spelled, spelled.trim());
            assert!(!spelled.contains("  "), "double space in {:?}", spelled);
        }
    }

    #[test]
    fn test_invoice_grand_total_in_words() {
        let items = [
            LineItem {
                unit_price: 100.0,
                quantity: 2,
                tax_rate: 9.0,
                tax_type: TaxType::Cgst,
                ..LineItem::new(1)
            },
            LineItem {
                unit_price: 50.0,
                quantity: 1,
                tax_rate: 0.0,
                tax_type: TaxType::Igst,
                ..LineItem::new(2)
            },
        ];
        let totals = compute_totals(&items);
        assert_eq!(totals.subtotal(), 250.0);
        assert_eq!(totals.total_tax(), 18.0);
        assert_eq!(totals.grand_total(), 268.0);
        assert_eq!(words(totals.grand_total()), "two hundred sixty eight");
    }
}
