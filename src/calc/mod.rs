//! Invoice arithmetic: line and invoice totals, and the amount-in-words
//! spelling printed under the summary.
//!
//! Both halves are pure functions with no I/O, safe to call on every
//! keystroke from any thread.

mod totals;
mod words;

pub use totals::{compute_totals, InvoiceTotals};
pub use words::{amount_to_words, amount_to_words_with_subunit, DEFAULT_SUBUNIT};
