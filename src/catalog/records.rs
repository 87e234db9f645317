//! Raw catalog payload records.

use jiff::civil::Date;
use serde::Deserialize;

/// Exhibition entry as it arrives in the exhibitions payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ExhibitionRecord {
    pub title: String,
    pub start_date: Date,
    pub end_date: Date,
}

/// Ticket variant entry as it arrives in the variant payload.
///
/// Prices are minor currency units.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantRecord {
    pub id: u64,
    pub title: String,
    pub price: i64,
}
