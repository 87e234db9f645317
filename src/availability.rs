//! Availability
//!
//! Pure date-selectability rules for the booking calendar. A visit date
//! must be on or after today, not a closed day, and inside the booking
//! window derived from the loaded exhibition runs.

use jiff::{Span, civil::Date};
use rustc_hash::FxHashSet;

use crate::catalog::Exhibition;

/// Whether `candidate` can be offered in the calendar.
///
/// `last_bookable_exclusive` is the first date that is no longer
/// bookable; see [`last_bookable_exclusive`].
#[must_use]
pub fn is_date_selectable(
    candidate: Date,
    today: Date,
    closed_dates: &FxHashSet<Date>,
    last_bookable_exclusive: Date,
) -> bool {
    candidate >= today && !closed_dates.contains(&candidate) && candidate < last_bookable_exclusive
}

/// First date past the end of the booking window.
///
/// The day after the latest exhibition end date, or `today` plus
/// `fallback_window_months` when no exhibitions are loaded.
#[must_use]
pub fn last_bookable_exclusive(
    exhibitions: &[Exhibition],
    today: Date,
    fallback_window_months: i8,
) -> Date {
    exhibitions
        .iter()
        .map(|exhibition| exhibition.end_date)
        .max()
        .map_or_else(
            || today.saturating_add(Span::new().months(fallback_window_months)),
            |latest_end| latest_end.saturating_add(Span::new().days(1)),
        )
}

/// Title of the first exhibition, in load order, whose run contains
/// `date`; empty when none does.
///
/// Load order decides which title shows when runs overlap. Never feed
/// this a display-sorted list.
#[must_use]
pub fn exhibition_title_for_date(date: Date, exhibitions: &[Exhibition]) -> &str {
    exhibitions
        .iter()
        .find(|exhibition| exhibition.start_date <= date && date <= exhibition.end_date)
        .map_or("", |exhibition| exhibition.title.as_str())
}

/// Exhibitions ordered by start date, for display only.
#[must_use]
pub fn sorted_for_display(exhibitions: &[Exhibition]) -> Vec<&Exhibition> {
    let mut sorted: Vec<&Exhibition> = exhibitions.iter().collect();
    sorted.sort_by_key(|exhibition| exhibition.start_date);
    sorted
}
