//! Policy
//!
//! Embedded configuration for the booking engine. The host constructs
//! one of these at widget start; the defaults match the venue's standard
//! policy.

/// Booking policy knobs.
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    /// Maximum total ticket quantity per booking session.
    pub ticket_cap: u32,

    /// Booking window, in months from today, used when no exhibitions
    /// are loaded.
    pub fallback_window_months: i8,

    /// Section the remote cart re-renders after an add, so externally
    /// rendered cart indicators pick up the change.
    pub cart_section: &'static str,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            ticket_cap: 7,
            fallback_window_months: 9,
            cart_section: "cart-icon-bubble",
        }
    }
}

impl BookingPolicy {
    /// Advisory text shown when an add would exceed the cap.
    #[must_use]
    pub fn cap_message(&self) -> String {
        format!(
            "You can book a maximum of {} tickets per visit.",
            self.ticket_cap
        )
    }
}
