//! Booking
//!
//! The widget's single source of truth and its event-driven update
//! function. State transitions are synchronous and pure: the reducer
//! takes the current state plus one event and returns the next state
//! with at most one effect for the host to execute.

use jiff::civil::Date;

use crate::{
    availability::exhibition_title_for_date,
    catalog::{CartSnapshot, Catalog, VariantId},
    gift_aid::has_eligible_ticket,
    ledger::{Ledger, QuantityRuling},
    policy::BookingPolicy,
    sync::{CartRequest, CartRequestKind, build_commit},
};

mod session;

pub use session::{BookingSession, SessionOutcome};

/// A discrete external event entering the state machine.
#[derive(Debug, Clone)]
pub enum Event {
    /// The visitor picked a visit date in the calendar.
    DatePicked(Date),

    /// The visitor reset the date selection. The basket is kept.
    DateCleared,

    /// One more unit of a variant.
    Increment(VariantId),

    /// One unit fewer of a variant.
    Decrement(VariantId),

    /// A quantity typed directly into the variant's input field.
    QuantityEntered(VariantId, String),

    /// The gift-aid declaration checkbox was toggled.
    GiftAidToggled,

    /// The book-now button was pressed.
    SubmitPressed,

    /// A remote cart call completed successfully.
    CartSynced(CartRequestKind),

    /// A remote cart call failed.
    CartSyncFailed,
}

/// An action for the host to carry out after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send the request to the remote cart service.
    Sync(CartRequest),

    /// Leave the widget for the remote cart page.
    NavigateToCart,

    /// Force a full page reload so externally rendered cart indicators
    /// re-read the remote state.
    ReloadPage,
}

/// The booking model. Owned by the host runtime; mutated only through
/// [`BookingState::apply`].
#[derive(Debug, Clone)]
pub struct BookingState {
    selected_date: Option<Date>,
    gift_aid_declared: bool,
    remote_cart_was_empty: bool,
    ledger: Ledger,
    message: Option<String>,
    submission_in_flight: bool,
}

impl BookingState {
    /// Build the initial state from the remote cart snapshot.
    ///
    /// When the snapshot is non-empty the state starts with a pending
    /// clear of the remote cart, so entries left by a previous abandoned
    /// session cannot duplicate with this session's selection.
    #[must_use]
    pub fn initialise(snapshot: &CartSnapshot) -> (Self, Option<Effect>) {
        let remote_cart_was_empty = snapshot.is_empty();

        let state = Self {
            selected_date: None,
            gift_aid_declared: false,
            remote_cart_was_empty,
            ledger: Ledger::from_snapshot(snapshot),
            message: None,
            submission_in_flight: !remote_cart_was_empty,
        };

        if remote_cart_was_empty {
            (state, None)
        } else {
            tracing::debug!("remote cart not empty at start, clearing it");
            (state, Some(Effect::Sync(CartRequest::Clear)))
        }
    }

    /// Apply one event, returning the next state and at most one effect.
    #[must_use]
    pub fn apply(
        &self,
        event: Event,
        catalog: &Catalog,
        policy: &BookingPolicy,
    ) -> (Self, Option<Effect>) {
        let mut next = self.clone();

        let effect = match event {
            Event::DatePicked(date) => {
                tracing::debug!(%date, "visit date picked");
                next.selected_date = Some(date);
                None
            }

            Event::DateCleared => {
                // Only the date resets; the basket survives reselection.
                next.selected_date = None;
                None
            }

            Event::Increment(variant) => {
                match next.ledger.add_one(variant, policy.ticket_cap) {
                    QuantityRuling::Accepted => next.message = None,
                    QuantityRuling::CapRefused => {
                        tracing::debug!(%variant, cap = policy.ticket_cap, "add refused at cap");
                        next.message = Some(policy.cap_message());
                    }
                }
                None
            }

            Event::Decrement(variant) => {
                next.ledger.remove_one(variant);
                next.message = None;
                next.enforce_declaration(catalog);
                None
            }

            Event::QuantityEntered(variant, raw) => {
                next.ledger.set_quantity(variant, &raw, policy.ticket_cap);
                next.message = None;
                next.enforce_declaration(catalog);
                None
            }

            Event::GiftAidToggled => {
                if has_eligible_ticket(catalog, &next.ledger) {
                    next.gift_aid_declared = !next.gift_aid_declared;
                }
                None
            }

            Event::SubmitPressed => {
                if next.submission_in_flight {
                    tracing::debug!("submit ignored, a submission is already in flight");
                    None
                } else {
                    let request = build_commit(
                        &next.ledger,
                        next.selected_date,
                        next.gift_aid_declared,
                        next.remote_cart_was_empty,
                        catalog,
                        policy,
                    );

                    if let Some(request) = request {
                        next.submission_in_flight = true;
                        Some(Effect::Sync(request))
                    } else {
                        None
                    }
                }
            }

            Event::CartSynced(kind) => {
                next.submission_in_flight = false;

                match kind {
                    CartRequestKind::Add | CartRequestKind::Update => Some(Effect::NavigateToCart),
                    CartRequestKind::Clear => {
                        next.ledger.clear();
                        Some(Effect::ReloadPage)
                    }
                }
            }

            Event::CartSyncFailed => {
                tracing::error!("remote cart call failed; selection kept for retry");
                next.submission_in_flight = false;
                None
            }
        };

        (next, effect)
    }

    fn enforce_declaration(&mut self, catalog: &Catalog) {
        if self.gift_aid_declared && !has_eligible_ticket(catalog, &self.ledger) {
            self.gift_aid_declared = false;
        }
    }

    /// The selected visit date, when one is picked.
    #[must_use]
    pub fn selected_date(&self) -> Option<Date> {
        self.selected_date
    }

    /// Title of the exhibition covering the selected date; empty when no
    /// date is selected or none covers it.
    #[must_use]
    pub fn exhibition_title<'c>(&self, catalog: &'c Catalog) -> &'c str {
        self.selected_date
            .map_or("", |date| exhibition_title_for_date(date, catalog.exhibitions()))
    }

    /// Whether the ticket selector should render.
    #[must_use]
    pub fn ticket_selector_visible(&self) -> bool {
        self.selected_date.is_some()
    }

    /// The local cart.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Whether the visitor has declared gift aid.
    #[must_use]
    pub fn gift_aid_declared(&self) -> bool {
        self.gift_aid_declared
    }

    /// Whether the remote cart was empty when the widget started.
    #[must_use]
    pub fn remote_cart_was_empty(&self) -> bool {
        self.remote_cart_was_empty
    }

    /// Advisory text to render, when present.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Whether a remote call is outstanding.
    #[must_use]
    pub fn submission_in_flight(&self) -> bool {
        self.submission_in_flight
    }
}
