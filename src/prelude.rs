//! Atrium prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    availability::{
        exhibition_title_for_date, is_date_selectable, last_bookable_exclusive, sorted_for_display,
    },
    booking::{BookingSession, BookingState, Effect, Event, SessionOutcome},
    catalog::{
        CartSnapshot, Catalog, CatalogLoad, Exhibition, GiftAidCopy, PayloadFallback, PayloadKind,
        RawPayloads, Variant, VariantId,
    },
    gift_aid::has_eligible_ticket,
    ledger::{Ledger, LineItem, QuantityRuling},
    policy::BookingPolicy,
    sync::{
        AddBody, AddItem, CartApi, CartApiError, CartEndpoint, CartRequest, CartRequestKind,
        HttpCartApi, ItemProperties, UpdateBody, build_commit,
    },
};
