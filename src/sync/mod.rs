//! Sync
//!
//! Translates the local selection into the remote cart's fixed wire
//! contract. The remote service cannot partially read its own state, so
//! reconciliation is last-write-wins: a bulk add when the remote cart
//! started empty, otherwise a bulk update keyed by variant in which a
//! zero quantity communicates removal.

use std::collections::BTreeMap;

use jiff::civil::Date;
use serde::Serialize;

use crate::{
    availability::exhibition_title_for_date,
    catalog::{Catalog, VariantId},
    ledger::Ledger,
    policy::BookingPolicy,
};

mod client;

pub use client::{CartApi, CartApiError, CartEndpoint, HttpCartApi, MockCartApi};

/// Textual format of the attendance date sent to the remote cart.
const DATE_FORMAT: &str = "%d %B %Y";

/// Body of `POST /cart/add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddBody {
    /// One entry per line item with a positive quantity.
    pub items: Vec<AddItem>,
}

/// One entry in an add request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddItem {
    /// Variant to add.
    pub id: VariantId,

    /// Line-item metadata shown on the remote cart page.
    pub properties: ItemProperties,

    /// Quantity to add.
    pub quantity: u32,

    /// Remote page sections to re-render, so the cart badge updates.
    pub sections: Vec<String>,
}

/// Line-item metadata bundle.
///
/// The gift-aid marker is encoded by presence: it is omitted entirely
/// when no declaration was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemProperties {
    /// Exhibition-and-date label.
    #[serde(rename = "Exhibition")]
    pub exhibition: String,

    /// Attendance date, formatted as `"%d %B %Y"`.
    #[serde(rename = "Date")]
    pub date: String,

    /// `"Yes"` when the visitor declared gift aid.
    #[serde(rename = "Gift Aid", skip_serializing_if = "Option::is_none")]
    pub gift_aid: Option<String>,
}

/// Body of `POST /cart/update`: absolute desired quantities keyed by
/// variant id, zeroes included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateBody {
    /// Desired quantity per variant.
    pub updates: BTreeMap<String, u32>,
}

/// A remote cart operation ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartRequest {
    /// Bulk add of the fresh selection.
    Add(AddBody),

    /// Bulk update of absolute quantities.
    Update(UpdateBody),

    /// Wipe the remote cart; issued once at widget start when the
    /// initial snapshot was non-empty.
    Clear,
}

impl CartRequest {
    /// The operation kind, used to route the completion event.
    #[must_use]
    pub fn kind(&self) -> CartRequestKind {
        match self {
            Self::Add(_) => CartRequestKind::Add,
            Self::Update(_) => CartRequestKind::Update,
            Self::Clear => CartRequestKind::Clear,
        }
    }
}

/// Kind of a remote cart operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartRequestKind {
    /// `POST /cart/add`.
    Add,
    /// `POST /cart/update`.
    Update,
    /// `POST /cart/clear`.
    Clear,
}

/// Build the remote operation committing the current selection.
///
/// Branches on whether the remote cart was empty when the widget
/// started: an add request carries only positive quantities with full
/// metadata; an update request carries every touched variant's absolute
/// quantity, zeroes included. Returns `None` when there is nothing to
/// send.
#[must_use]
pub fn build_commit(
    ledger: &Ledger,
    visit_date: Option<Date>,
    gift_aid_declared: bool,
    remote_cart_was_empty: bool,
    catalog: &Catalog,
    policy: &BookingPolicy,
) -> Option<CartRequest> {
    if remote_cart_was_empty {
        let date = visit_date?;
        let date_text = date.strftime(DATE_FORMAT).to_string();
        let title = exhibition_title_for_date(date, catalog.exhibitions());

        let exhibition = if title.is_empty() {
            date_text.clone()
        } else {
            format!("{title}, {date_text}")
        };

        let items: Vec<AddItem> = ledger
            .items()
            .iter()
            .filter(|item| item.quantity > 0)
            .map(|item| AddItem {
                id: item.variant,
                properties: ItemProperties {
                    exhibition: exhibition.clone(),
                    date: date_text.clone(),
                    gift_aid: gift_aid_declared.then(|| "Yes".to_string()),
                },
                quantity: item.quantity,
                sections: vec![policy.cart_section.to_string()],
            })
            .collect();

        if items.is_empty() {
            return None;
        }

        return Some(CartRequest::Add(AddBody { items }));
    }

    if ledger.is_empty() {
        return None;
    }

    let updates = ledger
        .items()
        .iter()
        .map(|item| (item.variant.to_string(), item.quantity))
        .collect();

    Some(CartRequest::Update(UpdateBody { updates }))
}
