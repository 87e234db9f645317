//! Ledger
//!
//! The local cart: one line item per ticket variant, with a global
//! quantity cap across all variants. Exceeding the cap is a policy
//! refusal, not an error; the operation leaves the ledger untouched and
//! the caller surfaces advisory text.

use rusty_money::{
    Money,
    iso::{self, Currency},
};
use smallvec::SmallVec;

use crate::catalog::{Catalog, CartSnapshot, VariantId};

/// One local cart entry.
///
/// `key` is the server-assigned line-item identity and stays empty until
/// the entry has been synced at least once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Remote line-item key; empty for not-yet-synced entries.
    pub key: String,

    /// Variant the entry is for.
    pub variant: VariantId,

    /// Desired quantity. Zero means "remove on the next sync".
    pub quantity: u32,

    /// Exhibition-and-date label carried from the initial snapshot.
    pub date_label: String,
}

/// Outcome of a quantity operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityRuling {
    /// The edit was applied.
    Accepted,

    /// The edit would push the aggregate past the cap; nothing changed.
    CapRefused,
}

/// The set of line items making up the local cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    items: SmallVec<[LineItem; 4]>,
}

impl Ledger {
    /// An empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a ledger from the initial remote cart snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &CartSnapshot) -> Self {
        let items = snapshot
            .items
            .iter()
            .map(|item| LineItem {
                key: item.key.clone(),
                variant: item.variant_id,
                quantity: item.quantity,
                date_label: item.properties.exhibition.clone().unwrap_or_default(),
            })
            .collect();

        Self { items }
    }

    /// Add one unit of `variant`, appending a line item when absent.
    ///
    /// Refused without change when the post-add aggregate would exceed
    /// `cap`.
    pub fn add_one(&mut self, variant: VariantId, cap: u32) -> QuantityRuling {
        if self.aggregate_quantity() + 1 > cap {
            return QuantityRuling::CapRefused;
        }

        match self.items.iter_mut().find(|item| item.variant == variant) {
            Some(item) => item.quantity += 1,
            None => self.items.push(LineItem {
                key: String::new(),
                variant,
                quantity: 1,
                date_label: String::new(),
            }),
        }

        QuantityRuling::Accepted
    }

    /// Remove one unit of `variant`, flooring at zero.
    ///
    /// A zero-quantity line item is retained, not deleted, so the ledger
    /// remembers touched variants until the next sync.
    pub fn remove_one(&mut self, variant: VariantId) {
        if let Some(item) = self.items.iter_mut().find(|item| item.variant == variant) {
            item.quantity = item.quantity.saturating_sub(1);
        }
    }

    /// Set the quantity of `variant` from free-form text.
    ///
    /// Non-numeric text counts as zero. The requested amount is clamped
    /// so the aggregate stays within `cap`. Returns the quantity actually
    /// applied.
    pub fn set_quantity(&mut self, variant: VariantId, raw: &str, cap: u32) -> u32 {
        let requested: u32 = raw.trim().parse().unwrap_or(0);

        let others: u32 = self
            .items
            .iter()
            .filter(|item| item.variant != variant)
            .map(|item| item.quantity)
            .sum();

        let applied = requested.min(cap.saturating_sub(others));

        match self.items.iter_mut().find(|item| item.variant == variant) {
            Some(item) => item.quantity = applied,
            None => self.items.push(LineItem {
                key: String::new(),
                variant,
                quantity: applied,
                date_label: String::new(),
            }),
        }

        applied
    }

    /// Total quantity across all line items.
    #[must_use]
    pub fn aggregate_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Whether the aggregate has reached `cap`.
    #[must_use]
    pub fn reached_cap(&self, cap: u32) -> bool {
        self.aggregate_quantity() >= cap
    }

    /// Quantity currently held for `variant`.
    #[must_use]
    pub fn quantity_of(&self, variant: VariantId) -> u32 {
        self.items
            .iter()
            .find(|item| item.variant == variant)
            .map_or(0, |item| item.quantity)
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Whether any variant has been touched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Price of the current selection.
    ///
    /// Variants missing from the catalog price at zero.
    #[must_use]
    pub fn subtotal(&self, catalog: &Catalog) -> Money<'static, Currency> {
        let minor: i64 = self
            .items
            .iter()
            .filter_map(|item| {
                let variant = catalog.variant(item.variant)?;
                Some(variant.price.to_minor_units() * i64::from(item.quantity))
            })
            .sum();

        Money::from_minor(minor, iso::GBP)
    }
}
