//! Catalog
//!
//! Typed decoding of the payloads the host page embeds for the booking
//! widget: the exhibition list, the closed-date list, the ticket variant
//! list with its optional descriptions, and the gift-aid copy. Each
//! payload decodes independently; a payload that fails to decode is
//! replaced by a safe default so the widget still starts with degraded
//! data.

use std::fmt;

use jiff::civil::Date;
use rustc_hash::FxHashSet;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::Deserialize;

mod records;

use records::{ExhibitionRecord, VariantRecord};

/// Remote-assigned identifier of a purchasable ticket variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct VariantId(pub u64);

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An exhibition run with an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exhibition {
    /// Display title.
    pub title: String,

    /// First day of the run.
    pub start_date: Date,

    /// Last day of the run, inclusive.
    pub end_date: Date,
}

/// A purchasable ticket variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    /// Remote-assigned identifier.
    pub id: VariantId,

    /// Display title, e.g. `"Adult"` or `"Adult + Gift Aid"`.
    pub title: String,

    /// Unit price.
    pub price: Money<'static, Currency>,
}

/// Static gift-aid copy rendered next to the declaration checkbox.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GiftAidCopy {
    /// Section heading.
    pub heading: String,

    /// Explanatory paragraph.
    pub info: String,

    /// Label on the declaration checkbox itself.
    pub declaration_label: String,
}

impl Default for GiftAidCopy {
    fn default() -> Self {
        Self {
            heading: "Gift Aid".to_string(),
            info: String::new(),
            declaration_label: "Add Gift Aid to my tickets".to_string(),
        }
    }
}

/// Which of the load-time payloads a decode fallback refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Exhibition list.
    Exhibitions,
    /// Closed-date list.
    ClosedDates,
    /// Ticket variant list.
    Variants,
    /// Colon-delimited variant descriptions.
    Descriptions,
    /// Gift-aid copy strings.
    GiftAidCopy,
}

/// Record of one payload that failed to decode and was defaulted.
#[derive(Debug)]
pub struct PayloadFallback {
    /// The payload that fell back.
    pub payload: PayloadKind,

    /// The decode error that triggered the fallback.
    pub error: serde_json::Error,
}

/// Raw JSON payloads as embedded by the host page.
#[derive(Debug, Clone, Copy)]
pub struct RawPayloads<'a> {
    /// Exhibition list: `[{"title", "start_date", "end_date"}, ...]`.
    pub exhibitions: &'a str,

    /// Closed dates: `["2026-01-01", ...]`.
    pub closed_dates: &'a str,

    /// Variant list: `[{"id", "title", "price"}, ...]`.
    pub variants: &'a str,

    /// Variant descriptions: `["<id>:<text>", ...]`.
    pub descriptions: &'a str,

    /// Gift-aid copy: `{"heading", "info", "declaration_label"}`.
    pub gift_aid: &'a str,
}

/// Result of decoding all load-time payloads.
#[derive(Debug)]
pub struct CatalogLoad {
    /// The decoded catalog, with defaults substituted where needed.
    pub catalog: Catalog,

    /// One entry per payload that failed to decode.
    pub fallbacks: Vec<PayloadFallback>,
}

/// Everything the booking widget knows at load time.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    exhibitions: Vec<Exhibition>,
    closed_dates: FxHashSet<Date>,
    variants: Vec<Variant>,
    descriptions: Vec<(VariantId, String)>,
    gift_aid: GiftAidCopy,
}

impl Catalog {
    /// Assemble a catalog from already-typed parts.
    #[must_use]
    pub fn new(
        exhibitions: Vec<Exhibition>,
        closed_dates: FxHashSet<Date>,
        variants: Vec<Variant>,
        descriptions: Vec<(VariantId, String)>,
        gift_aid: GiftAidCopy,
    ) -> Self {
        Self {
            exhibitions,
            closed_dates,
            variants,
            descriptions,
            gift_aid,
        }
    }

    /// Decode the load-time payloads, substituting a default for any
    /// payload that fails to decode.
    #[must_use]
    pub fn decode(payloads: &RawPayloads<'_>) -> CatalogLoad {
        let mut fallbacks = Vec::new();

        let exhibition_records: Vec<ExhibitionRecord> =
            decode_or_default(PayloadKind::Exhibitions, payloads.exhibitions, &mut fallbacks);

        let closed_dates: Vec<Date> =
            decode_or_default(PayloadKind::ClosedDates, payloads.closed_dates, &mut fallbacks);

        let variant_records: Vec<VariantRecord> =
            decode_or_default(PayloadKind::Variants, payloads.variants, &mut fallbacks);

        let description_strings: Vec<String> =
            decode_or_default(PayloadKind::Descriptions, payloads.descriptions, &mut fallbacks);

        let gift_aid: GiftAidCopy =
            decode_or_default(PayloadKind::GiftAidCopy, payloads.gift_aid, &mut fallbacks);

        let exhibitions = exhibition_records
            .into_iter()
            .filter_map(|record| {
                if record.start_date > record.end_date {
                    tracing::warn!(
                        title = %record.title,
                        "exhibition starts after it ends, dropping"
                    );
                    return None;
                }

                Some(Exhibition {
                    title: record.title,
                    start_date: record.start_date,
                    end_date: record.end_date,
                })
            })
            .collect();

        let variants = variant_records
            .into_iter()
            .map(|record| Variant {
                id: VariantId(record.id),
                title: record.title,
                price: Money::from_minor(record.price, iso::GBP),
            })
            .collect();

        let descriptions = description_strings
            .iter()
            .filter_map(|entry| parse_description(entry))
            .collect();

        CatalogLoad {
            catalog: Self {
                exhibitions,
                closed_dates: closed_dates.into_iter().collect(),
                variants,
                descriptions,
                gift_aid,
            },
            fallbacks,
        }
    }

    /// Exhibitions in load order.
    #[must_use]
    pub fn exhibitions(&self) -> &[Exhibition] {
        &self.exhibitions
    }

    /// Days the venue is shut.
    #[must_use]
    pub fn closed_dates(&self) -> &FxHashSet<Date> {
        &self.closed_dates
    }

    /// Ticket variants in load order.
    #[must_use]
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Look up a variant by id.
    #[must_use]
    pub fn variant(&self, id: VariantId) -> Option<&Variant> {
        self.variants.iter().find(|variant| variant.id == id)
    }

    /// Free-text description for a variant.
    ///
    /// First entry for the id with non-blank text wins; blank when the id
    /// has no usable entry.
    #[must_use]
    pub fn description_for(&self, id: VariantId) -> &str {
        self.descriptions
            .iter()
            .find(|(entry_id, text)| *entry_id == id && !text.trim().is_empty())
            .map_or("", |(_, text)| text.as_str())
    }

    /// Gift-aid copy.
    #[must_use]
    pub fn gift_aid(&self) -> &GiftAidCopy {
        &self.gift_aid
    }
}

/// Snapshot of the remote cart taken by the host page at widget start.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartSnapshot {
    /// Line items currently in the remote cart.
    #[serde(default)]
    pub items: Vec<SnapshotItem>,
}

impl CartSnapshot {
    /// Decode a snapshot payload, treating a malformed one as empty.
    #[must_use]
    pub fn decode_or_empty(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!(%error, "cart snapshot failed to decode, treating as empty");
                Self::default()
            }
        }
    }

    /// Whether the remote cart held anything at snapshot time.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One remote cart entry in the initial snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotItem {
    /// Server-assigned line-item key.
    pub key: String,

    /// Variant the entry is for.
    pub variant_id: VariantId,

    /// Quantity in the remote cart.
    pub quantity: u32,

    /// Line-item metadata attached by a previous session.
    #[serde(default)]
    pub properties: SnapshotProperties,
}

/// Metadata carried on a snapshot line item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotProperties {
    /// Exhibition-and-date label, when the entry came from this widget.
    #[serde(rename = "Exhibition")]
    pub exhibition: Option<String>,
}

fn decode_or_default<T>(
    kind: PayloadKind,
    raw: &str,
    fallbacks: &mut Vec<PayloadFallback>,
) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(payload = ?kind, %error, "payload failed to decode, using default");
            fallbacks.push(PayloadFallback {
                payload: kind,
                error,
            });
            T::default()
        }
    }
}

fn parse_description(entry: &str) -> Option<(VariantId, String)> {
    let (id, text) = entry.split_once(':')?;
    let id = id.trim().parse().ok()?;

    Some((VariantId(id), text.to_string()))
}
