//! Gift Aid
//!
//! Whether the gift-aid declaration section applies to the current
//! selection. Eligibility is carried by the variant title: any variant
//! whose title mentions gift aid qualifies the basket.

use crate::{catalog::Catalog, ledger::Ledger};

/// Case-insensitive marker in a variant title that makes it eligible.
const GIFT_AID_MARKER: &str = "gift aid";

/// True when at least one line item with a positive quantity is for a
/// gift-aid variant.
#[must_use]
pub fn has_eligible_ticket(catalog: &Catalog, ledger: &Ledger) -> bool {
    ledger.items().iter().any(|item| {
        item.quantity > 0
            && catalog
                .variant(item.variant)
                .is_some_and(|variant| variant.title.to_lowercase().contains(GIFT_AID_MARKER))
    })
}

#[cfg(test)]
mod tests {
    use crate::catalog::{Catalog, RawPayloads, VariantId};

    use super::*;

    fn catalog() -> Catalog {
        Catalog::decode(&RawPayloads {
            exhibitions: "[]",
            closed_dates: "[]",
            variants: r#"[
                {"id": 101, "title": "Adult", "price": 1500},
                {"id": 102, "title": "Adult + GIFT AID", "price": 1650}
            ]"#,
            descriptions: "[]",
            gift_aid: r#"{"heading": "h", "info": "i", "declaration_label": "d"}"#,
        })
        .catalog
    }

    #[test]
    fn plain_tickets_are_not_eligible() {
        let catalog = catalog();
        let mut ledger = Ledger::new();
        ledger.add_one(VariantId(101), 7);

        assert!(!has_eligible_ticket(&catalog, &ledger));
    }

    #[test]
    fn marker_match_is_case_insensitive() {
        let catalog = catalog();
        let mut ledger = Ledger::new();
        ledger.add_one(VariantId(102), 7);

        assert!(has_eligible_ticket(&catalog, &ledger));
    }

    #[test]
    fn zero_quantity_items_do_not_qualify() {
        let catalog = catalog();
        let mut ledger = Ledger::new();
        ledger.add_one(VariantId(102), 7);
        ledger.remove_one(VariantId(102));

        assert!(!has_eligible_ticket(&catalog, &ledger));
    }

    #[test]
    fn unknown_variants_do_not_qualify() {
        let catalog = catalog();
        let mut ledger = Ledger::new();
        ledger.add_one(VariantId(999), 7);

        assert!(!has_eligible_ticket(&catalog, &ledger));
    }
}
