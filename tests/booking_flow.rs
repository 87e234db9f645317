//! End-to-end booking flows through the reducer and the wire encoding.

use atrium::prelude::*;
use jiff::civil::date;
use serde_json::json;
use testresult::TestResult;

fn catalog() -> Catalog {
    Catalog::decode(&RawPayloads {
        exhibitions: r#"[
            {"title": "Light and Water", "start_date": "2026-03-01", "end_date": "2026-06-30"},
            {"title": "Bronze Age", "start_date": "2026-05-01", "end_date": "2026-09-30"}
        ]"#,
        closed_dates: r#"["2026-05-04"]"#,
        variants: r#"[
            {"id": 101, "title": "Adult", "price": 1500},
            {"id": 102, "title": "Adult + Gift Aid", "price": 1650},
            {"id": 103, "title": "Concession", "price": 900}
        ]"#,
        descriptions: r#"["101:Standard entry"]"#,
        gift_aid: r#"{"heading": "Gift Aid it", "info": "25p per pound.", "declaration_label": "I am a UK taxpayer"}"#,
    })
    .catalog
}

fn drive(
    state: BookingState,
    events: impl IntoIterator<Item = Event>,
) -> (BookingState, Option<Effect>) {
    let catalog = catalog();
    let policy = BookingPolicy::default();

    let mut state = state;
    let mut last_effect = None;
    for event in events {
        let (next, effect) = state.apply(event, &catalog, &policy);
        state = next;
        last_effect = effect;
    }

    (state, last_effect)
}

#[test]
fn fresh_cart_books_three_adults() -> TestResult {
    let (state, effect) = BookingState::initialise(&CartSnapshot::default());
    assert!(effect.is_none());

    let (state, effect) = drive(
        state,
        [
            Event::DatePicked(date(2026, 5, 2)),
            Event::Increment(VariantId(101)),
            Event::Increment(VariantId(101)),
            Event::Increment(VariantId(101)),
            Event::SubmitPressed,
        ],
    );

    let Some(Effect::Sync(CartRequest::Add(body))) = &effect else {
        panic!("expected an add sync, got {effect:?}");
    };

    assert_eq!(
        serde_json::to_value(&body)?,
        json!({
            "items": [{
                "id": 101,
                "properties": {
                    "Exhibition": "Light and Water, 02 May 2026",
                    "Date": "02 May 2026"
                },
                "quantity": 3,
                "sections": ["cart-icon-bubble"]
            }]
        })
    );
    assert!(state.submission_in_flight());

    Ok(())
}

#[test]
fn carried_over_cart_communicates_removal_with_a_zero() -> TestResult {
    let snapshot = CartSnapshot::decode_or_empty(
        r#"{"items": [{"key": "li-1", "variant_id": 202, "quantity": 2,
                       "properties": {"Exhibition": "Bronze Age, 01 June 2026"}}]}"#,
    );

    let (state, effect) = BookingState::initialise(&snapshot);
    assert_eq!(effect, Some(Effect::Sync(CartRequest::Clear)));
    assert!(!state.remote_cart_was_empty());

    // Drive on without the clear completing; the visitor empties the line.
    let (_, effect) = drive(
        state,
        [
            Event::CartSyncFailed,
            Event::DatePicked(date(2026, 5, 2)),
            Event::QuantityEntered(VariantId(202), "0".to_string()),
            Event::SubmitPressed,
        ],
    );

    let Some(Effect::Sync(CartRequest::Update(body))) = &effect else {
        panic!("expected an update sync, got {effect:?}");
    };

    assert_eq!(serde_json::to_value(&body)?, json!({"updates": {"202": 0}}));

    Ok(())
}

#[test]
fn cap_fills_to_exactly_seven_then_refuses() {
    let (state, _) = BookingState::initialise(&CartSnapshot::default());

    let (state, _) = drive(
        state,
        [
            Event::DatePicked(date(2026, 5, 2)),
            Event::QuantityEntered(VariantId(101), "6".to_string()),
            Event::Increment(VariantId(103)),
        ],
    );

    assert_eq!(state.ledger().aggregate_quantity(), 7);
    assert!(state.message().is_none());

    let ledger_before = state.ledger().clone();
    let (state, _) = drive(state, [Event::Increment(VariantId(102))]);

    assert_eq!(state.ledger(), &ledger_before, "a refused add changes nothing");
    assert_eq!(
        state.message(),
        Some("You can book a maximum of 7 tickets per visit.")
    );
}

#[test]
fn gift_aid_declaration_rides_the_add_request() -> TestResult {
    let (state, _) = BookingState::initialise(&CartSnapshot::default());

    let (_, effect) = drive(
        state,
        [
            Event::DatePicked(date(2026, 5, 2)),
            Event::Increment(VariantId(102)),
            Event::GiftAidToggled,
            Event::SubmitPressed,
        ],
    );

    let Some(Effect::Sync(CartRequest::Add(body))) = &effect else {
        panic!("expected an add sync, got {effect:?}");
    };

    let value = serde_json::to_value(&body)?;
    assert_eq!(value["items"][0]["properties"]["Gift Aid"], json!("Yes"));

    Ok(())
}

#[test]
fn removing_every_gift_aid_ticket_drops_the_declaration_from_the_request() -> TestResult {
    let (state, _) = BookingState::initialise(&CartSnapshot::default());

    let (state, effect) = drive(
        state,
        [
            Event::DatePicked(date(2026, 5, 2)),
            Event::Increment(VariantId(102)),
            Event::Increment(VariantId(101)),
            Event::GiftAidToggled,
            Event::Decrement(VariantId(102)),
            Event::SubmitPressed,
        ],
    );

    assert!(!state.gift_aid_declared());

    let Some(Effect::Sync(CartRequest::Add(body))) = &effect else {
        panic!("expected an add sync, got {effect:?}");
    };

    let value = serde_json::to_value(&body)?;
    assert!(
        value["items"][0]["properties"].get("Gift Aid").is_none(),
        "no declaration may survive without an eligible ticket"
    );

    Ok(())
}

#[test]
fn closed_date_is_not_selectable_even_inside_an_exhibition_run() {
    let catalog = catalog();
    let policy = BookingPolicy::default();
    let today = date(2026, 4, 1);

    let bound = last_bookable_exclusive(
        catalog.exhibitions(),
        today,
        policy.fallback_window_months,
    );

    assert!(!is_date_selectable(
        date(2026, 5, 4),
        today,
        catalog.closed_dates(),
        bound
    ));
    assert!(is_date_selectable(
        date(2026, 5, 5),
        today,
        catalog.closed_dates(),
        bound
    ));
}

#[test]
fn basket_survives_a_date_reselection() {
    let (state, _) = BookingState::initialise(&CartSnapshot::default());

    let (state, _) = drive(
        state,
        [
            Event::DatePicked(date(2026, 5, 2)),
            Event::Increment(VariantId(101)),
            Event::DateCleared,
            Event::DatePicked(date(2026, 6, 10)),
        ],
    );

    assert_eq!(state.ledger().quantity_of(VariantId(101)), 1);
    assert_eq!(state.selected_date(), Some(date(2026, 6, 10)));
}
