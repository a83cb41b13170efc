use pretty_assertions::assert_eq;
use serde_json::json;

use vertex_portal_api::models::Currency;
use vertex_portal_api::services::rates::RateTable;

#[test]
fn parses_bid_quotes_from_api_payload() {
    let payload = json!({
        "USDBRL": {"code": "USD", "bid": "5.4321", "ask": "5.4350"},
        "EURBRL": {"code": "EUR", "bid": "6.1000", "ask": "6.1100"},
        "CHFBRL": {"code": "CHF", "bid": "6.2500", "ask": "6.2600"}
    });

    let table = RateTable::from_api_json(&payload);
    assert_eq!(table.to_brl(Currency::USD), 5.4321);
    assert_eq!(table.to_brl(Currency::EUR), 6.1);
    assert_eq!(table.to_brl(Currency::CHF), 6.25);
}

#[test]
fn brl_is_always_one() {
    let payload = json!({"USDBRL": {"bid": "5.00"}});
    let table = RateTable::from_api_json(&payload);
    assert_eq!(table.to_brl(Currency::BRL), 1.0);

    assert_eq!(RateTable::empty().to_brl(Currency::BRL), 1.0);
}

#[test]
fn missing_currency_passes_through_at_one() {
    let payload = json!({"USDBRL": {"bid": "5.00"}});
    let table = RateTable::from_api_json(&payload);
    assert_eq!(table.to_brl(Currency::EUR), 1.0);
}

#[test]
fn empty_table_passes_everything_through() {
    let table = RateTable::empty();
    assert!(table.is_empty());
    assert_eq!(table.to_brl(Currency::USD), 1.0);
    assert_eq!(table.to_brl(Currency::CHF), 1.0);
}

#[test]
fn malformed_bid_entries_are_skipped() {
    let payload = json!({
        "USDBRL": {"bid": "not-a-number"},
        "EURBRL": {"ask": "6.10"},
        "CHFBRL": {"bid": "6.25"}
    });

    let table = RateTable::from_api_json(&payload);
    assert_eq!(table.to_brl(Currency::USD), 1.0);
    assert_eq!(table.to_brl(Currency::EUR), 1.0);
    assert_eq!(table.to_brl(Currency::CHF), 6.25);
}

#[test]
fn non_object_payload_yields_empty_table() {
    let table = RateTable::from_api_json(&json!("oops"));
    assert!(table.is_empty());
}
