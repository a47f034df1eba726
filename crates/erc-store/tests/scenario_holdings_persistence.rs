//! Scenario: holdings persistence
//!
//! # Invariants under test
//!
//! 1. A missing state file loads as empty holdings for every ladder tier.
//! 2. save → load round-trips, parent directories are created.
//! 3. The legacy `{ep, items}` layout is read.
//! 4. Malformed or negative files fail `load` and degrade in `load_or_empty`.
//! 5. Tiers the ladder does not define are dropped.

use erc_engine::{tiers, ConversionRule, Holdings, Ladder};
use erc_store::HoldingsStore;

fn ladder() -> Ladder {
    Ladder::new(vec![
        ConversionRule::base_only(1, 1000),
        ConversionRule::new(2, tiers([(1, 15)]), 2000),
        ConversionRule::new(3, tiers([(1, 30), (2, 15)]), 2500),
    ])
    .unwrap()
}

#[test]
fn missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = HoldingsStore::new(dir.path().join("inventory_state.json"));
    assert!(!store.exists());

    let h = store.load(&ladder()).unwrap();
    assert_eq!(h, Holdings::new(0, tiers([(1, 0), (2, 0), (3, 0)])));
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = HoldingsStore::new(dir.path().join("nested").join("state.json"));
    let h = Holdings::new(50_000, tiers([(1, 600), (2, 3), (3, 0)]));

    store.save(&h).unwrap();
    assert!(store.exists());
    assert_eq!(store.load(&ladder()).unwrap(), h);

    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert!(raw.ends_with("}\n"));
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v["base_currency"], 50_000);
    assert_eq!(v["tiers"]["1"], 600);
}

#[test]
fn legacy_layout_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory_state.json");
    std::fs::write(&path, r#"{ "ep": 12000, "items": [0, 5, 6, 7, 8, 9] }"#).unwrap();

    let h = HoldingsStore::new(&path).load(&ladder()).unwrap();
    assert_eq!(h.base_currency, 12_000);
    assert_eq!(h.tiers, tiers([(1, 5), (2, 6), (3, 7)]), "tiers 4 and 5 are not in this ladder");
}

#[test]
fn partial_file_fills_missing_tiers_with_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("s.json");
    std::fs::write(&path, r#"{ "base_currency": 7, "tiers": { "2": 4 } }"#).unwrap();

    let h = HoldingsStore::new(&path).load(&ladder()).unwrap();
    assert_eq!(h, Holdings::new(7, tiers([(1, 0), (2, 4), (3, 0)])));
}

#[test]
fn malformed_file_fails_load_but_degrades_gracefully() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("s.json");
    std::fs::write(&path, "{ not json").unwrap();
    let store = HoldingsStore::new(&path);

    let err = store.load(&ladder()).unwrap_err();
    assert!(format!("{err:#}").contains("not valid JSON"));
    assert_eq!(store.load_or_empty(&ladder()), Holdings::empty(&ladder()));
}

#[test]
fn negative_values_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("s.json");
    std::fs::write(&path, r#"{ "base_currency": 10, "tiers": { "1": -3 } }"#).unwrap();
    let store = HoldingsStore::new(&path);

    let err = store.load(&ladder()).unwrap_err();
    assert!(err.to_string().contains("HOLDINGS_NEGATIVE_VALUE"));

    let bad = Holdings {
        base_currency: -1,
        tiers: tiers([(1, 0)]),
    };
    assert!(store.save(&bad).is_err());
}

#[test]
fn bad_tier_key_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("s.json");
    std::fs::write(&path, r#"{ "base_currency": 10, "tiers": { "gold": 1 } }"#).unwrap();

    let err = HoldingsStore::new(&path).load(&ladder()).unwrap_err();
    assert!(format!("{err:#}").contains("'gold'"));
}
