//! Scenario: unused-key lint
//!
//! Validates:
//! 1) Unused keys are reported in Warn mode without error.
//! 2) Unused keys fail in Fail mode with a CONFIG_UNUSED_KEYS code.
//! 3) Keys under consumed prefixes are never flagged.
//! 4) The embedded default document is clean.

use erc_config::{
    load_default, load_layered_yaml_from_strings, report_unused_keys, UnusedKeyPolicy,
};

const YAML_WITH_TYPO: &str = r#"
ladder:
  - tier: 1
    base_currency_cost: 1000
reward:
  - name: "typo'd section"
store:
  holdings_path: "x.json"
  backup: true
"#;

#[test]
fn warn_mode_reports_unused_keys_without_error() {
    let loaded = load_layered_yaml_from_strings(&[YAML_WITH_TYPO]).unwrap();
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)
        .expect("warn mode must not error");

    assert!(!report.is_clean());
    assert_eq!(
        report.unused_leaf_pointers,
        vec!["/reward/0/name".to_string(), "/store/backup".to_string()],
        "sorted, and nothing under /ladder or /store/holdings_path"
    );
}

#[test]
fn fail_mode_errors_on_unused_keys() {
    let loaded = load_layered_yaml_from_strings(&[YAML_WITH_TYPO]).unwrap();
    let err = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("CONFIG_UNUSED_KEYS"), "got: {msg}");
    assert!(msg.contains("/reward/0/name"), "got: {msg}");
}

#[test]
fn default_document_is_clean() {
    let loaded = load_default().unwrap();
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail)
        .expect("default catalog must not carry unused keys");
    assert!(report.is_clean());
    assert_eq!(
        report.consumed_prefixes,
        vec![
            "/ladder".to_string(),
            "/rewards".to_string(),
            "/store/holdings_path".to_string()
        ]
    );
}
