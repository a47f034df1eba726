//! erc-config
//!
//! Layered YAML configuration for the ladder, the reward catalog and the
//! holdings store:
//! - layers are deep-merged in order (later overrides earlier, arrays replace)
//! - the merged document is canonicalized to JSON and hashed (SHA-256, hex)
//! - `decode_catalog` turns the merged document into a validated `Catalog`
//! - `report_unused_keys` flags leaves nothing reads
//!
//! With no layers given, callers fall back to the embedded default catalog.

mod catalog;
mod unused;

pub use catalog::{decode_catalog, load_default_catalog, StoreSettings, DEFAULT_HOLDINGS_PATH};
pub use unused::{consumed_pointers, report_unused_keys, UnusedKeyPolicy, UnusedKeyReport};

use anyhow::{Context, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use tracing::debug;

/// Embedded default ladder + catalog.
pub const DEFAULT_CATALOG_YAML: &str = include_str!("../defaults/catalog.yaml");

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let docs = paths
        .iter()
        .map(|p| fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}")))
        .collect::<Result<Vec<String>>>()?;

    let doc_refs: Vec<&str> = docs.iter().map(String::as_str).collect();
    let loaded = load_layered_yaml_from_strings(&doc_refs)?;
    debug!(layers = paths.len(), config_hash = %loaded.config_hash, "config loaded");
    Ok(loaded)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for (idx, raw) in yaml_docs.iter().enumerate() {
        let v_yaml: serde_yaml::Value =
            serde_yaml::from_str(raw).with_context(|| format!("invalid yaml in layer {idx}"))?;
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

/// The embedded default document, loaded like a single layer.
pub fn load_default() -> Result<LoadedConfig> {
    load_layered_yaml_from_strings(&[DEFAULT_CATALOG_YAML])
}

/// Objects merge key by key; anything else in `overlay` replaces `base`.
/// A `null` overlay leaf replaces too, which lets a layer blank a key.
fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_val) => deep_merge(base_val, overlay_val),
                    None => overlay_val,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// serde_json's default `Map` is ordered by key, so the compact rendering is
/// independent of key order in the source YAML.
fn canonicalize_json(v: &Value) -> Result<String> {
    serde_json::to_string(v).context("canonical json serialize failed")
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
