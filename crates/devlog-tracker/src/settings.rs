//! `config.json` access. The typed [`Config`] is what the tracker reads; the
//! raw map is what `devlog config` and the tracker's own updates write, so
//! keys this version does not know about survive a rewrite.

use anyhow::Context;
use devlog_core::Config;
use serde_json::{Map, Value};
use std::path::Path;

pub type ConfigMap = Map<String, Value>;

/// Typed config. A missing file yields the defaults.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config: {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    Config::from_json_str(&content).with_context(|| format!("parsing config: {}", path.display()))
}

/// Raw key/value view. Returns an empty map if the file doesn't exist.
pub fn read_config_map(path: &Path) -> anyhow::Result<ConfigMap> {
    if !path.exists() {
        return Ok(Map::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config: {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Map::new());
    }
    let val: Value = serde_json::from_str(&content)
        .with_context(|| format!("parsing config: {}", path.display()))?;
    match val {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

pub fn write_config_map(path: &Path, config: &ConfigMap) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    devlog_store::write_atomic(path, json.as_bytes())
        .with_context(|| format!("writing config: {}", path.display()))
}

/// Set several keys in one read-modify-write.
pub fn update_config(path: &Path, updates: Vec<(&str, Value)>) -> anyhow::Result<()> {
    let mut config = read_config_map(path)?;
    for (key, value) in updates {
        config.insert(key.to_string(), value);
    }
    write_config_map(path, &config)
}

/// Parse a command-line value: bool, number, JSON array/object, else string.
pub fn parse_value(s: &str) -> Value {
    match s {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(n) = s.parse::<i64>() {
                Value::Number(n.into())
            } else if let Ok(f) = s.parse::<f64>() {
                serde_json::json!(f)
            } else if s.starts_with('[') || s.starts_with('{') {
                serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.to_string()))
            } else {
                Value::String(s.to_string())
            }
        }
    }
}
