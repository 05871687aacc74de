use clap::Subcommand;
use devlog_core::Config;
use devlog_ledger::DevlogPaths;
use devlog_tracker::settings::{parse_value, read_config_map, write_config_map, ConfigMap};
use serde_json::Value;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Set a config value
    Set {
        /// Config key (e.g. logLevel, excludePatterns)
        key: String,
        /// Config value (true/false/number/JSON array/string)
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
}

// ── Dispatch ──

pub fn run(cmd: ConfigCmd, paths: &DevlogPaths) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Set { key, value } => set(paths, &key, &value),
        ConfigCmd::Get { key } => get(paths, &key),
        ConfigCmd::List => list(paths),
    }
}

// ── Command Implementations ──

/// `devlog config set <key> <value>`. Rejects values that would make the
/// typed config unreadable, e.g. `logLevel = loud`.
pub fn set(paths: &DevlogPaths, key: &str, value: &str) -> anyhow::Result<()> {
    let mut config = read_config_map(&paths.config_json)?;
    config.insert(key.to_string(), parse_value(value));
    check(&config).map_err(|e| anyhow::anyhow!("invalid value for {key}: {e}"))?;
    write_config_map(&paths.config_json, &config)?;
    println!("{key} = {value}");
    Ok(())
}

/// `devlog config get <key>`
pub fn get(paths: &DevlogPaths, key: &str) -> anyhow::Result<()> {
    let config = read_config_map(&paths.config_json)?;
    match config.get(key) {
        Some(val) => println!("{val}"),
        None => println!("(not set)"),
    }
    Ok(())
}

/// `devlog config list`
pub fn list(paths: &DevlogPaths) -> anyhow::Result<()> {
    let config = read_config_map(&paths.config_json)?;
    if config.is_empty() {
        println!("(no config set)");
    } else {
        for (k, v) in &config {
            println!("{k} = {v}");
        }
    }
    Ok(())
}

fn check(config: &ConfigMap) -> serde_json::Result<Config> {
    serde_json::from_value(Value::Object(config.clone()))
}
