//! Typed view of `config.json` in the store root.
//!
//! Every key is optional; missing keys take their defaults, unknown keys are
//! ignored so `devlog config set` can store anything.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::Level;

/// Output format of a log export.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[serde(rename = "json")]
    Json,
    #[default]
    #[serde(rename = "md", alias = "markdown")]
    Markdown,
    #[serde(rename = "txt", alias = "text")]
    Text,
}

impl ExportFormat {
    /// File extension of an export in this format.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
            ExportFormat::Text => "txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "txt" | "text" => Ok(ExportFormat::Text),
            other => Err(format!("unknown export format: {other} (expected md, json or txt)")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub enabled: bool,
    pub log_level: Level,
    pub exclude_patterns: Vec<String>,
    pub export_format: ExportFormat,
    pub auto_export_daily: bool,
    pub last_export_date: String,
    pub show_in_status_bar: bool,
    pub log_document_events: bool,
    pub log_editor_events: bool,
    pub log_terminal_events: bool,
    pub default_individual: String,
    pub default_team: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_sheet_path: Option<String>,
    pub auto_sync: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: Level::Info,
            exclude_patterns: Vec::new(),
            export_format: ExportFormat::Markdown,
            auto_export_daily: false,
            last_export_date: String::new(),
            show_in_status_bar: true,
            log_document_events: true,
            log_editor_events: true,
            log_terminal_events: true,
            default_individual: String::new(),
            default_team: String::new(),
            team_sheet_path: None,
            auto_sync: false,
        }
    }
}

impl Config {
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Whether an entry at `level` passes the `logLevel` threshold.
    pub fn records(&self, level: Level) -> bool {
        level >= self.log_level
    }

    /// Whether `path` matches one of the exclude patterns. Glob stars are
    /// stripped and the remainder is matched as a substring, so
    /// `**/node_modules/**` excludes any path containing `/node_modules/`.
    /// A pattern made only of stars matches nothing.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude_patterns.iter().any(|pattern| {
            let needle = pattern.replace('*', "");
            !needle.is_empty() && path.contains(needle.as_str())
        })
    }

    /// Configured team sheet path, ignoring blank values.
    pub fn team_sheet(&self) -> Option<&str> {
        self.team_sheet_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg = Config::from_json_str("{}").unwrap();
        assert_eq!(cfg, Config::default());
        assert!(cfg.enabled);
        assert_eq!(cfg.export_format, ExportFormat::Markdown);
    }

    #[test]
    fn camel_case_keys_and_aliases() {
        let cfg = Config::from_json_str(
            r#"{"enabled":false,"logLevel":"warn","exportFormat":"text","excludePatterns":["**/target/**"],"unknownKey":1}"#,
        )
        .unwrap();
        assert!(!cfg.enabled);
        assert_eq!(cfg.log_level, Level::Warn);
        assert_eq!(cfg.export_format, ExportFormat::Text);
        assert_eq!(cfg.exclude_patterns, vec!["**/target/**".to_string()]);
    }

    #[test]
    fn level_threshold() {
        let cfg = Config {
            log_level: Level::Warn,
            ..Config::default()
        };
        assert!(!cfg.records(Level::Info));
        assert!(cfg.records(Level::Warn));
        assert!(cfg.records(Level::Error));
    }

    #[test]
    fn exclude_patterns_strip_stars() {
        let cfg = Config {
            exclude_patterns: vec!["**/node_modules/**".into(), "*.lock".into()],
            ..Config::default()
        };
        assert!(cfg.is_excluded("/repo/node_modules/pkg/index.js"));
        assert!(cfg.is_excluded("/repo/Cargo.lock"));
        assert!(!cfg.is_excluded("/repo/src/main.rs"));
    }

    #[test]
    fn blank_team_sheet_is_none() {
        let cfg = Config {
            team_sheet_path: Some("  ".into()),
            ..Config::default()
        };
        assert_eq!(cfg.team_sheet(), None);
    }

    #[test]
    fn export_format_from_str() {
        assert_eq!("markdown".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("pdf".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Text.extension(), "txt");
    }
}
