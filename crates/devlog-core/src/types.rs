use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::clock::now_rfc3339;

/// Well-known entry categories.
pub mod category {
    pub const DOCUMENT: &str = "document";
    pub const EDITOR: &str = "editor";
    pub const TERMINAL: &str = "terminal";
    pub const SYSTEM: &str = "system";
    pub const AI_TRACKING: &str = "ai-tracking";
    pub const DATA: &str = "data";
    pub const SYNC: &str = "sync";
    /// Assigned to lines that do not parse as a structured entry.
    pub const LEGACY: &str = "legacy";
}

/// Severity of a log entry. Ordered: `Info < Warn < Error`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }

    /// Uppercase label used by plain-text renderings.
    pub fn label(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    /// Per-level marker glyph for human-facing output.
    pub fn marker(self) -> &'static str {
        match self {
            Level::Info => "📝",
            Level::Warn => "⚠️",
            Level::Error => "❌",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// A single activity entry (one JSONL line in `activity.log`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: Level,
    pub message: String,
    pub category: String,
}

impl LogEntry {
    /// Create an entry stamped with the current UTC instant.
    pub fn new(level: Level, message: impl Into<String>, category: impl Into<String>) -> Self {
        Self::at(now_rfc3339(), level, message, category)
    }

    /// Create an entry with an explicit timestamp.
    pub fn at(
        timestamp: impl Into<String>,
        level: Level,
        message: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            level,
            message: message.into(),
            category: category.into(),
        }
    }

    /// Wrap an unparseable line. The original write time is unknown, so the
    /// read time stands in for it.
    pub fn legacy(raw_line: &str, read_at: &str) -> Self {
        Self::at(read_at, Level::Info, raw_line, category::LEGACY)
    }

    /// One-line rendering for live display sinks:
    /// `[2026-10-19T08:30:00.000Z] 📝 [DOCUMENT] Document opened: src/main.rs`
    pub fn display_line(&self) -> String {
        format!(
            "[{}] {} [{}] {}",
            self.timestamp,
            self.level.marker(),
            self.category.to_uppercase(),
            self.message
        )
    }
}
