use devlog_core::{Level, LogEntry};
use serde::Serialize;
use std::collections::HashSet;

/// Counts by level plus distinct categories in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub info: usize,
    pub warn: usize,
    pub error: usize,
    pub categories: Vec<String>,
}

pub fn summarize(entries: &[LogEntry]) -> Summary {
    let mut summary = Summary {
        total: entries.len(),
        ..Summary::default()
    };
    let mut seen: HashSet<&str> = HashSet::new();
    for e in entries {
        match e.level {
            Level::Info => summary.info += 1,
            Level::Warn => summary.warn += 1,
            Level::Error => summary.error += 1,
        }
        if seen.insert(e.category.as_str()) {
            summary.categories.push(e.category.clone());
        }
    }
    summary
}
