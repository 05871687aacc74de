use devlog_core::clock::time_of_day;
use devlog_core::{ExportFormat, LogEntry};
use std::collections::HashMap;
use time::UtcOffset;

use crate::summary::Summary;

const REPORT_TITLE: &str = "Devlog Report";

/// Render `entries` in `format`. `date` goes into the report header; times of
/// day are shown at `offset`.
pub fn export(
    entries: &[LogEntry],
    summary: &Summary,
    format: ExportFormat,
    date: &str,
    offset: UtcOffset,
) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => serde_json::to_string_pretty(entries),
        ExportFormat::Markdown => Ok(render_markdown(entries, summary, date, offset)),
        ExportFormat::Text => Ok(render_text(entries, summary, date, offset)),
    }
}

// ── Markdown ──

/// Header, summary block, then one section per category in first-seen order.
pub fn render_markdown(
    entries: &[LogEntry],
    summary: &Summary,
    date: &str,
    offset: UtcOffset,
) -> String {
    let mut out = format!("# 📊 {REPORT_TITLE} - {date}\n\n");
    out.push_str("## 📈 Summary\n");
    out.push_str(&format!("- **Total Events**: {}\n", summary.total));
    out.push_str(&format!(
        "- **Info**: {} | **Warnings**: {} | **Errors**: {}\n",
        summary.info, summary.warn, summary.error
    ));
    out.push_str(&format!(
        "- **Categories**: {}",
        summary.categories.join(", ")
    ));
    out.push_str("\n\n## 📋 Detailed Logs\n\n");

    for (category, group) in group_by_category(entries) {
        out.push_str(&format!("### {} Events\n\n", capitalize(category)));
        for e in group {
            out.push_str(&format!(
                "- **{}** {} {}\n",
                time_of_day(&e.timestamp, offset),
                e.level.marker(),
                e.message
            ));
        }
        out.push('\n');
    }
    out
}

/// Group entries by category, keeping first-seen category order and file
/// order within each group.
fn group_by_category(entries: &[LogEntry]) -> Vec<(&str, Vec<&LogEntry>)> {
    let mut groups: Vec<(&str, Vec<&LogEntry>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for e in entries {
        let slot = *index.entry(e.category.as_str()).or_insert_with(|| {
            groups.push((e.category.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(e);
    }
    groups
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ── Plain text ──

/// Flat listing in file order: `[HH:MM:SS] [LEVEL] [CATEGORY] message`.
pub fn render_text(
    entries: &[LogEntry],
    summary: &Summary,
    date: &str,
    offset: UtcOffset,
) -> String {
    let mut out = format!("{REPORT_TITLE} - {date}\n");
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");
    out.push_str("Summary:\n");
    out.push_str(&format!("Total Events: {}\n", summary.total));
    out.push_str(&format!(
        "Info: {} | Warnings: {} | Errors: {}\n",
        summary.info, summary.warn, summary.error
    ));
    out.push_str(&format!("Categories: {}", summary.categories.join(", ")));
    out.push_str("\n\nDetailed Logs:\n");
    out.push_str(&"-".repeat(20));
    out.push_str("\n\n");

    for e in entries {
        out.push_str(&format!(
            "[{}] [{}] [{}] {}\n",
            time_of_day(&e.timestamp, offset),
            e.level.label(),
            e.category.to_uppercase(),
            e.message
        ));
    }
    out
}
