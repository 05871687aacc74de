//! CSV rendering of usage entries for the team sheet.
//!
//! Quoting follows RFC 4180: a field is quoted when it contains a comma, a
//! double quote, CR or LF; inner quotes are doubled. Every record ends with
//! `\n`.

use crate::entry::AiUsageEntry;

pub const HEADER: &str = "Individual,Team,Date,JIRA ticket,Experiment Summary,Tools and Model Used,Notable Outcomes,Estimated Time without AI (hours),Estimated Time with AI (hours),% time taken with AI vs no AI,% time saved with AI vs no AI";

/// Quote `field` if needed.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// One record, without the trailing newline.
pub fn row(entry: &AiUsageEntry) -> String {
    let hours_with = entry
        .estimated_time_with_ai()
        .map(|h| h.to_string())
        .unwrap_or_default();
    let percent = |p: Option<i64>| p.map(|p| format!("{p}%")).unwrap_or_default();

    let fields = [
        entry.individual.clone(),
        entry.team.clone(),
        entry.date.clone(),
        entry.jira_ticket.clone(),
        entry.experiment_summary.clone(),
        entry.tools_used.clone(),
        entry.notable_outcomes().to_string(),
        entry.estimated_time_without_ai.to_string(),
        hours_with,
        percent(entry.percent_time_with_ai()),
        percent(entry.percent_time_saved()),
    ];
    fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Data rows only, each terminated by `\n`.
pub fn rows<'a>(entries: impl IntoIterator<Item = &'a AiUsageEntry>) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&row(entry));
        out.push('\n');
    }
    out
}

/// Header plus one row per entry.
pub fn to_csv(entries: &[AiUsageEntry]) -> String {
    let mut out = String::with_capacity(HEADER.len() + 1);
    out.push_str(HEADER);
    out.push('\n');
    out.push_str(&rows(entries));
    out
}

/// Append one row per completed entry to `existing`. The existing bytes are
/// kept as-is; a newline is inserted first when they do not end with one.
/// Rows already present are not detected; callers drop synced entries.
///
/// Returns the new content and the number of rows appended.
pub fn merge_into_external_sheet(existing: &str, entries: &[AiUsageEntry]) -> (String, usize) {
    let completed: Vec<&AiUsageEntry> = entries.iter().filter(|e| e.is_completed()).collect();
    let mut out = existing.to_string();
    if completed.is_empty() {
        return (out, 0);
    }
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&rows(completed.iter().copied()));
    (out, completed.len())
}
