use anyhow::{Context, Result};
use std::path::Path;

use crate::entry::AiUsageEntry;

/// Load the usage history. A missing file is an empty history.
pub fn load_entries(path: &Path) -> Result<Vec<AiUsageEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading usage data: {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let entries = serde_json::from_str(&content)
        .with_context(|| format!("parsing usage data: {}", path.display()))?;
    Ok(entries)
}

/// Overwrite the usage history atomically with a pretty-printed snapshot.
pub fn save_entries(path: &Path, entries: &[AiUsageEntry]) -> Result<()> {
    let data = serde_json::to_string_pretty(entries)?;
    devlog_store::write_atomic(path, data.as_bytes())
        .with_context(|| format!("saving usage data: {}", path.display()))?;
    Ok(())
}
