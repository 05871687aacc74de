use devlog_core::clock::{local_offset, today_utc};
use devlog_core::ExportFormat;
use devlog_ledger::DevlogPaths;

use crate::console::open_tracker;

/// `devlog export [--format] [--date]` and the legacy `devlog process`.
pub fn execute(
    paths: &DevlogPaths,
    format: Option<ExportFormat>,
    date: Option<&str>,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut tracker = open_tracker(paths, quiet)?;
    let date = date.map(str::to_string).unwrap_or_else(today_utc);
    let dest = tracker.export_logs(format, &date, local_offset())?;
    println!("Logs exported to: {}", dest.display());
    Ok(())
}
