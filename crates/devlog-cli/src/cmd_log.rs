use devlog_core::Level;
use devlog_ledger::DevlogPaths;

use crate::console::open_tracker;

/// `devlog log [--level] [--category] <message>`. Subject to the same
/// enabled flag and level threshold as host events.
pub fn execute(
    paths: &DevlogPaths,
    level: Level,
    category: &str,
    message: &str,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut tracker = open_tracker(paths, quiet)?;
    tracker.log(level, message, category);
    Ok(())
}
