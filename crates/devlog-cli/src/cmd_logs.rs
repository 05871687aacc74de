use devlog_ledger::DevlogPaths;

use crate::console::open_tracker;

/// `devlog toggle`
pub fn toggle(paths: &DevlogPaths, quiet: bool) -> anyhow::Result<()> {
    let mut tracker = open_tracker(paths, quiet)?;
    let enabled = tracker.toggle_logging()?;
    println!("Devlog {}", if enabled { "enabled" } else { "disabled" });
    Ok(())
}

/// `devlog clear --yes`
pub fn clear(paths: &DevlogPaths, yes: bool, quiet: bool) -> anyhow::Result<()> {
    if !yes {
        anyhow::bail!("refusing to clear the activity log without --yes");
    }
    let mut tracker = open_tracker(paths, quiet)?;
    tracker.clear_logs()?;
    println!("Logs cleared");
    Ok(())
}

/// `devlog open`
pub fn open(paths: &DevlogPaths, quiet: bool) -> anyhow::Result<()> {
    let mut tracker = open_tracker(paths, quiet)?;
    let path = tracker.log_file()?;
    println!("{}", path.display());
    Ok(())
}
