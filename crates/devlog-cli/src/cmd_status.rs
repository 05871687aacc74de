use devlog_core::Config;
use devlog_ledger::DevlogPaths;

use crate::console::open_tracker;

/// `devlog status [--line]`
pub fn execute(paths: &DevlogPaths, line: bool) -> anyhow::Result<()> {
    let tracker = open_tracker(paths, true)?;
    let session_active = tracker.usage().current().is_some();

    if line {
        if let Some(indicator) = status_line(tracker.config(), session_active) {
            println!("{indicator}");
        }
        return Ok(());
    }

    let state = if tracker.is_enabled() { "enabled" } else { "disabled" };
    println!("Logging {state} (level {})", tracker.config().log_level);
    println!("Store: {}", paths.root.display());

    let entries = tracker.activity_log().read_all()?;
    println!("Log entries: {}", entries.len());
    if let Some(last) = entries.last() {
        println!("Last entry: {}", last.display_line());
    }

    match tracker.usage().current() {
        Some(session) => println!(
            "AI session active since {}: {}",
            session.session_start_time, session.experiment_summary
        ),
        None => println!("AI session: none"),
    }
    println!("AI usage entries: {}", tracker.usage().entries().len());
    Ok(())
}

/// Short indicator for an editor status bar. `None` when hidden by
/// `showInStatusBar`.
fn status_line(config: &Config, session_active: bool) -> Option<&'static str> {
    if !config.show_in_status_bar {
        return None;
    }
    Some(match (session_active, config.enabled) {
        (true, _) => "● AI Session Active",
        (false, true) => "● Devlog",
        (false, false) => "⏸ Devlog",
    })
}
