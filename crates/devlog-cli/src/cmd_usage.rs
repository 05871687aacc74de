use clap::Subcommand;
use devlog_ledger::{DevlogPaths, StoreLock};

use crate::cmd_session::print_sync;
use crate::console::open_tracker;

#[derive(Subcommand)]
pub enum UsageCmd {
    /// Write ai-usage-log.csv, or print the rows
    Csv {
        /// Print data rows without the header instead of writing the file
        #[arg(long)]
        rows_only: bool,
    },
    /// Print the AI usage dashboard
    Summary,
    /// Append completed sessions to the team sheet
    Sync,
}

pub fn run(cmd: UsageCmd, paths: &DevlogPaths, quiet: bool) -> anyhow::Result<()> {
    match cmd {
        UsageCmd::Csv { rows_only } => csv(paths, rows_only, quiet),
        UsageCmd::Summary => summary(paths),
        UsageCmd::Sync => sync(paths, quiet),
    }
}

/// `devlog usage csv [--rows-only]`
fn csv(paths: &DevlogPaths, rows_only: bool, quiet: bool) -> anyhow::Result<()> {
    let mut tracker = open_tracker(paths, quiet)?;
    if rows_only {
        print!("{}", tracker.csv_rows()?);
    } else {
        let path = tracker.export_csv()?;
        println!("AI usage data exported to CSV: {}", path.display());
    }
    Ok(())
}

/// `devlog usage summary`
fn summary(paths: &DevlogPaths) -> anyhow::Result<()> {
    let tracker = open_tracker(paths, true)?;
    print!("{}", tracker.usage_summary()?);
    Ok(())
}

/// `devlog usage sync`
fn sync(paths: &DevlogPaths, quiet: bool) -> anyhow::Result<()> {
    let _lock = StoreLock::acquire(paths)?;
    let mut tracker = open_tracker(paths, quiet)?;
    let outcome = tracker.sync_team_sheet()?;
    print_sync(&outcome);
    Ok(())
}
