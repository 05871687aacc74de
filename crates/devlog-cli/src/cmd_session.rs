use clap::Subcommand;
use devlog_ledger::{DevlogPaths, StoreLock};
use devlog_tracker::SyncOutcome;
use devlog_usage::SessionRequest;
use std::path::Path;
use time::OffsetDateTime;

use crate::console::open_tracker;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum SessionCmd {
    /// Start tracking an AI assistance session
    Start {
        /// Describe what you are working on
        #[arg(long)]
        summary: String,
        /// AI tool in use (repeatable)
        #[arg(long = "tool", required = true)]
        tools: Vec<String>,
        /// Hours the task would take without AI
        #[arg(long)]
        estimate: f64,
        /// Your name (default: defaultIndividual)
        #[arg(long)]
        individual: Option<String>,
        /// Your team (default: defaultTeam)
        #[arg(long)]
        team: Option<String>,
        /// JIRA ticket
        #[arg(long)]
        jira: Option<String>,
    },
    /// End the active session
    End {
        /// What came out of the session
        #[arg(long)]
        outcomes: String,
    },
}

// ── Dispatch ──

pub fn run(cmd: SessionCmd, paths: &DevlogPaths, quiet: bool) -> anyhow::Result<()> {
    match cmd {
        SessionCmd::Start {
            summary,
            tools,
            estimate,
            individual,
            team,
            jira,
        } => start(
            paths,
            SessionRequest {
                individual: individual.unwrap_or_default(),
                team: team.unwrap_or_default(),
                jira_ticket: jira,
                experiment_summary: summary,
                tools_used: tools,
                estimated_time_without_ai: estimate,
            },
            quiet,
        ),
        SessionCmd::End { outcomes } => end(paths, &outcomes, quiet),
    }
}

// ── Command Implementations ──

/// `devlog session start`
pub fn start(paths: &DevlogPaths, req: SessionRequest, quiet: bool) -> anyhow::Result<()> {
    let _lock = StoreLock::acquire(paths)?;
    let mut tracker = open_tracker(paths, quiet)?;
    let entry = tracker.start_session(req, OffsetDateTime::now_utc())?;
    tracker.save_data()?;
    println!(
        "AI session started for {} ({}): {}",
        entry.individual, entry.team, entry.experiment_summary
    );
    Ok(())
}

/// `devlog session end`
pub fn end(paths: &DevlogPaths, outcomes: &str, quiet: bool) -> anyhow::Result<()> {
    let _lock = StoreLock::acquire(paths)?;
    let mut tracker = open_tracker(paths, quiet)?;
    let end = tracker.end_session(outcomes, OffsetDateTime::now_utc())?;
    tracker.save_data()?;

    let hours = end.entry.actual_time_spent().unwrap_or_default();
    println!("AI session ended. Duration: {hours:.2} hours");
    if let Some(saved) = end.entry.percent_time_saved() {
        println!("Time saved vs. estimate: {saved}%");
    }
    match &end.csv {
        Some(path) => println!("CSV: {}", path.display()),
        None => eprintln!("warning: CSV export failed; see the activity log"),
    }
    match end.sync {
        Some(Some(outcome)) => print_sync(&outcome),
        Some(None) => eprintln!("warning: team sheet sync failed; see the activity log"),
        None => {}
    }
    Ok(())
}

/// `devlog setup`
pub fn setup(
    paths: &DevlogPaths,
    individual: &str,
    team: &str,
    team_sheet: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut tracker = open_tracker(paths, quiet)?;
    tracker.setup(individual, team, team_sheet)?;
    println!("Configured defaults: {individual} ({team})");
    if let Some(sheet) = team_sheet {
        println!("Team sheet: {} (autoSync on)", sheet.display());
    }
    Ok(())
}

pub fn print_sync(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::NotConfigured => {
            eprintln!("warning: team CSV file path not configured (see `devlog setup`)")
        }
        SyncOutcome::SheetMissing(path) => {
            eprintln!("warning: team CSV file not found: {}", path.display())
        }
        SyncOutcome::Synced { path, rows } => {
            println!("Synced {rows} entries to team sheet: {}", path.display())
        }
    }
}
