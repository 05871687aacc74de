mod cmd_config;
mod cmd_export;
mod cmd_ingest;
mod cmd_log;
mod cmd_logs;
mod cmd_session;
mod cmd_status;
mod cmd_usage;
mod console;

use clap::{Parser, Subcommand};
use cmd_config::ConfigCmd;
use cmd_session::SessionCmd;
use cmd_usage::UsageCmd;
use devlog_core::{ExportFormat, Level};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "devlog",
    version,
    about = "Local developer activity log with daily reports and AI-session tracking"
)]
struct Cli {
    /// Store directory (default: $DEVLOG_HOME, else the per-user data dir)
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Do not echo recorded entries to stderr
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Turn logging on or off
    Toggle,
    /// Show logging state, log size, and the active AI session
    Status {
        /// Print only the one-line status indicator
        #[arg(long)]
        line: bool,
    },
    /// Delete every entry in the activity log
    Clear {
        /// Confirm the clear
        #[arg(long)]
        yes: bool,
    },
    /// Print the path of the activity log
    Open,
    /// Export the activity log as a dated report
    Export {
        /// md, json or txt (default: exportFormat from config)
        #[arg(long)]
        format: Option<ExportFormat>,
        /// Date in the report name and header (default: today, UTC)
        #[arg(long)]
        date: Option<String>,
    },
    /// Same as `export` with the configured format
    Process,
    /// Read host events (one JSON object per line) from stdin
    Ingest {
        /// Workspace root for relative paths (repeatable; first match wins)
        #[arg(long = "root")]
        roots: Vec<PathBuf>,
        /// Announce activation and run the daily auto-export first
        #[arg(long)]
        activate: bool,
    },
    /// Record a single entry
    Log {
        /// Message text
        message: String,
        /// info, warn or error
        #[arg(long, default_value = "info")]
        level: Level,
        /// Entry category
        #[arg(long, default_value = "system")]
        category: String,
    },
    /// Start or end an AI assistance session
    Session {
        #[command(subcommand)]
        cmd: SessionCmd,
    },
    /// AI usage reports and team-sheet sync
    Usage {
        #[command(subcommand)]
        cmd: UsageCmd,
    },
    /// Save your name, team, and optional team sheet as defaults
    Setup {
        /// Your name
        #[arg(long)]
        individual: String,
        /// Your team
        #[arg(long)]
        team: String,
        /// Shared team CSV file; enables autoSync
        #[arg(long)]
        team_sheet: Option<PathBuf>,
    },
    /// Manage config.json
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("devlog: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let store = cli.store.unwrap_or_else(devlog_store::store_root);
    let paths = devlog_ledger::DevlogPaths::discover(store);
    let quiet = cli.quiet;

    match cli.cmd {
        Command::Toggle => cmd_logs::toggle(&paths, quiet),
        Command::Status { line } => cmd_status::execute(&paths, line),
        Command::Clear { yes } => cmd_logs::clear(&paths, yes, quiet),
        Command::Open => cmd_logs::open(&paths, quiet),
        Command::Export { format, date } => {
            cmd_export::execute(&paths, format, date.as_deref(), quiet)
        }
        Command::Process => cmd_export::execute(&paths, None, None, quiet),
        Command::Ingest { roots, activate } => cmd_ingest::execute(&paths, roots, activate, quiet),
        Command::Log {
            message,
            level,
            category,
        } => cmd_log::execute(&paths, level, &category, &message, quiet),
        Command::Session { cmd } => cmd_session::run(cmd, &paths, quiet),
        Command::Usage { cmd } => cmd_usage::run(cmd, &paths, quiet),
        Command::Setup {
            individual,
            team,
            team_sheet,
        } => cmd_session::setup(&paths, &individual, &team, team_sheet.as_deref(), quiet),
        Command::Config { cmd } => cmd_config::run(cmd, &paths),
    }
}
