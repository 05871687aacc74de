use devlog_usage::UsageError;
use std::path::PathBuf;
use thiserror::Error;

pub type TrackerResult<T> = Result<T, TrackerError>;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// Rejected session transition or invalid session input
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error("no log file exists yet: {}", .0.display())]
    NoLogFile(PathBuf),

    #[error("no AI usage data yet; start an AI session to begin tracking")]
    NoUsageData,

    /// Filesystem or serialization failure
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
