pub mod autosave;
mod commands;
pub mod error;
pub mod event;
pub mod settings;
mod tracker;
mod usage;

pub use autosave::AutosaveTimer;
pub use error::{TrackerError, TrackerResult};
pub use event::{HostEvent, Position, Selection};
pub use tracker::Tracker;
pub use usage::{SessionEnd, SyncOutcome};
