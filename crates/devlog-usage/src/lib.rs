pub mod csv;
pub mod dashboard;
pub mod entry;
pub mod persist;
pub mod session;

pub use dashboard::UsageSummary;
pub use entry::{AiUsageEntry, SessionRequest};
pub use persist::{load_entries, save_entries};
pub use session::{SessionMarker, UsageError, UsageLedger};
