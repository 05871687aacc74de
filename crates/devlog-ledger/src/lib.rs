pub mod activity;
pub mod lock;
pub mod paths;
pub mod sink;

pub use activity::{parse_lines, ActivityLog};
pub use lock::StoreLock;
pub use paths::DevlogPaths;
pub use sink::{DisplaySink, MemorySink, NullSink};
