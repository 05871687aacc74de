pub mod clock;
pub mod config;
pub mod types;

pub use config::{Config, ExportFormat};
pub use types::*;
