//! Report generation over a normalized entry sequence.
//!
//! Pure functions: nothing here reads or writes storage. Callers pick the
//! destination file.

pub mod export;
pub mod summary;

pub use export::{export, render_markdown, render_text};
pub use summary::{summarize, Summary};
