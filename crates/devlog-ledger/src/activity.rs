//! The append-only activity log backed by `activity.log`.
//!
//! One JSON object per line. Lines written by older versions (plain text) or
//! damaged lines stay readable: the reader turns them into `legacy` entries
//! instead of failing.

use anyhow::Context;
use devlog_core::clock::now_rfc3339;
use devlog_core::LogEntry;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::sink::DisplaySink;

pub struct ActivityLog<S: DisplaySink> {
    path: PathBuf,
    sink: S,
}

impl<S: DisplaySink> ActivityLog<S> {
    pub fn new(path: impl Into<PathBuf>, sink: S) -> Self {
        Self {
            path: path.into(),
            sink,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mirror `entry` to the display sink, then append it to the file.
    /// The sink write happens even when the file append fails.
    pub fn append(&mut self, entry: &LogEntry) -> anyhow::Result<()> {
        self.sink.write_line(&entry.display_line());
        let line = serde_json::to_string(entry)?;
        append_line(&self.path, &line)
            .with_context(|| format!("appending to {}", self.path.display()))
    }

    /// Truncate the file, then clear the sink. If truncation fails the sink is
    /// left untouched.
    pub fn clear(&mut self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("truncating {}", self.path.display()))?;
        self.sink.clear();
        Ok(())
    }

    /// Read every entry in file order. Legacy lines are stamped with the
    /// current time.
    pub fn read_all(&self) -> anyhow::Result<Vec<LogEntry>> {
        self.read_all_at(&now_rfc3339())
    }

    /// Read every entry in file order, stamping legacy lines with `read_at`.
    /// A missing file reads as empty.
    pub fn read_all_at(&self, read_at: &str) -> anyhow::Result<Vec<LogEntry>> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            }
        };
        Ok(parse_lines(&bytes, read_at))
    }
}

/// Normalize raw log content into entries. Total: every non-blank line yields
/// exactly one entry.
pub fn parse_lines(content: &[u8], read_at: &str) -> Vec<LogEntry> {
    let mut entries = Vec::new();
    let mut legacy = 0usize;
    for raw in content.split(|b| *b == b'\n') {
        let line = String::from_utf8_lossy(raw);
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<LogEntry>(line) {
            Ok(entry) => entries.push(entry),
            Err(_) => {
                legacy += 1;
                entries.push(LogEntry::legacy(line, read_at));
            }
        }
    }
    if legacy > 0 {
        tracing::debug!(legacy, total = entries.len(), "normalized legacy log lines");
    }
    entries
}

/// Append a single line to a file, creating parent dirs if needed.
fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}
