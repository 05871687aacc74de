//! The tracker context: everything one run of devlog needs, owned in one
//! place and passed explicitly.

use devlog_core::{category, Config, Level, LogEntry};
use devlog_ledger::{ActivityLog, DevlogPaths, DisplaySink};
use devlog_usage::UsageLedger;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::autosave::AutosaveTimer;
use crate::error::TrackerError;
use crate::event::{HostEvent, Selection};
use crate::settings;

pub struct Tracker<S: DisplaySink> {
    pub(crate) paths: DevlogPaths,
    pub(crate) config: Config,
    pub(crate) activity: ActivityLog<S>,
    pub(crate) usage: UsageLedger,
    pub(crate) workspace_roots: Vec<PathBuf>,
    pub(crate) autosave: AutosaveTimer,
    /// Usage list changed since the last save.
    pub(crate) dirty: bool,
    /// The usage store exists but could not be read; saving would destroy it.
    pub(crate) store_load_failed: bool,
}

impl<S: DisplaySink> Tracker<S> {
    /// Open the store at `paths`: create the root, read `config.json`, and
    /// load the usage history. A usage store that fails to load is reported
    /// as a `data` error entry and left untouched on disk.
    pub fn open(paths: DevlogPaths, sink: S) -> anyhow::Result<Self> {
        paths.ensure_layout()?;
        let config = settings::load_config(&paths.config_json)?;
        let activity = ActivityLog::new(paths.activity_log.clone(), sink);

        let (usage, load_error) = match devlog_usage::load_entries(&paths.usage_json) {
            Ok(entries) => {
                tracing::debug!(count = entries.len(), "loaded AI usage entries");
                (UsageLedger::from_entries(entries), None)
            }
            Err(e) => (UsageLedger::new(), Some(e)),
        };

        let mut tracker = Self {
            paths,
            config,
            activity,
            usage,
            workspace_roots: Vec::new(),
            autosave: AutosaveTimer::default(),
            dirty: false,
            store_load_failed: load_error.is_some(),
        };
        if let Some(e) = load_error {
            tracing::error!("usage store unreadable: {e:#}");
            tracker.log(
                Level::Error,
                format!("Failed to load existing data: {e:#}"),
                category::DATA,
            );
        }
        Ok(tracker)
    }

    /// Set the workspace roots used to shorten paths in messages.
    pub fn with_workspace_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.workspace_roots = roots;
        self
    }

    pub fn with_autosave(mut self, timer: AutosaveTimer) -> Self {
        self.autosave = timer;
        self
    }

    pub fn paths(&self) -> &DevlogPaths {
        &self.paths
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn usage(&self) -> &UsageLedger {
        &self.usage
    }

    pub fn activity_log(&self) -> &ActivityLog<S> {
        &self.activity
    }

    pub fn sink(&self) -> &S {
        self.activity.sink()
    }

    /// Record an entry unless logging is disabled or `level` is below the
    /// configured minimum. Write failures go to tracing only.
    pub fn log(&mut self, level: Level, message: impl Into<String>, category: &str) {
        if !self.config.enabled || !self.config.records(level) {
            return;
        }
        let entry = LogEntry::new(level, message, category);
        if let Err(e) = self.activity.append(&entry) {
            tracing::warn!("failed to write activity log: {e:#}");
        }
    }

    pub fn info(&mut self, message: impl Into<String>, category: &str) {
        self.log(Level::Info, message, category);
    }

    pub fn warn(&mut self, message: impl Into<String>, category: &str) {
        self.log(Level::Warn, message, category);
    }

    /// Log `err` as an error entry in `category` and hand it back as a
    /// storage error.
    pub(crate) fn fail(&mut self, category: &str, what: &str, err: anyhow::Error) -> TrackerError {
        self.log(Level::Error, format!("Failed to {what}: {err:#}"), category);
        TrackerError::Storage(err)
    }

    // ── Ingestion ──

    /// Route one host event to its port.
    pub fn ingest(&mut self, event: HostEvent) {
        match event {
            HostEvent::DocumentOpened { path } => self.document_opened(&path),
            HostEvent::DocumentClosed { path } => self.document_closed(&path),
            HostEvent::DocumentSaved { path } => self.document_saved(&path),
            HostEvent::DocumentChanged { path, changes } => self.document_changed(&path, changes),
            HostEvent::EditorSwitched { path } => self.editor_switched(&path),
            HostEvent::SelectionChanged { path, selection } => {
                self.selection_changed(&path, selection)
            }
            HostEvent::TerminalOpened { name } => self.terminal_opened(&name),
            HostEvent::TerminalClosed { name } => self.terminal_closed(&name),
            HostEvent::ConfigurationChanged => self.configuration_changed(),
            HostEvent::WorkspaceFolders { folders } => self.workspace_roots = folders,
        }
    }

    pub fn document_opened(&mut self, path: &str) {
        self.document_event("Document opened", path);
    }

    pub fn document_closed(&mut self, path: &str) {
        self.document_event("Document closed", path);
    }

    pub fn document_saved(&mut self, path: &str) {
        self.document_event("Document saved", path);
    }

    /// Ignored for zero changes and for edits to devlog's own files, which
    /// would otherwise log themselves forever.
    pub fn document_changed(&mut self, path: &str, change_count: usize) {
        if change_count == 0 || self.paths.contains(Path::new(path)) {
            return;
        }
        if !self.config.log_document_events || !self.should_log_file(path) {
            return;
        }
        let rel = self.relative_path(path);
        self.info(
            format!("Document modified: {rel} ({change_count} changes)"),
            category::DOCUMENT,
        );
    }

    pub fn editor_switched(&mut self, path: &str) {
        if !self.config.log_editor_events || !self.should_log_file(path) {
            return;
        }
        let rel = self.relative_path(path);
        self.info(format!("Editor switched to: {rel}"), category::EDITOR);
    }

    pub fn selection_changed(&mut self, path: &str, selection: Selection) {
        if selection.is_empty() || !self.config.log_editor_events || !self.should_log_file(path) {
            return;
        }
        let rel = self.relative_path(path);
        self.info(
            format!("Text selected in: {rel} ({selection})"),
            category::EDITOR,
        );
    }

    pub fn terminal_opened(&mut self, name: &str) {
        if self.config.log_terminal_events {
            self.info(format!("Terminal opened: {name}"), category::TERMINAL);
        }
    }

    pub fn terminal_closed(&mut self, name: &str) {
        if self.config.log_terminal_events {
            self.info(format!("Terminal closed: {name}"), category::TERMINAL);
        }
    }

    /// Re-read `config.json`. An unreadable file keeps the previous config.
    pub fn configuration_changed(&mut self) {
        let config = match settings::load_config(&self.paths.config_json) {
            Ok(c) => c,
            Err(e) => {
                self.log(
                    Level::Error,
                    format!("Failed to reload configuration: {e:#}"),
                    category::SYSTEM,
                );
                return;
            }
        };
        let was_enabled = self.config.enabled;
        self.config = config;
        if was_enabled != self.config.enabled {
            let status = if self.config.enabled { "enabled" } else { "disabled" };
            self.info(format!("Logging {status} via settings"), category::SYSTEM);
        }
        self.info("Configuration updated", category::SYSTEM);
    }

    /// Save the usage store if it changed and the autosave interval elapsed.
    pub fn tick(&mut self, now: Instant) {
        if !self.autosave.due(now) {
            return;
        }
        self.autosave.reset(now);
        if self.dirty {
            // Failure is already recorded as a `data` error entry.
            let _ = self.save_data();
        }
    }

    fn document_event(&mut self, action: &str, path: &str) {
        if !self.config.log_document_events || !self.should_log_file(path) {
            return;
        }
        let rel = self.relative_path(path);
        self.info(format!("{action}: {rel}"), category::DOCUMENT);
    }

    fn should_log_file(&self, path: &str) -> bool {
        self.config.enabled && !self.config.is_excluded(path)
    }

    /// Path relative to the first workspace root containing it, else the
    /// file name.
    pub fn relative_path(&self, path: &str) -> String {
        let p = Path::new(path);
        for root in &self.workspace_roots {
            if let Ok(rel) = p.strip_prefix(root) {
                if !rel.as_os_str().is_empty() {
                    return rel.display().to_string();
                }
            }
        }
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string())
    }
}
