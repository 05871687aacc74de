use anyhow::Context;
use devlog_core::{category, ExportFormat};
use devlog_ledger::DisplaySink;
use serde_json::Value;
use std::path::PathBuf;
use time::UtcOffset;

use crate::error::{TrackerError, TrackerResult};
use crate::settings;
use crate::tracker::Tracker;

const EXPORT_PREFIX: &str = "logs-export";

impl<S: DisplaySink> Tracker<S> {
    /// Announce startup, then run the daily auto-export if one is due.
    pub fn activate(&mut self, today: &str, offset: UtcOffset) -> TrackerResult<Option<PathBuf>> {
        self.info("Devlog activated", category::SYSTEM);
        self.check_auto_export(today, offset)
    }

    /// Flip the master switch and persist it. Returns the new state.
    pub fn toggle_logging(&mut self) -> TrackerResult<bool> {
        let enabled = !self.config.enabled;
        if let Err(e) = settings::update_config(
            &self.paths.config_json,
            vec![("enabled", Value::Bool(enabled))],
        ) {
            return Err(self.fail(category::SYSTEM, "toggle logging", e));
        }
        self.config.enabled = enabled;
        let status = if enabled { "enabled" } else { "disabled" };
        self.info(format!("Logging {status} via command"), category::SYSTEM);
        Ok(enabled)
    }

    pub fn clear_logs(&mut self) -> TrackerResult<()> {
        if let Err(e) = self.activity.clear() {
            return Err(self.fail(category::SYSTEM, "clear logs", e));
        }
        self.info("Logs cleared via command", category::SYSTEM);
        Ok(())
    }

    /// Path of the activity log, for the host to open.
    pub fn log_file(&mut self) -> TrackerResult<PathBuf> {
        if !self.activity.exists() {
            return Err(TrackerError::NoLogFile(self.paths.activity_log.clone()));
        }
        self.info("Log file opened via command", category::SYSTEM);
        Ok(self.paths.activity_log.clone())
    }

    /// Write `logs-export-<date>.<ext>` next to the log. `format` falls back
    /// to the configured `exportFormat`.
    pub fn export_logs(
        &mut self,
        format: Option<ExportFormat>,
        date: &str,
        offset: UtcOffset,
    ) -> TrackerResult<PathBuf> {
        if !self.activity.exists() {
            return Err(TrackerError::NoLogFile(self.paths.activity_log.clone()));
        }
        let format = format.unwrap_or(self.config.export_format);
        let dest = self
            .paths
            .export_file(EXPORT_PREFIX, date, format.extension());

        match self.write_export(format, date, offset, &dest) {
            Ok(()) => {
                self.info(format!("Logs exported to: {}", dest.display()), category::SYSTEM);
                Ok(dest)
            }
            Err(e) => Err(self.fail(category::SYSTEM, "export logs", e)),
        }
    }

    fn write_export(
        &self,
        format: ExportFormat,
        date: &str,
        offset: UtcOffset,
        dest: &std::path::Path,
    ) -> anyhow::Result<()> {
        let entries = self.activity.read_all()?;
        let summary = devlog_report::summarize(&entries);
        let content = devlog_report::export(&entries, &summary, format, date, offset)
            .context("rendering export")?;
        devlog_store::write_atomic(dest, content.as_bytes())
            .with_context(|| format!("writing export: {}", dest.display()))
    }

    /// Export once per calendar day when `autoExportDaily` is set. Records
    /// `lastExportDate` only after a successful export.
    pub fn check_auto_export(
        &mut self,
        today: &str,
        offset: UtcOffset,
    ) -> TrackerResult<Option<PathBuf>> {
        if !self.config.auto_export_daily
            || self.config.last_export_date == today
            || !self.activity.exists()
        {
            return Ok(None);
        }
        let dest = self.export_logs(None, today, offset)?;
        if let Err(e) = settings::update_config(
            &self.paths.config_json,
            vec![("lastExportDate", Value::String(today.to_string()))],
        ) {
            return Err(self.fail(category::SYSTEM, "record auto-export date", e));
        }
        self.config.last_export_date = today.to_string();
        Ok(Some(dest))
    }
}

#[cfg(test)]
mod tests {
    use crate::tracker::tests::{messages, tracker};
    use crate::TrackerError;
    use devlog_core::{ExportFormat, Level};
    use time::UtcOffset;

    #[test]
    fn toggle_persists_and_logs_only_when_enabled() {
        let tmp = tempfile::tempdir().unwrap();
        let mut t = tracker(tmp.path());
        assert!(!t.toggle_logging().unwrap());
        assert!(!t.is_enabled());
        t.document_opened("/work/repo/a.rs");
        assert!(t.toggle_logging().unwrap());

        assert_eq!(messages(&t), vec!["Logging enabled via command"]);
        let cfg = crate::settings::load_config(&t.paths().config_json).unwrap();
        assert!(cfg.enabled);
    }

    #[test]
    fn clear_then_only_the_clear_notice_remains() {
        let tmp = tempfile::tempdir().unwrap();
        let mut t = tracker(tmp.path());
        t.document_opened("/work/repo/a.rs");
        t.document_saved("/work/repo/a.rs");
        t.clear_logs().unwrap();
        assert_eq!(messages(&t), vec!["Logs cleared via command"]);
        assert_eq!(t.sink().lines.len(), 1);
    }

    #[test]
    fn log_file_requires_existing_log() {
        let tmp = tempfile::tempdir().unwrap();
        let mut t = tracker(tmp.path());
        assert!(matches!(t.log_file(), Err(TrackerError::NoLogFile(_))));
        t.terminal_opened("zsh");
        assert_eq!(t.log_file().unwrap(), t.paths().activity_log);
    }

    #[test]
    fn export_without_log_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let mut t = tracker(tmp.path());
        let err = t
            .export_logs(None, "2026-10-19", UtcOffset::UTC)
            .unwrap_err();
        assert!(matches!(err, TrackerError::NoLogFile(_)));
    }

    #[test]
    fn export_writes_dated_file_in_configured_format() {
        let tmp = tempfile::tempdir().unwrap();
        let mut t = tracker(tmp.path());
        t.document_opened("/work/repo/a.rs");
        t.editor_switched("/work/repo/b.rs");

        let md = t.export_logs(None, "2026-10-19", UtcOffset::UTC).unwrap();
        assert!(md.ends_with("logs-export-2026-10-19.md"));
        let content = std::fs::read_to_string(&md).unwrap();
        assert!(content.contains("### Document Events"));
        assert!(content.contains("- **Total Events**: 2\n"));

        let json = t
            .export_logs(Some(ExportFormat::Json), "2026-10-19", UtcOffset::UTC)
            .unwrap();
        let parsed: Vec<devlog_core::LogEntry> =
            serde_json::from_str(&std::fs::read_to_string(json).unwrap()).unwrap();
        // The markdown export notice is part of the log by now.
        assert_eq!(parsed.len(), 3);
        assert!(parsed[2].message.starts_with("Logs exported to: "));
    }

    #[test]
    fn export_failure_is_logged_as_system_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut t = tracker(tmp.path());
        t.terminal_opened("zsh");
        // A directory in place of the export file makes the write fail.
        std::fs::create_dir_all(t.paths().export_file("logs-export", "d", "txt")).unwrap();

        let err = t
            .export_logs(Some(ExportFormat::Text), "d", UtcOffset::UTC)
            .unwrap_err();
        assert!(matches!(err, TrackerError::Storage(_)));
        let entries = t.activity_log().read_all().unwrap();
        let last = entries.last().unwrap();
        assert_eq!(last.level, Level::Error);
        assert_eq!(last.category, "system");
        assert!(last.message.starts_with("Failed to export logs"));
    }

    #[test]
    fn auto_export_runs_once_per_day() {
        let tmp = tempfile::tempdir().unwrap();
        let mut t = tracker(tmp.path());
        std::fs::write(&t.paths().config_json, r#"{"autoExportDaily":true}"#).unwrap();
        t.configuration_changed();

        let first = t.activate("2026-10-19", UtcOffset::UTC).unwrap();
        assert!(first.unwrap().ends_with("logs-export-2026-10-19.md"));
        assert_eq!(t.config().last_export_date, "2026-10-19");
        assert!(t.activate("2026-10-19", UtcOffset::UTC).unwrap().is_none());
        assert!(t.check_auto_export("2026-10-20", UtcOffset::UTC).unwrap().is_some());

        let cfg = crate::settings::load_config(&t.paths().config_json).unwrap();
        assert_eq!(cfg.last_export_date, "2026-10-20");
        assert!(cfg.auto_export_daily);
    }

    #[test]
    fn auto_export_off_by_default() {
        let tmp = tempfile::tempdir().unwrap();
        let mut t = tracker(tmp.path());
        assert!(t.activate("2026-10-19", UtcOffset::UTC).unwrap().is_none());
        assert_eq!(messages(&t), vec!["Devlog activated"]);
    }
}
