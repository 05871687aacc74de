//! AI-session commands: start/end, CSV export, dashboard, team-sheet sync,
//! and persistence of the usage store.

use anyhow::Context;
use devlog_core::category;
use devlog_ledger::DisplaySink;
use devlog_usage::{csv, AiUsageEntry, SessionRequest, UsageError, UsageSummary};
use serde_json::Value;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

use crate::error::{TrackerError, TrackerResult};
use crate::settings;
use crate::tracker::Tracker;

/// Result of merging completed sessions into the team sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// `teamSheetPath` is unset.
    NotConfigured,
    /// `teamSheetPath` points at nothing.
    SheetMissing(PathBuf),
    Synced { path: PathBuf, rows: usize },
}

/// What happened when a session was closed.
#[derive(Debug, Clone)]
pub struct SessionEnd {
    pub entry: AiUsageEntry,
    /// CSV snapshot written, `None` if the export failed.
    pub csv: Option<PathBuf>,
    /// Present when `autoSync` is on. `None` inside if the sync failed.
    pub sync: Option<Option<SyncOutcome>>,
}

impl<S: DisplaySink> Tracker<S> {
    /// Open an AI session. Blank individual/team fall back to the configured
    /// defaults.
    pub fn start_session(
        &mut self,
        mut req: SessionRequest,
        now: OffsetDateTime,
    ) -> TrackerResult<AiUsageEntry> {
        if req.individual.trim().is_empty() {
            req.individual = self.config.default_individual.clone();
        }
        if req.team.trim().is_empty() {
            req.team = self.config.default_team.clone();
        }
        let entry = self.usage.start(req, now)?.clone();
        self.dirty = true;
        self.info(
            format!("AI session started for: {}", entry.experiment_summary),
            category::AI_TRACKING,
        );
        Ok(entry)
    }

    /// Close the open session, then write the CSV snapshot and, with
    /// `autoSync`, merge into the team sheet. Export and sync failures are
    /// logged and do not undo the end.
    pub fn end_session(
        &mut self,
        notable_outcomes: &str,
        now: OffsetDateTime,
    ) -> TrackerResult<SessionEnd> {
        let entry = self.usage.end(notable_outcomes, now)?.clone();
        self.dirty = true;
        let hours = entry.actual_time_spent().unwrap_or_default();
        self.info(
            format!("AI session ended. Duration: {hours:.2} hours"),
            category::AI_TRACKING,
        );

        let csv = self.export_csv().ok();
        let sync = if self.config.auto_sync {
            Some(self.sync_team_sheet().ok())
        } else {
            None
        };
        Ok(SessionEnd { entry, csv, sync })
    }

    /// Overwrite `ai-usage-log.csv` with every entry.
    pub fn export_csv(&mut self) -> TrackerResult<PathBuf> {
        if self.usage.is_empty() {
            return Err(TrackerError::NoUsageData);
        }
        let path = self.paths.usage_csv.clone();
        let content = csv::to_csv(self.usage.entries());
        if let Err(e) = devlog_store::write_atomic(&path, content.as_bytes())
            .with_context(|| format!("writing CSV: {}", path.display()))
        {
            return Err(self.fail(category::AI_TRACKING, "export CSV", e));
        }
        self.info(
            format!("AI usage data exported to: {}", path.display()),
            category::AI_TRACKING,
        );
        Ok(path)
    }

    /// Data rows without the header, for pasting into an existing sheet.
    pub fn csv_rows(&self) -> TrackerResult<String> {
        if self.usage.is_empty() {
            return Err(TrackerError::NoUsageData);
        }
        Ok(csv::rows(self.usage.entries()))
    }

    /// The Markdown dashboard.
    pub fn usage_summary(&self) -> TrackerResult<String> {
        if self.usage.is_empty() {
            return Err(TrackerError::NoUsageData);
        }
        let entries = self.usage.entries();
        Ok(UsageSummary::compute(entries).render_markdown(entries))
    }

    /// Append completed sessions to the team sheet, then drop them from the
    /// store. A missing sheet is a warning, not an error.
    pub fn sync_team_sheet(&mut self) -> TrackerResult<SyncOutcome> {
        let Some(sheet) = self.config.team_sheet().map(PathBuf::from) else {
            self.warn("Team CSV file path not configured", category::SYNC);
            return Ok(SyncOutcome::NotConfigured);
        };
        if !sheet.is_file() {
            self.warn(
                format!("Team CSV file not found: {}", sheet.display()),
                category::SYNC,
            );
            return Ok(SyncOutcome::SheetMissing(sheet));
        }

        let rows = match merge_into(&sheet, self.usage.entries()) {
            Ok(rows) => rows,
            Err(e) => return Err(self.fail(category::SYNC, "sync with team sheet", e)),
        };
        self.info(
            format!("Synced {rows} entries to team sheet: {}", sheet.display()),
            category::SYNC,
        );

        if self.usage.retain_open() > 0 {
            self.dirty = true;
            if let Err(e) = self.persist_usage() {
                let e = e.context(format!(
                    "{rows} entries are already in team sheet {}; remove them from the usage store before syncing again",
                    sheet.display()
                ));
                return Err(self.fail(category::SYNC, "drop synced entries", e));
            }
            self.info("AI usage data saved", category::DATA);
        }
        Ok(SyncOutcome::Synced { path: sheet, rows })
    }

    /// Store the session defaults and, when given, the team sheet (which
    /// also turns on `autoSync`).
    pub fn setup(
        &mut self,
        individual: &str,
        team: &str,
        team_sheet: Option<&Path>,
    ) -> TrackerResult<()> {
        let (individual, team) = (individual.trim(), team.trim());
        if individual.is_empty() || team.is_empty() {
            return Err(UsageError::Validation("name and team must not be empty".into()).into());
        }
        let mut updates = vec![
            ("defaultIndividual", Value::String(individual.to_string())),
            ("defaultTeam", Value::String(team.to_string())),
        ];
        if let Some(sheet) = team_sheet {
            updates.push(("teamSheetPath", Value::String(sheet.display().to_string())));
            updates.push(("autoSync", Value::Bool(true)));
        }

        let result = settings::update_config(&self.paths.config_json, updates)
            .and_then(|()| settings::load_config(&self.paths.config_json));
        match result {
            Ok(config) => self.config = config,
            Err(e) => return Err(self.fail(category::SYSTEM, "save setup", e)),
        }
        self.info(
            format!("AI usage tracker configured for: {individual} ({team})"),
            category::AI_TRACKING,
        );
        Ok(())
    }

    /// Write the usage store. Refuses while the store on disk is unreadable.
    pub fn save_data(&mut self) -> TrackerResult<()> {
        if let Err(e) = self.persist_usage() {
            return Err(self.fail(category::DATA, "save data", e));
        }
        self.info("AI usage data saved", category::DATA);
        Ok(())
    }

    fn persist_usage(&mut self) -> anyhow::Result<()> {
        if self.store_load_failed {
            anyhow::bail!(
                "usage store {} could not be loaded; not overwriting it",
                self.paths.usage_json.display()
            );
        }
        devlog_usage::save_entries(&self.paths.usage_json, self.usage.entries())?;
        self.dirty = false;
        Ok(())
    }
}

fn merge_into(sheet: &Path, entries: &[AiUsageEntry]) -> anyhow::Result<usize> {
    let existing = std::fs::read_to_string(sheet)
        .with_context(|| format!("reading team sheet: {}", sheet.display()))?;
    let (merged, rows) = csv::merge_into_external_sheet(&existing, entries);
    if rows > 0 {
        devlog_store::write_atomic(sheet, merged.as_bytes())
            .with_context(|| format!("writing team sheet: {}", sheet.display()))?;
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::tests::{messages, tracker};
    use devlog_core::Level;
    use time::macros::datetime;
    use time::Duration;

    const T0: OffsetDateTime = datetime!(2026-10-19 09:00 UTC);

    fn request(summary: &str) -> SessionRequest {
        SessionRequest {
            experiment_summary: summary.into(),
            tools_used: vec!["Claude".into()],
            estimated_time_without_ai: 4.0,
            ..Default::default()
        }
    }

    fn configured(dir: &Path) -> Tracker<devlog_ledger::MemorySink> {
        let mut t = tracker(dir);
        t.setup("Ada", "ST7", None).unwrap();
        t
    }

    #[test]
    fn session_uses_configured_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let mut t = configured(tmp.path());
        let entry = t.start_session(request("table"), T0).unwrap();
        assert_eq!(entry.individual, "Ada");
        assert_eq!(entry.team, "ST7");
        assert!(t.usage().active().is_some());
    }

    #[test]
    fn start_without_defaults_is_validation_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut t = tracker(tmp.path());
        let err = t.start_session(request("x"), T0).unwrap_err();
        assert!(matches!(err, TrackerError::Usage(UsageError::Validation(_))));
        assert!(t.usage().is_empty());
    }

    #[test]
    fn end_session_writes_csv_and_logs_duration() {
        let tmp = tempfile::tempdir().unwrap();
        let mut t = configured(tmp.path());
        t.start_session(request("table"), T0).unwrap();
        let end = t.end_session("worked", T0 + Duration::hours(2)).unwrap();

        assert_eq!(end.entry.percent_time_saved(), Some(50));
        let csv_path = end.csv.unwrap();
        let csv = std::fs::read_to_string(csv_path).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(end.sync.is_none());

        let msgs = messages(&t);
        assert!(msgs.contains(&"AI session started for: table".to_string()));
        assert!(msgs.contains(&"AI session ended. Duration: 2.00 hours".to_string()));
    }

    #[test]
    fn second_start_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let mut t = configured(tmp.path());
        t.start_session(request("one"), T0).unwrap();
        let err = t
            .start_session(request("two"), T0 + Duration::minutes(1))
            .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Usage(UsageError::SessionAlreadyActive)
        ));
        assert_eq!(t.usage().entries().len(), 1);
    }

    #[test]
    fn session_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let mut t = configured(tmp.path());
            t.start_session(request("table"), T0).unwrap();
            t.save_data().unwrap();
        }
        let mut t = tracker(tmp.path());
        let end = t.end_session("done", T0 + Duration::hours(1)).unwrap();
        assert_eq!(end.entry.percent_time_with_ai(), Some(25));
    }

    #[test]
    fn usage_views_need_data() {
        let tmp = tempfile::tempdir().unwrap();
        let mut t = tracker(tmp.path());
        assert!(matches!(t.export_csv(), Err(TrackerError::NoUsageData)));
        assert!(matches!(t.csv_rows(), Err(TrackerError::NoUsageData)));
        assert!(matches!(t.usage_summary(), Err(TrackerError::NoUsageData)));
    }

    #[test]
    fn missing_team_sheet_is_a_warning() {
        let tmp = tempfile::tempdir().unwrap();
        let mut t = configured(tmp.path());
        assert_eq!(t.sync_team_sheet().unwrap(), SyncOutcome::NotConfigured);

        let sheet = tmp.path().join("team.csv");
        t.setup("Ada", "ST7", Some(sheet.as_path())).unwrap();
        assert_eq!(
            t.sync_team_sheet().unwrap(),
            SyncOutcome::SheetMissing(sheet)
        );
        let entries = t.activity_log().read_all().unwrap();
        assert_eq!(entries.last().unwrap().level, Level::Warn);
        assert_eq!(entries.last().unwrap().category, "sync");
    }

    #[test]
    fn auto_sync_appends_and_drops_synced_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let sheet = tmp.path().join("team.csv");
        let existing = format!("{}\nOld,T,2025-01-01,,x,Claude,y,1,1,100%,0%\n", csv::HEADER);
        std::fs::write(&sheet, &existing).unwrap();

        let mut t = configured(tmp.path());
        t.setup("Ada", "ST7", Some(sheet.as_path())).unwrap();
        assert!(t.config().auto_sync);

        t.start_session(request("table"), T0).unwrap();
        let end = t.end_session("ok", T0 + Duration::hours(1)).unwrap();
        assert_eq!(
            end.sync,
            Some(Some(SyncOutcome::Synced {
                path: sheet.clone(),
                rows: 1
            }))
        );

        let merged = std::fs::read_to_string(&sheet).unwrap();
        assert!(merged.starts_with(&existing));
        assert_eq!(merged.lines().count(), 3);

        assert!(t.usage().is_empty());
        let stored = devlog_usage::load_entries(&t.paths().usage_json).unwrap();
        assert!(stored.is_empty());
    }

    #[test]
    fn failed_store_save_after_sync_names_the_sheet() {
        let tmp = tempfile::tempdir().unwrap();
        let store = tmp.path().join("store");
        std::fs::create_dir_all(&store).unwrap();
        std::fs::write(store.join("ai-usage-data.json"), "[{ broken").unwrap();
        let sheet = tmp.path().join("team.csv");
        std::fs::write(&sheet, format!("{}\n", csv::HEADER)).unwrap();

        let mut t = configured(tmp.path());
        t.start_session(request("table"), T0).unwrap();
        t.end_session("ok", T0 + Duration::hours(1)).unwrap();
        t.setup("Ada", "ST7", Some(sheet.as_path())).unwrap();

        assert!(matches!(t.sync_team_sheet(), Err(TrackerError::Storage(_))));
        assert_eq!(std::fs::read_to_string(&sheet).unwrap().lines().count(), 2);
        assert_eq!(
            std::fs::read_to_string(store.join("ai-usage-data.json")).unwrap(),
            "[{ broken"
        );

        let entries = t.activity_log().read_all().unwrap();
        let last = entries.last().unwrap();
        assert_eq!(last.level, Level::Error);
        assert_eq!(last.category, "sync");
        assert!(last.message.starts_with("Failed to drop synced entries: 1 entries are already in team sheet"));
    }

    #[test]
    fn unreadable_store_is_never_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        let store = tmp.path().join("store");
        std::fs::create_dir_all(&store).unwrap();
        std::fs::write(store.join("ai-usage-data.json"), "[{ broken").unwrap();

        let mut t = configured(tmp.path());
        t.start_session(request("table"), T0).unwrap();
        assert!(matches!(t.save_data(), Err(TrackerError::Storage(_))));
        assert_eq!(
            std::fs::read_to_string(store.join("ai-usage-data.json")).unwrap(),
            "[{ broken"
        );

        let entries = t.activity_log().read_all().unwrap();
        let errors: Vec<_> = entries
            .iter()
            .filter(|e| e.level == Level::Error && e.category == "data")
            .collect();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.starts_with("Failed to load existing data"));
    }
}
