//! AI-session state machine: `Idle → Open → Idle`.
//!
//! At most one session is open. The open session is always the last entry of
//! the history; its start instant is kept in the [`SessionMarker`].

use devlog_core::clock::parse_timestamp;
use thiserror::Error;
use time::OffsetDateTime;

use crate::entry::{AiUsageEntry, SessionRequest};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("no active AI session to end")]
    NoActiveSession,
    #[error("an AI session is already active; end it before starting another")]
    SessionAlreadyActive,
}

/// Start instant of the open session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionMarker {
    pub start_time: OffsetDateTime,
}

/// Session history plus the open-session marker.
#[derive(Debug, Clone, Default)]
pub struct UsageLedger {
    entries: Vec<AiUsageEntry>,
    active: Option<SessionMarker>,
}

impl UsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a stored history. When the last entry is still open its
    /// start time becomes the marker, so a session can be ended by a later
    /// process.
    pub fn from_entries(entries: Vec<AiUsageEntry>) -> Self {
        let active = entries
            .last()
            .filter(|e| !e.is_completed())
            .and_then(|e| match parse_timestamp(&e.session_start_time) {
                Some(start_time) => Some(SessionMarker { start_time }),
                None => {
                    tracing::warn!(
                        start = %e.session_start_time,
                        "open session has an unreadable start time; it cannot be ended or replaced"
                    );
                    None
                }
            });
        Self { entries, active }
    }

    pub fn entries(&self) -> &[AiUsageEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<AiUsageEntry> {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn active(&self) -> Option<&SessionMarker> {
        self.active.as_ref()
    }

    /// The open entry, if any.
    pub fn current(&self) -> Option<&AiUsageEntry> {
        self.active?;
        self.entries.last().filter(|e| !e.is_completed())
    }

    /// Open a new session at `now`. Nothing changes on error.
    pub fn start(
        &mut self,
        req: SessionRequest,
        now: OffsetDateTime,
    ) -> Result<&AiUsageEntry, UsageError> {
        // An open entry that could not be resumed still counts as open.
        if self.active.is_some() || self.entries.iter().any(|e| !e.is_completed()) {
            return Err(UsageError::SessionAlreadyActive);
        }
        validate(&req)?;

        self.entries.push(AiUsageEntry::open(req, now));
        self.active = Some(SessionMarker { start_time: now });
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Close the open session at `now`, deriving its time metrics.
    pub fn end(
        &mut self,
        notable_outcomes: &str,
        now: OffsetDateTime,
    ) -> Result<&AiUsageEntry, UsageError> {
        let marker = self.active.ok_or(UsageError::NoActiveSession)?;
        let outcomes = notable_outcomes.trim();
        let entry = match self.entries.last_mut() {
            Some(e) if !e.is_completed() => e,
            _ => return Err(UsageError::NoActiveSession),
        };
        if outcomes.is_empty() {
            return Err(UsageError::Validation(
                "notable outcomes must not be empty".into(),
            ));
        }

        entry.finish(marker.start_time, now, outcomes.to_string());
        self.active = None;
        Ok(entry)
    }

    /// Completed entries, in history order.
    pub fn completed(&self) -> impl Iterator<Item = &AiUsageEntry> {
        self.entries.iter().filter(|e| e.is_completed())
    }

    /// Drop every completed entry (after a successful sync). Returns how many
    /// were removed.
    pub fn retain_open(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !e.is_completed());
        before - self.entries.len()
    }
}

fn validate(req: &SessionRequest) -> Result<(), UsageError> {
    let required = [
        ("individual", req.individual.as_str()),
        ("team", req.team.as_str()),
        ("experiment summary", req.experiment_summary.as_str()),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(UsageError::Validation(format!("{name} must not be empty")));
        }
    }
    if req.tools_used.iter().all(|t| t.trim().is_empty()) {
        return Err(UsageError::Validation(
            "at least one AI tool must be selected".into(),
        ));
    }
    let est = req.estimated_time_without_ai;
    if !est.is_finite() || est <= 0.0 {
        return Err(UsageError::Validation(format!(
            "estimated time without AI must be a positive number of hours (got {est})"
        )));
    }
    Ok(())
}
