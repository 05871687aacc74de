use devlog_core::clock::{format_timestamp, iso_date};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Operator input for starting a session.
#[derive(Debug, Clone, Default)]
pub struct SessionRequest {
    pub individual: String,
    pub team: String,
    pub jira_ticket: Option<String>,
    pub experiment_summary: String,
    pub tools_used: Vec<String>,
    /// Hours the task would take without AI assistance. Must be > 0.
    pub estimated_time_without_ai: f64,
}

/// One AI assistance session (an element of `ai-usage-data.json`).
///
/// Fields fixed at start are public. Outcome, end time, and the derived
/// metrics are private and written once, when the session ends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiUsageEntry {
    pub individual: String,
    pub team: String,
    /// Calendar day of the session start (`YYYY-MM-DD`, UTC).
    pub date: String,
    #[serde(default)]
    pub jira_ticket: String,
    pub experiment_summary: String,
    /// Comma-joined tool names.
    pub tools_used: String,
    #[serde(default)]
    notable_outcomes: String,
    #[serde(rename = "estimatedTimeWithoutAI")]
    pub estimated_time_without_ai: f64,
    #[serde(
        rename = "estimatedTimeWithAI",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    estimated_time_with_ai: Option<f64>,
    #[serde(
        rename = "percentTimeWithAI",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    percent_time_with_ai: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    percent_time_saved: Option<i64>,
    pub session_start_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session_end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    actual_time_spent: Option<f64>,
}

impl AiUsageEntry {
    /// Open a session entry from a validated request.
    pub(crate) fn open(req: SessionRequest, started_at: OffsetDateTime) -> Self {
        Self {
            individual: req.individual.trim().to_string(),
            team: req.team.trim().to_string(),
            date: iso_date(started_at),
            jira_ticket: req.jira_ticket.unwrap_or_default().trim().to_string(),
            experiment_summary: req.experiment_summary,
            tools_used: req
                .tools_used
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            notable_outcomes: String::new(),
            estimated_time_without_ai: req.estimated_time_without_ai,
            estimated_time_with_ai: None,
            percent_time_with_ai: None,
            percent_time_saved: None,
            session_start_time: format_timestamp(started_at),
            session_end_time: None,
            actual_time_spent: None,
        }
    }

    /// Close the session: record end time and outcomes, derive the metrics
    /// from the elapsed wall time.
    pub(crate) fn finish(
        &mut self,
        started_at: OffsetDateTime,
        ended_at: OffsetDateTime,
        notable_outcomes: String,
    ) {
        let elapsed_hours = ((ended_at - started_at).as_seconds_f64() / 3600.0).max(0.0);
        let percent_with = (100.0 * elapsed_hours / self.estimated_time_without_ai).round() as i64;

        self.session_end_time = Some(format_timestamp(ended_at));
        self.notable_outcomes = notable_outcomes;
        self.actual_time_spent = Some(elapsed_hours);
        self.estimated_time_with_ai = Some(elapsed_hours);
        self.percent_time_with_ai = Some(percent_with);
        self.percent_time_saved = Some(100 - percent_with);
    }

    pub fn is_completed(&self) -> bool {
        self.session_end_time.is_some()
    }

    pub fn session_end_time(&self) -> Option<&str> {
        self.session_end_time.as_deref()
    }

    pub fn notable_outcomes(&self) -> &str {
        &self.notable_outcomes
    }

    /// Elapsed hours with AI assistance. `None` while the session is open.
    pub fn estimated_time_with_ai(&self) -> Option<f64> {
        self.completed_then(self.estimated_time_with_ai)
    }

    pub fn actual_time_spent(&self) -> Option<f64> {
        self.completed_then(self.actual_time_spent)
    }

    pub fn percent_time_with_ai(&self) -> Option<i64> {
        self.completed_then(self.percent_time_with_ai)
    }

    pub fn percent_time_saved(&self) -> Option<i64> {
        self.completed_then(self.percent_time_saved)
    }

    // Older stores carry zero placeholders on open sessions; hide them.
    fn completed_then<T>(&self, value: Option<T>) -> Option<T> {
        if self.is_completed() {
            value
        } else {
            None
        }
    }
}
