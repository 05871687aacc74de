use serde::Serialize;

use crate::entry::AiUsageEntry;

const RECENT_SESSIONS: usize = 5;

/// Aggregate view over the usage history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageSummary {
    pub total_sessions: usize,
    pub completed_sessions: usize,
    /// Sum of positive savings percentages over the number of completed
    /// sessions. Sessions that overran count towards the divisor only.
    pub average_percent_saved: f64,
    pub hours_without_ai: f64,
    pub hours_with_ai: f64,
    pub hours_saved: f64,
}

impl UsageSummary {
    /// Hour totals cover completed sessions only.
    pub fn compute(entries: &[AiUsageEntry]) -> Self {
        let completed: Vec<&AiUsageEntry> = entries.iter().filter(|e| e.is_completed()).collect();

        let positive_saved: i64 = completed
            .iter()
            .filter_map(|e| e.percent_time_saved())
            .filter(|p| *p > 0)
            .sum();
        let average_percent_saved = if completed.is_empty() {
            0.0
        } else {
            positive_saved as f64 / completed.len() as f64
        };

        let hours_without_ai: f64 = completed.iter().map(|e| e.estimated_time_without_ai).sum();
        let hours_with_ai: f64 = completed
            .iter()
            .filter_map(|e| e.estimated_time_with_ai())
            .sum();

        Self {
            total_sessions: entries.len(),
            completed_sessions: completed.len(),
            average_percent_saved,
            hours_without_ai,
            hours_with_ai,
            hours_saved: hours_without_ai - hours_with_ai,
        }
    }

    /// The "AI Usage Dashboard" Markdown page, listing the last five sessions.
    pub fn render_markdown(&self, entries: &[AiUsageEntry]) -> String {
        let mut out = String::from("# AI Usage Dashboard\n\n## Summary\n");
        out.push_str(&format!("- **Total Sessions**: {}\n", self.total_sessions));
        out.push_str(&format!("- **Completed Sessions**: {}\n", self.completed_sessions));
        out.push_str(&format!(
            "- **Average Time Saved**: {:.1}%\n",
            self.average_percent_saved
        ));
        out.push_str(&format!(
            "- **Total Time Without AI**: {:.1} hours\n",
            self.hours_without_ai
        ));
        out.push_str(&format!(
            "- **Total Time With AI**: {:.1} hours\n",
            self.hours_with_ai
        ));
        out.push_str(&format!(
            "- **Total Time Saved**: {:.1} hours\n",
            self.hours_saved
        ));

        out.push_str("\n## Recent Sessions\n");
        let skip = entries.len().saturating_sub(RECENT_SESSIONS);
        for e in &entries[skip..] {
            out.push_str(&format!("\n### {} - {}\n", e.individual, e.date));
            out.push_str(&format!("- **Task**: {}\n", e.experiment_summary));
            out.push_str(&format!("- **Tools**: {}\n", e.tools_used));
            match e.percent_time_saved() {
                Some(p) => out.push_str(&format!("- **Time Saved**: {p}%\n")),
                None => out.push_str("- **Time Saved**: n/a\n"),
            }
            let outcome = if e.is_completed() {
                e.notable_outcomes()
            } else {
                "Session in progress..."
            };
            out.push_str(&format!("- **Outcome**: {outcome}\n"));
        }
        out.push_str("\n---\n*Run `devlog usage sync` to merge completed sessions into the team sheet*\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::SessionRequest;
    use crate::session::UsageLedger;
    use time::macros::datetime;
    use time::Duration;

    fn req(summary: &str, est: f64) -> SessionRequest {
        SessionRequest {
            individual: "Ada".into(),
            team: "ST7".into(),
            experiment_summary: summary.into(),
            tools_used: vec!["Claude".into()],
            estimated_time_without_ai: est,
            ..Default::default()
        }
    }

    /// Sessions as (estimate, elapsed minutes); the last one stays open when
    /// `leave_open` is set.
    fn history(sessions: &[(f64, i64)], leave_open: bool) -> Vec<AiUsageEntry> {
        let mut now = datetime!(2026-10-19 08:00 UTC);
        let mut ledger = UsageLedger::new();
        for (i, (est, minutes)) in sessions.iter().enumerate() {
            ledger.start(req(&format!("task {i}"), *est), now).unwrap();
            now += Duration::minutes(*minutes);
            let last = i + 1 == sessions.len();
            if !(last && leave_open) {
                ledger.end("ok", now).unwrap();
            }
        }
        ledger.into_entries()
    }

    #[test]
    fn empty_history() {
        let s = UsageSummary::compute(&[]);
        assert_eq!(s, UsageSummary::default());
    }

    #[test]
    fn averages_positive_savings_over_completed_count() {
        // 50% saved, -100% (overran), open.
        let entries = history(&[(2.0, 60), (1.0, 120), (4.0, 30)], true);
        let s = UsageSummary::compute(&entries);
        assert_eq!(s.total_sessions, 3);
        assert_eq!(s.completed_sessions, 2);
        assert_eq!(s.average_percent_saved, 25.0);
        assert_eq!(s.hours_without_ai, 3.0);
        assert_eq!(s.hours_with_ai, 3.0);
        assert_eq!(s.hours_saved, 0.0);
    }

    #[test]
    fn dashboard_lists_last_five_sessions() {
        let entries = history(&[(1.0, 30); 7], true);
        let md = UsageSummary::compute(&entries).render_markdown(&entries);
        assert!(md.starts_with("# AI Usage Dashboard\n"));
        assert!(md.contains("- **Completed Sessions**: 6\n"));
        assert!(md.contains("- **Average Time Saved**: 50.0%\n"));
        assert_eq!(md.matches("\n### ").count(), 5);
        assert!(!md.contains("task 1\n"));
        assert!(md.contains("- **Task**: task 2\n"));
        assert!(md.contains("- **Outcome**: Session in progress...\n"));
    }
}
