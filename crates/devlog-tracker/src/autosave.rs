use std::time::{Duration, Instant};

pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Periodic save trigger, polled by the event loop.
#[derive(Debug, Clone)]
pub struct AutosaveTimer {
    interval: Duration,
    last: Instant,
}

impl AutosaveTimer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last: now,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last) >= self.interval
    }

    pub fn reset(&mut self, now: Instant) {
        self.last = now;
    }
}

impl Default for AutosaveTimer {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_INTERVAL, Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_after_interval_then_reset() {
        let t0 = Instant::now();
        let mut timer = AutosaveTimer::new(Duration::from_secs(300), t0);
        assert!(!timer.due(t0 + Duration::from_secs(299)));
        assert!(timer.due(t0 + Duration::from_secs(300)));

        timer.reset(t0 + Duration::from_secs(300));
        assert!(!timer.due(t0 + Duration::from_secs(400)));
        assert!(timer.due(t0 + Duration::from_secs(601)));
    }

    #[test]
    fn earlier_instant_is_not_due() {
        let t0 = Instant::now() + Duration::from_secs(10);
        let timer = AutosaveTimer::new(Duration::from_secs(1), t0);
        assert!(!timer.due(t0 - Duration::from_secs(5)));
    }
}
