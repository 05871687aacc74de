use devlog_ledger::{DevlogPaths, DisplaySink};
use devlog_tracker::Tracker;

/// Mirrors recorded entries to stderr, keeping stdout for command output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink {
    quiet: bool,
}

impl ConsoleSink {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl DisplaySink for ConsoleSink {
    fn write_line(&mut self, line: &str) {
        if !self.quiet {
            eprintln!("{line}");
        }
    }

    fn clear(&mut self) {}
}

/// Open the tracker over `paths` with the console sink.
pub fn open_tracker(paths: &DevlogPaths, quiet: bool) -> anyhow::Result<Tracker<ConsoleSink>> {
    Tracker::open(paths.clone(), ConsoleSink::new(quiet))
}
