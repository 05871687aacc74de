use devlog_core::clock::{local_offset, today_utc};
use devlog_ledger::{DevlogPaths, DisplaySink};
use devlog_tracker::{HostEvent, Tracker};
use std::io::BufRead;
use std::path::PathBuf;
use std::time::Instant;

use crate::console::open_tracker;

/// `devlog ingest`: one host event per stdin line until EOF.
///
/// Runs for the lifetime of the editor session, so it does not hold the
/// store lock; it never touches the usage store unless something marked it
/// dirty.
pub fn execute(
    paths: &DevlogPaths,
    roots: Vec<PathBuf>,
    activate: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut tracker = open_tracker(paths, quiet)?.with_workspace_roots(roots);

    if activate {
        match tracker.activate(&today_utc(), local_offset()) {
            Ok(Some(dest)) => println!("Logs exported to: {}", dest.display()),
            Ok(None) => {}
            Err(e) => tracing::warn!("auto-export failed: {e}"),
        }
    }

    let stdin = std::io::stdin();
    let processed = ingest_lines(&mut tracker, stdin.lock())?;
    tracing::debug!(processed, "ingest finished");
    Ok(())
}

/// Feed every parseable line to the tracker. Returns how many events were
/// processed; malformed or non-UTF-8 lines are skipped with a warning.
fn ingest_lines<S: DisplaySink>(
    tracker: &mut Tracker<S>,
    input: impl BufRead,
) -> anyhow::Result<usize> {
    let mut processed = 0;
    for (n, line) in input.split(b'\n').enumerate() {
        let bytes = line?;
        let Ok(line) = std::str::from_utf8(&bytes) else {
            tracing::warn!(line = n + 1, "skipping host event that is not valid UTF-8");
            continue;
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<HostEvent>(line) {
            Ok(event) => {
                tracker.ingest(event);
                processed += 1;
            }
            Err(e) => tracing::warn!(line = n + 1, "skipping malformed host event: {e}"),
        }
        tracker.tick(Instant::now());
    }
    Ok(processed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use devlog_ledger::MemorySink;

    #[test]
    fn ingests_valid_lines_and_skips_bad_ones() {
        let tmp = tempfile::tempdir().unwrap();
        let mut tracker = Tracker::open(DevlogPaths::discover(tmp.path()), MemorySink::default())
            .unwrap()
            .with_workspace_roots(vec![PathBuf::from("/repo")]);
        let input = concat!(
            "{\"event\":\"document_opened\",\"path\":\"/repo/src/a.rs\"}\n",
            "not json\n",
            "\n",
            "{\"event\":\"terminal_opened\",\"name\":\"zsh\"}\n",
        );

        let processed = ingest_lines(&mut tracker, input.as_bytes()).unwrap();
        assert_eq!(processed, 2);
        assert_eq!(
            tracker.sink().lines.len(),
            2,
            "one display line per recorded entry"
        );
        let messages: Vec<String> = tracker
            .activity_log()
            .read_all()
            .unwrap()
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(messages, vec!["Document opened: src/a.rs", "Terminal opened: zsh"]);
    }

    #[test]
    fn invalid_utf8_line_does_not_stop_ingest() {
        let tmp = tempfile::tempdir().unwrap();
        let mut tracker =
            Tracker::open(DevlogPaths::discover(tmp.path()), MemorySink::default()).unwrap();
        let mut input = b"{\"event\":\"terminal_opened\",\"name\":\"a\"}\n".to_vec();
        input.extend_from_slice(b"{\"event\":\"terminal_opened\",\"name\":\"\xff\xfe\"}\r\n");
        input.extend_from_slice(b"{\"event\":\"terminal_opened\",\"name\":\"b\"}");

        let processed = ingest_lines(&mut tracker, input.as_slice()).unwrap();
        assert_eq!(processed, 2);
        let messages: Vec<String> = tracker
            .activity_log()
            .read_all()
            .unwrap()
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(messages, vec!["Terminal opened: a", "Terminal opened: b"]);
    }
}
