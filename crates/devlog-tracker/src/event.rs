use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Zero-based position as reported by the host editor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Renders 1-based: `3:1 - 5:12`.
impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} - {}:{}",
            self.start.line + 1,
            self.start.character + 1,
            self.end.line + 1,
            self.end.character + 1
        )
    }
}

fn one() -> usize {
    1
}

/// One host notification, as read by `devlog ingest` (one JSON object per
/// line, e.g. `{"event":"document_saved","path":"/repo/src/lib.rs"}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    DocumentOpened {
        path: String,
    },
    DocumentClosed {
        path: String,
    },
    DocumentSaved {
        path: String,
    },
    DocumentChanged {
        path: String,
        #[serde(default = "one")]
        changes: usize,
    },
    EditorSwitched {
        path: String,
    },
    SelectionChanged {
        path: String,
        selection: Selection,
    },
    TerminalOpened {
        name: String,
    },
    TerminalClosed {
        name: String,
    },
    ConfigurationChanged,
    /// Replaces the workspace roots used for relative paths.
    WorkspaceFolders {
        folders: Vec<PathBuf>,
    },
}
