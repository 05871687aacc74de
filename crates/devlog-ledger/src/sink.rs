/// Live display target mirroring every appended entry, e.g. an editor output
/// panel or the terminal.
pub trait DisplaySink {
    fn write_line(&mut self, line: &str);
    fn clear(&mut self);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DisplaySink for NullSink {
    fn write_line(&mut self, _line: &str) {}
    fn clear(&mut self) {}
}

/// Keeps lines in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub lines: Vec<String>,
}

impl DisplaySink for MemorySink {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn clear(&mut self) {
        self.lines.clear();
    }
}
