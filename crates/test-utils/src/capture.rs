use std::io;
use std::sync::{Arc, Mutex};

use sequence::exec::{LineSink, SinkProvider};
use sequence::listing::Entry;

/// A relayed line together with the entry it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLine {
    pub entry: String,
    pub line: String,
}

/// A `SinkProvider` that records every relayed line in memory.
#[derive(Debug, Clone, Default)]
pub struct CapturingSinks {
    lines: Arc<Mutex<Vec<CapturedLine>>>,
    opened: Arc<Mutex<Vec<(String, Option<u32>)>>>,
}

impl CapturingSinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<CapturedLine> {
        self.lines.lock().unwrap().clone()
    }

    /// Just the text of each line, in arrival order.
    pub fn texts(&self) -> Vec<String> {
        self.lines().into_iter().map(|l| l.line).collect()
    }

    /// `(display name, pid)` for every sink opened.
    pub fn opened(&self) -> Vec<(String, Option<u32>)> {
        self.opened.lock().unwrap().clone()
    }
}

impl SinkProvider for CapturingSinks {
    fn open(&self, entry: &Entry, pid: Option<u32>) -> Box<dyn LineSink> {
        self.opened
            .lock()
            .unwrap()
            .push((entry.display_name(), pid));
        Box::new(CapturingSink {
            entry: entry.display_name(),
            lines: Arc::clone(&self.lines),
        })
    }
}

struct CapturingSink {
    entry: String,
    lines: Arc<Mutex<Vec<CapturedLine>>>,
}

impl LineSink for CapturingSink {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.lines.lock().unwrap().push(CapturedLine {
            entry: self.entry.clone(),
            line: String::from_utf8_lossy(line).into_owned(),
        });
        Ok(())
    }
}

/// A `LineSink` that always fails, to check the relay keeps draining.
pub struct FailingSink;

impl LineSink for FailingSink {
    fn write_line(&mut self, _line: &[u8]) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }
}
