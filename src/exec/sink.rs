// src/exec/sink.rs

//! Destinations for relayed diagnostic lines.

use std::ffi::CString;
use std::io::{self, Write};

use crate::config::LogTarget;
use crate::listing::Entry;

/// Receives complete lines (without the trailing newline) from a relay.
pub trait LineSink: Send {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()>;
}

/// Opens the sink for one entry's lifetime.
///
/// Production code uses [`LogTarget`]; tests can provide their own provider
/// that records lines instead of writing them anywhere.
pub trait SinkProvider: Send + Sync {
    /// `pid` is the child's process id, if it is still known.
    fn open(&self, entry: &Entry, pid: Option<u32>) -> Box<dyn LineSink>;
}

impl SinkProvider for LogTarget {
    fn open(&self, entry: &Entry, pid: Option<u32>) -> Box<dyn LineSink> {
        match *self {
            LogTarget::PrefixedStderr => {
                Box::new(PrefixedWriter::new(entry.display_name(), io::stderr()))
            }
            LogTarget::Syslog { facility, level } => {
                let ident = match pid {
                    Some(pid) => format!("{}[{pid}]", entry.display_name()),
                    None => entry.display_name(),
                };
                Box::new(SyslogSink::open(&ident, facility, level))
            }
        }
    }
}

/// Writes `<prefix>: <line>\n` to the wrapped writer.
pub struct PrefixedWriter<W> {
    prefix: String,
    out: W,
    buf: Vec<u8>,
}

impl<W: Write + Send> PrefixedWriter<W> {
    pub fn new(prefix: impl Into<String>, out: W) -> Self {
        Self {
            prefix: prefix.into(),
            out,
            buf: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> LineSink for PrefixedWriter<W> {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        // One write per line so concurrent writers to stderr can't split it.
        self.buf.clear();
        self.buf.extend_from_slice(self.prefix.as_bytes());
        self.buf.extend_from_slice(b": ");
        self.buf.extend_from_slice(line);
        self.buf.push(b'\n');
        self.out.write_all(&self.buf)?;
        self.out.flush()
    }
}

/// A syslog channel held open for the lifetime of the sink.
///
/// `openlog` keeps a pointer to the ident, so the `CString` lives here and
/// the channel is closed before it is freed.
pub struct SyslogSink {
    ident: CString,
    level: libc::c_int,
}

impl SyslogSink {
    pub fn open(ident: &str, facility: i32, level: i32) -> Self {
        let ident = to_cstring(ident.as_bytes());
        // SAFETY: `ident` is NUL-terminated and outlives the channel; see Drop.
        unsafe { libc::openlog(ident.as_ptr(), 0, facility) };
        Self { ident, level }
    }

    pub fn ident(&self) -> &CString {
        &self.ident
    }
}

impl LineSink for SyslogSink {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        let msg = to_cstring(line);
        // SAFETY: constant format string with a single NUL-terminated argument.
        unsafe { libc::syslog(self.level, c"%s".as_ptr(), msg.as_ptr()) };
        Ok(())
    }
}

impl Drop for SyslogSink {
    fn drop(&mut self) {
        // SAFETY: closes the channel opened in `open`.
        unsafe { libc::closelog() };
    }
}

/// Interior NULs would truncate the message; replace them.
fn to_cstring(bytes: &[u8]) -> CString {
    let cleaned: Vec<u8> = bytes
        .iter()
        .map(|&b| if b == 0 { b'?' } else { b })
        .collect();
    CString::new(cleaned).unwrap_or_default()
}
