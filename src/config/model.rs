// src/config/model.rs

use std::ffi::OsString;
use std::path::PathBuf;

use crate::listing::ListingPolicy;

/// Where the diagnostic output of each child goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogTarget {
    /// Each line is written to our own stderr as `<name>: <line>`.
    #[default]
    PrefixedStderr,
    /// Each line is sent to syslog; one channel per entry.
    Syslog { facility: i32, level: i32 },
}

/// Immutable options for one run, resolved before anything executes.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Terminate printed names with `\0` instead of `\n`.
    pub terminator_is_zero: bool,

    /// List entries rather than execute them.
    pub print_only: bool,

    /// Treat permission-denied entries as successful no-ops.
    pub ignore_inaccessible: bool,

    pub log_target: LogTarget,

    /// Changed into before the target directory is resolved.
    pub base_directory: Option<PathBuf>,

    /// The target directory, as given on the command line.
    pub directory: PathBuf,

    pub listing: ListingPolicy,

    /// Passed to every executable after argv[0].
    pub args: Vec<OsString>,
}

impl RunOptions {
    /// Options for executing `directory` with everything else defaulted.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            terminator_is_zero: false,
            print_only: false,
            ignore_inaccessible: false,
            log_target: LogTarget::default(),
            base_directory: None,
            directory: directory.into(),
            listing: ListingPolicy::default(),
            args: Vec::new(),
        }
    }

    /// The byte written after each printed path.
    pub fn terminator(&self) -> u8 {
        if self.terminator_is_zero { b'\0' } else { b'\n' }
    }
}
