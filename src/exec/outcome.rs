// src/exec/outcome.rs

use std::fmt;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

/// Exit status used when a child's termination could not be decoded
/// (`EX_OSERR` from `sysexits.h`).
pub const OS_ERROR_STATUS: i32 = 71;

/// Decoded result of a finished child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Normal exit with a non-zero status.
    ExitCode(i32),
    /// Terminated by this signal number.
    Signaled(i32),
    /// Any other termination shape (stopped, unrecognised status).
    Abnormal,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Status the whole run exits with when this outcome halts it.
    pub fn exit_code(&self) -> i32 {
        match *self {
            Outcome::Success => 0,
            Outcome::ExitCode(code) => code,
            Outcome::Signaled(signal) => signal + 128,
            Outcome::Abnormal => OS_ERROR_STATUS,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "succeeded"),
            Outcome::ExitCode(code) => write!(f, "returned {code}"),
            Outcome::Signaled(signal) => write!(f, "signaled {signal}"),
            Outcome::Abnormal => write!(f, "terminated abnormally"),
        }
    }
}

/// Map a termination status onto exactly one [`Outcome`].
pub fn decode(status: ExitStatus) -> Outcome {
    if let Some(code) = status.code() {
        return if code == 0 {
            Outcome::Success
        } else {
            Outcome::ExitCode(code)
        };
    }

    if let Some(signal) = status.signal() {
        return Outcome::Signaled(signal);
    }

    Outcome::Abnormal
}

/// [`decode`] for a raw `waitpid` status word.
pub fn decode_raw(raw: i32) -> Outcome {
    decode(ExitStatus::from_raw(raw))
}
