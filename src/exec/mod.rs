// src/exec/mod.rs

//! Process execution layer.
//!
//! This module owns everything that touches a single child process:
//!
//! - [`process`] spawns an entry with `tokio::process::Command` and waits for
//!   it, hiding the pipe plumbing for stderr capture.
//! - [`outcome`] decodes a raw termination status into an [`Outcome`].
//! - [`relay`] drains a child's stderr line by line into a [`LineSink`].
//! - [`sink`] provides the sinks: prefixed stderr and syslog, plus the
//!   [`SinkProvider`] seam the engine opens one sink per entry through.

pub mod outcome;
pub mod process;
pub mod relay;
pub mod sink;

pub use outcome::{Outcome, decode, decode_raw};
pub use process::{SpawnRequest, SpawnedChild, spawn};
pub use relay::{EXIT_DRAIN, LineSplitter, RelayStats, relay, relay_until, spawn_relay};
pub use sink::{LineSink, PrefixedWriter, SinkProvider, SyslogSink};
