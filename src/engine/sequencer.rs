// src/engine/sequencer.rs

use std::ffi::OsString;
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::config::RunOptions;
use crate::engine::state::SequenceState;
use crate::errors::{Result, SequenceError};
use crate::exec::{Outcome, SinkProvider, SpawnRequest, decode, spawn, spawn_relay};
use crate::listing::{Entry, EntryLister};

/// Runs (or prints) a sorted list of entries, strictly one at a time.
///
/// - `working_dir` is where entries are resolved from and where children
///   start; in the binary this is `.` after changing into the target
///   directory.
/// - `sinks` opens the destination for each child's stderr.
/// - `out` receives the paths in print mode.
pub struct Sequencer<P, W> {
    options: RunOptions,
    working_dir: PathBuf,
    sinks: P,
    out: W,
    program_name: String,
    state: SequenceState,
    visited: Vec<OsString>,
}

impl<P, W> Sequencer<P, W>
where
    P: SinkProvider,
    W: Write,
{
    pub fn new(options: RunOptions, working_dir: impl Into<PathBuf>, sinks: P, out: W) -> Self {
        Self {
            options,
            working_dir: working_dir.into(),
            sinks,
            out,
            program_name: "sequence".to_string(),
            state: SequenceState::Idle,
            visited: Vec::new(),
        }
    }

    /// Name used to prefix halt reports on stderr.
    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = name.into();
        self
    }

    pub fn state(&self) -> &SequenceState {
        &self.state
    }

    /// Names of the entries that were started (or printed), in order.
    pub fn visited(&self) -> &[OsString] {
        &self.visited
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// List `working_dir` with `lister`, then [`run`](Self::run) the result.
    ///
    /// Nothing executes unless the listing completes.
    pub async fn run_directory(&mut self, lister: &EntryLister) -> Result<Outcome> {
        self.state = SequenceState::Listing;
        let entries = match lister.list(&self.working_dir, &self.options.directory) {
            Ok(entries) => entries,
            Err(e) => {
                self.state = SequenceState::Halted(e.exit_code());
                return Err(e);
            }
        };
        self.run(&entries).await
    }

    /// Process `entries` in the given order, stopping at the first outcome
    /// that is not [`Outcome::Success`].
    ///
    /// `Ok` carries the overall outcome; `Err` is an infrastructure failure
    /// (spawn, wait, output) that also stops the run.
    pub async fn run(&mut self, entries: &[Entry]) -> Result<Outcome> {
        for (index, entry) in entries.iter().enumerate() {
            let step = if self.options.print_only {
                self.print_entry(entry).map(|()| Outcome::Success)
            } else {
                self.execute_entry(index, entry).await
            };

            let outcome = match step {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.state = SequenceState::Halted(e.exit_code());
                    return Err(e);
                }
            };

            if !outcome.is_success() {
                eprintln!(
                    "{}: {} {}",
                    self.program_name,
                    entry.display_name(),
                    outcome
                );
                self.state = SequenceState::Halted(outcome.exit_code());
                info!(entry = %entry.display_name(), ?outcome, remaining = entries.len() - index - 1, "halting sequence");
                return Ok(outcome);
            }
        }

        self.state = SequenceState::Completed;
        Ok(Outcome::Success)
    }

    fn print_entry(&mut self, entry: &Entry) -> Result<()> {
        if self.options.ignore_inaccessible && !entry.is_executable() {
            debug!(entry = %entry.display_name(), "not an executable file; not printing");
            return Ok(());
        }

        let terminator = self.options.terminator();
        self.out
            .write_all(entry.full_path().as_os_str().as_bytes())
            .and_then(|()| self.out.write_all(&[terminator]))
            .and_then(|()| self.out.flush())
            .map_err(SequenceError::Output)?;

        self.visited.push(entry.name().to_os_string());
        Ok(())
    }

    async fn execute_entry(&mut self, index: usize, entry: &Entry) -> Result<Outcome> {
        self.state = SequenceState::Spawning { index };

        let request = SpawnRequest {
            program: entry.location(),
            arg0: entry.full_path().as_os_str(),
            args: &self.options.args,
            working_dir: &self.working_dir,
            capture_stderr: true,
        };

        let mut child = match spawn(request).await {
            Ok(child) => child,
            Err(e)
                if e.kind() == io::ErrorKind::PermissionDenied
                    && self.options.ignore_inaccessible =>
            {
                warn!(entry = %entry.display_name(), error = %e, "skipping inaccessible entry");
                return Ok(Outcome::Success);
            }
            Err(source) => {
                return Err(SequenceError::Spawn {
                    path: entry.full_path().to_path_buf(),
                    source,
                });
            }
        };

        self.visited.push(entry.name().to_os_string());
        let pid = child.id();
        self.state = SequenceState::Running { index, pid };
        info!(entry = %entry.display_name(), pid = ?pid, "started");

        let (exited_tx, exited_rx) = oneshot::channel();
        let relay = child.take_stderr().map(|stderr| {
            spawn_relay(
                stderr,
                self.sinks.open(entry, pid),
                entry.display_name(),
                exited_rx,
            )
        });

        let status = child.wait().await;
        // Dropping the child kills it if the wait failed. Either way the
        // relay only drains briefly from here on; background grandchildren
        // may keep the pipe open indefinitely.
        drop(child);
        let _ = exited_tx.send(());

        if let Some(handle) = relay {
            if let Err(e) = handle.await {
                warn!(entry = %entry.display_name(), error = %e, "stderr relay task panicked");
            }
        }

        let status = status.map_err(|source| SequenceError::Wait {
            path: entry.full_path().to_path_buf(),
            source,
        })?;

        self.state = SequenceState::Decoding { index };
        let outcome = decode(status);
        info!(entry = %entry.display_name(), ?outcome, "finished");
        Ok(outcome)
    }
}
