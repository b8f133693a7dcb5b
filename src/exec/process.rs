// src/exec/process.rs

//! Spawn/wait seam around `tokio::process`.

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::{Child, ChildStderr, Command};
use tracing::debug;

/// `ETXTBSY` is transient: another process forked while the file was still
/// open for writing. Retry a few times before giving up.
const TEXT_BUSY_RETRIES: u32 = 5;
const TEXT_BUSY_BACKOFF: Duration = Duration::from_millis(20);

/// Everything needed to start one entry.
#[derive(Debug, Clone, Copy)]
pub struct SpawnRequest<'a> {
    /// Path to execute, as reachable from `working_dir`.
    pub program: &'a Path,
    /// Presented to the child as argv[0].
    pub arg0: &'a OsStr,
    pub args: &'a [OsString],
    pub working_dir: &'a Path,
    /// Pipe stderr back to us instead of letting the child inherit it.
    pub capture_stderr: bool,
}

/// A running child and its (optional) diagnostic stream.
#[derive(Debug)]
pub struct SpawnedChild {
    child: Child,
    stderr: Option<ChildStderr>,
}

/// Start a new process image for `req`.
///
/// stdin and stdout are inherited. Exec failures (e.g. `PermissionDenied`)
/// are reported here rather than from the child.
pub async fn spawn(req: SpawnRequest<'_>) -> io::Result<SpawnedChild> {
    let mut attempt = 0;
    loop {
        match spawn_once(req) {
            Err(e) if e.raw_os_error() == Some(libc::ETXTBSY) && attempt < TEXT_BUSY_RETRIES => {
                attempt += 1;
                debug!(program = %req.program.display(), attempt, "executable busy; retrying");
                tokio::time::sleep(TEXT_BUSY_BACKOFF).await;
            }
            result => return result,
        }
    }
}

fn spawn_once(req: SpawnRequest<'_>) -> io::Result<SpawnedChild> {
    let mut cmd = Command::new(req.program);
    cmd.arg0(req.arg0)
        .args(req.args)
        .current_dir(req.working_dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(if req.capture_stderr {
            Stdio::piped()
        } else {
            Stdio::inherit()
        })
        .kill_on_drop(true);

    let mut child = cmd.spawn()?;
    let stderr = child.stderr.take();
    Ok(SpawnedChild { child, stderr })
}

impl SpawnedChild {
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Hand the stderr pipe to a relay. Returns `None` the second time.
    pub fn take_stderr(&mut self) -> Option<ChildStderr> {
        self.stderr.take()
    }

    /// Wait for termination and return the raw status.
    ///
    /// Reaping is driven by `SIGCHLD`; unrelated signals interrupting the
    /// wait are retried inside tokio and never surface here.
    pub async fn wait(&mut self) -> io::Result<ExitStatus> {
        self.child.wait().await
    }
}
