// src/cli.rs

//! CLI argument parsing using `clap`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};

use crate::listing::ListingPolicy;

const EXAMPLES: &str = "\
RETURN VALUE:
  The exit status of the first executable to fail. If it was terminated by a
  signal, the signal number plus 128. If its status could not be decoded, 71.
  If an executable could not be run, or the options are invalid, 1.

EXAMPLES:
  Execute all commands in /etc/rc3.d, passing 'start' to each of them:

    sequence /etc/rc3.d -- start";

/// Command-line arguments for `sequence`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sequence",
    version,
    about = "Run all the executables in a directory in sequence, ordered alphabetically.",
    long_about = None,
    after_help = EXAMPLES
)]
pub struct CliArgs {
    /// Terminate printed names with a zero byte instead of a newline.
    #[arg(short = '0', long)]
    pub zero: bool,

    /// Print the names of the executables rather than execute them.
    #[arg(short, long)]
    pub print: bool,

    /// Skip executables that cannot be executed instead of failing.
    #[arg(short, long)]
    pub ignore_inaccessible: bool,

    /// Change to this directory before resolving DIRECTORY.
    #[arg(short, long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Send the stderr of each executable to syslog at this priority.
    ///
    /// The facility defaults to `user` when omitted, e.g. `daemon.notice`
    /// or just `err`.
    #[arg(short, long, value_name = "[FACILITY.]LEVEL")]
    pub syslog: Option<String>,

    /// Which directory entries are candidates for execution.
    #[arg(long, value_enum, value_name = "POLICY", default_value_t = ListingPolicy::Strict)]
    pub listing: ListingPolicy,

    /// Logging level of sequence itself (error, warn, info, debug, trace).
    ///
    /// If omitted, `SEQUENCE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Directory containing the executables.
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Arguments passed to every executable.
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<OsString>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Parse an explicit argument list (argv[0] first).
pub fn try_parse_from<I, T>(itr: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CliArgs::try_parse_from(itr)
}

/// Exit status for a parse failure.
///
/// Help and version requests succeed; everything else is a usage error with
/// status 1 rather than clap's default of 2.
pub fn exit_code_for(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Name used to prefix our own diagnostics: the basename of argv[0].
pub fn program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sequence".to_string())
}
