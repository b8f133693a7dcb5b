// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod listing;
pub mod logging;

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::RunOptions;
use crate::engine::Sequencer;
use crate::errors::{Result, SequenceError};
use crate::exec::Outcome;
use crate::listing::EntryLister;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - option resolution (all configuration errors surface here)
/// - changing into the base and target directories
/// - listing the target directory
/// - the sequencer, writing printed paths to stdout and relaying child
///   stderr to the configured log target
pub async fn run(args: CliArgs) -> Result<Outcome> {
    let options = config::resolve(&args)?;
    enter_directories(&options)?;

    let lister = EntryLister::new(options.listing);
    let target = options.log_target;
    info!(
        dir = %options.directory.display(),
        print = options.print_only,
        "running directory"
    );

    let mut sequencer = Sequencer::new(options, ".", target, io::stdout())
        .with_program_name(cli::program_name());
    let outcome = sequencer.run_directory(&lister).await?;

    debug!(state = %sequencer.state(), "sequence finished");
    Ok(outcome)
}

/// Change into the base directory (if any), then into the target directory.
///
/// Children inherit the resulting working directory.
fn enter_directories(options: &RunOptions) -> Result<()> {
    if let Some(base) = &options.base_directory {
        change_dir(base)?;
    }

    let dir = &options.directory;
    let meta = fs::metadata(dir).map_err(|source| SequenceError::OpenDirectory {
        path: dir.clone(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(SequenceError::OpenDirectory {
            path: dir.clone(),
            source: io::Error::new(io::ErrorKind::NotADirectory, "Not a directory"),
        });
    }

    change_dir(dir)
}

fn change_dir(path: &Path) -> Result<()> {
    debug!(dir = %path.display(), "changing directory");
    std::env::set_current_dir(path).map_err(|source| SequenceError::ChangeDirectory {
        path: path.to_path_buf(),
        source,
    })
}
