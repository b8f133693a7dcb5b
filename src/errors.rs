// src/errors.rs

//! Crate-wide error type.
//!
//! Every variant is fatal to the run and maps to exit status 1. A child that
//! fails is *not* an error: that is an [`Outcome`](crate::exec::Outcome).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SequenceError {
    #[error("{0}")]
    Config(String),

    #[error("Could not open '{}': {source}", .path.display())]
    OpenDirectory { path: PathBuf, source: io::Error },

    #[error("Could not chdir to '{}': {source}", .path.display())]
    ChangeDirectory { path: PathBuf, source: io::Error },

    #[error("Could not read directory '{}': {source}", .path.display())]
    ReadDirectory { path: PathBuf, source: io::Error },

    #[error("Could not stat '{}': {source}", .path.display())]
    Stat { path: PathBuf, source: io::Error },

    #[error("Could not execute '{}': {source}", .path.display())]
    Spawn { path: PathBuf, source: io::Error },

    #[error("waitpid for '{}' failed: {source}", .path.display())]
    Wait { path: PathBuf, source: io::Error },

    #[error("Could not write output: {0}")]
    Output(#[source] io::Error),
}

impl SequenceError {
    /// Process exit status for a fatal error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub type Result<T> = std::result::Result<T, SequenceError>;
