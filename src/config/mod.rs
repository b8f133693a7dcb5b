// src/config/mod.rs

//! Run configuration for sequence.
//!
//! Responsibilities:
//! - Define the immutable options a run is driven by (`model.rs`).
//! - Map syslog facility and severity names to their numeric codes
//!   (`priority.rs`).
//! - Turn parsed CLI arguments into validated `RunOptions` (`resolve.rs`).

pub mod model;
pub mod priority;
pub mod resolve;

pub use model::{LogTarget, RunOptions};
pub use priority::{facility_by_name, parse_syslog_target, severity_by_name};
pub use resolve::resolve;
