// src/config/resolve.rs

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{LogTarget, RunOptions};
use crate::config::priority::parse_syslog_target;
use crate::errors::Result;

/// Build the immutable [`RunOptions`] for a run from parsed arguments.
///
/// Fails on configuration errors only (e.g. an unknown syslog facility); the
/// filesystem is not touched here.
pub fn resolve(args: &CliArgs) -> Result<RunOptions> {
    let log_target = match args.syslog.as_deref() {
        Some(target) => parse_syslog_target(target)?,
        None => LogTarget::PrefixedStderr,
    };

    let options = RunOptions {
        terminator_is_zero: args.zero,
        print_only: args.print,
        ignore_inaccessible: args.ignore_inaccessible,
        log_target,
        base_directory: args.base_dir.clone(),
        directory: args.directory.clone(),
        listing: args.listing,
        args: args.args.clone(),
    };

    debug!(?options, "resolved run options");
    Ok(options)
}
