//! Fixtures shared by the `sequence` integration tests.
//!
//! [`builders::ScriptDirBuilder`] lays out a throwaway directory of scripts,
//! files and symlinks to run a sequence over. [`capture::CapturingSinks`]
//! stands in for the stderr log sinks and records every relayed line
//! together with the entry that produced it.

pub mod builders;
pub mod capture;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound on any single sequence run under test. Generous, since a run
/// forks real processes.
pub const RUN_TIMEOUT: Duration = Duration::from_secs(10);

static TRACING: Once = Once::new();

/// Route the crate's tracing output into the test harness.
///
/// Output is only shown for failing tests. `SEQUENCE_LOG` overrides the
/// default of debug for `sequence` and warn elsewhere, same as the binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_env("SEQUENCE_LOG")
            .unwrap_or_else(|_| EnvFilter::new("sequence=debug,warn"));
        fmt().with_env_filter(filter).with_test_writer().init();
    });
}

/// Await a sequence run, failing the test if a child hangs it.
pub async fn with_timeout<F: Future>(run: F) -> F::Output {
    match tokio::time::timeout(RUN_TIMEOUT, run).await {
        Ok(output) => output,
        Err(_) => panic!("sequence run did not finish within {RUN_TIMEOUT:?}"),
    }
}
