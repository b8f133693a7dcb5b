// tests/outcome_decode.rs

use std::error::Error;
use std::os::unix::process::ExitStatusExt;
use std::process::{Command, ExitStatus};

use sequence::exec::outcome::OS_ERROR_STATUS;
use sequence::exec::{Outcome, decode, decode_raw};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn zero_exit_is_success() {
    assert_eq!(decode_raw(0), Outcome::Success);
    assert_eq!(Outcome::Success.exit_code(), 0);
}

#[test]
fn nonzero_exit_is_surfaced_as_exit_code() {
    let outcome = decode_raw(3 << 8);
    assert_eq!(outcome, Outcome::ExitCode(3));
    assert_eq!(outcome.exit_code(), 3);

    assert_eq!(decode_raw(255 << 8), Outcome::ExitCode(255));
}

#[test]
fn signal_termination_adds_128() {
    let outcome = decode_raw(9);
    assert_eq!(outcome, Outcome::Signaled(9));
    assert_eq!(outcome.exit_code(), 137);

    // Core dump flag set alongside the signal.
    assert_eq!(decode_raw(0x80 | 11), Outcome::Signaled(11));
}

#[test]
fn stopped_or_continued_status_is_abnormal() {
    // WIFSTOPPED with SIGSTOP (19).
    let stopped = decode_raw((19 << 8) | 0x7f);
    assert_eq!(stopped, Outcome::Abnormal);
    assert_eq!(stopped.exit_code(), OS_ERROR_STATUS);
    assert_eq!(OS_ERROR_STATUS, 71);

    // WIFCONTINUED.
    assert_eq!(decode_raw(0xffff), Outcome::Abnormal);
}

#[test]
fn decode_matches_real_processes() -> TestResult {
    let ok = Command::new("sh").arg("-c").arg("exit 0").status()?;
    assert_eq!(decode(ok), Outcome::Success);

    let failed = Command::new("sh").arg("-c").arg("exit 3").status()?;
    assert_eq!(decode(failed), Outcome::ExitCode(3));

    let killed = Command::new("sh").arg("-c").arg("kill -9 $$").status()?;
    assert_eq!(decode(killed), Outcome::Signaled(9));
    assert_eq!(ExitStatus::from_raw(killed.into_raw()).signal(), Some(9));

    Ok(())
}

#[test]
fn outcome_display_reads_like_a_report() {
    assert_eq!(Outcome::ExitCode(3).to_string(), "returned 3");
    assert_eq!(Outcome::Signaled(15).to_string(), "signaled 15");
    assert_eq!(Outcome::Abnormal.to_string(), "terminated abnormally");
}
