// tests/sequencer_exec.rs

use std::error::Error;
use std::ffi::OsString;
use std::fs;
use std::time::{Duration, Instant};

use sequence::config::RunOptions;
use sequence::engine::{SequenceState, Sequencer};
use sequence::errors::SequenceError;
use sequence::exec::Outcome;
use sequence::listing::{EntryLister, ListingPolicy};
use sequence_test_utils::builders::ScriptDirBuilder;
use sequence_test_utils::capture::CapturingSinks;
use sequence_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn sequencer(
    builder: &ScriptDirBuilder,
    options: RunOptions,
    sinks: &CapturingSinks,
) -> Sequencer<CapturingSinks, Vec<u8>> {
    Sequencer::new(options, builder.path(), sinks.clone(), Vec::new())
}

async fn run(
    builder: &ScriptDirBuilder,
    options: RunOptions,
    sinks: &CapturingSinks,
) -> (Sequencer<CapturingSinks, Vec<u8>>, Result<Outcome, SequenceError>) {
    let lister = EntryLister::new(options.listing);
    let mut seq = sequencer(builder, options, sinks);
    let result = with_timeout(seq.run_directory(&lister)).await;
    (seq, result)
}

#[tokio::test]
async fn all_entries_run_in_sorted_order() -> TestResult {
    init_tracing();
    let dir = ScriptDirBuilder::new()?
        .recording_script("9-c", 0)?
        .recording_script("2-b", 0)?
        .recording_script("10-a", 0)?;
    let sinks = CapturingSinks::new();

    let (seq, result) = run(&dir, dir.options(), &sinks).await;

    assert_eq!(result?, Outcome::Success);
    assert_eq!(seq.state(), &SequenceState::Completed);
    assert!(seq.state().is_terminal());
    assert_eq!(dir.recorded(), vec!["10-a", "2-b", "9-c"]);
    assert_eq!(
        seq.visited(),
        &[OsString::from("10-a"), OsString::from("2-b"), OsString::from("9-c")]
    );
    Ok(())
}

#[tokio::test]
async fn nonzero_exit_halts_with_that_code() -> TestResult {
    init_tracing();
    let dir = ScriptDirBuilder::new()?
        .recording_script("a", 0)?
        .recording_script("b", 3)?
        .recording_script("c", 0)?;
    let sinks = CapturingSinks::new();

    let (seq, result) = run(&dir, dir.options(), &sinks).await;

    let outcome = result?;
    assert_eq!(outcome, Outcome::ExitCode(3));
    assert_eq!(outcome.exit_code(), 3);
    assert_eq!(seq.state(), &SequenceState::Halted(3));
    assert!(seq.state().is_terminal());
    assert_eq!(dir.recorded(), vec!["a", "b"]);
    Ok(())
}

#[tokio::test]
async fn signal_halts_with_signal_plus_128() -> TestResult {
    init_tracing();
    let dir = ScriptDirBuilder::new()?
        .script("a", "kill -9 $$")?
        .recording_script("b", 0)?;
    let sinks = CapturingSinks::new();

    let (seq, result) = run(&dir, dir.options(), &sinks).await;

    let outcome = result?;
    assert_eq!(outcome, Outcome::Signaled(9));
    assert_eq!(outcome.exit_code(), 137);
    assert_eq!(seq.state(), &SequenceState::Halted(137));
    assert!(dir.recorded().is_empty());
    Ok(())
}

#[tokio::test]
async fn inaccessible_entry_is_skipped_when_ignoring() -> TestResult {
    init_tracing();
    let dir = ScriptDirBuilder::new()?
        .file("a", "#!/bin/sh\nexit 0\n", 0o644)?
        .recording_script("b", 0)?;
    let sinks = CapturingSinks::new();

    let mut options = dir.options();
    options.ignore_inaccessible = true;
    let (seq, result) = run(&dir, options, &sinks).await;

    assert_eq!(result?, Outcome::Success);
    assert_eq!(dir.recorded(), vec!["b"]);
    assert_eq!(seq.visited(), &[OsString::from("b")]);
    Ok(())
}

#[tokio::test]
async fn inaccessible_entry_is_fatal_without_ignore() -> TestResult {
    init_tracing();
    let dir = ScriptDirBuilder::new()?
        .file("a", "#!/bin/sh\nexit 0\n", 0o644)?
        .recording_script("b", 0)?;
    let sinks = CapturingSinks::new();

    let (seq, result) = run(&dir, dir.options(), &sinks).await;

    match result {
        Err(SequenceError::Spawn { path, source }) => {
            assert_eq!(path, dir.path().join("a"));
            assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
        }
        other => panic!("expected Spawn error, got {other:?}"),
    }
    assert_eq!(seq.state(), &SequenceState::Halted(1));
    assert!(dir.recorded().is_empty());
    Ok(())
}

#[tokio::test]
async fn permissive_listing_defers_directory_failures_to_execution() -> TestResult {
    init_tracing();
    let dir = ScriptDirBuilder::new()?
        .subdir("a-dir")?
        .recording_script("b", 0)?;
    let sinks = CapturingSinks::new();

    let mut options = dir.options();
    options.listing = ListingPolicy::Permissive;
    options.ignore_inaccessible = true;
    let (_, result) = run(&dir, options.clone(), &sinks).await;
    assert_eq!(result?, Outcome::Success);
    assert_eq!(dir.recorded(), vec!["b"]);

    options.ignore_inaccessible = false;
    let (_, result) = run(&dir, options, &sinks).await;
    assert!(matches!(result, Err(SequenceError::Spawn { .. })));
    Ok(())
}

#[tokio::test]
async fn trailing_partial_line_is_relayed() -> TestResult {
    init_tracing();
    let dir = ScriptDirBuilder::new()?.script("a", "printf 'partial line' >&2")?;
    let sinks = CapturingSinks::new();

    let (_, result) = run(&dir, dir.options(), &sinks).await;

    assert_eq!(result?, Outcome::Success);
    assert_eq!(sinks.texts(), vec!["partial line"]);
    Ok(())
}

#[tokio::test]
async fn lines_are_attributed_to_their_entry_in_order() -> TestResult {
    init_tracing();
    let dir = ScriptDirBuilder::new()?
        .script("1-first", "echo one >&2\necho two >&2")?
        .script("2-second", "echo three >&2")?;
    let sinks = CapturingSinks::new();

    let (_, result) = run(&dir, dir.options(), &sinks).await;
    assert_eq!(result?, Outcome::Success);

    let first = dir.path().join("1-first").display().to_string();
    let second = dir.path().join("2-second").display().to_string();
    let got: Vec<(String, String)> = sinks
        .lines()
        .into_iter()
        .map(|l| (l.entry, l.line))
        .collect();
    assert_eq!(
        got,
        vec![
            (first.clone(), "one".to_string()),
            (first, "two".to_string()),
            (second, "three".to_string()),
        ]
    );

    // One sink per entry, each opened with the child's pid.
    let opened = sinks.opened();
    assert_eq!(opened.len(), 2);
    assert!(opened.iter().all(|(_, pid)| pid.is_some()));
    Ok(())
}

#[tokio::test]
async fn large_stderr_output_does_not_deadlock() -> TestResult {
    init_tracing();
    let body = r#"i=0
while [ $i -lt 5000 ]; do
  echo "line $i: padding padding padding padding padding padding" >&2
  i=$((i+1))
done"#;
    let dir = ScriptDirBuilder::new()?.script("noisy", body)?;
    let sinks = CapturingSinks::new();

    let (_, result) = run(&dir, dir.options(), &sinks).await;

    assert_eq!(result?, Outcome::Success);
    let texts = sinks.texts();
    assert_eq!(texts.len(), 5000);
    assert!(texts[4999].starts_with("line 4999:"));
    Ok(())
}

#[tokio::test]
async fn arguments_and_working_directory_are_passed_through() -> TestResult {
    init_tracing();
    let dir = ScriptDirBuilder::new()?.script("a", "echo \"$@\" >&2\npwd -P >&2")?;
    let sinks = CapturingSinks::new();

    let mut options = dir.options();
    options.args = vec![OsString::from("start"), OsString::from("--fast")];
    let (_, result) = run(&dir, options, &sinks).await;

    assert_eq!(result?, Outcome::Success);
    let texts = sinks.texts();
    assert_eq!(texts[0], "start --fast");
    assert_eq!(texts[1], fs::canonicalize(dir.path())?.display().to_string());
    Ok(())
}

#[tokio::test]
async fn child_sees_its_full_path_as_argv0() -> TestResult {
    init_tracing();
    let dir = ScriptDirBuilder::new()?.symlink("shell", "/bin/sh")?;
    let sinks = CapturingSinks::new();

    let mut options = dir.options();
    options.args = vec![
        OsString::from("-c"),
        OsString::from("tr '\\0' '\\n' < /proc/$$/cmdline >&2"),
    ];
    let (_, result) = run(&dir, options, &sinks).await;

    assert_eq!(result?, Outcome::Success);
    let texts = sinks.texts();
    assert_eq!(texts[0], dir.path().join("shell").display().to_string());
    assert_eq!(texts[1], "-c");
    Ok(())
}

#[tokio::test]
async fn background_grandchild_does_not_stall_sequence() -> TestResult {
    init_tracing();
    let dir = ScriptDirBuilder::new()?
        .script("a", "sleep 4 &\necho started >&2\nexit 0")?
        .recording_script("b", 0)?;
    let sinks = CapturingSinks::new();

    let started = Instant::now();
    let (seq, result) = run(&dir, dir.options(), &sinks).await;
    let elapsed = started.elapsed();

    assert_eq!(result?, Outcome::Success);
    assert!(elapsed < Duration::from_secs(2), "sequence took {elapsed:?}");
    assert_eq!(sinks.texts(), vec!["started"]);
    assert_eq!(dir.recorded(), vec!["b"]);
    assert_eq!(seq.state(), &SequenceState::Completed);
    Ok(())
}

#[tokio::test]
async fn empty_directory_completes_successfully() -> TestResult {
    let dir = ScriptDirBuilder::new()?;
    let sinks = CapturingSinks::new();

    let (seq, result) = run(&dir, dir.options(), &sinks).await;

    assert_eq!(result?, Outcome::Success);
    assert_eq!(seq.state(), &SequenceState::Completed);
    assert!(seq.visited().is_empty());
    Ok(())
}

#[tokio::test]
async fn listing_failure_runs_nothing() -> TestResult {
    let sinks = CapturingSinks::new();
    let options = RunOptions::new("/nonexistent/sequence-test-dir");
    let mut seq = Sequencer::new(options, "/nonexistent/sequence-test-dir", sinks, Vec::<u8>::new());

    let result = seq.run_directory(&EntryLister::new(ListingPolicy::Strict)).await;

    assert!(matches!(result, Err(SequenceError::ReadDirectory { .. })));
    assert_eq!(seq.state(), &SequenceState::Halted(1));
    Ok(())
}
