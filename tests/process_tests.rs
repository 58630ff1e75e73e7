#![cfg(unix)]

use std::time::Duration;
use wperf_studio::process::{
    CancellationToken, CommandLine, KillInterrupter, ProcessRunner, RunOptions,
};

fn sh(script: &str) -> CommandLine {
    CommandLine::new("sh").args(["-c", script])
}

#[tokio::test]
async fn test_success_captures_streams() {
    let runner = ProcessRunner::new();
    let output = runner
        .run(
            &sh("echo out; echo err >&2"),
            &RunOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(output.stdout, "out\n");
    assert_eq!(output.stderr, "err\n");
}

#[tokio::test]
async fn test_non_zero_exit_is_error() {
    let runner = ProcessRunner::new();
    let err = runner
        .run(
            &sh("echo partial; echo 'driver busy' >&2; exit 3"),
            &RunOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, Some(3));
    assert_eq!(err.stdout, "partial\n");
    assert_eq!(err.stderr, "driver busy\n");
    assert!(err.message.contains("driver busy"));
    assert!(!err.cancelled);
}

#[tokio::test]
async fn test_spawn_failure_is_error() {
    let runner = ProcessRunner::new();
    let err = runner
        .run(
            &CommandLine::new("/definitely/not/a/wperf"),
            &RunOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, None);
    assert!(err.message.starts_with("Failed to start"));
}

#[tokio::test]
async fn test_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    let runner = ProcessRunner::new();
    let output = runner
        .run(
            &sh("pwd"),
            &RunOptions {
                cwd: Some(dir.path().to_path_buf()),
            },
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let expected = dir.path().canonicalize().unwrap();
    let reported = std::path::Path::new(output.stdout.trim()).canonicalize().unwrap();
    assert_eq!(reported, expected);
}

#[tokio::test]
async fn test_cancellation_interrupts_gracefully() {
    // The trap only runs if the process is interrupted rather than killed
    let script = "trap 'echo flushed; kill $! 2>/dev/null; exit 0' INT; \
                  sleep 10 >/dev/null 2>&1 & wait";

    let runner = ProcessRunner::new();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        trigger.cancel();
    });

    let output = tokio::time::timeout(
        Duration::from_secs(5),
        runner.run(&sh(script), &RunOptions::default(), &cancel),
    )
    .await
    .expect("interrupted process should exit promptly")
    .unwrap();

    assert_eq!(output.stdout, "flushed\n");
}

#[tokio::test]
async fn test_cancellation_with_kill_fallback() {
    let runner = ProcessRunner::with_interrupter(Box::new(KillInterrupter));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let err = tokio::time::timeout(
        Duration::from_secs(5),
        runner.run(
            &CommandLine::new("sleep").arg("10"),
            &RunOptions::default(),
            &cancel,
        ),
    )
    .await
    .expect("killed process should exit promptly")
    .unwrap_err();

    assert!(err.cancelled);
    assert_eq!(err.code, None);
}
