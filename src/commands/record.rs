//! Record command implementation.
//!
//! The record command:
//! 1. Resolves record options (from arguments or the last run)
//! 2. Runs the orchestrator with Ctrl-C wired to cancellation
//! 3. Writes the sample and, if requested, its line decorations

use super::config::StudioConfig;
use super::console::{ConsoleNotifier, ConsolePrompt, LogTelemetry};
use super::models::RecordArgs;
use super::state::JsonStateStore;
use crate::aggregator::{aggregate, decoratable};
use crate::output::{write_decorations, write_sample};
use crate::parser::{events_with_unknown_symbol, Sample};
use crate::process::{CancellationToken, ProcessRunner, RunOptions};
use crate::record::{
    validate_record_options, RecordOptions, RecordOrchestrator, RecordOutcome, RecordResult,
    WperfVersionGate,
};
use anyhow::{Context, Result};
use chrono::Local;
use colored::*;
use log::{info, warn};
use std::path::PathBuf;

/// Execute the record command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Invalid or missing record options
/// * wperf failures (after the optional force-lock retry)
/// * File write errors
pub async fn execute_record(args: RecordArgs, config: &StudioConfig) -> Result<()> {
    let store = JsonStateStore::new(&config.state_file);
    let options = resolve_options(&args, &store)?;
    validate_record_options(&options)?;

    let runner = ProcessRunner::new();
    let version_gate = WperfVersionGate::new(
        &runner,
        &config.wperf_path,
        config.version_check && !args.no_version_check,
    );
    let prompt = ConsolePrompt {
        assume_yes: args.assume_yes,
    };

    let orchestrator = RecordOrchestrator {
        executor: &runner,
        version_gate: &version_gate,
        telemetry: &LogTelemetry,
        prompt: &prompt,
        notifier: &ConsoleNotifier,
        history: &store,
        wperf: config.wperf_path.clone(),
        recent_events_capacity: config.recent_events_capacity,
        run_options: RunOptions::default(),
    };

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, stopping wperf");
                cancel.cancel();
            }
        })
    };

    let outcome = orchestrator.record(options.clone(), &cancel).await;
    ctrl_c.abort();

    if let Err(e) = store.update(|state| state.last_record = Some(options)) {
        warn!("Failed to save record options: {}", e);
    }

    match outcome {
        RecordOutcome::Abandoned => {
            println!("Recording skipped: installed wperf is not compatible");
            Ok(())
        }
        RecordOutcome::Finished(RecordResult::Success { sample, force_lock }) => {
            if force_lock {
                info!("Recorded with --force-lock");
            }
            report_sample(&sample, &args, config)
        }
        RecordOutcome::Finished(RecordResult::Failure {
            error_message,
            driver_locked,
            ..
        }) => {
            if driver_locked {
                anyhow::bail!("{} (retry with --yes to force the lock)", error_message);
            }
            anyhow::bail!("Recording failed: {}", error_message)
        }
    }
}

/// Options from the arguments, or the saved ones with `--last`
///
/// **Private** - internal helper for execute_record
fn resolve_options(args: &RecordArgs, store: &JsonStateStore) -> Result<RecordOptions> {
    if args.last {
        let state = store
            .load()
            .with_context(|| format!("Failed to read {}", store.path().display()))?;
        return state
            .last_record
            .context("No previous record options saved, run `record` with events first");
    }
    args.to_options()
}

/// Write outputs and print what was recorded
///
/// **Private** - internal helper for execute_record
fn report_sample(sample: &Sample, args: &RecordArgs, config: &StudioConfig) -> Result<()> {
    let output = args.output.clone().unwrap_or_else(|| default_output(config));
    write_sample(sample, &output).context("Failed to write sample JSON")?;
    println!("{} Sample written to: {}", "✓".green(), output.display());
    println!("  {}", sample.summary());

    for event in events_with_unknown_symbol(sample) {
        println!(
            "{} event '{}' only hit unknown symbols, build the target with debug info",
            "!".yellow(),
            event
        );
    }

    if let Some(path) = &args.decorations {
        let decorations = aggregate(&decoratable(sample));
        write_decorations(&decorations, path).context("Failed to write decorations JSON")?;
        println!(
            "{} {} line decorations written to: {}",
            "✓".green(),
            decorations.len(),
            path.display()
        );
    }

    Ok(())
}

fn default_output(config: &StudioConfig) -> PathBuf {
    config.output_dir.join(format!(
        "sample-{}.json",
        Local::now().format("%Y%m%d-%H%M%S")
    ))
}
