//! Drive one `wperf record` operation end to end.
//!
//! The orchestration:
//! 1. Checks the installed wperf version
//! 2. Remembers the requested events
//! 3. Runs wperf and parses its output
//! 4. On a locked driver, asks once whether to retry with `--force-lock`

use super::collaborators::{ConfirmPrompt, HistoryStore, Notifier, TelemetrySink, VersionGate};
use super::options::{build_record_command, update_recent_events, RecordOptions};
use crate::parser::{events_with_unknown_symbol, parse_sample, Sample};
use crate::process::{CancellationToken, CommandExecutor, RunOptions};
use crate::utils::config::{
    DRIVER_LOCKED_MARKER, DRIVER_LOCKED_MESSAGE, FORCE_LOCK_PROMPT, PROMPT_NO, PROMPT_YES,
    RECORD_TELEMETRY_EVENT, VERSION_MISMATCH_MARKER, VERSION_MISMATCH_MESSAGE,
};
use crate::utils::error::ExecError;
use log::{error, info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Outcome of one attempt
#[derive(Debug, Clone, PartialEq)]
pub enum RecordResult {
    Success {
        sample: Sample,
        force_lock: bool,
    },
    Failure {
        error_message: String,
        driver_locked: bool,
        force_lock: bool,
    },
}

impl RecordResult {
    pub fn is_success(&self) -> bool {
        matches!(self, RecordResult::Success { .. })
    }

    pub fn force_lock(&self) -> bool {
        match self {
            RecordResult::Success { force_lock, .. } | RecordResult::Failure { force_lock, .. } => {
                *force_lock
            }
        }
    }

    pub fn driver_locked(&self) -> bool {
        matches!(
            self,
            RecordResult::Failure {
                driver_locked: true,
                ..
            }
        )
    }
}

/// Result of a whole orchestration
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// Stopped by the version gate before anything ran
    Abandoned,
    Finished(RecordResult),
}

/// How a failed wperf run is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Another process holds the driver; recoverable with `--force-lock`
    DriverLocked,
    VersionMismatch,
    Tool,
}

impl FailureKind {
    pub fn classify(err: &ExecError) -> Self {
        let text = err.diagnostic_text();
        if text.contains(DRIVER_LOCKED_MARKER) {
            FailureKind::DriverLocked
        } else if text.to_lowercase().contains(VERSION_MISMATCH_MARKER) {
            FailureKind::VersionMismatch
        } else {
            FailureKind::Tool
        }
    }
}

/// Everything the orchestrator talks to
pub struct RecordOrchestrator<'a> {
    pub executor: &'a dyn CommandExecutor,
    pub version_gate: &'a dyn VersionGate,
    pub telemetry: &'a dyn TelemetrySink,
    pub prompt: &'a dyn ConfirmPrompt,
    pub notifier: &'a dyn Notifier,
    pub history: &'a dyn HistoryStore,
    pub wperf: PathBuf,
    pub recent_events_capacity: usize,
    pub run_options: RunOptions,
}

impl RecordOrchestrator<'_> {
    /// Run a record operation
    ///
    /// **Public** - main entry point for recording
    ///
    /// Performs at most two wperf executions: the initial one and, only when
    /// the driver was locked and the user agreed, one forced retry. Cancelling
    /// `cancel` stops the running attempt and skips the retry prompt.
    pub async fn record(
        &self,
        options: RecordOptions,
        cancel: &CancellationToken,
    ) -> RecordOutcome {
        if self.version_gate.enabled() && !self.version_gate.is_compatible().await {
            warn!("Installed wperf is not compatible, recording abandoned");
            self.notifier.version_incompatible();
            return RecordOutcome::Abandoned;
        }

        self.remember_events(&options);

        // Attempts run under separate child tokens
        let first = self.attempt(&options, false, &cancel.child_token()).await;
        if !first.driver_locked() {
            return RecordOutcome::Finished(first);
        }
        if cancel.is_cancelled() {
            info!("Recording cancelled, not offering a forced retry");
            return RecordOutcome::Finished(first);
        }

        let answer = self
            .prompt
            .confirm(FORCE_LOCK_PROMPT, &[PROMPT_YES, PROMPT_NO])
            .await;

        if answer.as_deref() == Some(PROMPT_YES) {
            info!("Retrying with --force-lock");
            RecordOutcome::Finished(self.attempt(&options, true, &cancel.child_token()).await)
        } else {
            info!("Force-lock retry declined");
            RecordOutcome::Finished(first)
        }
    }

    /// Record the requested events in the recent list
    ///
    /// **Private** - internal helper for record
    fn remember_events(&self, options: &RecordOptions) {
        let updated = update_recent_events(
            &self.history.recent_events(),
            &options.event_names(),
            self.recent_events_capacity,
        );
        if let Err(e) = self.history.save_recent_events(&updated) {
            warn!("Failed to save recent events: {}", e);
        }
    }

    /// One wperf execution, parsed and reported
    ///
    /// **Private** - internal helper for record
    async fn attempt(
        &self,
        options: &RecordOptions,
        force_lock: bool,
        cancel: &CancellationToken,
    ) -> RecordResult {
        let start_time = Instant::now();
        let command = match build_record_command(&self.wperf, options, force_lock) {
            Ok(command) => command,
            Err(e) => {
                let result = self.failure(
                    &ExecError {
                        message: e.to_string(),
                        ..Default::default()
                    },
                    force_lock,
                );
                self.send_telemetry(options, &result);
                return result;
            }
        };

        let executed = self
            .executor
            .execute(&command, &self.run_options, cancel)
            .await;

        info!(
            "wperf finished in {:.2}s",
            start_time.elapsed().as_secs_f64()
        );

        let result = match executed {
            Ok(output) => match parse_sample(&output.stdout) {
                Ok(sample) => {
                    info!("Recorded sample: {}", sample.summary());
                    RecordResult::Success { sample, force_lock }
                }
                Err(e) => {
                    error!("Failed to parse wperf output: {}", e);
                    self.notifier.record_failed(&e.to_string());
                    RecordResult::Failure {
                        error_message: e.to_string(),
                        driver_locked: false,
                        force_lock,
                    }
                }
            },
            Err(err) => self.failure(&err, force_lock),
        };

        self.send_telemetry(options, &result);
        result
    }

    /// Turn an execution error into a result, notifying where needed
    ///
    /// **Private** - internal helper for attempt
    fn failure(&self, err: &ExecError, force_lock: bool) -> RecordResult {
        match FailureKind::classify(err) {
            FailureKind::DriverLocked => {
                warn!("{}", DRIVER_LOCKED_MESSAGE);
                RecordResult::Failure {
                    error_message: DRIVER_LOCKED_MESSAGE.to_string(),
                    driver_locked: true,
                    force_lock,
                }
            }
            FailureKind::VersionMismatch => {
                error!("{}", VERSION_MISMATCH_MESSAGE);
                self.notifier.version_mismatch(VERSION_MISMATCH_MESSAGE);
                RecordResult::Failure {
                    error_message: VERSION_MISMATCH_MESSAGE.to_string(),
                    driver_locked: false,
                    force_lock,
                }
            }
            FailureKind::Tool => {
                error!("Recording failed: {}", err.message);
                // The user asked for the stop, so no failure popup
                if !err.cancelled {
                    self.notifier.record_failed(&err.message);
                }
                RecordResult::Failure {
                    error_message: err.message.clone(),
                    driver_locked: false,
                    force_lock,
                }
            }
        }
    }

    fn send_telemetry(&self, options: &RecordOptions, result: &RecordResult) {
        let mut properties = options.telemetry_properties();

        match result {
            RecordResult::Success { sample, force_lock } => {
                properties.insert("status".to_string(), "success".to_string());
                properties.insert("forceLock".to_string(), force_lock.to_string());
                properties.insert(
                    "hasUnknownSymbols".to_string(),
                    (!events_with_unknown_symbol(sample).is_empty()).to_string(),
                );
            }
            RecordResult::Failure {
                error_message,
                driver_locked,
                force_lock,
            } => {
                properties.insert("status".to_string(), "error".to_string());
                properties.insert("forceLock".to_string(), force_lock.to_string());
                properties.insert("driverLocked".to_string(), driver_locked.to_string());
                properties.insert("errorMessage".to_string(), error_message.clone());
            }
        }

        self.telemetry.send(RECORD_TELEMETRY_EVENT, &properties);
    }
}
