//! Terminal implementations of the record collaborators.

use crate::record::{ConfirmPrompt, Notifier, TelemetrySink};
use crate::utils::config::SUPPORTED_WPERF_VERSION;
use async_trait::async_trait;
use chrono::Utc;
use colored::*;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Asks on stdin
pub struct ConsolePrompt {
    /// Pick the first button without asking
    pub assume_yes: bool,
}

#[async_trait]
impl ConfirmPrompt for ConsolePrompt {
    async fn confirm(&self, message: &str, buttons: &[&str]) -> Option<String> {
        if self.assume_yes {
            return buttons.first().map(|b| b.to_string());
        }

        print!("{} [{}] ", message.yellow(), buttons.join("/"));
        flush_prompt(&mut std::io::stdout());

        let mut line = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        match stdin.read_line(&mut line).await {
            Ok(0) | Err(_) => None,
            Ok(_) => match_button(line.trim(), buttons),
        }
    }
}

/// Full label or its first letter, case-insensitive
pub fn match_button(answer: &str, buttons: &[&str]) -> Option<String> {
    if answer.is_empty() {
        return None;
    }
    let answer = answer.to_lowercase();
    buttons
        .iter()
        .find(|b| {
            let label = b.to_lowercase();
            label == answer || label.starts_with(&answer)
        })
        .map(|b| b.to_string())
}

/// Prints notifications to stderr
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn version_incompatible(&self) {
        eprintln!(
            "{} installed wperf is not supported (expected {}.{}.x)",
            "✗".red(),
            SUPPORTED_WPERF_VERSION.0,
            SUPPORTED_WPERF_VERSION.1
        );
        eprintln!(
            "  Skip the check with {} or set {} in wperf-studio.toml",
            "--no-version-check".cyan(),
            "version_check = false".cyan()
        );
    }

    fn version_mismatch(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    fn record_failed(&self, message: &str) {
        eprintln!("{} wperf failed: {}", "✗".red(), message);
        eprintln!("  Re-run with {} for the full log", "--verbose".cyan());
        eprintln!(
            "  Check the installation with {}",
            "wperf-studio check-version".cyan()
        );
    }
}

/// Writes telemetry events to the debug log
pub struct LogTelemetry;

impl TelemetrySink for LogTelemetry {
    fn send(&self, event: &str, properties: &BTreeMap<String, String>) {
        match serde_json::to_string(properties) {
            Ok(json) => debug!("telemetry [{}] {}: {}", Utc::now().to_rfc3339(), event, json),
            Err(e) => warn!("Failed to encode telemetry for {}: {}", event, e),
        }
    }
}

/// Push the prompt out before blocking on stdin
fn flush_prompt(out: &mut impl Write) -> bool {
    match out.flush() {
        Ok(()) => true,
        Err(e) => {
            debug!("Failed to flush prompt: {}", e);
            false
        }
    }
}
