//! Record options, command line construction and recent-events history.

use crate::process::CommandLine;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One event to sample, optionally with its sampling frequency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSpec {
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u64>,
}

impl EventSpec {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            frequency: None,
        }
    }

    pub fn with_frequency(mut self, frequency: u64) -> Self {
        self.frequency = Some(frequency);
        self
    }
}

impl std::str::FromStr for EventSpec {
    type Err = String;

    /// Accepts `name` or `name:frequency`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            None if !s.is_empty() => Ok(EventSpec::new(s)),
            Some((event, frequency)) if !event.is_empty() => frequency
                .parse::<u64>()
                .map(|f| EventSpec::new(event).with_frequency(f))
                .map_err(|e| format!("Invalid frequency in '{}': {}", s, e)),
            _ => Err(format!("Invalid event '{}'", s)),
        }
    }
}

/// Everything needed for one `wperf record` invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOptions {
    pub events: Vec<EventSpec>,
    pub core: u32,
    pub command: String,
    #[serde(default)]
    pub arguments: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub disassemble_enabled: bool,
}

impl RecordOptions {
    pub fn event_names(&self) -> Vec<String> {
        self.events.iter().map(|e| e.event.clone()).collect()
    }

    /// Flat summary for telemetry
    pub fn telemetry_properties(&self) -> BTreeMap<String, String> {
        let mut properties = BTreeMap::new();
        properties.insert("events".to_string(), build_events_parameter(&self.events));
        properties.insert("core".to_string(), self.core.to_string());
        properties.insert(
            "timeout".to_string(),
            self.timeout_seconds
                .map(|t| t.to_string())
                .unwrap_or_default(),
        );
        properties.insert(
            "disassembleEnabled".to_string(),
            self.disassemble_enabled.to_string(),
        );
        properties.insert(
            "hasArguments".to_string(),
            (!self.arguments.trim().is_empty()).to_string(),
        );
        properties
    }
}

/// Check options before anything is spawned
///
/// **Public** - can be called before recording for early validation
pub fn validate_record_options(options: &RecordOptions) -> Result<()> {
    if options.events.is_empty() {
        anyhow::bail!("At least one event is required");
    }

    if let Some(bad) = options.events.iter().find(|e| e.event.trim().is_empty()) {
        anyhow::bail!("Event names cannot be empty: {:?}", bad);
    }

    if options.events.iter().any(|e| e.frequency == Some(0)) {
        anyhow::bail!("Event frequency must be greater than 0");
    }

    if options.command.trim().is_empty() {
        anyhow::bail!("Command to profile cannot be empty");
    }

    split_arguments(&options.arguments)?;

    if options.timeout_seconds == Some(0) {
        anyhow::bail!("Timeout must be greater than 0");
    }

    Ok(())
}

/// `ld_spec,st_spec:200000` style event list
pub fn build_events_parameter(events: &[EventSpec]) -> String {
    events
        .iter()
        .map(|e| match e.frequency {
            Some(frequency) => format!("{}:{}", e.event, frequency),
            None => e.event.clone(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Full `wperf record` command line
///
/// Order: `record -e <events> -c <core> [--timeout <s>] [--force-lock] --json
/// <--annotate|--disassemble> -- <command> <arguments...>`. `arguments` is
/// split with shell quoting rules, so quoted words keep their spaces.
///
/// # Errors
/// Unbalanced quotes in `arguments`
pub fn build_record_command(
    wperf: &Path,
    options: &RecordOptions,
    force_lock: bool,
) -> Result<CommandLine> {
    let arguments = split_arguments(&options.arguments)?;

    let mut line = CommandLine::new(wperf)
        .args(["record", "-e"])
        .arg(build_events_parameter(&options.events))
        .arg("-c")
        .arg(options.core.to_string());

    if let Some(timeout) = options.timeout_seconds {
        line = line.arg("--timeout").arg(timeout.to_string());
    }
    if force_lock {
        line = line.arg("--force-lock");
    }

    line = line.arg("--json");
    line = line.arg(if options.disassemble_enabled {
        "--disassemble"
    } else {
        "--annotate"
    });

    Ok(line.arg("--").arg(options.command.clone()).args(arguments))
}

/// Quote program arguments into one `arguments` string
pub fn join_arguments(arguments: &[String]) -> Result<String> {
    Ok(shlex::try_join(arguments.iter().map(String::as_str))?)
}

/// Inverse of [`join_arguments`]
pub fn split_arguments(arguments: &str) -> Result<Vec<String>> {
    shlex::split(arguments)
        .ok_or_else(|| anyhow::anyhow!("Unbalanced quotes in arguments: {}", arguments))
}

/// New events first, then older history, without duplicates, capped
pub fn update_recent_events(
    history: &[String],
    new_events: &[String],
    capacity: usize,
) -> Vec<String> {
    let mut recent: Vec<String> = Vec::with_capacity(capacity);

    for event in new_events.iter().chain(history) {
        if recent.len() == capacity {
            break;
        }
        if !recent.contains(event) {
            recent.push(event.clone());
        }
    }

    recent
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_update_recent_events_moves_duplicates_to_front() {
        let history = names(&["e1", "e2", "e3"]);
        let updated = update_recent_events(&history, &names(&["e3", "e4"]), 5);
        assert_eq!(updated, names(&["e3", "e4", "e1", "e2"]));
    }

    #[test]
    fn test_update_recent_events_dedupes_new_events() {
        let updated = update_recent_events(&[], &names(&["e1", "e1", "e2"]), 5);
        assert_eq!(updated, names(&["e1", "e2"]));
    }

    #[test]
    fn test_arguments_keep_embedded_spaces() {
        let arguments = names(&["-i", "C:\\My Files\\in.txt", "it's"]);
        let joined = join_arguments(&arguments).unwrap();
        assert_eq!(split_arguments(&joined).unwrap(), arguments);
    }

    #[test]
    fn test_split_arguments_rejects_unbalanced_quotes() {
        assert!(split_arguments("--name \"unterminated").is_err());
        assert_eq!(split_arguments("").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_event_spec_from_str() {
        assert_eq!("ld_spec".parse::<EventSpec>().unwrap(), EventSpec::new("ld_spec"));
        assert_eq!(
            "st_spec:200000".parse::<EventSpec>().unwrap(),
            EventSpec::new("st_spec").with_frequency(200_000)
        );
        assert!("st_spec:fast".parse::<EventSpec>().is_err());
        assert!(":10".parse::<EventSpec>().is_err());
        assert!("".parse::<EventSpec>().is_err());
    }
}
