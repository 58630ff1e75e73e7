//! Main parser for `wperf record --json` output.
//!
//! Validates the raw document and normalizes it into a [`Sample`]:
//! per-event counts, per-line overheads and the run total.

use super::schema::{
    sampling_shape, Annotation, Event, RawAnnotation, RawEvent, RawSampleOutput, Sample,
    SourceCode,
};
use super::validator::validate;
use crate::utils::config::{UNKNOWN_EVENT, UNKNOWN_SYMBOL};
use crate::utils::error::ParseError;
use log::debug;

/// Parse raw wperf output into a sample
///
/// **Public** - main entry point for parsing
///
/// # Errors
/// * `ParseError::Decode` - text is not JSON
/// * `ParseError::Validation` - JSON does not have the sampling structure
pub fn parse_sample(raw: &str) -> Result<Sample, ParseError> {
    // Disassembly can carry raw tabs, which JSON forbids inside strings
    let text = raw.replace('\t', " ");

    let value: serde_json::Value = serde_json::from_str(&text)?;
    let output: RawSampleOutput = validate(&sampling_shape(), value)?;

    let events: Vec<Event> = output
        .sampling
        .events
        .into_iter()
        .map(normalize_event)
        .collect();
    let total_count = saturating_sum(events.iter().map(|e| e.count));

    debug!(
        "Parsed sample: {} events, {} total samples",
        events.len(),
        total_count
    );

    Ok(Sample {
        events,
        total_count,
    })
}

/// `value` as a percentage of `total`, 0 when `total` is 0
pub fn percentage(value: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        value as f64 * 100.0 / total as f64
    }
}

/// Sum of counters, clamped at `u64::MAX`
pub(crate) fn saturating_sum(values: impl IntoIterator<Item = u64>) -> u64 {
    values.into_iter().fold(0, u64::saturating_add)
}

/// Event types whose only resolved symbol is `"unknown"`
///
/// Events that also hit at least one known symbol are not reported.
pub fn events_with_unknown_symbol(sample: &Sample) -> Vec<String> {
    sample
        .events
        .iter()
        .filter(|event| {
            !event.samples.is_empty() && event.samples.iter().all(|s| s.symbol == UNKNOWN_SYMBOL)
        })
        .map(|event| event.event_type.clone())
        .collect()
}

fn normalize_event(raw: RawEvent) -> Event {
    let count = saturating_sum(raw.samples.iter().map(|s| s.count));

    Event {
        event_type: raw.event_type,
        count,
        samples: raw.samples,
        annotate: raw.annotate.into_iter().map(normalize_annotation).collect(),
    }
}

fn normalize_annotation(raw: RawAnnotation) -> Annotation {
    let annotation_hits = saturating_sum(raw.source_code.iter().map(|s| s.hits));

    let source_code = raw
        .source_code
        .into_iter()
        .map(|line| SourceCode {
            overhead: percentage(line.hits, annotation_hits),
            filename: line.filename,
            line_number: line.line_number,
            hits: line.hits,
            instruction_address: line.instruction_address,
            disassembled_line: line.disassembled_line,
        })
        .collect();

    Annotation {
        function_name: raw.function_name,
        source_code,
    }
}

impl Sample {
    /// Find an event by its type
    pub fn event(&self, event_type: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.event_type == event_type)
    }

    /// Distinct source files in first-encountered order
    pub fn source_files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = Vec::new();
        for event in &self.events {
            for annotation in &event.annotate {
                for line in &annotation.source_code {
                    if !files.contains(&line.filename.as_str()) {
                        files.push(&line.filename);
                    }
                }
            }
        }
        files
    }

    /// Short description for logs and the CLI
    pub fn summary(&self) -> SampleSummary {
        SampleSummary {
            events: self.events.len(),
            unresolved_events: self
                .events
                .iter()
                .filter(|e| e.event_type == UNKNOWN_EVENT)
                .count(),
            total_count: self.total_count,
            source_files: self.source_files().len(),
        }
    }
}

/// Counts describing a parsed sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSummary {
    pub events: usize,
    pub unresolved_events: usize,
    pub total_count: u64,
    pub source_files: usize,
}

impl std::fmt::Display for SampleSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Events: {} ({} unresolved) | Samples: {} | Source files: {}",
            self.events, self.unresolved_events, self.total_count, self.source_files
        )
    }
}
