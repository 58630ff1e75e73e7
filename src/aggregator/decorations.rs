//! Merge per-line hits into decoration facts.
//!
//! Every `(event, annotation, source line)` triple is grouped by file, then
//! merged by line number. The result has one [`Decoration`] per distinct
//! `(filename, line_number)`, in the order the file and line were first seen.
//!
//! Input is expected to exclude unresolved (`"unknown event"`) and empty
//! events; see [`decoratable`].

use crate::parser::schema::{Sample, SourceCode};
use crate::parser::sample::{percentage, saturating_sum};
use crate::utils::config::UNKNOWN_EVENT;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One contribution to a merged line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleHitDetails {
    pub event_type: String,
    pub function_name: String,
    pub source_code: SourceCode,
}

/// Merged hit information for a single source line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub filename: String,
    pub line_number: u64,

    /// Every contribution, in encounter order
    pub content: Vec<SampleHitDetails>,

    /// Sum of `content[].source_code.hits`
    pub line_hits: u64,

    /// Sample-wide total the rendering layer scales against
    pub total_sample_hits: u64,
}

impl Decoration {
    /// Share of the sample's hits landing on this line
    pub fn hit_percentage(&self) -> f64 {
        percentage(self.line_hits, self.total_sample_hits)
    }

    /// Apply a caller-provided color scale to `(line_hits, total_sample_hits)`
    pub fn scaled<T>(&self, scale: impl Fn(u64, u64) -> T) -> T {
        scale(self.line_hits, self.total_sample_hits)
    }
}

/// Build decorations for every source line hit in `sample`
///
/// **Public** - main entry point for aggregation
///
/// # Algorithm
/// 1. Group hit details by filename, keeping duplicates
/// 2. Within a file, merge details sharing a line number and sum their hits
/// 3. Emit files and lines in first-encountered order
pub fn aggregate(sample: &Sample) -> Vec<Decoration> {
    let by_file = group_by_file(sample);

    let decorations: Vec<Decoration> = by_file
        .into_iter()
        .flat_map(|(filename, details)| merge_lines(filename, details, sample.total_count))
        .collect();

    debug!("Built {} line decorations", decorations.len());

    decorations
}

/// Copy of `sample` without unresolved or empty events
///
/// **Public** - callers use this to satisfy the aggregation precondition
pub fn decoratable(sample: &Sample) -> Sample {
    let events: Vec<_> = sample
        .events
        .iter()
        .filter(|e| e.event_type != UNKNOWN_EVENT && e.count > 0)
        .cloned()
        .collect();
    let total_count = saturating_sum(events.iter().map(|e| e.count));

    Sample {
        events,
        total_count,
    }
}

/// First pass: filename -> hit details, both in encounter order
///
/// **Private** - internal helper for aggregate
fn group_by_file(sample: &Sample) -> Vec<(String, Vec<SampleHitDetails>)> {
    let mut files: Vec<(String, Vec<SampleHitDetails>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for event in &sample.events {
        for annotation in &event.annotate {
            for source_code in &annotation.source_code {
                let slot = *index.entry(source_code.filename.clone()).or_insert_with(|| {
                    files.push((source_code.filename.clone(), Vec::new()));
                    files.len() - 1
                });

                files[slot].1.push(SampleHitDetails {
                    event_type: event.event_type.clone(),
                    function_name: annotation.function_name.clone(),
                    source_code: source_code.clone(),
                });
            }
        }
    }

    files
}

/// Second pass: merge one file's details by line number
///
/// **Private** - internal helper for aggregate
fn merge_lines(
    filename: String,
    details: Vec<SampleHitDetails>,
    total_sample_hits: u64,
) -> Vec<Decoration> {
    let mut lines: Vec<Decoration> = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();

    for detail in details {
        let line_number = detail.source_code.line_number;
        let slot = match index.get(&line_number) {
            Some(&slot) => slot,
            None => {
                lines.push(Decoration {
                    filename: filename.clone(),
                    line_number,
                    content: Vec::new(),
                    line_hits: 0,
                    total_sample_hits,
                });
                index.insert(line_number, lines.len() - 1);
                lines.len() - 1
            }
        };

        let decoration = &mut lines[slot];
        decoration.line_hits = decoration.line_hits.saturating_add(detail.source_code.hits);
        decoration.content.push(detail);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{Annotation, Event, EventSample};

    fn line(filename: &str, line_number: u64, hits: u64) -> SourceCode {
        SourceCode {
            filename: filename.to_string(),
            line_number,
            hits,
            overhead: 0.0,
            instruction_address: None,
            disassembled_line: None,
        }
    }

    fn event(event_type: &str, count: u64, annotate: Vec<Annotation>) -> Event {
        Event {
            event_type: event_type.to_string(),
            count,
            samples: vec![EventSample {
                symbol: "main".to_string(),
                count,
                overhead: 100.0,
            }],
            annotate,
        }
    }

    #[test]
    fn test_empty_annotation_contributes_nothing() {
        let sample = Sample {
            events: vec![event(
                "ld_spec",
                3,
                vec![Annotation {
                    function_name: "main".to_string(),
                    source_code: vec![],
                }],
            )],
            total_count: 3,
        };

        assert!(aggregate(&sample).is_empty());
    }

    #[test]
    fn test_decoratable_drops_unknown_and_empty() {
        let sample = Sample {
            events: vec![
                event("ld_spec", 4, vec![]),
                event(UNKNOWN_EVENT, 2, vec![]),
                event("st_spec", 0, vec![]),
            ],
            total_count: 6,
        };

        let filtered = decoratable(&sample);
        assert_eq!(filtered.events.len(), 1);
        assert_eq!(filtered.events[0].event_type, "ld_spec");
        assert_eq!(filtered.total_count, 4);
    }

    #[test]
    fn test_scaled_receives_hits_and_total() {
        let sample = Sample {
            events: vec![event(
                "ld_spec",
                8,
                vec![Annotation {
                    function_name: "main".to_string(),
                    source_code: vec![line("a.c", 3, 2)],
                }],
            )],
            total_count: 8,
        };

        let decorations = aggregate(&sample);
        assert_eq!(decorations[0].scaled(|hits, total| (hits, total)), (2, 8));
        assert_eq!(decorations[0].hit_percentage(), 25.0);
    }

    #[test]
    fn test_line_hits_clamp_at_max() {
        let sample = Sample {
            events: vec![
                event(
                    "ld_spec",
                    u64::MAX,
                    vec![Annotation {
                        function_name: "main".to_string(),
                        source_code: vec![line("a.c", 4, u64::MAX)],
                    }],
                ),
                event(
                    "st_spec",
                    2,
                    vec![Annotation {
                        function_name: "main".to_string(),
                        source_code: vec![line("a.c", 4, 2)],
                    }],
                ),
            ],
            total_count: u64::MAX,
        };

        let decorations = aggregate(&sample);
        assert_eq!(decorations.len(), 1);
        assert_eq!(decorations[0].line_hits, u64::MAX);
        assert_eq!(decoratable(&sample).total_count, u64::MAX);
    }
}
