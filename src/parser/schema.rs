//! Sample model and the raw wperf shapes it is built from.
//!
//! `Raw*` types mirror `wperf record --json` output and are only produced by
//! the validator. The normalized types carry the derived counts and overheads.

use super::validator::{Field, Shape};
use serde::{Deserialize, Serialize};

/// Normalized result of one profiling run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub events: Vec<Event>,

    /// Sum of every event's `count`
    pub total_count: u64,
}

/// One hardware event tracked during the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Counter name, or `"unknown event"` when wperf could not resolve it
    #[serde(rename = "type")]
    pub event_type: String,

    /// Sum of `samples[].count`
    pub count: u64,

    pub samples: Vec<EventSample>,
    pub annotate: Vec<Annotation>,
}

/// A symbol hit by an event, overhead as reported by wperf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSample {
    pub symbol: String,
    pub count: u64,
    pub overhead: f64,
}

/// Per-function breakdown of hits by source line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub function_name: String,
    pub source_code: Vec<SourceCode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCode {
    pub filename: String,
    pub line_number: u64,
    pub hits: u64,

    /// Share of this line among its annotation's lines, in percent
    pub overhead: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disassembled_line: Option<DisassembledLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisassembledLine {
    pub disassemble: Vec<DisassemblyInstruction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisassemblyInstruction {
    pub address: String,
    pub instruction: String,
}

// Raw wperf output

#[derive(Debug, Clone, Deserialize)]
pub struct RawSampleOutput {
    pub sampling: RawSampling,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSampling {
    pub events: Vec<RawEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub samples: Vec<EventSample>,
    pub annotate: Vec<RawAnnotation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAnnotation {
    pub function_name: String,
    pub source_code: Vec<RawSourceCode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSourceCode {
    pub filename: String,
    pub line_number: u64,
    pub hits: u64,
    #[serde(default)]
    pub instruction_address: Option<String>,
    #[serde(default)]
    pub disassembled_line: Option<DisassembledLine>,
}

/// Shape of `wperf record --json` output
pub fn sampling_shape() -> Shape {
    let disassembly = Shape::object(vec![Field::required(
        "disassemble",
        Shape::array(Shape::object(vec![
            Field::required("address", Shape::String),
            Field::required("instruction", Shape::String),
        ])),
    )]);

    let source_code = Shape::object(vec![
        Field::required("filename", Shape::String),
        Field::required("line_number", Shape::Integer),
        Field::required("hits", Shape::Integer),
        Field::optional("instruction_address", Shape::String),
        Field::optional("disassembled_line", disassembly),
    ]);

    let annotation = Shape::object(vec![
        Field::required("function_name", Shape::String),
        Field::required("source_code", Shape::array(source_code)),
    ]);

    let event_sample = Shape::object(vec![
        Field::required("symbol", Shape::String),
        Field::required("count", Shape::Integer),
        Field::required("overhead", Shape::Number),
    ]);

    let event = Shape::object(vec![
        Field::required("type", Shape::String),
        Field::required("samples", Shape::array(event_sample)),
        Field::required("annotate", Shape::array(annotation)),
    ]);

    Shape::object(vec![Field::required(
        "sampling",
        Shape::object(vec![Field::required("events", Shape::array(event))]),
    )])
}
