//! Parsing of wperf sampling output.
//!
//! This module handles:
//! - Structural validation of decoded JSON against declarative shapes
//! - Normalizing raw `wperf record --json` output into a `Sample`
//! - Derived per-event and per-line statistics

pub mod sample;
pub mod schema;
pub mod validator;

// Re-export main types
pub use sample::{events_with_unknown_symbol, parse_sample, percentage, SampleSummary};
pub use schema::{
    Annotation, DisassembledLine, DisassemblyInstruction, Event, EventSample, Sample, SourceCode,
};
pub use validator::{validate, ErrorTree, Field, Shape, ValidationError};
