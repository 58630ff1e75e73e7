//! Aggregation of sample data into per-line decoration facts.
//!
//! This module transforms a parsed `Sample` into:
//! - One merged decoration per `(file, line)` across events and functions
//! - Line hit totals for the rendering layer's color scale

pub mod decorations;

// Re-export main types and functions
pub use decorations::{aggregate, decoratable, Decoration, SampleHitDetails};
