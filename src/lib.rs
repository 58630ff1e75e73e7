//! WindowsPerf Studio
//!
//! Sampling pipeline and record orchestration for WindowsPerf (`wperf`).
//!
//! - [`parser`] validates `wperf record --json` output and normalizes it into a
//!   [`parser::Sample`]
//! - [`aggregator`] merges per-line hits into [`aggregator::Decoration`]s
//! - [`process`] runs wperf as a cancellable child process
//! - [`record`] drives a full record operation, including the locked-driver
//!   retry
//!
//! The `wperf-studio` binary wires these to a terminal.

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod process;
pub mod record;
pub mod utils;
