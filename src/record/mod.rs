//! Record orchestration.
//!
//! This module handles:
//! - Building `wperf record` command lines from options
//! - The recently used events history
//! - Version gating, execution, locked-driver retry and telemetry

pub mod collaborators;
pub mod options;
pub mod orchestrator;
pub mod version;

pub use collaborators::{ConfirmPrompt, HistoryStore, Notifier, TelemetrySink, VersionGate};
pub use options::{
    build_events_parameter, build_record_command, join_arguments, split_arguments,
    update_recent_events, validate_record_options, EventSpec, RecordOptions,
};
pub use orchestrator::{FailureKind, RecordOrchestrator, RecordOutcome, RecordResult};
pub use version::{is_supported, parse_version, query_versions, WperfVersionGate};
