//! Interfaces to the host around a record operation.
//!
//! The orchestrator never renders UI, stores settings or ships telemetry
//! itself; it goes through these traits.

use crate::utils::error::StateError;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Installed-tool compatibility check
#[async_trait]
pub trait VersionGate: Send + Sync {
    /// Whether the check should run at all
    fn enabled(&self) -> bool;

    async fn is_compatible(&self) -> bool;
}

/// Receives named events with flat string properties
pub trait TelemetrySink: Send + Sync {
    fn send(&self, event: &str, properties: &BTreeMap<String, String>);
}

/// Asks the user to pick one of `buttons`
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    /// The chosen label, or `None` when dismissed
    async fn confirm(&self, message: &str, buttons: &[&str]) -> Option<String>;
}

/// User-facing notifications
pub trait Notifier: Send + Sync {
    /// The installed wperf is not supported; offer to disable the check
    fn version_incompatible(&self);

    /// wperf reported that it and its driver disagree on version
    fn version_mismatch(&self, message: &str);

    /// Generic failure, with pointers to the log and the environment check
    fn record_failed(&self, message: &str);
}

/// Persists the recently used events list
pub trait HistoryStore: Send + Sync {
    fn recent_events(&self) -> Vec<String>;

    fn save_recent_events(&self, events: &[String]) -> Result<(), StateError>;
}
