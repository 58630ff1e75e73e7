//! Configuration and constants shared by the pipeline.

/// Event type reported by wperf when it could not resolve the counter name
pub const UNKNOWN_EVENT: &str = "unknown event";

/// Symbol reported by wperf for samples it could not attribute to a function
pub const UNKNOWN_SYMBOL: &str = "unknown";

// Markers searched for in wperf's error output
pub const DRIVER_LOCKED_MARKER: &str = "other WindowsPerf process acquired the wperf-driver";
pub const VERSION_MISMATCH_MARKER: &str = "version mismatch";

/// Message surfaced when the driver is held by another process
pub const DRIVER_LOCKED_MESSAGE: &str =
    "The wperf-driver is locked by another process. Recording was not started.";

/// Message surfaced when wperf and wperf-driver disagree on version
pub const VERSION_MISMATCH_MESSAGE: &str =
    "wperf and wperf-driver versions do not match. Reinstall WindowsPerf.";

/// Question asked before retrying with `--force-lock`
pub const FORCE_LOCK_PROMPT: &str =
    "The wperf-driver is locked by another process. Force the lock and retry?";

// Button labels for the retry confirmation
pub const PROMPT_YES: &str = "Yes";
pub const PROMPT_NO: &str = "No";

/// How many recently used events are remembered
pub const DEFAULT_RECENT_EVENTS_CAPACITY: usize = 5;

/// wperf release line this crate understands (major, minor)
pub const SUPPORTED_WPERF_VERSION: (u32, u32) = (3, 8);

/// Default executable name, resolved through PATH
pub const DEFAULT_WPERF_PATH: &str = "wperf";

/// Telemetry event emitted after every record attempt
pub const RECORD_TELEMETRY_EVENT: &str = "record";
