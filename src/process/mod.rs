//! External process execution with graceful cancellation.
//!
//! This module handles:
//! - Spawning the profiler and capturing its output
//! - A caller-owned cancellation token
//! - Platform selection of the interrupt used to stop the profiler

pub mod interrupt;
pub mod runner;

pub use tokio_util::sync::CancellationToken;
pub use interrupt::{platform_interrupter, Interrupter, KillInterrupter};
#[cfg(unix)]
pub use interrupt::SignalInterrupter;
pub use runner::{CommandExecutor, CommandLine, ProcessOutput, ProcessRunner, RunOptions};
