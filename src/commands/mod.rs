//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod config;
pub mod console;
pub mod decorate;
pub mod models;
pub mod record;
pub mod state;
pub mod utils;

// Re-export main command functions
pub use config::{load_config, StudioConfig};
pub use decorate::execute_decorate;
pub use models::{DecorateArgs, RecordArgs};
pub use record::execute_record;
pub use utils::{check_version, display_version, validate_sample_file};
