use super::config::StudioConfig;
use super::decorate::load_sample;
use crate::parser::events_with_unknown_symbol;
use crate::process::{CancellationToken, ProcessRunner};
use crate::record::{is_supported, query_versions};
use crate::utils::config::SUPPORTED_WPERF_VERSION;
use crate::utils::error::ParseError;
use anyhow::Result;
use colored::*;
use log::error;
use std::path::PathBuf;

/// Validate a wperf output or sample file
pub fn validate_sample_file(file_path: PathBuf) -> Result<()> {
    println!("Validating sample: {}", file_path.display());

    let sample = match load_sample(&file_path) {
        Ok(sample) => sample,
        Err(e) => {
            // Show the whole path-annotated tree, not just the first line
            if let Some(ParseError::Validation(validation)) = e.downcast_ref::<ParseError>() {
                error!("Validation failed:\n{}", validation.render());
            }
            return Err(e);
        }
    };

    println!("{} Valid sample", "✓".green());
    println!("  {}", sample.summary());
    for event in &sample.events {
        println!("  {:<24} {:>10} samples", event.event_type, event.count);
    }

    let unknown = events_with_unknown_symbol(&sample);
    if !unknown.is_empty() {
        println!(
            "{} only unknown symbols for: {}",
            "!".yellow(),
            unknown.join(", ")
        );
    }

    Ok(())
}

/// Report installed wperf component versions
pub async fn check_version(config: &StudioConfig) -> Result<()> {
    let runner = ProcessRunner::new();
    let cancel = CancellationToken::new();
    let components = query_versions(&runner, &config.wperf_path, &cancel).await?;

    for component in &components {
        println!("  {:<16} {}", component.component, component.version);
    }

    if is_supported(&components, SUPPORTED_WPERF_VERSION) {
        println!("{} wperf is supported", "✓".green());
        Ok(())
    } else {
        anyhow::bail!(
            "Unsupported wperf installation, expected {}.{}.x",
            SUPPORTED_WPERF_VERSION.0,
            SUPPORTED_WPERF_VERSION.1
        )
    }
}

/// Display version information
pub fn display_version() {
    println!("WindowsPerf Studio v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "Supported wperf: {}.{}.x",
        SUPPORTED_WPERF_VERSION.0, SUPPORTED_WPERF_VERSION.1
    );
}
