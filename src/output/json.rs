//! JSON output writer for samples and decorations.

use crate::aggregator::Decoration;
use crate::parser::Sample;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write a normalized sample to a JSON file
///
/// **Public** - main entry point for sample output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_sample(sample: &Sample, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    write_json(sample, output_path.as_ref())
}

/// Write decorations to a JSON file
pub fn write_decorations(
    decorations: &[Decoration],
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    write_json(&decorations, output_path.as_ref())
}

fn write_json<T: Serialize + ?Sized>(value: &T, output_path: &Path) -> Result<(), OutputError> {
    info!("Writing JSON to: {}", output_path.display());

    super::validate_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, value).map_err(OutputError::SerializationFailed)?;

    info!(
        "Written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a previously written sample
///
/// **Public** - useful for decorate and testing
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_sample(input_path: impl AsRef<Path>) -> Result<Sample, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading sample from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let sample: Sample = serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Sample loaded: {} events, {} samples",
        sample.events.len(),
        sample.total_count
    );

    Ok(sample)
}
