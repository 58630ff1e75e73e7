//! Decorate command implementation.
//!
//! Loads a sample, merges its line hits and prints the hottest lines.

use super::models::DecorateArgs;
use crate::aggregator::{aggregate, decoratable, Decoration};
use crate::output::write_decorations;
use crate::parser::{parse_sample, Sample};
use anyhow::{Context, Result};
use colored::*;
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Execute the decorate command
///
/// **Public** - main entry point called from main.rs
pub fn execute_decorate(args: DecorateArgs) -> Result<()> {
    let sample = load_sample(&args.input)?;

    let input = if args.keep_unknown {
        sample
    } else {
        decoratable(&sample)
    };
    let decorations = aggregate(&input);
    info!("{} decorated lines", decorations.len());

    if let Some(path) = &args.output {
        write_decorations(&decorations, path).context("Failed to write decorations JSON")?;
        println!("{} Decorations written to: {}", "✓".green(), path.display());
    }

    println!("{}", render_hottest(&decorations, args.top));
    Ok(())
}

/// Raw wperf output or a sample previously written by `record`
///
/// **Public** - also used by the validate command
pub fn load_sample(path: &Path) -> Result<Sample> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    // Raw wperf output is the only form with a top-level "sampling" key
    let is_raw = serde_json::from_str::<serde_json::Value>(&text.replace('\t', " "))
        .map(|v| v.get("sampling").is_some())
        .unwrap_or(true);

    if is_raw {
        debug!("{} looks like raw wperf output", path.display());
        Ok(parse_sample(&text)?)
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("{} is not a recorded sample", path.display()))
    }
}

/// Table of the `top` lines with the most hits
pub fn render_hottest(decorations: &[Decoration], top: usize) -> String {
    if decorations.is_empty() {
        return "No source lines were hit".to_string();
    }

    let mut hottest: Vec<&Decoration> = decorations.iter().collect();
    hottest.sort_by(|a, b| b.line_hits.cmp(&a.line_hits));

    let mut out = String::new();
    out.push_str(&format!("{:>8}  {:>7}  {}\n", "HITS", "SHARE", "LOCATION"));
    for decoration in hottest.into_iter().take(top) {
        let functions: Vec<&str> = decoration
            .content
            .iter()
            .map(|c| c.function_name.as_str())
            .fold(Vec::new(), |mut acc, f| {
                if !acc.contains(&f) {
                    acc.push(f);
                }
                acc
            });

        out.push_str(&format!(
            "{:>8}  {:>6.2}%  {}:{} ({})\n",
            decoration.line_hits,
            decoration.hit_percentage(),
            decoration.filename,
            decoration.line_number,
            functions.join(", ")
        ));
    }
    out
}
