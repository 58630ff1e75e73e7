//! WindowsPerf Studio CLI
//!
//! Records samples with wperf and turns them into per-line hit reports.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use wperf_studio::commands::{
    check_version, display_version, execute_decorate, execute_record, load_config,
    validate_sample_file, DecorateArgs, RecordArgs,
};
use wperf_studio::record::EventSpec;

/// WindowsPerf Studio - sampling and line decorations for wperf
#[derive(Parser, Debug)]
#[command(name = "wperf-studio")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to wperf-studio.toml
    #[arg(long, global = true, env = "WPERF_STUDIO_CONFIG")]
    config: Option<PathBuf>,

    /// wperf executable (overrides the config file)
    #[arg(long, global = true)]
    wperf: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Record a sample of a program
    Record {
        /// Events as name or name:frequency, comma separated
        #[arg(short, long, value_delimiter = ',', required_unless_present = "last")]
        events: Vec<EventSpec>,

        /// Core to sample on
        #[arg(short, long, default_value = "0")]
        core: u32,

        /// Stop after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Collect disassembly instead of source annotation
        #[arg(long)]
        disassemble: bool,

        /// Output path for the sample JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write line decorations to this path
        #[arg(long)]
        decorations: Option<PathBuf>,

        /// Force the driver lock without asking
        #[arg(short, long)]
        yes: bool,

        /// Skip the installed version check
        #[arg(long)]
        no_version_check: bool,

        /// Repeat the previous record
        #[arg(long, conflicts_with_all = ["events", "target"])]
        last: bool,

        /// Program to profile and its arguments
        #[arg(last = true)]
        target: Vec<String>,
    },

    /// Merge line hits of a sample and show the hottest lines
    Decorate {
        /// Raw wperf output or a recorded sample
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for decorations JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep unresolved and empty events
        #[arg(long)]
        keep_unknown: bool,

        /// Number of lines to print
        #[arg(long, default_value = "20")]
        top: usize,
    },

    /// Validate a wperf output or sample file
    Validate {
        /// Path to the JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Check the installed wperf version
    CheckVersion,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(wperf) = cli.wperf {
        config.wperf_path = wperf;
    }

    // Execute command
    match cli.command {
        Commands::Record {
            events,
            core,
            timeout,
            disassemble,
            output,
            decorations,
            yes,
            no_version_check,
            last,
            target,
        } => {
            let args = RecordArgs {
                events,
                core,
                target,
                timeout,
                disassemble,
                output,
                decorations,
                assume_yes: yes,
                no_version_check,
                last,
            };

            execute_record(args, &config).await?;
        }

        Commands::Decorate {
            input,
            output,
            keep_unknown,
            top,
        } => {
            execute_decorate(DecorateArgs {
                input,
                output,
                keep_unknown,
                top,
            })?;
        }

        Commands::Validate { file } => {
            validate_sample_file(file)?;
        }

        Commands::CheckVersion => {
            check_version(&config).await?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
