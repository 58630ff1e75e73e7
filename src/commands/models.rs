use crate::record::{join_arguments, EventSpec, RecordOptions};
use anyhow::Result;
use std::path::PathBuf;

/// Arguments for the record command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct RecordArgs {
    /// Events to sample
    pub events: Vec<EventSpec>,

    /// Core to pin sampling to
    pub core: u32,

    /// Program followed by its arguments
    pub target: Vec<String>,

    /// Stop sampling after this many seconds
    pub timeout: Option<u64>,

    /// Ask wperf for disassembly instead of annotation
    pub disassemble: bool,

    /// Output path for the sample JSON (defaults into the output directory)
    pub output: Option<PathBuf>,

    /// Output path for line decorations (optional)
    pub decorations: Option<PathBuf>,

    /// Answer yes to the force-lock prompt
    pub assume_yes: bool,

    /// Skip the installed version check
    pub no_version_check: bool,

    /// Reuse the options of the previous record
    pub last: bool,
}

impl RecordArgs {
    /// Options for the orchestrator
    pub fn to_options(&self) -> Result<RecordOptions> {
        let Some((command, arguments)) = self.target.split_first() else {
            anyhow::bail!("Missing command to profile (pass it after `--`)");
        };

        Ok(RecordOptions {
            events: self.events.clone(),
            core: self.core,
            command: command.clone(),
            arguments: join_arguments(arguments)?,
            timeout_seconds: self.timeout,
            disassemble_enabled: self.disassemble,
        })
    }
}

/// Arguments for the decorate command
#[derive(Debug, Clone)]
pub struct DecorateArgs {
    /// Raw wperf output or a sample written by `record`
    pub input: PathBuf,

    /// Output path for decorations JSON (optional)
    pub output: Option<PathBuf>,

    /// Keep unresolved and empty events
    pub keep_unknown: bool,

    /// Number of hottest lines to print
    pub top: usize,
}

impl Default for DecorateArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("sample.json"),
            output: None,
            keep_unknown: false,
            top: 20,
        }
    }
}
