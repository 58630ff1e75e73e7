//! Run one external process to completion or cancellation.

use super::interrupt::{interrupt_or_kill, platform_interrupter, Interrupter};
use crate::utils::error::ExecError;
use async_trait::async_trait;
use log::{debug, error, info, trace, warn};
use std::fmt;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

/// Program plus arguments, spawned without a shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(part: &str) -> String {
    if part.is_empty() || part.contains(char::is_whitespace) {
        format!("\"{}\"", part.replace('"', "\\\""))
    } else {
        part.to_string()
    }
}

/// Per-call spawn settings
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub cwd: Option<PathBuf>,
}

/// Captured streams of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Something that can execute a command line
///
/// Implemented by [`ProcessRunner`]; tests script their own.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(
        &self,
        command: &CommandLine,
        options: &RunOptions,
        cancel: &CancellationToken,
    ) -> Result<ProcessOutput, ExecError>;
}

/// Spawns processes and interrupts them on cancellation
pub struct ProcessRunner {
    interrupter: Box<dyn Interrupter>,
}

impl ProcessRunner {
    /// Runner using the platform's interrupt mechanism
    pub fn new() -> Self {
        Self::with_interrupter(platform_interrupter())
    }

    pub fn with_interrupter(interrupter: Box<dyn Interrupter>) -> Self {
        Self { interrupter }
    }

    /// Spawn `command` and wait for it
    ///
    /// **Public** - main entry point for process execution
    ///
    /// # Returns
    /// Captured stdout/stderr when the process exits with code 0. A process
    /// that exits 0 after being interrupted counts as a success.
    ///
    /// # Errors
    /// `ExecError` on spawn failure or non-zero exit, with `cancelled` set
    /// when cancellation was requested first.
    pub async fn run(
        &self,
        command: &CommandLine,
        options: &RunOptions,
        cancel: &CancellationToken,
    ) -> Result<ProcessOutput, ExecError> {
        info!("Executing: {}", command);

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }

        let mut child = cmd.spawn().map_err(|e| {
            let err = ExecError {
                message: format!("Failed to start {}: {}", command.program.display(), e),
                ..Default::default()
            };
            error!("{}", err.message);
            err
        })?;

        let stdout_task = tokio::spawn(read_stream(child.stdout.take()));
        let stderr_task = tokio::spawn(read_stream(child.stderr.take()));

        let mut cancelled = false;
        let status = tokio::select! {
            status = child.wait() => status,
            _ = cancel.cancelled() => {
                cancelled = true;
                warn!(
                    "Cancellation requested, sending {} to: {}",
                    self.interrupter.name(),
                    command
                );
                if let Err(e) = interrupt_or_kill(self.interrupter.as_ref(), &mut child) {
                    warn!("Failed to stop process: {}", e);
                }
                child.wait().await
            }
        };

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        let status = match status {
            Ok(status) => status,
            Err(e) => {
                let err = ExecError {
                    message: format!("Failed to wait for {}: {}", command.program.display(), e),
                    code: None,
                    stdout,
                    stderr,
                    cancelled,
                };
                error!("{}", err.message);
                return Err(err);
            }
        };

        if status.success() {
            log_streams(&stdout, &stderr);
            if cancelled {
                info!("Process stopped after cancellation: {}", command);
            }
            return Ok(ProcessOutput { stdout, stderr });
        }

        let err = ExecError {
            message: failure_message(command, status, &stderr),
            code: status.code(),
            stdout,
            stderr,
            cancelled,
        };

        if cancelled {
            warn!("Cancelled: {} ({})", command, describe_status(status));
        } else {
            error!("Command failed: {} ({})", command, describe_status(status));
        }
        log_streams(&err.stdout, &err.stderr);

        Err(err)
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandExecutor for ProcessRunner {
    async fn execute(
        &self,
        command: &CommandLine,
        options: &RunOptions,
        cancel: &CancellationToken,
    ) -> Result<ProcessOutput, ExecError> {
        self.run(command, options, cancel).await
    }
}

async fn read_stream<R: AsyncRead + Unpin>(stream: Option<R>) -> String {
    let Some(mut stream) = stream else {
        return String::new();
    };

    let mut buf = Vec::new();
    if let Err(e) = stream.read_to_end(&mut buf).await {
        debug!("Stream read stopped early: {}", e);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn log_streams(stdout: &str, stderr: &str) {
    if !stderr.is_empty() {
        debug!("stderr: {}", stderr);
    }
    if !stdout.is_empty() {
        trace!("stdout: {}", stdout);
    }
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

fn failure_message(command: &CommandLine, status: ExitStatus, stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("Command failed: {} ({})", command, describe_status(status))
    } else {
        format!(
            "Command failed: {} ({})\n{}",
            command,
            describe_status(status),
            stderr
        )
    }
}
