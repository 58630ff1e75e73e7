//! Platform-specific ways of asking a child process to stop.
//!
//! wperf treats Ctrl-C as "stop sampling and flush results", so cancellation
//! sends the console interrupt where one can be delivered and only falls back
//! to a forced kill where it cannot.

use log::warn;
use std::io;
use tokio::process::Child;

/// Asks a running child to terminate
pub trait Interrupter: Send + Sync {
    fn interrupt(&self, child: &mut Child) -> io::Result<()>;

    /// Name used in logs
    fn name(&self) -> &'static str;
}

/// Delivers `SIGINT`, the signal a terminal sends on Ctrl-C
#[cfg(unix)]
#[derive(Debug, Default, Clone, Copy)]
pub struct SignalInterrupter;

#[cfg(unix)]
impl Interrupter for SignalInterrupter {
    fn interrupt(&self, child: &mut Child) -> io::Result<()> {
        // No pid means the child was already reaped
        let Some(pid) = child.id() else {
            return Ok(());
        };

        let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGINT) };
        if rc == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "SIGINT"
    }
}

/// Forced termination, used where no interrupt can be emulated
#[derive(Debug, Default, Clone, Copy)]
pub struct KillInterrupter;

impl Interrupter for KillInterrupter {
    fn interrupt(&self, child: &mut Child) -> io::Result<()> {
        child.start_kill()
    }

    fn name(&self) -> &'static str {
        "kill"
    }
}

/// Interrupter for the current platform
#[cfg(unix)]
pub fn platform_interrupter() -> Box<dyn Interrupter> {
    Box::new(SignalInterrupter)
}

/// Interrupter for the current platform
#[cfg(not(unix))]
pub fn platform_interrupter() -> Box<dyn Interrupter> {
    warn!("Console interrupt emulation unavailable, cancellation will kill wperf");
    Box::new(KillInterrupter)
}

/// Try `primary`, falling back to a forced kill if it fails
pub fn interrupt_or_kill(primary: &dyn Interrupter, child: &mut Child) -> io::Result<()> {
    match primary.interrupt(child) {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!("{} interrupt failed ({}), killing process", primary.name(), e);
            KillInterrupter.interrupt(child)
        }
    }
}
