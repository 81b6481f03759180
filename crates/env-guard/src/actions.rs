//! Remote actions on a host.
//!
//! Guard evaluation and topology queries never touch the network. Tests that
//! need to run commands on a [`Host`](crate::host::Host) go through a
//! [`HostActions`] implementation supplied by the remote-execution layer.

use std::fmt;
use thiserror::Error;

/// Output of a command run on a host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// A command exited with a non-zero status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Command '{command}' failed with exit code {exit_code}: {stderr}")]
pub struct CommandFailed {
    pub command: String,
    pub exit_code: i32,
    pub stderr: String,
}

/// Service lifecycle operations understood by `service(8)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Start,
    Stop,
    Restart,
    Status,
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self {
            ServiceAction::Start => "start",
            ServiceAction::Stop => "stop",
            ServiceAction::Restart => "restart",
            ServiceAction::Status => "status",
        };
        f.write_str(action)
    }
}

/// Capability to act on a remote host.
pub trait HostActions {
    type Error: From<CommandFailed>;

    /// Run a command and return its output regardless of exit status.
    ///
    /// # Errors
    ///
    /// Transport-level failures of the implementation.
    fn exec_command(&self, command: &str) -> Result<CommandOutput, Self::Error>;

    /// Run a command that must succeed.
    ///
    /// # Errors
    ///
    /// Transport failures, or `CommandFailed` for a non-zero exit status.
    fn check_call(&self, command: &str) -> Result<CommandOutput, Self::Error> {
        let output = self.exec_command(command)?;
        if !output.success() {
            tracing::warn!(
                target: "env_guard.actions",
                command = %command,
                exit_code = output.exit_code,
                "Remote command failed"
            );
            return Err(CommandFailed {
                command: command.to_string(),
                exit_code: output.exit_code,
                stderr: output.stderr,
            }
            .into());
        }
        Ok(output)
    }

    /// Start, stop, restart or query a system service.
    ///
    /// # Errors
    ///
    /// Same as [`HostActions::check_call`].
    fn manage_service(
        &self,
        service: &str,
        action: ServiceAction,
    ) -> Result<CommandOutput, Self::Error> {
        self.check_call(&format!("service {service} {action}"))
    }
}
