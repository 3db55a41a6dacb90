//! ImageMagick backend — runs `convert <src> -resize <geometry> <dst>`.
//!
//! The process is run to completion synchronously; there is no timeout, so a
//! hung `convert` hangs the build. Standard error is captured and carried in
//! [`BackendError::NonZeroExit`] rather than streamed.

use super::backend::{BackendError, ResizeBackend};
use super::params::ResizeParams;
use std::io::ErrorKind;
use std::process::Command;

/// Default executable name.
pub const DEFAULT_COMMAND: &str = "convert";

/// Resize backend that shells out to an ImageMagick-compatible executable.
#[derive(Debug, Clone)]
pub struct ConvertBackend {
    command: String,
}

impl ConvertBackend {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Build the process invocation for `params` without running it.
    pub fn build_command(&self, params: &ResizeParams) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.arg(&params.source)
            .arg("-resize")
            .arg(params.geometry.to_string())
            .arg(&params.output);
        cmd
    }
}

impl Default for ConvertBackend {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND)
    }
}

impl ResizeBackend for ConvertBackend {
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let output = match self.build_command(params).output() {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BackendError::ToolMissing(self.command.clone()));
            }
            Err(e) => return Err(BackendError::Io(e)),
        };

        if output.status.success() {
            Ok(())
        } else {
            Err(BackendError::NonZeroExit {
                command: self.command.clone(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
