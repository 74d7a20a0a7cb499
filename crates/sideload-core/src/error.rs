//! Fatal external-command errors.
//!
//! Everything this tool does that can fail hard goes through another
//! program: the linker diagnostics on the host and the container runtime's
//! copy/exec primitives. [`ToolError`] records which program failed and how,
//! so the binary can mirror the failing command's own exit status.

use std::io;
use std::process::Output;
use thiserror::Error;

/// Failure of an external command that aborts the whole run.
///
/// Recoverable conditions (unparsable diagnostic lines, unresolved sonames,
/// a missing companion library) are logged and skipped by the resolver; they
/// never become a `ToolError`.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The program is not installed or not on `PATH`.
    #[error("'{tool}' not found. {hint}")]
    Missing {
        /// Program name as invoked.
        tool: String,
        /// Actionable installation hint shown to the user.
        hint: &'static str,
    },

    /// The program could not be spawned for a reason other than absence.
    #[error("failed to run '{tool}': {source}")]
    Spawn {
        /// Program name as invoked.
        tool: String,
        /// Underlying spawn error.
        #[source]
        source: io::Error,
    },

    /// The program ran but exited with a non-zero status.
    #[error("'{tool}' exited with status {status}: {stderr}")]
    Failed {
        /// Program name as invoked.
        tool: String,
        /// The program's own exit status.
        status: i32,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The program was terminated by a signal before it could exit.
    #[error("'{tool}' was terminated by a signal: {stderr}")]
    Killed {
        /// Program name as invoked.
        tool: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },
}

impl ToolError {
    /// Map a spawn error, turning `NotFound` into an actionable message.
    pub fn from_spawn(tool: &str, hint: &'static str, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::Missing {
                tool: tool.to_string(),
                hint,
            }
        } else {
            Self::Spawn {
                tool: tool.to_string(),
                source: err,
            }
        }
    }

    /// Build the error for a command that ran and failed.
    pub fn from_output(tool: &str, output: &Output) -> Self {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        match output.status.code() {
            Some(status) => Self::Failed {
                tool: tool.to_string(),
                status,
                stderr,
            },
            None => Self::Killed {
                tool: tool.to_string(),
                stderr,
            },
        }
    }

    /// The failing command's own exit status, when it has one.
    ///
    /// Used by the binary to propagate a fatal external failure as the
    /// process exit code.
    pub fn exit_status(&self) -> Option<i32> {
        match self {
            Self::Failed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_missing() {
        let err = io::Error::from(io::ErrorKind::NotFound);
        let tool = ToolError::from_spawn("ldd", "install glibc", err);
        assert!(matches!(tool, ToolError::Missing { .. }));
        assert!(tool.to_string().contains("install glibc"));
    }

    #[test]
    fn exit_status_only_for_failed() {
        let failed = ToolError::Failed {
            tool: "docker".into(),
            status: 3,
            stderr: String::new(),
        };
        assert_eq!(failed.exit_status(), Some(3));

        let missing = ToolError::Missing {
            tool: "docker".into(),
            hint: "",
        };
        assert_eq!(missing.exit_status(), None);
    }
}
