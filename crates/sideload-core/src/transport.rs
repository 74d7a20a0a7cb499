//! Container control-plane seam.
//!
//! The core plans what to copy and what to run; everything that actually
//! touches a container goes through [`ControlPlane`]. The CLI crate
//! provides the Docker implementation; tests substitute recording fakes.

use crate::remote::RemoteInvocation;
use anyhow::Result;
use std::path::Path;

/// How the remote process is attached to the local terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttachMode {
    /// Keep stdin open for the remote process.
    pub stdin: bool,
    /// Allocate a pseudo-terminal.
    pub tty: bool,
}

/// The three operations the deployment plan consumes.
///
/// All calls are synchronous and all-or-nothing: a failure aborts the run,
/// nothing is retried.
pub trait ControlPlane {
    /// Copy one local file to a remote path.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport tool cannot run or reports failure.
    fn copy_file(&self, local: &Path, remote: &Path) -> Result<()>;

    /// Synchronize a local directory into a remote parent directory, so the
    /// directory appears under the parent with its local name.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport tool cannot run or reports failure.
    fn sync_dir(&self, local_dir: &Path, remote_parent: &Path) -> Result<()>;

    /// Execute the invocation inside the container and return the remote
    /// process's exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be started at all; a
    /// non-zero remote exit status is a successful call.
    fn exec(&self, invocation: &RemoteInvocation, attach: AttachMode) -> Result<i32>;
}
