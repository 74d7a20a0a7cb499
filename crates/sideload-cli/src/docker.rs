//! Docker implementation of the control plane.
//!
//! Copy operations run `docker cp` with captured output; a non-zero exit is
//! fatal and carries Docker's own status and stderr. `exec` inherits the
//! terminal so the remote process's output and exit status flow straight
//! through to the caller.

use anyhow::Result;
use sideload_core::{AttachMode, ControlPlane, RemoteInvocation, ToolError};
use std::path::Path;
use std::process::Command;

const DOCKER: &str = "docker";
const DOCKER_HINT: &str = "Is Docker installed and on PATH?";

/// [`ControlPlane`] backed by the `docker` CLI.
#[derive(Debug, Clone)]
pub struct DockerControlPlane {
    container: String,
}

impl DockerControlPlane {
    /// Control plane for one target container (name or ID).
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
        }
    }

    fn remote_ref(&self, path: &Path, trailing_slash: bool) -> String {
        if trailing_slash {
            format!("{}:{}/", self.container, path.display())
        } else {
            format!("{}:{}", self.container, path.display())
        }
    }

    fn cp(&self, local: &Path, remote_ref: &str) -> Result<()> {
        tracing::debug!("docker cp {} {remote_ref}", local.display());
        let output = Command::new(DOCKER)
            .arg("cp")
            .arg(local)
            .arg(remote_ref)
            .output()
            .map_err(|e| ToolError::from_spawn(DOCKER, DOCKER_HINT, e))?;

        if !output.status.success() {
            return Err(ToolError::from_output(DOCKER, &output).into());
        }
        Ok(())
    }
}

impl ControlPlane for DockerControlPlane {
    fn copy_file(&self, local: &Path, remote: &Path) -> Result<()> {
        self.cp(local, &self.remote_ref(remote, false))
    }

    fn sync_dir(&self, local_dir: &Path, remote_parent: &Path) -> Result<()> {
        self.cp(local_dir, &self.remote_ref(remote_parent, true))
    }

    fn exec(&self, invocation: &RemoteInvocation, attach: AttachMode) -> Result<i32> {
        let mut cmd = Command::new(DOCKER);
        cmd.arg("exec");
        if attach.stdin {
            cmd.arg("-i");
        }
        if attach.tty {
            cmd.arg("-t");
        }
        for (name, value) in &invocation.env {
            cmd.arg("-e").arg(format!("{name}={value}"));
        }
        cmd.arg(&self.container);
        cmd.args(&invocation.argv);

        tracing::debug!("docker exec: {:?}", invocation.argv);
        let status = cmd
            .status()
            .map_err(|e| ToolError::from_spawn(DOCKER, DOCKER_HINT, e))?;

        match status.code() {
            Some(code) => Ok(code),
            None => Err(ToolError::Killed {
                tool: DOCKER.to_string(),
                stderr: String::new(),
            }
            .into()),
        }
    }
}
