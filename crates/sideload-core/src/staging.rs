//! Staging layout planning and deployment.
//!
//! A one-entry manifest is copied file-to-file into the remote scratch
//! directory; anything larger gets a fingerprint-named directory that is
//! built locally and synchronized wholesale, so the remote library search
//! path can be expressed as a single directory.
//!
//! The fingerprint is the only collision-avoidance mechanism: unrelated
//! dependency sets land in different paths, identical ones reuse the same
//! path. Nothing here removes old remote directories.

use crate::config::Config;
use crate::fingerprint::Fingerprint;
use crate::manifest::Manifest;
use crate::transport::ControlPlane;
use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

/// Deployment shape, a pure function of manifest size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StagingMode {
    /// Exactly one object: direct file-to-file copy, no staging directory.
    SingleFile,
    /// More than one object: build a local directory, sync it across.
    Directory,
}

/// Where every object goes, locally and remotely.
#[derive(Debug, Clone, Serialize)]
pub struct StagingPlan {
    /// Chosen layout.
    pub mode: StagingMode,
    /// Local directory the manifest is materialized into (directory mode).
    pub local_dir: Option<PathBuf>,
    /// Remote directory holding the synced objects (directory mode).
    pub remote_dir: Option<PathBuf>,
    /// Remote path of the executable after deployment.
    pub remote_executable: PathBuf,
}

impl StagingPlan {
    /// Plan the layout for `manifest` under `fingerprint`.
    ///
    /// # Errors
    ///
    /// Fails on an empty manifest (a bug in resolution, since the executable
    /// is always registered first) and on duplicate logical names, which
    /// would collide as destination file names.
    pub fn new(manifest: &Manifest, fingerprint: &Fingerprint, config: &Config) -> Result<Self> {
        let Some(executable) = manifest.executable() else {
            bail!("empty manifest; this is a bug, the target executable is always registered");
        };

        let mut seen = HashSet::new();
        for entry in manifest.entries() {
            if !seen.insert(entry.name.as_str()) {
                bail!(
                    "duplicate object name '{}' in manifest; destination names must be distinct",
                    entry.name
                );
            }
        }

        if manifest.len() == 1 {
            let remote_executable = config
                .scratch_root
                .join(format!("{fingerprint}_{}", executable.name));
            return Ok(Self {
                mode: StagingMode::SingleFile,
                local_dir: None,
                remote_dir: None,
                remote_executable,
            });
        }

        let remote_dir = config.scratch_root.join(fingerprint.as_str());
        Ok(Self {
            mode: StagingMode::Directory,
            local_dir: Some(config.staging_root.join(fingerprint.as_str())),
            remote_dir: Some(remote_dir.clone()),
            remote_executable: remote_dir.join(&executable.name),
        })
    }

    /// Build the local staging directory for directory mode.
    ///
    /// Safe to re-run: the directory is created if absent and entries are
    /// overwritten in place. A no-op in single-file mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or an entry
    /// cannot be copied.
    pub fn materialize(&self, manifest: &Manifest) -> Result<()> {
        let Some(local_dir) = &self.local_dir else {
            return Ok(());
        };

        fs::create_dir_all(local_dir)
            .with_context(|| format!("failed to create staging dir {}", local_dir.display()))?;

        for entry in manifest.entries() {
            let dest = local_dir.join(&entry.name);
            fs::copy(&entry.source, &dest).with_context(|| {
                format!("failed to stage {} as {}", entry.source.display(), dest.display())
            })?;
        }

        tracing::debug!(
            "staged {} objects into {}",
            manifest.len(),
            local_dir.display()
        );
        Ok(())
    }
}

/// Ship a planned layout into the container.
///
/// Single-file mode copies the executable straight to its remote path;
/// directory mode syncs the materialized staging directory into the scratch
/// root, yielding `<scratch>/<fingerprint>`.
///
/// # Errors
///
/// Propagates control-plane failures; a transport that cannot copy aborts
/// the run before anything executes remotely.
pub fn deploy(plan: &StagingPlan, manifest: &Manifest, transport: &dyn ControlPlane) -> Result<()> {
    match plan.mode {
        StagingMode::SingleFile => {
            // Planning already guaranteed a first entry.
            let executable = manifest
                .executable()
                .context("empty manifest reached deployment; this is a bug")?;
            transport.copy_file(&executable.source, &plan.remote_executable)
        }
        StagingMode::Directory => {
            let local_dir = plan
                .local_dir
                .as_ref()
                .context("directory plan without a local staging dir; this is a bug")?;
            let remote_parent = plan
                .remote_dir
                .as_ref()
                .and_then(|d| d.parent())
                .context("directory plan without a remote parent; this is a bug")?;
            transport.sync_dir(local_dir, remote_parent)
        }
    }
}
