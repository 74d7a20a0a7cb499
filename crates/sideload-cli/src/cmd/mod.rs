//! Command implementations, one module per subcommand.

pub mod completions;
pub mod plan;
pub mod run;

use anyhow::{Context, Result, ensure};
use std::path::PathBuf;

/// Resolve the executable argument to a host path.
///
/// A bare name is looked up on `PATH`; anything containing a separator is
/// taken as a path and only checked for existence.
pub(crate) fn resolve_program(spec: &str) -> Result<PathBuf> {
    if spec.contains('/') {
        let path = PathBuf::from(spec);
        ensure!(path.is_file(), "executable {} does not exist", path.display());
        Ok(path)
    } else {
        which::which(spec).with_context(|| format!("'{spec}' not found on PATH"))
    }
}
