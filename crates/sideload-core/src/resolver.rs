//! Dependency-closure resolution.
//!
//! Builds the [`Manifest`] for a target executable: the executable itself,
//! an optional instrumentation module, then every shared object the dynamic
//! linker reports, in discovery order. That order is load-bearing: the
//! fingerprint is computed from the manifest's insertion sequence.

use crate::diag::Diagnostics;
use crate::manifest::{Manifest, logical_name};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Sonames that never get shipped.
///
/// These are virtual objects the kernel maps into every process; they have
/// no backing file to copy.
pub const DENIED_SONAMES: &[&str] = &["linux-vdso.so.1", "linux-gate.so.1"];

/// Tag recorded on instrumentation-support entries.
pub const INSTRUMENTATION_TAG: &str = "dyninst";

/// Dyninst mutator library soname prefix; seeing one of these means the
/// target will also need the runtime support library in the container.
const DYNINST_API_PREFIX: &str = "libdyninstAPI.so";

/// Runtime support library prefix, derived by suffix substitution.
const DYNINST_RUNTIME_PREFIX: &str = "libdyninstAPI_RT.so";

/// Options for one resolution run.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Skip the dependency listing entirely; ship only the executable
    /// (and module, if any).
    pub assume_static: bool,
    /// Instrumentation module to ship alongside the executable.
    pub module: Option<PathBuf>,
    /// Sonames to skip. Defaults to [`DENIED_SONAMES`] via
    /// [`ResolveOptions::new`].
    pub deny: Vec<String>,
}

impl ResolveOptions {
    /// Options with the default deny-list.
    pub fn new() -> Self {
        Self {
            assume_static: false,
            module: None,
            deny: DENIED_SONAMES.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Resolve the full object closure for `executable`.
///
/// The returned manifest lists the executable first, then the module (if
/// any), then the linker-reported dependencies in listing order, with
/// companion runtime libraries inserted immediately after the library that
/// triggered them.
///
/// Individual unparsable or unresolved listing lines are logged and
/// skipped; they never fail the run.
///
/// # Errors
///
/// Returns an error if a diagnostic tool cannot run at all, or if the
/// executable/module path has no file name to stage under.
pub fn resolve(
    executable: &Path,
    opts: &ResolveOptions,
    diag: &dyn Diagnostics,
) -> Result<Manifest> {
    let mut manifest = Manifest::new();

    let exe_name = logical_name(executable)
        .with_context(|| format!("no file name in executable path {}", executable.display()))?;
    manifest.add_item(exe_name, executable, None);

    if let Some(module) = &opts.module {
        let module_name = logical_name(module)
            .with_context(|| format!("no file name in module path {}", module.display()))?;
        manifest.add_item(module_name, module, Some(INSTRUMENTATION_TAG));
    }

    if opts.assume_static {
        tracing::debug!("treating {} as statically linked", executable.display());
        return Ok(manifest);
    }

    for dep in diag.list_dependencies(executable)? {
        if opts.deny.iter().any(|d| d == &dep.soname) {
            tracing::debug!("skipping denied soname {}", dep.soname);
            continue;
        }

        // The bare-path form carries its location in the soname field.
        let (name, source) = match (&dep.path, dep.soname.starts_with('/')) {
            (Some(path), _) => (dep.soname.clone(), path.clone()),
            (None, true) => {
                let path = PathBuf::from(&dep.soname);
                let name = logical_name(&path).unwrap_or_else(|| dep.soname.clone());
                (name, path)
            }
            (None, false) => {
                tracing::warn!(
                    "no path found for {}; the target may fail to load it remotely",
                    dep.soname
                );
                continue;
            }
        };

        manifest.add_item(&name, source, None);
        register_companion(&name, &mut manifest, diag)?;
    }

    Ok(manifest)
}

/// Ship the Dyninst runtime support library next to its API library.
///
/// The runtime library is loaded by soname inside the container, so it has
/// to travel with any `libdyninstAPI` dependency. A deployment without it
/// is legal (the target may never instrument anything), hence the warning
/// rather than a failure when the cache has no entry.
fn register_companion(name: &str, manifest: &mut Manifest, diag: &dyn Diagnostics) -> Result<()> {
    if !name.starts_with(DYNINST_API_PREFIX) {
        return Ok(());
    }

    let companion = name.replacen(DYNINST_API_PREFIX, DYNINST_RUNTIME_PREFIX, 1);
    match diag.find_library(&companion)? {
        Some(path) => {
            manifest.add_item(&companion, path, Some(INSTRUMENTATION_TAG));
        }
        None => {
            tracing::warn!("{companion} not found in the library cache; continuing without it");
        }
    }
    Ok(())
}
