//! Run configuration threaded through the pipeline.
//!
//! Every component takes its settings as input rather than reading ambient
//! state, so a single [`Config`] built from the command line drives the
//! whole run.

use std::env;
use std::path::PathBuf;

/// Remote scratch directory both staging layouts nest under.
pub const REMOTE_SCRATCH_ROOT: &str = "/tmp";

/// Default dynamic-loader object used by the preload pattern.
///
/// Deliberately a configuration value rather than something inferred from
/// the target's architecture; override it with [`LoaderConfig::object`] for
/// non-x86-64 targets.
pub const DEFAULT_LOADER_OBJECT: &str = "ld-linux-x86-64.so.2";

/// Settings for the custom-loader preload pattern.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Whether the copied loader should be invoked instead of the
    /// container's default one. Only takes effect for directory layouts.
    pub enabled: bool,
    /// File name of the loader object inside the staged directory.
    pub object: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            object: DEFAULT_LOADER_OBJECT.to_string(),
        }
    }
}

/// Paths and loader settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Scratch root on the container's filesystem.
    pub scratch_root: PathBuf,
    /// Parent directory for local staging directories.
    pub staging_root: PathBuf,
    /// Custom-loader settings.
    pub loader: LoaderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scratch_root: PathBuf::from(REMOTE_SCRATCH_ROOT),
            staging_root: env::temp_dir(),
            loader: LoaderConfig::default(),
        }
    }
}
