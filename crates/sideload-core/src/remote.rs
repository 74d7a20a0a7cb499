//! Remote invocation assembly.
//!
//! Turns a [`StagingPlan`] into the environment block and argument vector
//! that make the copied executable load its copied libraries inside the
//! container.

use crate::config::LoaderConfig;
use crate::staging::{StagingMode, StagingPlan};
use serde::Serialize;

/// Library search path variable set for directory layouts.
pub const LIBRARY_PATH_VAR: &str = "LD_LIBRARY_PATH";

/// Preload variable used by the custom-loader pattern.
pub const PRELOAD_VAR: &str = "LD_PRELOAD";

/// Everything the control plane needs to execute the target.
#[derive(Debug, Clone, Serialize)]
pub struct RemoteInvocation {
    /// Environment overrides, in assignment order.
    pub env: Vec<(String, String)>,
    /// Argument vector; the first element is what actually gets invoked.
    pub argv: Vec<String>,
}

/// Assemble the remote environment and argument vector.
///
/// - Directory layouts get [`LIBRARY_PATH_VAR`] pointed at the remote
///   directory.
/// - `extra_env` is appended verbatim: space-separated `NAME=value` tokens,
///   split at the first `=`, with no validation; malformed tokens are the
///   caller's responsibility.
/// - When the loader is enabled and the layout is a directory, the loader
///   object inside the remote directory is both preloaded and prepended as
///   the first argument, bypassing the container's default loader even when
///   the copied one is not on its search path. Single-file layouts have no
///   remote directory to host a loader, so the setting is ignored there.
pub fn build_invocation(
    plan: &StagingPlan,
    loader: &LoaderConfig,
    extra_env: &str,
    args: &[String],
) -> RemoteInvocation {
    let mut env = Vec::new();
    let mut argv = Vec::new();

    if let Some(remote_dir) = &plan.remote_dir {
        env.push((
            LIBRARY_PATH_VAR.to_string(),
            remote_dir.to_string_lossy().into_owned(),
        ));
    }

    for token in extra_env.split_whitespace() {
        let (name, value) = token.split_once('=').unwrap_or((token, ""));
        env.push((name.to_string(), value.to_string()));
    }

    if loader.enabled && plan.mode == StagingMode::Directory {
        if let Some(remote_dir) = &plan.remote_dir {
            let loader_path = remote_dir.join(&loader.object);
            let loader_path = loader_path.to_string_lossy().into_owned();
            env.push((PRELOAD_VAR.to_string(), loader_path.clone()));
            argv.push(loader_path);
        }
    }

    argv.push(plan.remote_executable.to_string_lossy().into_owned());
    argv.extend(args.iter().cloned());

    RemoteInvocation { env, argv }
}
