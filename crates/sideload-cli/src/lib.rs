//! sideload - run host binaries inside running containers
#![allow(missing_docs)]
#![allow(clippy::doc_markdown)]
//!
//! Container images rarely carry the debugging and tracing binaries you
//! reach for on a host, and rebuilding an image for a one-off run is slow.
//! `sideload` copies a dynamically-linked executable, and every shared
//! library it needs, into a running container and executes it there with a
//! library search path matching the copied layout.
//!
//! # Flow
//!
//! ```text
//! sideload run mycontainer gdb -- -p 1
//!   1. resolve gdb on PATH, list its dynamic dependencies
//!   2. fingerprint the dependency set
//!   3. stage everything into /tmp/<fingerprint>/ locally
//!   4. docker cp the directory into the container
//!   5. docker exec with LD_LIBRARY_PATH pointing at the copied directory
//! ```
//!
//! Remote staging directories accumulate under the scratch root; identical
//! invocations reuse them, stale ones are left for the operator to remove.

pub mod cmd;
pub mod docker;

use clap::{ArgAction, Parser, Subcommand};
use sideload_core::config::{DEFAULT_LOADER_OBJECT, REMOTE_SCRATCH_ROOT};
use sideload_core::{Config, LoaderConfig, ResolveOptions};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sideload")]
#[command(author, version, about = "sideload - run host binaries inside running containers")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Copy an executable and its libraries into a container and run it
    Run {
        /// Target container name or ID
        container: String,
        /// Executable to ship: a path, or a name looked up on PATH
        executable: String,
        /// Arguments for the remote process
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
        #[command(flatten)]
        resolution: ResolutionArgs,
        /// Keep stdin open for the remote process
        #[arg(short, long)]
        interactive: bool,
        /// Allocate a pseudo-terminal for the remote process
        #[arg(short, long)]
        tty: bool,
    },
    /// Show the manifest, fingerprint, and staging plan without a container
    Plan {
        /// Executable to inspect: a path, or a name looked up on PATH
        executable: String,
        #[command(flatten)]
        resolution: ResolutionArgs,
        /// Emit the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Options shaping resolution and staging; shared by `run` and `plan`.
#[derive(Debug, clap::Args)]
pub struct ResolutionArgs {
    /// Treat the executable as statically linked (skip dependency listing)
    #[arg(long = "static")]
    pub assume_static: bool,

    /// Instrumentation module to ship alongside the executable
    #[arg(long, value_name = "PATH")]
    pub module: Option<PathBuf>,

    /// Extra environment for the remote process: space-separated NAME=value
    #[arg(long, value_name = "ASSIGNMENTS")]
    pub env: Option<String>,

    /// Run the copied dynamic loader instead of the container's default one,
    /// optionally naming the loader object (--loader=OBJECT)
    #[arg(
        long,
        value_name = "OBJECT",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = DEFAULT_LOADER_OBJECT
    )]
    pub loader: Option<String>,

    /// Remote scratch directory the staged objects nest under
    #[arg(long, value_name = "DIR", default_value = REMOTE_SCRATCH_ROOT)]
    pub scratch_dir: PathBuf,
}

impl ResolutionArgs {
    /// Pipeline configuration for this invocation.
    pub fn config(&self) -> Config {
        Config {
            scratch_root: self.scratch_dir.clone(),
            loader: LoaderConfig {
                enabled: self.loader.is_some(),
                object: self
                    .loader
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LOADER_OBJECT.to_string()),
            },
            ..Config::default()
        }
    }

    /// Resolver options for this invocation.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            assume_static: self.assume_static,
            module: self.module.clone(),
            ..ResolveOptions::new()
        }
    }
}
