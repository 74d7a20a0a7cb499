//! sideload-core - dependency closure, staging, and remote invocation logic.
//!
//! This crate implements the pipeline behind the `sideload` binary: it works
//! out which filesystem objects a dynamically-linked executable needs, gives
//! that set a stable identity, and plans how to place those objects inside a
//! running container so the executable can be run there unmodified.
//!
//! # Pipeline
//!
//! ```text
//! resolver ──▶ Manifest ──▶ Fingerprint ──▶ StagingPlan ──▶ RemoteInvocation
//!    │                                           │
//!    └── diag (ldd / ldconfig)                   └── transport (ControlPlane)
//! ```
//!
//! - [`resolver`] drives the dynamic-linker diagnostics in [`diag`] to build
//!   a [`Manifest`]: the executable itself, an optional instrumentation
//!   module, and every shared library the linker reports.
//! - [`Fingerprint`] hashes the manifest's description log so that distinct
//!   dependency sets stage into distinct, reusable locations.
//! - [`StagingPlan`] picks the deployment shape (direct file copy for a
//!   single object, a synchronized directory otherwise) and the remote paths.
//! - [`remote`] assembles the environment and argument vector that make the
//!   copied executable load its copied libraries.
//! - [`transport::ControlPlane`] is the seam to the container runtime; the
//!   CLI crate provides the Docker implementation.
//!
//! Remote staging directories are never garbage collected: re-running with
//! an identical dependency set reuses the same fingerprinted directory, and
//! stale directories from older dependency sets are left for the operator to
//! remove.

pub mod config;
pub mod diag;
pub mod error;
pub mod fingerprint;
pub mod manifest;
pub mod remote;
pub mod resolver;
pub mod staging;
pub mod transport;

pub use config::{Config, LoaderConfig};
pub use diag::{DepLine, Diagnostics, LinkerDiagnostics};
pub use error::ToolError;
pub use fingerprint::Fingerprint;
pub use manifest::{Manifest, ManifestEntry};
pub use remote::RemoteInvocation;
pub use resolver::{ResolveOptions, resolve};
pub use staging::{StagingMode, StagingPlan, deploy};
pub use transport::{AttachMode, ControlPlane};
