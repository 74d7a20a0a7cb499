//! The `run` command: resolve, stage, deploy, execute.

use crate::ResolutionArgs;
use crate::docker::DockerControlPlane;
use anyhow::Result;
use sideload_core::{
    AttachMode, ControlPlane, Fingerprint, LinkerDiagnostics, StagingPlan, deploy, remote, resolve,
};

/// Ship `executable` into `container` and run it there.
///
/// Returns the remote process's exit status; the caller exits with it.
pub fn run(
    container: &str,
    executable: &str,
    args: &[String],
    resolution: &ResolutionArgs,
    attach: AttachMode,
) -> Result<i32> {
    let exe_path = super::resolve_program(executable)?;
    let config = resolution.config();

    let manifest = resolve(
        &exe_path,
        &resolution.resolve_options(),
        &LinkerDiagnostics::default(),
    )?;
    let fingerprint = Fingerprint::of_manifest(&manifest);
    tracing::info!("deployment fingerprint: {fingerprint}");

    let plan = StagingPlan::new(&manifest, &fingerprint, &config)?;
    plan.materialize(&manifest)?;

    let invocation = remote::build_invocation(
        &plan,
        &config.loader,
        resolution.env.as_deref().unwrap_or(""),
        args,
    );

    let docker = DockerControlPlane::new(container);
    deploy(&plan, &manifest, &docker)?;

    tracing::info!(
        "executing {} in {container}",
        plan.remote_executable.display()
    );
    docker.exec(&invocation, attach)
}
