//! The `plan` command: show what `run` would do, without a container.

use crate::ResolutionArgs;
use anyhow::Result;
use serde::Serialize;
use sideload_core::{
    Fingerprint, LinkerDiagnostics, Manifest, ManifestEntry, RemoteInvocation, StagingMode,
    StagingPlan, remote, resolve,
};

/// Machine-readable rendering of one planned deployment.
#[derive(Debug, Serialize)]
struct PlanReport<'a> {
    objects: &'a [ManifestEntry],
    fingerprint: &'a Fingerprint,
    staging: &'a StagingPlan,
    invocation: &'a RemoteInvocation,
}

/// Resolve and plan, then print the result.
pub fn plan(executable: &str, resolution: &ResolutionArgs, json: bool) -> Result<()> {
    let exe_path = super::resolve_program(executable)?;
    let config = resolution.config();

    let manifest = resolve(
        &exe_path,
        &resolution.resolve_options(),
        &LinkerDiagnostics::default(),
    )?;
    let fingerprint = Fingerprint::of_manifest(&manifest);
    let staging = StagingPlan::new(&manifest, &fingerprint, &config)?;
    let invocation = remote::build_invocation(
        &staging,
        &config.loader,
        resolution.env.as_deref().unwrap_or(""),
        &[],
    );

    if json {
        let report = PlanReport {
            objects: manifest.entries(),
            fingerprint: &fingerprint,
            staging: &staging,
            invocation: &invocation,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_human(&manifest, &fingerprint, &staging, &invocation);
    Ok(())
}

fn print_human(
    manifest: &Manifest,
    fingerprint: &Fingerprint,
    staging: &StagingPlan,
    invocation: &RemoteInvocation,
) {
    println!("Objects:");
    for entry in manifest.entries() {
        match entry.note.as_deref() {
            Some(tag) => println!("  {} => {} [{tag}]", entry.name, entry.source.display()),
            None => println!("  {} => {}", entry.name, entry.source.display()),
        }
    }

    println!();
    println!("Fingerprint: {fingerprint}");

    match staging.mode {
        StagingMode::SingleFile => {
            println!("Layout: single file (direct copy)");
        }
        StagingMode::Directory => {
            println!("Layout: directory");
            if let Some(dir) = &staging.local_dir {
                println!("Local staging: {}", dir.display());
            }
            if let Some(dir) = &staging.remote_dir {
                println!("Remote directory: {}", dir.display());
            }
        }
    }
    println!("Remote executable: {}", staging.remote_executable.display());

    println!();
    if invocation.env.is_empty() {
        println!("Environment: (none)");
    } else {
        println!("Environment:");
        for (name, value) in &invocation.env {
            println!("  {name}={value}");
        }
    }
    println!("Command: {}", invocation.argv.join(" "));
}
