//! End-to-end pipeline tests against canned diagnostics and a recording
//! control plane. No container runtime is involved.

use anyhow::Result;
use sideload_core::diag::parse_dependency_line;
use sideload_core::remote::{self, LIBRARY_PATH_VAR};
use sideload_core::{
    AttachMode, Config, ControlPlane, DepLine, Diagnostics, Fingerprint, LoaderConfig, Manifest,
    RemoteInvocation, ResolveOptions, StagingMode, StagingPlan, deploy, resolve,
};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

/// Diagnostics replaying a fixed dependency listing.
struct StubDiag {
    listing: String,
}

impl Diagnostics for StubDiag {
    fn list_dependencies(&self, _executable: &Path) -> Result<Vec<DepLine>> {
        Ok(self.listing.lines().filter_map(parse_dependency_line).collect())
    }

    fn find_library(&self, _soname: &str) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}

#[derive(Debug, PartialEq)]
enum Event {
    Copy { local: PathBuf, remote: PathBuf },
    Sync { local: PathBuf, remote_parent: PathBuf },
}

/// Control plane that records calls instead of touching a container.
#[derive(Default)]
struct RecordingPlane {
    events: RefCell<Vec<Event>>,
}

impl ControlPlane for RecordingPlane {
    fn copy_file(&self, local: &Path, remote: &Path) -> Result<()> {
        self.events.borrow_mut().push(Event::Copy {
            local: local.to_path_buf(),
            remote: remote.to_path_buf(),
        });
        Ok(())
    }

    fn sync_dir(&self, local_dir: &Path, remote_parent: &Path) -> Result<()> {
        self.events.borrow_mut().push(Event::Sync {
            local: local_dir.to_path_buf(),
            remote_parent: remote_parent.to_path_buf(),
        });
        Ok(())
    }

    fn exec(&self, _invocation: &RemoteInvocation, _attach: AttachMode) -> Result<i32> {
        Ok(0)
    }
}

fn env_value<'a>(invocation: &'a RemoteInvocation, name: &str) -> Option<&'a str> {
    invocation
        .env
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}

#[test]
fn dynamic_executable_ships_as_directory() {
    let tmp = tempfile::TempDir::new().unwrap();
    let exe = tmp.path().join("myprog");
    let lib = tmp.path().join("libfoo.so.1");
    fs::write(&exe, b"exe").unwrap();
    fs::write(&lib, b"lib").unwrap();

    let diag = StubDiag {
        listing: format!("\tlibfoo.so.1 => {} (0x00007f6e2a000000)\n", lib.display()),
    };
    let manifest = resolve(&exe, &ResolveOptions::new(), &diag).unwrap();
    assert_eq!(manifest.len(), 2);

    let fingerprint = Fingerprint::of_manifest(&manifest);
    let config = Config {
        staging_root: tmp.path().join("staging"),
        ..Config::default()
    };
    let plan = StagingPlan::new(&manifest, &fingerprint, &config).unwrap();
    assert_eq!(plan.mode, StagingMode::Directory);

    plan.materialize(&manifest).unwrap();
    let local_dir = plan.local_dir.clone().unwrap();
    assert!(local_dir.join("myprog").is_file());
    assert!(local_dir.join("libfoo.so.1").is_file());

    let transport = RecordingPlane::default();
    deploy(&plan, &manifest, &transport).unwrap();
    assert_eq!(
        *transport.events.borrow(),
        vec![Event::Sync {
            local: local_dir,
            remote_parent: PathBuf::from("/tmp"),
        }]
    );

    let invocation = remote::build_invocation(&plan, &LoaderConfig::default(), "", &[]);
    let remote_dir = PathBuf::from("/tmp").join(fingerprint.as_str());
    assert_eq!(
        env_value(&invocation, LIBRARY_PATH_VAR),
        Some(remote_dir.to_str().unwrap())
    );
    assert_eq!(invocation.argv, vec![remote_dir.join("myprog").to_str().unwrap()]);
}

#[test]
fn static_executable_ships_as_single_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let exe = tmp.path().join("myprog");
    fs::write(&exe, b"exe").unwrap();

    let diag = StubDiag {
        listing: String::new(),
    };
    let opts = ResolveOptions {
        assume_static: true,
        ..ResolveOptions::new()
    };
    let manifest = resolve(&exe, &opts, &diag).unwrap();
    assert_eq!(manifest.len(), 1);

    let fingerprint = Fingerprint::of_manifest(&manifest);
    let plan = StagingPlan::new(&manifest, &fingerprint, &Config::default()).unwrap();
    assert_eq!(plan.mode, StagingMode::SingleFile);
    assert_eq!(
        plan.remote_executable,
        PathBuf::from("/tmp").join(format!("{fingerprint}_myprog"))
    );

    // No staging directory to build.
    plan.materialize(&manifest).unwrap();
    assert!(plan.local_dir.is_none());

    let transport = RecordingPlane::default();
    deploy(&plan, &manifest, &transport).unwrap();
    assert_eq!(
        *transport.events.borrow(),
        vec![Event::Copy {
            local: exe,
            remote: plan.remote_executable.clone(),
        }]
    );

    let invocation = remote::build_invocation(&plan, &LoaderConfig::default(), "", &[]);
    assert_eq!(env_value(&invocation, LIBRARY_PATH_VAR), None);
    assert_eq!(invocation.argv, vec![plan.remote_executable.to_str().unwrap()]);
}

#[test]
fn identical_dependency_sets_reuse_the_same_remote_paths() {
    let build = |m: &mut Manifest| {
        m.add_item("myprog", "/usr/bin/myprog", None);
        m.add_item("libfoo.so.1", "/usr/lib/libfoo.so.1", None);
    };

    let mut first = Manifest::new();
    build(&mut first);
    let mut second = Manifest::new();
    build(&mut second);

    let config = Config::default();
    let plan_a = StagingPlan::new(&first, &Fingerprint::of_manifest(&first), &config).unwrap();
    let plan_b = StagingPlan::new(&second, &Fingerprint::of_manifest(&second), &config).unwrap();

    assert_eq!(plan_a.remote_dir, plan_b.remote_dir);
    assert_eq!(plan_a.remote_executable, plan_b.remote_executable);
}
