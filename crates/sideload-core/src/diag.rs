//! Dynamic-linker diagnostic output parsing.
//!
//! Two external tools feed the resolver: the dependency lister (`ldd`),
//! which prints one line per required object, and the library cache lister
//! (`ldconfig -p`), used to look up libraries by soname. Both grammars are
//! isolated here so an alternate linker's output format only touches this
//! module.
//!
//! Recognized dependency-listing forms:
//!
//! ```text
//! libfoo.so.1 => /usr/lib/libfoo.so.1 (0x00007f...)
//! linux-vdso.so.1 (0x00007f...)
//! /lib64/ld-linux-x86-64.so.2 (0x00007f...)
//! ```
//!
//! Library-cache lines have the fixed shape
//! `libfoo.so.1 (libc6,x86-64) => /usr/lib/libfoo.so.1`.
//!
//! Lines matching neither grammar are skipped and reported at debug level;
//! they are never fatal.

use crate::error::ToolError;
use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

/// One parsed dependency-listing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepLine {
    /// Soname as reported by the linker. For the bare-path form this is the
    /// absolute path itself.
    pub soname: String,
    /// Resolved filesystem path, when the linker reported one.
    pub path: Option<PathBuf>,
}

fn dep_resolved_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(\S+)\s+=>\s+(\S+)\s+\(0x[0-9a-f]+\)\s*$").unwrap()
    })
}

fn dep_bare_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\S+)\s+\(0x[0-9a-f]+\)\s*$").unwrap())
}

fn cache_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\S+)\s+\((.*?)\)\s+=>\s+(\S+)\s*$").unwrap())
}

/// Parse one line of dependency-listing output.
///
/// Returns `None` for lines matching neither recognized form (headers,
/// `not found` markers, the `statically linked` notice); those are logged
/// at debug level and skipped.
pub fn parse_dependency_line(line: &str) -> Option<DepLine> {
    if let Some(caps) = dep_resolved_re().captures(line) {
        return Some(DepLine {
            soname: caps[1].to_string(),
            path: Some(PathBuf::from(&caps[2])),
        });
    }
    if let Some(caps) = dep_bare_re().captures(line) {
        return Some(DepLine {
            soname: caps[1].to_string(),
            path: None,
        });
    }
    if !line.trim().is_empty() {
        tracing::debug!("skipping unrecognized dependency line: {}", line.trim());
    }
    None
}

/// Parse one line of library-cache output into `(soname, path)`.
pub fn parse_cache_line(line: &str) -> Option<(String, PathBuf)> {
    let caps = cache_re().captures(line)?;
    Some((caps[1].to_string(), PathBuf::from(&caps[3])))
}

/// Linker diagnostics the resolver consumes.
///
/// The production implementation shells out to the host's linker tooling;
/// tests substitute canned listings.
pub trait Diagnostics {
    /// List the dynamic dependencies of `executable`, one [`DepLine`] per
    /// well-formed output line, in the order the linker reported them.
    ///
    /// # Errors
    ///
    /// Returns an error if the dependency lister cannot run or exits with a
    /// non-zero status (for example, when pointed at a statically-linked
    /// executable).
    fn list_dependencies(&self, executable: &Path) -> Result<Vec<DepLine>>;

    /// Look up a library by exact soname in the system library cache.
    ///
    /// Returns `Ok(None)` when the cache has no entry for `soname`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache lister cannot run or exits with a
    /// non-zero status.
    fn find_library(&self, soname: &str) -> Result<Option<PathBuf>>;
}

/// [`Diagnostics`] backed by the host's `ldd` and `ldconfig` binaries.
#[derive(Debug, Clone)]
pub struct LinkerDiagnostics {
    /// Dependency lister, `ldd` by default.
    pub ldd: PathBuf,
    /// Library-cache lister, `ldconfig` by default.
    pub ldconfig: PathBuf,
}

impl Default for LinkerDiagnostics {
    fn default() -> Self {
        Self {
            ldd: PathBuf::from("ldd"),
            ldconfig: PathBuf::from("ldconfig"),
        }
    }
}

impl LinkerDiagnostics {
    fn run(&self, program: &Path, args: &[&str], hint: &'static str) -> Result<String> {
        let tool = program.display().to_string();
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| ToolError::from_spawn(&tool, hint, e))?;

        if !output.status.success() {
            return Err(ToolError::from_output(&tool, &output).into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Diagnostics for LinkerDiagnostics {
    fn list_dependencies(&self, executable: &Path) -> Result<Vec<DepLine>> {
        let exe = executable
            .to_str()
            .with_context(|| format!("non-UTF-8 executable path: {}", executable.display()))?;
        let listing = self.run(
            &self.ldd,
            &[exe],
            "The dependency lister ships with glibc; is this a glibc host?",
        )?;

        Ok(listing.lines().filter_map(parse_dependency_line).collect())
    }

    fn find_library(&self, soname: &str) -> Result<Option<PathBuf>> {
        let listing = self.run(
            &self.ldconfig,
            &["-p"],
            "The cache lister usually lives in /sbin; try adding it to PATH.",
        )?;

        Ok(listing
            .lines()
            .filter_map(parse_cache_line)
            .find(|(name, _)| name == soname)
            .map(|(_, path)| path))
    }
}
