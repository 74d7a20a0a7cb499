//! The ordered record of objects required for one remote run.
//!
//! A [`Manifest`] collects every filesystem object the target needs, in
//! discovery order. Each insertion also appends a line to the description
//! log; the log is both the audit trail shown at `-v` and the sole input to
//! the fingerprint, so insertion order is part of a manifest's identity.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// One object to ship: a logical name, where it lives on the host, and an
/// optional tag recording why it was added.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    /// Destination file name inside the staged layout.
    pub name: String,
    /// Source path on the host.
    pub source: PathBuf,
    /// Optional tag, e.g. `dyninst` for instrumentation support objects.
    pub note: Option<String>,
}

/// Ordered, append-only collection of [`ManifestEntry`] values.
///
/// Entries are never deduplicated or reordered after insertion. Logical
/// names are expected to be distinct; that is enforced by the staging
/// planner, the first consumer that turns names into destination files.
#[derive(Debug, Default)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
    log: String,
}

impl Manifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and extend the description log.
    ///
    /// The log line has the fixed form `Required[(note)]: name => path`;
    /// it is also emitted at info level as the run's audit trail.
    pub fn add_item(&mut self, name: impl Into<String>, source: impl Into<PathBuf>, note: Option<&str>) {
        let entry = ManifestEntry {
            name: name.into(),
            source: source.into(),
            note: note.map(str::to_string),
        };

        let line = match entry.note.as_deref() {
            Some(tag) => format!(
                "Required({tag}): {} => {}",
                entry.name,
                entry.source.display()
            ),
            None => format!("Required: {} => {}", entry.name, entry.source.display()),
        };
        tracing::info!("{line}");
        self.log.push_str(&line);
        self.log.push('\n');

        self.entries.push(entry);
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// The first entry: the target executable itself.
    pub fn executable(&self) -> Option<&ManifestEntry> {
        self.entries.first()
    }

    /// True if an entry with this logical name has been added.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries have been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The accumulated description log, one line per insertion.
    pub fn description_log(&self) -> &str {
        &self.log
    }
}

/// Derive the destination file name for a host path.
///
/// Fails on paths like `/` that have no final component.
pub(crate) fn logical_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_lines_follow_insertion_order() {
        let mut m = Manifest::new();
        m.add_item("myprog", "/usr/bin/myprog", None);
        m.add_item("libfoo.so.1", "/usr/lib/libfoo.so.1", None);
        m.add_item("mod.so", "/home/user/mod.so", Some("dyninst"));

        assert_eq!(
            m.description_log(),
            "Required: myprog => /usr/bin/myprog\n\
             Required: libfoo.so.1 => /usr/lib/libfoo.so.1\n\
             Required(dyninst): mod.so => /home/user/mod.so\n"
        );
    }

    #[test]
    fn duplicates_are_kept() {
        let mut m = Manifest::new();
        m.add_item("libfoo.so.1", "/usr/lib/libfoo.so.1", None);
        m.add_item("libfoo.so.1", "/opt/lib/libfoo.so.1", None);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn executable_is_first_entry() {
        let mut m = Manifest::new();
        assert!(m.executable().is_none());
        m.add_item("myprog", "/usr/bin/myprog", None);
        m.add_item("libfoo.so.1", "/usr/lib/libfoo.so.1", None);
        assert_eq!(m.executable().unwrap().name, "myprog");
    }
}
