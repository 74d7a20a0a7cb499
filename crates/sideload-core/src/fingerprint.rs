//! Deployment fingerprints.
//!
//! A fingerprint is a short, stable identifier for one manifest: the BLAKE3
//! hash of its description log, truncated and prefixed with a namespace so
//! generated directory names are self-describing. Identical manifests always
//! fingerprint identically across runs and hosts; any change to an entry's
//! name, path, tag, or position changes the fingerprint.

use crate::manifest::Manifest;
use serde::Serialize;
use std::fmt;

/// Namespace prefix for all generated directory and file names.
pub const FINGERPRINT_NAMESPACE: &str = "sideload";

/// Hex digits kept from the digest (64 bits).
const DIGEST_CHARS: usize = 16;

/// Stable identifier for a manifest, e.g. `sideload-9f2a6c41d803e7b5`.
///
/// Contains only lowercase hex and `-`, so it is safe to use as a local
/// directory name and as a remote directory/file-name component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint a manifest's description log.
    pub fn of_manifest(manifest: &Manifest) -> Self {
        Self::of_log(manifest.description_log())
    }

    fn of_log(log: &str) -> Self {
        let digest = blake3::hash(log.as_bytes());
        let hex = digest.to_hex();
        Self(format!("{FINGERPRINT_NAMESPACE}-{}", &hex[..DIGEST_CHARS]))
    }

    /// The fingerprint as a string slice, prefix included.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
