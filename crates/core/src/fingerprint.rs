//! Project fingerprint: a short, stable identifier for a project path used
//! to scope remote locks so two different projects on the same host never
//! contend (`spec.md` §3, §8).

use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;

/// 16-hex-character identifier of a project path, derived from a SHA-256
/// hash of the absolute path. Deterministic (same path always yields the
/// same fingerprint), collision-resistant for realistic paths, and always
/// exactly 16 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectFingerprint([u8; 8]);

impl ProjectFingerprint {
    /// Compute the fingerprint of a project root path.
    ///
    /// The path does not need to exist; only its textual form (after
    /// best-effort absolutization) is hashed, so the fingerprint is stable
    /// across machines that mount the project at the same path.
    pub fn of(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map(|cwd| cwd.join(path)).unwrap_or_else(|_| path.to_path_buf())
        };
        Self::of_str(&absolute.to_string_lossy())
    }

    /// Compute the fingerprint of an arbitrary string. Exposed so callers
    /// that already have a canonicalized path string (or a test fixture)
    /// don't need to round-trip through the filesystem.
    pub fn of_str(s: &str) -> Self {
        let digest = Sha256::digest(s.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        Self(bytes)
    }

    /// The lock directory name for this fingerprint: `rr-<fingerprint>.lock`.
    pub fn lock_dir_name(&self) -> String {
        format!("rr-{}.lock", self)
    }
}

impl fmt::Display for ProjectFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fingerprint_tests.rs"]
mod tests;
