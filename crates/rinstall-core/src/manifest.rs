//! Release manifests: a list of `<sha256>  <filename>` lines.
//!
//! The manifest is the document covered by the detached release signature.
//! Once its signature has been checked, the digests it lists are trusted for
//! the archives downloaded next to it.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use crate::digest::verify_sha256;
use crate::{InstallerError, Result};

lazy_static! {
    // `sha256sum` output; the `*` marks binary mode and is not part of the name
    static ref MANIFEST_LINE_RE: Regex = Regex::new(r"^([0-9a-fA-F]{64})\s+\*?(\S.*)$").unwrap();
}

/// One file listed in a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Lowercase hex SHA-256 digest
    pub digest: String,
    pub filename: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Parse manifest text. Blank lines are ignored, any other line that is
    /// not a digest followed by a file name is an error.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let caps = MANIFEST_LINE_RE.captures(line).ok_or_else(|| {
                InstallerError::InvalidManifest {
                    line: index + 1,
                    message: format!("expected \"<sha256> <filename>\", found {:?}", line),
                }
            })?;

            entries.push(ManifestEntry {
                digest: caps[1].to_ascii_lowercase(),
                filename: caps[2].to_string(),
            });
        }

        Ok(Self { entries })
    }

    /// Read and parse a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| InstallerError::io(path, e))?;
        Self::parse(&content)
    }

    /// Parse manifest bytes, which must be UTF-8. Used on the bytes returned
    /// by [`crate::verify_manifest`] so the parsed text is the signed text.
    pub fn parse_bytes(content: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(content).map_err(|e| {
            let line = content[..e.valid_up_to()].iter().filter(|b| **b == b'\n').count() + 1;
            InstallerError::InvalidManifest {
                line,
                message: "not valid UTF-8".to_string(),
            }
        })?;
        Self::parse(text)
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the entry for a file name
    pub fn find(&self, filename: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|entry| entry.filename == filename)
    }

    /// Check `dir/filename` against the digest recorded for `filename`
    pub fn verify_file(&self, dir: &Path, filename: &str) -> Result<()> {
        let entry = self.find(filename).ok_or_else(|| InstallerError::NotInManifest {
            file: filename.to_string(),
        })?;

        if !verify_sha256(&dir.join(filename), &entry.digest)? {
            return Err(InstallerError::ChecksumMismatch {
                file: filename.to_string(),
            });
        }

        log::debug!("{} matches manifest digest", filename);
        Ok(())
    }
}
