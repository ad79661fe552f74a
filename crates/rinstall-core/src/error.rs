use std::path::PathBuf;

use rinstall_semver::ParseError;
use thiserror::Error;

use crate::verify::VerifyError;

#[derive(Error, Debug)]
pub enum InstallerError {
    // IO errors
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Version errors
    #[error(transparent)]
    Version(#[from] ParseError),

    // Signature errors
    #[error(transparent)]
    Verify(#[from] VerifyError),

    // Archive errors
    #[error("Unsupported archive type: {}", .path.display())]
    UnsupportedArchive { path: PathBuf },

    #[error("Failed to unpack {}: {reason}", .path.display())]
    Unpack { path: PathBuf, reason: String },

    #[error("Path traversal detected: {entry} escapes destination directory")]
    PathTraversal { entry: String },

    // Manifest errors
    #[error("Invalid manifest at line {line}: {message}")]
    InvalidManifest { line: usize, message: String },

    #[error("{file} is not listed in the manifest")]
    NotInManifest { file: String },

    #[error("Checksum mismatch for {file}")]
    ChecksumMismatch { file: String },
}

impl InstallerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InstallerError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, InstallerError>;
