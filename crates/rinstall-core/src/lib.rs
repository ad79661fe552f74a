//! Verification and unpacking of signed software releases.
//!
//! A release consists of archives, a manifest listing their SHA-256 digests,
//! and a detached OpenPGP signature over the manifest. The manifest is only
//! read after [`verify_signature`] succeeds; an archive is only unpacked after
//! its digest matches the manifest entry.

pub mod archive;
pub mod digest;
pub mod error;
pub mod extract;
pub mod manifest;
pub mod prompt;
pub mod util;
pub mod verify;

pub use archive::{ArchiveExtractor, ArchiveType, UnpackOptions};
pub use digest::{sha256_file, sha256_file_hex, verify_sha256};
pub use error::{InstallerError, Result};
pub use extract::extract_release;
pub use manifest::{Manifest, ManifestEntry};
pub use rinstall_semver::{extract_semver, ParseError, SemVerInfo};
pub use util::exists;
pub use verify::{verify_manifest, verify_signature, SignatureVerifier, TrustedKey, TrustedKeyring, VerifyError};
