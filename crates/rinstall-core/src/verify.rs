//! Detached OpenPGP signature verification against a fixed trust anchor.
//!
//! A release manifest is only trusted once its detached, ASCII-armored
//! signature checks out against one of the keys in the [`TrustedKeyring`].
//! The keyring comes from a [`TrustedKey`], which by default is the release
//! key compiled into the binary.
//!
//! # Example
//!
//! ```rust,no_run
//! use rinstall_core::verify::{SignatureVerifier, TrustedKey};
//!
//! let verifier = SignatureVerifier::new(TrustedKey::release());
//! verifier
//!     .verify_signature("downloads/manifest.txt.asc", "downloads/manifest.txt")
//!     .expect("manifest is not signed by the release key");
//! ```

use lazy_static::lazy_static;
use pgp::composed::{SignedPublicKey, SignedPublicSubKey, StandaloneSignature};
use pgp::packet::Signature;
use pgp::types::{KeyId, PublicKeyTrait};
use pgp::Deserializable;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Armored public key of the release signing key
const RELEASE_PUBKEY: &str = include_str!("../res/release-pubkey.asc");

/// Error type for signature verification
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The trusted key itself is unusable. No verification can succeed.
    #[error("Invalid trusted keyring: {0}")]
    Keyring(String),

    #[error("Signature verification failed: {0}")]
    Signature(String),
}

impl VerifyError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        VerifyError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// ASCII-armored public key text that signatures are checked against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedKey {
    armored: Cow<'static, str>,
}

impl TrustedKey {
    /// The release signing key embedded at build time
    pub fn release() -> Self {
        Self {
            armored: Cow::Borrowed(RELEASE_PUBKEY),
        }
    }

    pub fn from_armored(armored: impl Into<String>) -> Self {
        Self {
            armored: Cow::Owned(armored.into()),
        }
    }

    pub fn armored(&self) -> &str {
        &self.armored
    }

    /// Parse the armored text into a keyring
    pub fn parse(&self) -> Result<TrustedKeyring, VerifyError> {
        TrustedKeyring::from_armored(&self.armored)
    }
}

impl Default for TrustedKey {
    fn default() -> Self {
        Self::release()
    }
}

/// Parsed public keys trusted for signature verification
#[derive(Debug, Clone)]
pub struct TrustedKeyring {
    keys: Vec<SignedPublicKey>,
}

impl TrustedKeyring {
    /// Parse one or more armored public keys. Every key must carry valid
    /// self-signatures.
    pub fn from_armored(armored: &str) -> Result<Self, VerifyError> {
        let (keys, _headers) = SignedPublicKey::from_armor_many(Cursor::new(armored.as_bytes()))
            .map_err(|e| VerifyError::Keyring(e.to_string()))?;
        let keys = keys
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| VerifyError::Keyring(e.to_string()))?;

        if keys.is_empty() {
            return Err(VerifyError::Keyring("no public keys found".to_string()));
        }

        for key in &keys {
            key.verify()
                .map_err(|e| VerifyError::Keyring(format!("key {:?}: {}", key.key_id(), e)))?;
        }

        Ok(Self { keys })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Key ids of the primary keys, for diagnostics
    pub fn key_ids(&self) -> Vec<KeyId> {
        self.keys.iter().map(|key| key.key_id()).collect()
    }

    /// Every primary key and subkey a signature may have been made with
    fn candidates(&self) -> Vec<Candidate<'_>> {
        let mut candidates = Vec::new();
        for key in &self.keys {
            candidates.push(Candidate::Primary(key));
            for subkey in &key.public_subkeys {
                candidates.push(Candidate::Subkey(subkey));
            }
        }
        candidates
    }
}

enum Candidate<'a> {
    Primary(&'a SignedPublicKey),
    Subkey(&'a SignedPublicSubKey),
}

impl Candidate<'_> {
    fn key_id(&self) -> KeyId {
        match self {
            Candidate::Primary(key) => key.key_id(),
            Candidate::Subkey(key) => key.key_id(),
        }
    }

    /// Hash `data` and check it against `signature` in one pass
    fn verify<R: Read>(&self, signature: &Signature, data: R) -> pgp::errors::Result<()> {
        match self {
            Candidate::Primary(key) => signature.verify(*key, data),
            Candidate::Subkey(key) => signature.verify(*key, data),
        }
    }
}

/// Verifies detached manifest signatures against a [`TrustedKey`].
///
/// The keyring is parsed on first use and cached; afterwards the verifier is
/// read-only and can be shared between threads.
#[derive(Debug)]
pub struct SignatureVerifier {
    key: TrustedKey,
    keyring: OnceLock<TrustedKeyring>,
}

impl SignatureVerifier {
    pub fn new(key: TrustedKey) -> Self {
        Self {
            key,
            keyring: OnceLock::new(),
        }
    }

    /// Verifier for the embedded release key
    pub fn release() -> Self {
        Self::new(TrustedKey::release())
    }

    pub fn trusted_key(&self) -> &TrustedKey {
        &self.key
    }

    /// The parsed keyring, loading it on first call
    pub fn keyring(&self) -> Result<&TrustedKeyring, VerifyError> {
        if let Some(keyring) = self.keyring.get() {
            return Ok(keyring);
        }

        let parsed = self.key.parse()?;
        log::debug!("Loaded trusted keyring: {:?}", parsed.key_ids());

        // A concurrent caller may have stored an identical keyring first
        Ok(self.keyring.get_or_init(|| parsed))
    }

    /// Check that `signature` is a valid detached signature over the full
    /// contents of `manifest`, made by a trusted key.
    pub fn verify_signature(
        &self,
        signature: impl AsRef<Path>,
        manifest: impl AsRef<Path>,
    ) -> Result<(), VerifyError> {
        let signature_path = signature.as_ref();
        let manifest_path = manifest.as_ref();

        let signature_file = File::open(signature_path).map_err(|e| VerifyError::io(signature_path, e))?;
        let manifest_file = File::open(manifest_path).map_err(|e| VerifyError::io(manifest_path, e))?;

        self.verify_stream(signature_path, signature_file, manifest_path, manifest_file)
    }

    /// Read `manifest` once, check `signature` over those bytes and return
    /// them. Callers that go on to use the manifest should parse the returned
    /// bytes rather than reading the file again.
    pub fn verify_manifest(
        &self,
        signature: impl AsRef<Path>,
        manifest: impl AsRef<Path>,
    ) -> Result<Vec<u8>, VerifyError> {
        let signature_path = signature.as_ref();
        let manifest_path = manifest.as_ref();

        let signature_file = File::open(signature_path).map_err(|e| VerifyError::io(signature_path, e))?;
        let content = std::fs::read(manifest_path).map_err(|e| VerifyError::io(manifest_path, e))?;

        self.verify_stream(signature_path, signature_file, manifest_path, Cursor::new(&content[..]))?;
        Ok(content)
    }

    fn verify_stream<D: Read + Seek>(
        &self,
        signature_path: &Path,
        signature_file: File,
        manifest_path: &Path,
        mut manifest: D,
    ) -> Result<(), VerifyError> {
        let keyring = self.keyring()?;

        let (standalone, _headers) = StandaloneSignature::from_armor_single(BufReader::new(signature_file))
            .map_err(|e| {
                VerifyError::Signature(format!(
                    "malformed signature {}: {}",
                    signature_path.display(),
                    e
                ))
            })?;
        let signature = standalone.signature;

        let mut failures = Vec::new();
        for candidate in keyring.candidates() {
            manifest
                .rewind()
                .map_err(|e| VerifyError::io(manifest_path, e))?;

            match candidate.verify(&signature, BufReader::new(&mut manifest)) {
                Ok(()) => {
                    log::debug!(
                        "{} verified with key {:?}",
                        manifest_path.display(),
                        candidate.key_id()
                    );
                    return Ok(());
                }
                Err(e) => failures.push(format!("{:?}: {}", candidate.key_id(), e)),
            }
        }

        Err(VerifyError::Signature(format!(
            "{} does not match {} ({})",
            signature_path.display(),
            manifest_path.display(),
            failures.join("; ")
        )))
    }
}

lazy_static! {
    static ref RELEASE_VERIFIER: SignatureVerifier = SignatureVerifier::release();
}

/// Verify a detached manifest signature against the embedded release key
pub fn verify_signature(
    signature: impl AsRef<Path>,
    manifest: impl AsRef<Path>,
) -> Result<(), VerifyError> {
    RELEASE_VERIFIER.verify_signature(signature, manifest)
}

/// Read and verify a manifest against the embedded release key, returning
/// the verified bytes
pub fn verify_manifest(
    signature: impl AsRef<Path>,
    manifest: impl AsRef<Path>,
) -> Result<Vec<u8>, VerifyError> {
    RELEASE_VERIFIER.verify_manifest(signature, manifest)
}
