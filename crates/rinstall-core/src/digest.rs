//! Streaming SHA-256 digests of files.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;

use crate::{InstallerError, Result};

fn sha256_digest(path: &Path) -> Result<sha2::digest::Output<Sha256>> {
    let mut file = File::open(path).map_err(|e| InstallerError::io(path, e))?;

    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| InstallerError::io(path, e))?;

    Ok(hasher.finalize())
}

/// Compute the SHA-256 digest of a file without loading it into memory
pub fn sha256_file(path: &Path) -> Result<Vec<u8>> {
    Ok(sha256_digest(path)?.to_vec())
}

/// Compute the SHA-256 digest of a file as lowercase hex
pub fn sha256_file_hex(path: &Path) -> Result<String> {
    Ok(format!("{:x}", sha256_digest(path)?))
}

/// Compare the SHA-256 digest of a file against an expected hex string
pub fn verify_sha256(path: &Path, expected: &str) -> Result<bool> {
    let actual = sha256_file_hex(path)?;
    log::debug!("sha256 {} = {}", path.display(), actual);
    Ok(actual.eq_ignore_ascii_case(expected.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // SHA-256 of "hello world"
    const HELLO_WORLD: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    fn temp_file_with(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_sha256_file() {
        let file = temp_file_with(b"hello world");
        let digest = sha256_file(file.path()).unwrap();
        assert_eq!(digest.len(), 32);
        assert_eq!(digest[0], 0xb9);
        assert_eq!(digest[31], 0xe9);
    }

    #[test]
    fn test_sha256_file_hex() {
        let file = temp_file_with(b"hello world");
        assert_eq!(sha256_file_hex(file.path()).unwrap(), HELLO_WORLD);
    }

    #[test]
    fn test_sha256_empty_file() {
        let file = temp_file_with(b"");
        assert_eq!(
            sha256_file_hex(file.path()).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_streams_large_file() {
        let content = vec![b'a'; 1024 * 1024 + 7];
        let file = temp_file_with(&content);

        let expected = format!("{:x}", Sha256::digest(&content));
        assert_eq!(sha256_file_hex(file.path()).unwrap(), expected);
    }

    #[test]
    fn test_sha256_hex_matches_raw_digest() {
        let file = temp_file_with(b"\x00\x01\x0f\xf0");
        let raw = sha256_file(file.path()).unwrap();
        let hex = sha256_file_hex(file.path()).unwrap();

        assert_eq!(hex.len(), 64);
        for (i, byte) in raw.iter().enumerate() {
            assert_eq!(&hex[i * 2..i * 2 + 2], format!("{:02x}", byte));
        }
    }

    #[test]
    fn test_verify_sha256() {
        let file = temp_file_with(b"hello world");
        assert!(verify_sha256(file.path(), HELLO_WORLD).unwrap());
        assert!(verify_sha256(file.path(), &HELLO_WORLD.to_uppercase()).unwrap());
    }

    #[test]
    fn test_verify_sha256_mismatch() {
        let file = temp_file_with(b"hello world");
        let wrong_hash = "0000000000000000000000000000000000000000000000000000000000000000";
        assert!(!verify_sha256(file.path(), wrong_hash).unwrap());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.tar.gz");

        match sha256_file(&missing) {
            Err(InstallerError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected io error, got {:?}", other),
        }
    }
}
