//! Unpacking a verified release and reporting its version.

use std::path::Path;

use crate::archive::{ArchiveExtractor, UnpackOptions};
use crate::Result;
use rinstall_semver::extract_semver;

/// Unpack `archive_dir/filename` into `destination` and return the canonical
/// version (`vMAJOR.MINOR.PATCH[-PRE]`) carried by the archive name.
///
/// The archive is expected to have been checked against a signed manifest
/// already; nothing here looks at digests or signatures.
pub fn extract_release(
    archive_dir: &Path,
    filename: &str,
    destination: &Path,
    options: &UnpackOptions,
) -> Result<String> {
    let archive = archive_dir.join(filename);
    log::info!("extracting: {} -> {}", archive.display(), destination.display());

    ArchiveExtractor::unpack(&archive, destination, options)?;

    let version = extract_semver(filename)?;
    Ok(version.canonical())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InstallerError;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs::File;

    fn write_release(path: &Path) {
        let file = File::create(path).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

        let data = b"#!/bin/sh\necho rinstall\n";
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, "bin/rinstall", &data[..]).unwrap();

        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_extract_release_returns_canonical_version() {
        let dir = tempfile::tempdir().unwrap();
        let filename = "rinstall-linux-amd64-v1.4.0-rc.2+b7.tar.gz";
        write_release(&dir.path().join(filename));

        let dest = dir.path().join("install");
        let version = extract_release(dir.path(), filename, &dest, &UnpackOptions::default()).unwrap();

        assert_eq!(version, "v1.4.0-rc.2");
        assert!(dest.join("bin/rinstall").is_file());
    }

    #[test]
    fn test_extract_release_without_version() {
        let dir = tempfile::tempdir().unwrap();
        write_release(&dir.path().join("release.tar.gz"));

        let result = extract_release(
            dir.path(),
            "release.tar.gz",
            &dir.path().join("install"),
            &UnpackOptions::default(),
        );
        assert!(matches!(result, Err(InstallerError::Version(_))));
    }

    #[test]
    fn test_extract_release_missing_archive() {
        let dir = tempfile::tempdir().unwrap();

        let result = extract_release(
            dir.path(),
            "rinstall-v1.0.0.tar.gz",
            &dir.path().join("install"),
            &UnpackOptions::default(),
        );
        assert!(matches!(result, Err(InstallerError::Io { .. })));
    }
}
