//! Release archive unpacking (tar, tar.gz, tar.bz2, tar.xz).

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path};

use crate::{InstallerError, Result};

/// Supported archive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    Tar,
    TarGz,
    TarBz2,
    TarXz,
}

impl ArchiveType {
    /// Detect archive type from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let path_str = path.to_string_lossy().to_lowercase();

        if path_str.ends_with(".tar.gz") || path_str.ends_with(".tgz") {
            Some(ArchiveType::TarGz)
        } else if path_str.ends_with(".tar.bz2") || path_str.ends_with(".tbz2") {
            Some(ArchiveType::TarBz2)
        } else if path_str.ends_with(".tar.xz") || path_str.ends_with(".txz") {
            Some(ArchiveType::TarXz)
        } else if path_str.ends_with(".tar") {
            Some(ArchiveType::Tar)
        } else {
            None
        }
    }
}

/// Options for unpacking a release archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnpackOptions {
    /// Do not restore uid/gid from the archive headers. Needed when running
    /// without elevated privileges.
    pub ignore_ownership: bool,
}

impl Default for UnpackOptions {
    fn default() -> Self {
        Self {
            ignore_ownership: true,
        }
    }
}

/// Archive extractor
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    /// Unpack an archive into the destination directory
    pub fn unpack(archive_path: &Path, dest_dir: &Path, options: &UnpackOptions) -> Result<()> {
        let archive_type = ArchiveType::from_path(archive_path).ok_or_else(|| {
            InstallerError::UnsupportedArchive {
                path: archive_path.to_path_buf(),
            }
        })?;

        Self::unpack_with_type(archive_path, dest_dir, archive_type, options)
    }

    /// Unpack an archive with explicit type
    pub fn unpack_with_type(
        archive_path: &Path,
        dest_dir: &Path,
        archive_type: ArchiveType,
        options: &UnpackOptions,
    ) -> Result<()> {
        let file = File::open(archive_path).map_err(|e| InstallerError::io(archive_path, e))?;
        let reader = BufReader::new(file);

        std::fs::create_dir_all(dest_dir).map_err(|e| InstallerError::io(dest_dir, e))?;

        log::debug!(
            "Unpacking {} ({:?}) into {}",
            archive_path.display(),
            archive_type,
            dest_dir.display()
        );

        match archive_type {
            ArchiveType::Tar => Self::unpack_tar(reader, archive_path, dest_dir, options),
            ArchiveType::TarGz => {
                Self::unpack_tar(GzDecoder::new(reader), archive_path, dest_dir, options)
            }
            ArchiveType::TarBz2 => {
                use bzip2::read::BzDecoder;
                Self::unpack_tar(BzDecoder::new(reader), archive_path, dest_dir, options)
            }
            ArchiveType::TarXz => {
                use xz2::read::XzDecoder;
                Self::unpack_tar(XzDecoder::new(reader), archive_path, dest_dir, options)
            }
        }
    }

    /// Unpack a tar stream. Entries are written as-is below `dest_dir`; any
    /// entry that would land outside of it aborts the whole unpack.
    pub fn unpack_tar<R: Read>(
        reader: R,
        archive_path: &Path,
        dest_dir: &Path,
        options: &UnpackOptions,
    ) -> Result<()> {
        let unpack_err = |e: std::io::Error| InstallerError::Unpack {
            path: archive_path.to_path_buf(),
            reason: e.to_string(),
        };

        let mut archive = tar::Archive::new(reader);
        archive.set_preserve_permissions(true);
        archive.set_preserve_ownerships(!options.ignore_ownership);
        archive.set_overwrite(true);

        let mut count = 0usize;
        for entry in archive.entries().map_err(unpack_err)? {
            let mut entry = entry.map_err(unpack_err)?;
            let path = entry.path().map_err(unpack_err)?.into_owned();

            if !Self::is_contained(&path) {
                return Err(InstallerError::PathTraversal {
                    entry: path.display().to_string(),
                });
            }

            // unpack_in refuses entries (and link targets) escaping dest_dir
            if !entry.unpack_in(dest_dir).map_err(unpack_err)? {
                return Err(InstallerError::PathTraversal {
                    entry: path.display().to_string(),
                });
            }
            count += 1;
        }

        log::debug!("Unpacked {} entries from {}", count, archive_path.display());
        Ok(())
    }

    /// Relative path without `..`, root or prefix components
    fn is_contained(path: &Path) -> bool {
        path.components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    }
}
