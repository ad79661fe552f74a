use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "rinstall.toml";

/// The rinstall configuration file structure (rinstall.toml)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RinstallConfig {
    /// Defaults for `rinstall install`
    pub install: InstallConfig,
}

/// Install defaults. Command line flags take precedence.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Directory holding the downloaded manifest, signature and archives
    pub path: Option<PathBuf>,

    /// Manifest file name inside `path`
    pub manifest: Option<String>,

    /// Signature file name inside `path` (default: `<manifest>.asc`)
    pub signature: Option<String>,

    /// Directory the archive is unpacked into
    pub destination: Option<PathBuf>,

    /// Restore file ownership recorded in the archive
    pub preserve_ownership: Option<bool>,
}

impl RinstallConfig {
    /// Load configuration from rinstall.toml, searching upward from the given directory
    pub fn load(start_dir: &Path) -> Result<Option<Self>> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE);

            if config_path.is_file() {
                return Self::load_file(&config_path).map(Some);
            }

            if !current.pop() {
                return Ok(None);
            }
        }
    }

    /// Load configuration by searching upward from the current working directory
    pub fn load_from_cwd() -> Result<Option<Self>> {
        let cwd = std::env::current_dir()?;
        Self::load(&cwd)
    }

    /// Load a specific configuration file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: RinstallConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
