//! Install command - verify a downloaded release and unpack it.

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::config::{InstallConfig, RinstallConfig};
use crate::output::Output;
use crate::verify::default_signature;
use rinstall_core::{exists, extract_release, prompt, verify_manifest, Manifest, UnpackOptions};

#[derive(Args, Debug, Default)]
pub struct InstallArgs {
    /// Directory holding the downloaded files
    #[arg(short, long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Manifest file name
    #[arg(short, long, value_name = "NAME")]
    pub manifest: Option<String>,

    /// Release archive file name, as listed in the manifest
    #[arg(short, long, value_name = "NAME")]
    pub file: String,

    /// Directory to unpack into
    #[arg(short, long, value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Signature file name (default: <manifest>.asc)
    #[arg(short, long, value_name = "NAME")]
    pub signature: Option<String>,

    /// Restore file ownership recorded in the archive
    #[arg(long)]
    pub preserve_ownership: bool,

    /// Do not ask before unpacking into an existing directory
    #[arg(short, long)]
    pub yes: bool,
}

/// Fully resolved install request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub manifest: PathBuf,
    pub signature: PathBuf,
    pub dir: PathBuf,
    pub file: String,
    pub destination: PathBuf,
    pub options: UnpackOptions,
}

/// Merge command line arguments with config defaults
pub fn resolve(args: &InstallArgs, config: Option<&InstallConfig>) -> Result<InstallPlan> {
    let defaults = InstallConfig::default();
    let config = config.unwrap_or(&defaults);

    let dir = args
        .path
        .clone()
        .or_else(|| config.path.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let Some(manifest) = args.manifest.clone().or_else(|| config.manifest.clone()) else {
        bail!("No manifest given; pass --manifest or set install.manifest in rinstall.toml");
    };

    let Some(destination) = args.destination.clone().or_else(|| config.destination.clone()) else {
        bail!("No destination given; pass --destination or set install.destination in rinstall.toml");
    };

    let manifest = dir.join(manifest);
    let signature = match args.signature.as_ref().or(config.signature.as_ref()) {
        Some(name) => dir.join(name),
        None => default_signature(&manifest),
    };

    let preserve_ownership = args.preserve_ownership || config.preserve_ownership.unwrap_or(false);

    Ok(InstallPlan {
        manifest,
        signature,
        dir,
        file: args.file.clone(),
        destination,
        options: UnpackOptions {
            ignore_ownership: !preserve_ownership,
        },
    })
}

pub fn execute(args: InstallArgs, config: Option<&RinstallConfig>, output: &Output) -> Result<i32> {
    let plan = resolve(&args, config.map(|c| &c.install))?;

    output.info(&format!("Verifying {}", plan.manifest.display()));
    // Parse the bytes that were verified, not a second read of the file
    let content = verify_manifest(&plan.signature, &plan.manifest)
        .with_context(|| format!("Manifest {} is not trusted", plan.manifest.display()))?;
    let manifest = Manifest::parse_bytes(&content)?;
    manifest
        .verify_file(&plan.dir, &plan.file)
        .with_context(|| format!("Refusing to install {}", plan.file))?;
    output.verbose(&format!("{} matches the signed manifest", plan.file));

    if exists(&plan.destination) && !args.yes {
        output.write(&format!(
            "{} already exists, unpack {} into it? [y/N] ",
            plan.destination.display(),
            plan.file
        ));
        if !prompt::yes_stdin() {
            output.warning("Installation aborted");
            return Ok(1);
        }
    }

    let version = extract_release(&plan.dir, &plan.file, &plan.destination, &plan.options)
        .with_context(|| format!("Failed to install {}", plan.file))?;

    output.success(&format!(
        "Installed {} into {}",
        version,
        plan.destination.display()
    ));
    if output.is_quiet() {
        println!("{}", version);
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(file: &str) -> InstallArgs {
        InstallArgs {
            file: file.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_from_args() {
        let mut args = args("app-v1.0.0.tar.gz");
        args.path = Some(PathBuf::from("/tmp/dl"));
        args.manifest = Some("manifest.txt".to_string());
        args.destination = Some(PathBuf::from("/opt/app"));

        let plan = resolve(&args, None).unwrap();
        assert_eq!(plan.manifest, PathBuf::from("/tmp/dl/manifest.txt"));
        assert_eq!(plan.signature, PathBuf::from("/tmp/dl/manifest.txt.asc"));
        assert_eq!(plan.dir, PathBuf::from("/tmp/dl"));
        assert_eq!(plan.file, "app-v1.0.0.tar.gz");
        assert_eq!(plan.destination, PathBuf::from("/opt/app"));
        assert!(plan.options.ignore_ownership);
    }

    #[test]
    fn test_resolve_from_config() {
        let config = InstallConfig {
            path: Some(PathBuf::from("/srv/releases")),
            manifest: Some("SHA256SUMS".to_string()),
            signature: Some("SHA256SUMS.sig".to_string()),
            destination: Some(PathBuf::from("/opt/app")),
            preserve_ownership: Some(true),
        };

        let plan = resolve(&args("app-v1.0.0.tar.gz"), Some(&config)).unwrap();
        assert_eq!(plan.manifest, PathBuf::from("/srv/releases/SHA256SUMS"));
        assert_eq!(plan.signature, PathBuf::from("/srv/releases/SHA256SUMS.sig"));
        assert!(!plan.options.ignore_ownership);
    }

    #[test]
    fn test_args_override_config() {
        let config = InstallConfig {
            path: Some(PathBuf::from("/srv/releases")),
            manifest: Some("SHA256SUMS".to_string()),
            destination: Some(PathBuf::from("/opt/app")),
            ..Default::default()
        };
        let mut args = args("app-v1.0.0.tar.gz");
        args.manifest = Some("manifest.txt".to_string());
        args.destination = Some(PathBuf::from("/usr/local/app"));

        let plan = resolve(&args, Some(&config)).unwrap();
        assert_eq!(plan.manifest, PathBuf::from("/srv/releases/manifest.txt"));
        assert_eq!(plan.destination, PathBuf::from("/usr/local/app"));
    }

    #[test]
    fn test_resolve_defaults_to_current_dir() {
        let mut args = args("app-v1.0.0.tar.gz");
        args.manifest = Some("manifest.txt".to_string());
        args.destination = Some(PathBuf::from("out"));

        let plan = resolve(&args, None).unwrap();
        assert_eq!(plan.dir, PathBuf::from("."));
        assert_eq!(plan.manifest, PathBuf::from("./manifest.txt"));
    }

    #[test]
    fn test_resolve_requires_manifest_and_destination() {
        let mut args = args("app-v1.0.0.tar.gz");
        args.destination = Some(PathBuf::from("out"));
        assert!(resolve(&args, None).is_err());

        let mut args = self::args("app-v1.0.0.tar.gz");
        args.manifest = Some("manifest.txt".to_string());
        assert!(resolve(&args, None).is_err());
    }
}
