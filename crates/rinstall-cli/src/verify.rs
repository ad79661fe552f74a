//! Verify command - check a manifest signature against the release key.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::output::Output;
use rinstall_core::{verify_manifest, Manifest};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Release manifest
    #[arg(short, long, value_name = "FILE")]
    pub manifest: PathBuf,

    /// Detached ASCII-armored signature (default: <manifest>.asc)
    #[arg(short, long, value_name = "FILE")]
    pub signature: Option<PathBuf>,
}

/// `manifest.txt` -> `manifest.txt.asc`
pub fn default_signature(manifest: &Path) -> PathBuf {
    let mut path = manifest.as_os_str().to_owned();
    path.push(".asc");
    PathBuf::from(path)
}

pub fn execute(args: VerifyArgs, output: &Output) -> Result<i32> {
    let signature = args
        .signature
        .unwrap_or_else(|| default_signature(&args.manifest));

    output.verbose(&format!(
        "Checking {} against {}",
        args.manifest.display(),
        signature.display()
    ));

    let content = verify_manifest(&signature, &args.manifest)
        .with_context(|| format!("Manifest {} is not trusted", args.manifest.display()))?;

    output.success(&format!("{}: signature OK", args.manifest.display()));

    let manifest = Manifest::parse_bytes(&content)?;
    for entry in manifest.entries() {
        output.list_item("-", &format!("{}  {}", entry.digest, entry.filename));
    }

    Ok(0)
}
