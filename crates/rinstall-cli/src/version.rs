//! Version command - extract the semantic version from a release file name.

use anyhow::{Context, Result};
use clap::Args;

use crate::output::Output;
use rinstall_semver::extract_semver;

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// File name or string containing a version, e.g. app-linux-amd64-v1.2.3.tar.gz
    #[arg(value_name = "INPUT")]
    pub input: String,
}

pub fn execute(args: VersionArgs, output: &Output) -> Result<i32> {
    let version = extract_semver(&args.input)
        .with_context(|| format!("No version found in {:?}", args.input))?;

    println!("{}", version.canonical());

    output.verbose(&format!("major:       {}", version.major()));
    output.verbose(&format!("minor:       {}", version.minor()));
    output.verbose(&format!("patch:       {}", version.patch()));
    if version.has_pre_release() {
        output.verbose(&format!("pre-release: {}", version.pre_release()));
    }
    if version.has_build() {
        output.verbose(&format!("build:       {}", version.build()));
    }

    Ok(0)
}
