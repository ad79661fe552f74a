//! Digest command - print the SHA-256 of a file.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use rinstall_core::sha256_file_hex;

#[derive(Args, Debug)]
pub struct DigestArgs {
    /// File to hash
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

pub fn execute(args: DigestArgs) -> Result<i32> {
    let digest = sha256_file_hex(&args.file)?;
    println!("{}", digest);
    Ok(0)
}
