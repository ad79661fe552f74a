mod config;
mod digest;
mod install;
mod output;
mod verify;
mod version;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use config::RinstallConfig;
use output::{Output, Verbosity};

#[derive(Parser, Debug)]
#[command(name = "rinstall")]
#[command(about = "Verify and install signed release archives")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only print results and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Configuration file (default: rinstall.toml in the current or a parent directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract the semantic version from a release file name
    Version(version::VersionArgs),

    /// Verify the detached signature of a release manifest
    Verify(verify::VerifyArgs),

    /// Print the SHA-256 digest of a file
    Digest(digest::DigestArgs),

    /// Verify and unpack a downloaded release archive
    Install(install::InstallArgs),
}

fn init_logger(verbosity: Verbosity) {
    // RUST_LOG still wins over the -v/-q derived level
    env_logger::Builder::new()
        .filter_level(verbosity.log_level())
        .format_target(false)
        .parse_default_env()
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<Option<RinstallConfig>> {
    match path {
        Some(path) => RinstallConfig::load_file(path).map(Some),
        None => RinstallConfig::load_from_cwd(),
    }
}

fn run() -> Result<i32> {
    let args = Args::parse();

    let verbosity = Verbosity::from_flags(args.verbose, args.quiet);
    init_logger(verbosity);

    let mut output = Output::new();
    output.set_verbosity(verbosity);

    let config = load_config(args.config.as_ref())?;

    match args.command {
        Commands::Version(args) => version::execute(args, &output),
        Commands::Verify(args) => verify::execute(args, &output),
        Commands::Digest(args) => digest::execute(args),
        Commands::Install(args) => install::execute(args, config.as_ref(), &output),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("Error: {}", e);
            // Print the error chain for debugging
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {}", cause);
            }
            ExitCode::FAILURE
        }
    }
}
