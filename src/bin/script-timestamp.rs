//! script-timestamp CLI
//!
//! Add RFC 3161 timestamps to the Authenticode signature blocks of signed
//! PowerShell/VBScript files, in batch.

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use script_timestamp::{timestamp_file, ScriptDialect};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "script-timestamp")]
#[command(version)]
#[command(about = "Timestamp Authenticode signature blocks in signed script files")]
struct Cli {
    /// Script dialect of the input files
    #[arg(value_enum)]
    dialect: Dialect,

    /// Path to a signtool-compatible executable
    #[arg(long, default_value = "signtool.exe")]
    signtool: PathBuf,

    /// URI of an RFC 3161 timestamp server
    #[arg(long = "tr")]
    server_uri: String,

    /// Digest algorithm, passed to the signer verbatim
    #[arg(long = "td", default_value = "sha256")]
    digest: String,

    /// Signed script files to timestamp
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Dialect {
    Powershell,
    Vbscript,
}

impl From<Dialect> for ScriptDialect {
    fn from(value: Dialect) -> Self {
        match value {
            Dialect::Powershell => ScriptDialect::PowerShell,
            Dialect::Vbscript => ScriptDialect::VbScript,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let dialect = ScriptDialect::from(cli.dialect);

    let mut successful = Vec::new();
    let mut failed = Vec::new();

    // One file's failure never stops the batch.
    for file in &cli.files {
        log::info!(
            "about to timestamp {} (dialect {}, server {}, digest {})",
            file.display(),
            dialect,
            cli.server_uri,
            cli.digest
        );
        match timestamp_file(&cli.signtool, file, dialect, &cli.server_uri, &cli.digest) {
            Ok(()) => successful.push(file),
            Err(err) => {
                log::error!("could not timestamp {}: {err}", file.display());
                failed.push(file);
            }
        }
    }

    if !successful.is_empty() {
        println!("The following files were successfully timestamped:");
        for file in &successful {
            println!("  [SUCCESS] {}", file.display());
        }
    }

    if !failed.is_empty() {
        println!("The following files could not be timestamped:");
        for file in &failed {
            println!("  [ERROR]   {}", file.display());
        }
        bail!("{} of {} files failed", failed.len(), cli.files.len());
    }

    Ok(())
}
