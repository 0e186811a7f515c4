//! External signer invocation
//!
//! The actual timestamping is delegated to an opaque signing tool (signtool.exe
//! or a compatible replacement). This crate only hands it a container file and
//! checks that the process ran and exited with code 0.

use std::path::Path;
use std::process::Command;

use crate::error::{TimestampError, TimestampResult};

/// Captured outcome of one signer process run.
#[derive(Debug)]
pub struct SignerOutput {
    /// Whether the process could be started and waited on at all
    pub successful: bool,
    /// Exit code, if the process ran to completion
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl SignerOutput {
    /// The sole success signal: the process ran and exited with code 0
    pub fn is_success(&self) -> bool {
        self.successful && self.exit_code == Some(0)
    }
}

/// Run an executable with the given arguments, capturing output.
///
/// A spawn failure is reported as `successful: false` rather than an error;
/// callers decide how to surface it.
pub fn run(program: &Path, args: &[String]) -> SignerOutput {
    log::info!("running {} {}", program.display(), args.join(" "));

    match Command::new(program).args(args).output() {
        Ok(output) => {
            let result = SignerOutput {
                successful: true,
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            };
            log::debug!("signer exited with {:?}", result.exit_code);
            result
        }
        Err(err) => {
            log::error!("could not run {}: {}", program.display(), err);
            SignerOutput {
                successful: false,
                exit_code: None,
                stdout: String::new(),
                stderr: err.to_string(),
            }
        }
    }
}

/// Ask the signer to add an RFC 3161 timestamp to a PKCS#7 container file,
/// mutating it in place.
///
/// Argument layout follows the signtool timestamp subcommand:
/// `timestamp /v /tr <uri> /td <digest> /p7 <container>`.
pub fn timestamp_container(
    signer_path: &Path,
    container_path: &Path,
    server_uri: &str,
    digest_algorithm: &str,
) -> TimestampResult<()> {
    let args = vec![
        "timestamp".to_string(),
        "/v".to_string(),
        "/tr".to_string(),
        server_uri.to_string(),
        "/td".to_string(),
        digest_algorithm.to_string(),
        "/p7".to_string(),
        container_path.display().to_string(),
    ];

    let output = run(signer_path, &args);
    if output.is_success() {
        return Ok(());
    }

    let reason = if !output.successful {
        format!("could not start process: {}", output.stderr.trim())
    } else {
        match output.exit_code {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        }
    };
    Err(TimestampError::SignerFailure {
        program: signer_path.display().to_string(),
        reason,
    })
}
