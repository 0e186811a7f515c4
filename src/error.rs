//! Error types for signature block extraction and timestamping.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for timestamp operations
pub type TimestampResult<T> = Result<T, TimestampError>;

/// Errors raised while timestamping a single file.
///
/// Every variant is fatal to the file it occurred on and is never retried
/// internally; a batch caller is expected to record the failure and move on
/// to the next file.
#[derive(Debug, Error)]
pub enum TimestampError {
    /// The begin sequence was not found under either encoding assumption
    #[error("signature block not found")]
    SignatureBlockNotFound,

    /// A begin sequence was found but no end sequence follows it
    #[error("end of signature block not found")]
    SignatureBlockUnterminated,

    /// The signature block content is not valid Base64
    #[error("signature block is not valid base64")]
    SignatureBlockMalformed(#[source] base64::DecodeError),

    /// The input script file could not be read
    #[error("could not read script {path:?}")]
    FileReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The reassembled script bytes could not be persisted
    #[error("could not overwrite script {path:?}")]
    FileWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The extracted container could not be written for the external signer
    #[error("could not write signature container {path:?}")]
    ContainerWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The container could not be read back after the signer ran
    #[error("could not read signature container {path:?} after timestamping")]
    ContainerReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external signer could not be started or reported failure
    #[error("signer {program} failed: {reason}")]
    SignerFailure { program: String, reason: String },
}
