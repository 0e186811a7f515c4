//! Single-file timestamp operation
//!
//! Glues the codec to the external signer: extract the container to a
//! temporary file, let the signer mutate it, and write the script back with
//! the refreshed container. Every step is fatal to this file only; a batch
//! caller keeps going with the remaining files.

use std::fs;
use std::path::Path;

use crate::codec;
use crate::dialect::ScriptDialect;
use crate::error::{TimestampError, TimestampResult};
use crate::signer;

/// Timestamp the signature block of one signed script file in place.
///
/// `signer_path` points at a signtool-compatible executable, `server_uri` at
/// an RFC 3161 timestamp server. The digest algorithm name is passed to the
/// signer verbatim. On success the file on disk is byte-identical to the
/// original outside the signature block.
pub fn timestamp_file(
    signer_path: &Path,
    file_path: &Path,
    dialect: ScriptDialect,
    server_uri: &str,
    digest_algorithm: &str,
) -> TimestampResult<()> {
    let traits = dialect.traits();

    let file_bytes = fs::read(file_path).map_err(|source| TimestampError::FileReadFailure {
        path: file_path.to_path_buf(),
        source,
    })?;

    let mut parts = codec::deassemble(&file_bytes, traits)?;
    log::debug!(
        "deassembled {} as {:?}: {} container bytes, {} before, {} after",
        file_path.display(),
        parts.encoding,
        parts.container.len(),
        parts.bytes_before.len(),
        parts.bytes_after.len()
    );

    // The signer works on a file of its own; the path outlives the handle and
    // is deleted when `container_path` drops, on every exit path below.
    let container_path = tempfile::Builder::new()
        .prefix("script-timestamp-")
        .suffix(".p7")
        .tempfile()
        .map_err(|source| TimestampError::ContainerWriteFailure {
            path: std::env::temp_dir(),
            source,
        })?
        .into_temp_path();

    fs::write(&container_path, &parts.container).map_err(|source| {
        TimestampError::ContainerWriteFailure {
            path: container_path.to_path_buf(),
            source,
        }
    })?;

    signer::timestamp_container(signer_path, &container_path, server_uri, digest_algorithm)?;

    parts.container =
        fs::read(&container_path).map_err(|source| TimestampError::ContainerReadFailure {
            path: container_path.to_path_buf(),
            source,
        })?;

    let output_bytes = codec::reassemble(&parts, traits);
    fs::write(file_path, output_bytes).map_err(|source| TimestampError::FileWriteFailure {
        path: file_path.to_path_buf(),
        source,
    })?;

    log::info!("timestamped {}", file_path.display());
    Ok(())
}
