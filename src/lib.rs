//! # script-timestamp
//!
//! Re-timestamp the Authenticode signature block embedded in signed
//! PowerShell and VBScript files.
//!
//! ## Signature block format
//!
//! A signed script carries its DER-encoded PKCS#7 signature as a
//! comment-quoted, line-wrapped Base64 block at the end of the file:
//!
//! ```text
//! Write-Host 'hello'
//! # SIG # Begin signature block
//! # SIG # MIIFuQYJKoZIhvcNAQcCoIIFqjCCBaYCAQExCzAJBgUrDgMCGgUAMGkGCisGAQQB
//! # SIG # gjcCAQSgWzBZMDQGCisGAQQBgjcCAR4wJgIDAQAABBAfzDtgWUsITrck0sYpfvNR
//! # SIG # End signature block
//! ```
//!
//! VBScript uses `''` as the comment marker and a narrower wrap width; both
//! dialects always terminate lines with CRLF.
//!
//! ## Byte-exact round trip
//!
//! The codec splits the file into raw bytes before the block, the decoded
//! container, and raw bytes after the block. Only the block itself is ever
//! decoded or re-encoded, so BOMs, the script's own text encoding, and any
//! trailing content survive unchanged. Reassembling with an untouched
//! container reproduces the input byte-for-byte.
//!
//! ## Encoding handling
//!
//! Signed scripts are either one-byte text (ASCII/UTF-8) or UTF-16LE. A
//! leading `FF FE` BOM pins UTF-16LE; otherwise the block is searched as
//! one-byte text first, then once more as UTF-16LE without BOM.
//!
//! ## Timestamping
//!
//! The cryptographic work is delegated to an external signtool-compatible
//! executable: the container is extracted to a temporary `.p7` file, the
//! signer mutates it in place, and the script is reassembled around the
//! result.

pub mod codec;
pub mod dialect;
pub mod error;
pub mod signer;
pub mod timestamp;

pub use codec::{deassemble, reassemble, DeassembledFile, TextEncoding};
pub use dialect::{ScriptDialect, SignatureTraits, POWERSHELL, VBSCRIPT};
pub use error::{TimestampError, TimestampResult};
pub use signer::SignerOutput;
pub use timestamp::timestamp_file;
