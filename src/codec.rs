//! Signature block codec
//!
//! Splits a signed script file into the raw bytes before the signature block,
//! the decoded PKCS#7 container, and the raw bytes after the block, and puts
//! the three parts back together byte-for-byte after the container has been
//! replaced.
//!
//! The codec only ever decodes the signature section itself. Everything
//! outside the begin/end sequences is carried as raw bytes, so byte order
//! marks, the script's own encoding, and any trailing content survive the
//! round trip untouched:
//!
//! ```text
//! <bytes before> CRLF <comment> SIG <comment> Begin signature block CRLF
//! <comment> SIG <comment> MIIFuQYJKoZIhvcNAQcCoIIFqjCCBaYCAQExCzAJBgUr CRLF
//! ...
//! CRLF <comment> SIG <comment> End signature block CRLF <bytes after>
//! ```

use crate::dialect::SignatureTraits;
use crate::error::{TimestampError, TimestampResult};
use base64::Engine;

/// Byte format of the signature block.
///
/// PowerShell and VBScript signatures always use CRLF line terminators, and
/// the block is encoded either in one-byte text (ASCII/UTF-8) or in UTF-16LE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// One byte per code unit (ASCII/UTF-8)
    SingleByte,
    /// Two bytes per code unit, little-endian
    Utf16Le,
}

impl TextEncoding {
    /// Byte length of one code unit; every byte-sequence search steps by this
    pub fn code_unit_len(self) -> usize {
        match self {
            TextEncoding::SingleByte => 1,
            TextEncoding::Utf16Le => 2,
        }
    }

    /// Encode a literal string into the byte pattern it has in this encoding
    pub fn encode_str(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::SingleByte => text.as_bytes().to_vec(),
            TextEncoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
        }
    }

    /// Decode raw bytes to text, replacing any ill-formed sequences
    pub fn decode_bytes(self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::SingleByte => String::from_utf8_lossy(bytes).into_owned(),
            TextEncoding::Utf16Le => {
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16_lossy(&units)
            }
        }
    }
}

/// A signed script file, deassembled around its signature block.
///
/// Created fresh from one file's raw bytes, mutated only by replacing
/// [`container`](Self::container), and consumed by [`reassemble`]. The two
/// raw byte sections are captured once and written back verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeassembledFile {
    /// Encoding detected during deassembly; reassembly reuses it as-is
    pub encoding: TextEncoding,
    /// Raw bytes before the begin sequence (may include a BOM)
    pub bytes_before: Vec<u8>,
    /// Decoded signature container, a DER-encoded PKCS#7 bundle. Opaque here;
    /// only the external signer interprets it.
    pub container: Vec<u8>,
    /// Raw bytes after the end sequence (observed empty, preserved regardless)
    pub bytes_after: Vec<u8>,
}

/// Find the first occurrence of `needle` in `haystack` at or after `start`,
/// looking only at offsets that are multiples of `stride` apart.
///
/// Brute-force scan; signed scripts are small, so no Boyer-Moore is needed.
pub fn find_sequence(haystack: &[u8], needle: &[u8], start: usize, stride: usize) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let mut position = start;
    while position + needle.len() <= haystack.len() {
        if &haystack[position..position + needle.len()] == needle {
            return Some(position);
        }
        position += stride;
    }
    None
}

/// Deassemble a signed script file into its three parts.
///
/// Detects the text encoding (BOM, then a one-shot UTF-16LE-without-BOM
/// retry), locates the dialect's begin/end sequences by raw byte search, and
/// decodes the comment-quoted, line-wrapped Base64 between them.
pub fn deassemble(file_bytes: &[u8], traits: &SignatureTraits) -> TimestampResult<DeassembledFile> {
    let mut encoding = TextEncoding::SingleByte;
    if file_bytes.len() >= 2 && file_bytes[0] == 0xFF && file_bytes[1] == 0xFE {
        // Byte order mark. The only possible encoding is UTF-16LE.
        encoding = TextEncoding::Utf16Le;
    }

    let mut begin_pattern = encoding.encode_str(traits.begin_sequence);
    let mut begin_match = find_sequence(file_bytes, &begin_pattern, 0, encoding.code_unit_len());

    if begin_match.is_none() && encoding == TextEncoding::SingleByte {
        // Maybe the script is UTF-16LE encoded but has no BOM. Retrying.
        log::warn!("signature block not found in one-byte encoding; retrying as UTF-16LE without BOM");
        encoding = TextEncoding::Utf16Le;
        begin_pattern = encoding.encode_str(traits.begin_sequence);
        begin_match = find_sequence(file_bytes, &begin_pattern, 0, encoding.code_unit_len());
    }

    let begin_offset = begin_match.ok_or(TimestampError::SignatureBlockNotFound)?;
    let section_start = begin_offset + begin_pattern.len();

    let end_pattern = encoding.encode_str(traits.end_sequence);
    let end_offset = find_sequence(
        file_bytes,
        &end_pattern,
        section_start,
        encoding.code_unit_len(),
    )
    .ok_or(TimestampError::SignatureBlockUnterminated)?;

    let section_text = encoding.decode_bytes(&file_bytes[section_start..end_offset]);
    let container = decode_signature_section(&section_text, traits)?;

    Ok(DeassembledFile {
        encoding,
        bytes_before: file_bytes[..begin_offset].to_vec(),
        container,
        bytes_after: file_bytes[end_offset + end_pattern.len()..].to_vec(),
    })
}

/// Strip the per-line comment quoting from the signature section and decode
/// the remaining Base64.
fn decode_signature_section(section: &str, traits: &SignatureTraits) -> TimestampResult<Vec<u8>> {
    let base64_text: String = section
        .split(traits.line_ending)
        .map(|line| line.strip_prefix(traits.line_beginning).unwrap_or(line))
        .collect::<String>()
        .chars()
        // Keep only the Base64 alphabet and padding; drops stray whitespace
        // and control characters left over from line wrapping.
        .filter(|c| c.is_ascii_alphanumeric() || *c == '/' || *c == '+' || *c == '=')
        .collect();

    base64::engine::general_purpose::STANDARD
        .decode(&base64_text)
        .map_err(TimestampError::SignatureBlockMalformed)
}

/// Reassemble file bytes from deassembled parts.
///
/// Re-encodes the container as wrapped Base64 using the dialect's literals
/// and the encoding recorded at deassembly time. Leaving the container
/// untouched reproduces the original file bytes exactly.
pub fn reassemble(parts: &DeassembledFile, traits: &SignatureTraits) -> Vec<u8> {
    let base64_text = base64::engine::general_purpose::STANDARD.encode(&parts.container);

    // Signature lines consist of the comment prefix plus up to
    // `chars_per_line` Base64 characters. Chunk boundaries are purely
    // positional; Base64 text is ASCII, so byte offsets are safe.
    let lines: Vec<String> = chunk_base64(&base64_text, traits.chars_per_line)
        .into_iter()
        .map(|chunk| format!("{}{}", traits.line_beginning, chunk))
        .collect();

    let block = format!(
        "{}{}{}",
        traits.begin_sequence,
        lines.join(traits.line_ending),
        traits.end_sequence
    );
    let block_bytes = parts.encoding.encode_str(&block);

    let mut output =
        Vec::with_capacity(parts.bytes_before.len() + block_bytes.len() + parts.bytes_after.len());
    output.extend_from_slice(&parts.bytes_before);
    output.extend_from_slice(&block_bytes);
    output.extend_from_slice(&parts.bytes_after);
    output
}

/// Split Base64 text into positional chunks of up to `chunk_size` characters
fn chunk_base64(text: &str, chunk_size: usize) -> Vec<&str> {
    let mut chunks = Vec::with_capacity(text.len().div_ceil(chunk_size));
    let mut offset = 0;
    while offset < text.len() {
        let end = usize::min(offset + chunk_size, text.len());
        chunks.push(&text[offset..end]);
        offset = end;
    }
    chunks
}
