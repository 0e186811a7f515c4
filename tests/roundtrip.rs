//! Round-trip tests against realistic signed script files on disk.

use script_timestamp::{deassemble, reassemble, DeassembledFile, ScriptDialect, TextEncoding};
use std::fs;

/// A PowerShell file as Set-AuthenticodeSignature writes it: CRLF text
/// followed by a 64-characters-per-line signature block.
fn signed_powershell_file(container: &[u8]) -> Vec<u8> {
    let parts = DeassembledFile {
        encoding: TextEncoding::SingleByte,
        bytes_before: b"param($Name)\r\nWrite-Host \"Hello, $Name\"\r\n".to_vec(),
        container: container.to_vec(),
        bytes_after: Vec::new(),
    };
    reassemble(&parts, ScriptDialect::PowerShell.traits())
}

#[test]
fn roundtrip_through_filesystem() {
    let container: Vec<u8> = (0u8..=255).cycle().take(1800).collect();
    let original = signed_powershell_file(&container);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.ps1");
    fs::write(&path, &original).unwrap();

    let traits = ScriptDialect::PowerShell.traits();
    let parts = deassemble(&fs::read(&path).unwrap(), traits).unwrap();
    assert_eq!(parts.container, container);

    fs::write(&path, reassemble(&parts, traits)).unwrap();
    assert_eq!(fs::read(&path).unwrap(), original);
}

#[test]
fn roundtrip_utf16le_file_with_bom() {
    // Same script, saved as UTF-16LE with BOM the way PowerShell ISE does.
    let container = vec![0x30u8, 0x82, 0x05, 0xA6, 1, 2, 3, 4];
    let text = String::from_utf8(signed_powershell_file(&container)).unwrap();

    let mut original = vec![0xFF, 0xFE];
    original.extend(text.encode_utf16().flat_map(u16::to_le_bytes));

    let traits = ScriptDialect::PowerShell.traits();
    let parts = deassemble(&original, traits).unwrap();
    assert_eq!(parts.encoding, TextEncoding::Utf16Le);
    assert_eq!(parts.container, container);
    assert_eq!(reassemble(&parts, traits), original);
}

#[test]
fn container_replacement_rewraps_lines() {
    let original = signed_powershell_file(&[0x11; 30]);
    let traits = ScriptDialect::PowerShell.traits();

    let mut parts = deassemble(&original, traits).unwrap();
    parts.container = vec![0x22; 3000];
    let rewritten = reassemble(&parts, traits);

    // 3000 bytes -> 4000 Base64 characters -> 63 lines of 64 plus one of 32.
    let text = String::from_utf8(rewritten.clone()).unwrap();
    let sig_lines: Vec<&str> = text
        .lines()
        .filter(|l| l.starts_with("# SIG # ") && !l.contains("signature block"))
        .collect();
    assert_eq!(sig_lines.len(), 63);
    assert!(sig_lines[..62].iter().all(|l| l.len() == "# SIG # ".len() + 64));
    assert_eq!(sig_lines[62].len(), "# SIG # ".len() + 32);

    let reparsed = deassemble(&rewritten, traits).unwrap();
    assert_eq!(reparsed.container, vec![0x22; 3000]);
    assert_eq!(reparsed.bytes_before, parts.bytes_before);
}

#[cfg(unix)]
mod with_noop_signer {
    //! The full timestamp operation, using `true` as the external signer.
    //! It exits 0 without touching the container file; a byte-identical echo
    //! is an accepted no-op, so the script must come back unchanged.

    use super::*;
    use script_timestamp::{timestamp_file, TimestampError};
    use std::path::Path;

    #[test]
    fn timestamp_file_with_echoing_signer_is_identity() {
        let original = signed_powershell_file(&[0xABu8; 256]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signed.ps1");
        fs::write(&path, &original).unwrap();

        timestamp_file(
            Path::new("true"),
            &path,
            ScriptDialect::PowerShell,
            "http://timestamp.example/rfc3161",
            "sha256",
        )
        .unwrap();

        assert_eq!(fs::read(&path).unwrap(), original);
    }

    #[test]
    fn timestamp_file_failing_signer_leaves_script_untouched() {
        let original = signed_powershell_file(&[0xCDu8; 64]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signed.ps1");
        fs::write(&path, &original).unwrap();

        let result = timestamp_file(
            Path::new("false"),
            &path,
            ScriptDialect::PowerShell,
            "http://timestamp.example/rfc3161",
            "sha256",
        );
        assert!(matches!(result, Err(TimestampError::SignerFailure { .. })));
        assert_eq!(fs::read(&path).unwrap(), original);
    }
}
