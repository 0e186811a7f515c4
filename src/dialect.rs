//! Signature block dialects
//!
//! Authenticode embeds its signature in a script file as a comment-quoted,
//! Base64-wrapped block. The delimiter strings and the wrap width depend only
//! on the scripting dialect's comment syntax; the codec itself is identical
//! for every dialect.

/// Literal strings and wrap width for one scripting dialect.
///
/// All fields are exact contracts: the begin/end sequences carry their own
/// surrounding CRLFs, and the line prefix includes its trailing space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureTraits {
    /// Code point sequence found immediately before every signature block
    pub begin_sequence: &'static str,
    /// Code point sequence found immediately after every signature block
    pub end_sequence: &'static str,
    /// Code point sequence at the beginning of each signature line
    pub line_beginning: &'static str,
    /// Line terminator between signature lines (always CRLF in practice)
    pub line_ending: &'static str,
    /// Number of Base64 characters on each full signature line
    pub chars_per_line: usize,
}

/// PowerShell `.ps1` signature block traits.
pub const POWERSHELL: SignatureTraits = SignatureTraits {
    begin_sequence: "\r\n# SIG # Begin signature block\r\n",
    end_sequence: "\r\n# SIG # End signature block\r\n",
    line_beginning: "# SIG # ",
    line_ending: "\r\n",
    chars_per_line: 64,
};

/// VBScript `.vbs` signature block traits.
pub const VBSCRIPT: SignatureTraits = SignatureTraits {
    begin_sequence: "\r\n'' SIG '' Begin signature block\r\n",
    end_sequence: "\r\n'' SIG '' End signature block\r\n",
    line_beginning: "'' SIG '' ",
    line_ending: "\r\n",
    chars_per_line: 44,
};

/// Supported scripting dialects.
///
/// Selects one of the [`SignatureTraits`] constants; the codec never branches
/// on the dialect beyond reading these values. Adding a dialect means adding
/// a variant and a constant here, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptDialect {
    PowerShell,
    VbScript,
}

impl ScriptDialect {
    /// Look up the trait table entry for this dialect
    pub fn traits(self) -> &'static SignatureTraits {
        match self {
            ScriptDialect::PowerShell => &POWERSHELL,
            ScriptDialect::VbScript => &VBSCRIPT,
        }
    }
}

impl std::fmt::Display for ScriptDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptDialect::PowerShell => write!(f, "powershell"),
            ScriptDialect::VbScript => write!(f, "vbscript"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traits_lookup() {
        assert_eq!(ScriptDialect::PowerShell.traits(), &POWERSHELL);
        assert_eq!(ScriptDialect::VbScript.traits(), &VBSCRIPT);
    }

    #[test]
    fn test_traits_invariants() {
        for traits in [&POWERSHELL, &VBSCRIPT] {
            assert!(!traits.line_ending.is_empty());
            assert!(traits.chars_per_line > 0);
            // Every line of the block body must start with the line prefix,
            // including the first line after the begin marker.
            assert!(traits.begin_sequence.ends_with(traits.line_ending));
            assert!(traits.end_sequence.starts_with(traits.line_ending));
        }
    }

    #[test]
    fn test_powershell_literals() {
        assert_eq!(POWERSHELL.line_beginning, "# SIG # ");
        assert_eq!(POWERSHELL.chars_per_line, 64);
    }

    #[test]
    fn test_vbscript_literals() {
        assert_eq!(VBSCRIPT.line_beginning, "'' SIG '' ");
        assert_eq!(VBSCRIPT.chars_per_line, 44);
    }
}
