use std::ops::Range;

/// Reference operator kinds.
///
/// Each operator selects how the referenced label's address is encoded in
/// the output: absolute or relative to the reference site, in 8, 16 or 32
/// bits. The operator determines the encoded width regardless of how long
/// the identifier is in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ReferenceKind {
    /// `&name` - absolute address, four bytes little-endian
    #[strum(to_string = "&")]
    Absolute32,
    /// `$name` - low 16 bits of the absolute address, two bytes little-endian
    #[strum(to_string = "$")]
    Absolute16,
    /// `!name` - one-byte displacement from the reference site
    #[strum(to_string = "!")]
    Relative8,
    /// `@name` - two-byte displacement, little-endian
    #[strum(to_string = "@")]
    Relative16,
    /// `%name` - four-byte displacement, little-endian
    #[strum(to_string = "%")]
    Relative32,
}

impl ReferenceKind {
    pub fn from_sigil(ch: char) -> Option<ReferenceKind> {
        match ch {
            '&' => Some(ReferenceKind::Absolute32),
            '$' => Some(ReferenceKind::Absolute16),
            '!' => Some(ReferenceKind::Relative8),
            '@' => Some(ReferenceKind::Relative16),
            '%' => Some(ReferenceKind::Relative32),
            _ => None,
        }
    }

    /// Number of bytes the encoded operand occupies in the output.
    pub fn byte_width(&self) -> u32 {
        match self {
            ReferenceKind::Absolute32 | ReferenceKind::Relative32 => 4,
            ReferenceKind::Absolute16 | ReferenceKind::Relative16 => 2,
            ReferenceKind::Relative8 => 1,
        }
    }

}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Two-character byte literal contributing one output byte.
    Pair,
    /// Reference operator followed by its identifier.
    Reference { kind: ReferenceKind, label: String },
}

/// A token of a content line.
///
/// `span` is the character range the token occupies in the original line,
/// used by the rewriter to splice in replacements without disturbing the
/// surrounding text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

impl Token {
    pub fn byte_width(&self) -> u32 {
        match &self.kind {
            TokenKind::Pair => 1,
            TokenKind::Reference { kind, .. } => kind.byte_width(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn test_byte_widths() {
        let tests = vec![('&', 4), ('$', 2), ('!', 1), ('@', 2), ('%', 4)];
        for (sigil, expected) in tests {
            let kind = ReferenceKind::from_sigil(sigil).unwrap();
            assert_eq!(kind.byte_width(), expected);
        }
    }

    #[test]
    fn test_sigil_display() {
        let tests = vec![
            (ReferenceKind::Absolute32, "&"),
            (ReferenceKind::Absolute16, "$"),
            (ReferenceKind::Relative8, "!"),
            (ReferenceKind::Relative16, "@"),
            (ReferenceKind::Relative32, "%"),
        ];
        for (kind, expected) in tests {
            assert_eq!(kind.to_string(), expected);
        }
    }

    #[test]
    fn test_non_sigil() {
        assert_eq!(ReferenceKind::from_sigil('A'), None);
        assert_eq!(ReferenceKind::from_sigil('#'), None);
        assert_eq!(ReferenceKind::from_sigil(';'), None);
    }
}
