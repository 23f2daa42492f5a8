pub use self::token::{ReferenceKind, Token, TokenKind};

pub mod token;

// Example source:
//
//   #- entry points
//   :start
//   FA F4          # cli, hlt
//   :loop
//   EB !loop       ; jmp loop
//   66 B8 &start
//
// ':' = label definition, e.g. `:my_label`
// '#' and ';' = comment until end of line
// '&' '$' '!' '@' '%' = label references, e.g. `&my_label`

/// A classified line of hex2 source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// `:name` - binds `name` to the running output address.
    Label(String),
    /// Byte pairs, references, comments and filler.
    Content(Vec<Token>),
}

/// A source line together with its original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub text: String,
    /// 1-based line number in the input.
    pub number: usize,
    pub line: Line,
}

impl SourceLine {
    /// Number of output bytes this line contributes. Label definitions
    /// contribute none.
    ///
    /// Both passes advance their running address with this value, so the
    /// scanner and the rewriter always agree on per-line deltas.
    pub fn byte_width(&self) -> u32 {
        match &self.line {
            Line::Label(_) => 0,
            Line::Content(tokens) => tokens.iter().map(Token::byte_width).sum(),
        }
    }
}

/// Lex the whole input into classified lines.
#[tracing::instrument(skip(input))]
pub fn lex(input: &str) -> Vec<SourceLine> {
    input
        .lines()
        .enumerate()
        .map(|(ix, text)| SourceLine {
            text: text.to_string(),
            number: ix + 1,
            line: lex_line(text),
        })
        .collect()
}

fn lex_line(text: &str) -> Line {
    if let Some(name) = text.strip_prefix(':') {
        Line::Label(name.trim().to_string())
    } else {
        Line::Content(tokenize(text))
    }
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Tokenize one content line.
///
/// Scanning stops at the first `#` or `;`. A byte literal is always read as
/// a two-character pair; a reference sigil consumes the maximal run of
/// identifier characters after it. Anything else (whitespace, punctuation)
/// is skipped and contributes no bytes.
fn tokenize(text: &str) -> Vec<Token> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut tokens = Vec::new();
    let mut ix = 0;

    while ix < chars.len() {
        let (start, ch) = chars[ix];

        if ch == '#' || ch == ';' {
            break;
        }

        if ch.is_alphanumeric() {
            ix += 2;
            let end = chars.get(ix).map_or(text.len(), |&(pos, _)| pos);
            tokens.push(Token {
                kind: TokenKind::Pair,
                span: start..end,
            });
            continue;
        }

        if let Some(kind) = ReferenceKind::from_sigil(ch) {
            ix += 1;
            let ident_start = ix;
            while ix < chars.len() && is_identifier_char(chars[ix].1) {
                ix += 1;
            }
            let end = chars.get(ix).map_or(text.len(), |&(pos, _)| pos);
            let label: String = chars[ident_start..ix].iter().map(|&(_, c)| c).collect();
            tokens.push(Token {
                kind: TokenKind::Reference { kind, label },
                span: start..end,
            });
            continue;
        }

        ix += 1;
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn test_label_line() {
        let tests = vec![
            (":start", "start"),
            (":loop ", "loop"),
            (": spaced", "spaced"),
            (":", ""),
        ];
        for (input, expected) in tests {
            assert_eq!(lex_line(input), Line::Label(expected.to_string()));
        }
    }

    #[test]
    fn test_byte_pairs() {
        let line = lex_line("B8 00 90");
        assert_eq!(
            line,
            Line::Content(vec![
                Token {
                    kind: TokenKind::Pair,
                    span: 0..2,
                },
                Token {
                    kind: TokenKind::Pair,
                    span: 3..5,
                },
                Token {
                    kind: TokenKind::Pair,
                    span: 6..8,
                },
            ])
        );
    }

    #[test]
    fn test_reference_tokens() {
        let tests = vec![
            ("&start", ReferenceKind::Absolute32, "start"),
            ("$start", ReferenceKind::Absolute16, "start"),
            ("!back", ReferenceKind::Relative8, "back"),
            ("@back", ReferenceKind::Relative16, "back"),
            ("%far_away_1", ReferenceKind::Relative32, "far_away_1"),
        ];
        for (input, kind, label) in tests {
            assert_eq!(
                lex_line(input),
                Line::Content(vec![Token {
                    kind: TokenKind::Reference {
                        kind,
                        label: label.to_string(),
                    },
                    span: 0..input.len(),
                }])
            );
        }
    }

    #[test]
    fn test_comment_terminates_scan() {
        let tests = vec![
            ("# only a comment", 0),
            ("B8 00 # trailing bytes FF FF", 2),
            ("EB ; &ref in comment", 1),
            ("#- directive", 0),
        ];
        for (input, expected_tokens) in tests {
            match lex_line(input) {
                Line::Content(tokens) => assert_eq!(tokens.len(), expected_tokens),
                line => panic!("expected content line, got {:?}", line),
            }
        }
    }

    #[test]
    fn test_byte_width() {
        let tests = vec![
            ("B8 00 90", 3),
            ("&start", 4),
            ("$start", 2),
            ("!back", 1),
            ("@back", 2),
            ("%back", 4),
            ("66 B8 &start", 6),
            ("# comment only", 0),
            ("", 0),
            (":label", 0),
            // A lone trailing character still reads as a pair.
            ("B8 0", 2),
        ];
        for (input, expected) in tests {
            let line = SourceLine {
                text: input.to_string(),
                number: 1,
                line: lex_line(input),
            };
            assert_eq!(line.byte_width(), expected, "width of {:?}", input);
        }
    }

    #[test]
    fn test_lex_line_numbers() {
        let lines = lex(":start\nB8 00\n&start\n");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[0].line, Line::Label("start".to_string()));
        assert_eq!(lines[1].number, 2);
        assert_eq!(lines[2].number, 3);
    }
}
