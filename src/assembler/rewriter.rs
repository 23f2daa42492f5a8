use std::io::Write;

use thiserror::Error;

use crate::assembler::{
    encode::{little_endian16, little_endian32, wrap_displacement},
    lexer::{Line, ReferenceKind, SourceLine, Token, TokenKind},
    symbols::{SymbolError, SymbolTable},
};

/// How an encoded reference is fitted into the span of the token it
/// replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PaddingPolicy {
    /// Pad the encoding with trailing spaces up to the reference token's
    /// width, keeping the column layout of the line intact. Wider encodings
    /// still grow the line.
    #[default]
    Pad,
    /// Emit exactly the encoded text and let later columns shift.
    Trim,
}

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error(transparent)]
    Symbol(#[from] SymbolError),
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Second pass: rewrite references to encoded bytes and comment out label
/// definitions.
///
/// The rewriter keeps its own running address, seeded like the scanner's,
/// and a one-line flag that arms address annotation for the next label
/// definition whenever a `#-` line was just emitted.
pub struct Rewriter<'a> {
    symbol_table: &'a SymbolTable,
    padding: PaddingPolicy,
    strict: bool,
    current_address: u32,
    annotate_next_label: bool,
}

impl<'a> Rewriter<'a> {
    pub fn new(
        symbol_table: &'a SymbolTable,
        base_address: u32,
        padding: PaddingPolicy,
        strict: bool,
    ) -> Rewriter<'a> {
        Rewriter {
            symbol_table,
            padding,
            strict,
            current_address: base_address,
            annotate_next_label: false,
        }
    }

    /// Rewrite every line and emit the hex0 text to `out`.
    #[tracing::instrument(skip(self, lines, out))]
    pub fn rewrite<W: Write>(
        &mut self,
        lines: &[SourceLine],
        out: &mut W,
    ) -> Result<(), RewriteError> {
        for line in lines {
            match &line.line {
                Line::Label(name) => {
                    if self.annotate_next_label {
                        if let Some(symbol) = self.symbol_table.find_symbol(name) {
                            writeln!(out, "#[{:04X}]", symbol.address)?;
                        }
                    }
                    // Label definitions survive as comments so the output
                    // stays line-for-line traceable.
                    writeln!(out, "#{}", line.text)?;
                    self.annotate_next_label = false;
                }
                Line::Content(tokens) => {
                    let rewritten = self.rewrite_content(line, tokens)?;
                    self.current_address = self.current_address.wrapping_add(line.byte_width());
                    self.annotate_next_label = rewritten.starts_with("#-");
                    writeln!(out, "{}", rewritten)?;
                }
            }
        }
        Ok(())
    }

    /// Splice encoded replacements into one content line.
    ///
    /// The local address is advanced past each token before the token after
    /// it is examined, so a relative displacement is measured from the end
    /// of the reference's own encoded bytes.
    fn rewrite_content(&self, line: &SourceLine, tokens: &[Token]) -> Result<String, SymbolError> {
        let mut rewritten = String::with_capacity(line.text.len());
        let mut cursor = 0;
        let mut address = self.current_address;

        for token in tokens {
            match &token.kind {
                TokenKind::Pair => address = address.wrapping_add(1),
                TokenKind::Reference { kind, label } => {
                    address = address.wrapping_add(kind.byte_width());
                    let symbol = match self.symbol_table.find_symbol(label) {
                        Some(symbol) => symbol,
                        None => {
                            if self.strict {
                                return Err(SymbolError::UndefinedLabel(label.clone()));
                            }
                            // Left unrewritten for a downstream tool to
                            // reject; the width accounting above still
                            // matches the scanner's.
                            tracing::warn!(
                                line = line.number,
                                "undefined reference {}{} left as-is",
                                kind,
                                label
                            );
                            continue;
                        }
                    };
                    let encoded = encode_reference(*kind, symbol.address, address);
                    rewritten.push_str(&line.text[cursor..token.span.start]);
                    rewritten.push_str(&fit(&encoded, token.span.len(), self.padding));
                    cursor = token.span.end;
                }
            }
        }
        rewritten.push_str(&line.text[cursor..]);

        Ok(rewritten)
    }
}

/// Encode one reference given the label's address and the running address
/// just past the reference's own bytes.
fn encode_reference(kind: ReferenceKind, target: u32, reference_address: u32) -> String {
    let delta = i64::from(target) - i64::from(reference_address);
    match kind {
        ReferenceKind::Absolute32 => little_endian32(target),
        ReferenceKind::Absolute16 => little_endian16(target as u16),
        ReferenceKind::Relative8 => format!("{:02X}", wrap_displacement(delta, 8)),
        ReferenceKind::Relative16 => little_endian16(wrap_displacement(delta, 16) as u16),
        ReferenceKind::Relative32 => little_endian32(wrap_displacement(delta, 32) as u32),
    }
}

fn fit(encoded: &str, span_len: usize, policy: PaddingPolicy) -> String {
    match policy {
        PaddingPolicy::Pad => format!("{:<width$}", encoded, width = span_len),
        PaddingPolicy::Trim => encoded.to_string(),
    }
}
