use std::io::Write;

/// Classifies source lines and tokenizes their content.
///
/// Converts a line into typed tokens. For example, the line `EB !loop` is
/// converted into the following tokens:
///
/// ```text
/// [
///     Token { kind: TokenKind::Pair, span: 0..2 },
///     Token { kind: TokenKind::Reference { kind: ReferenceKind::Relative8,
///             label: "loop" }, span: 3..8 },
/// ]
/// ```
pub mod lexer;

/// Pass 1: binds labels to output addresses.
pub mod scanner;

/// Label to address mapping shared by both passes.
pub mod symbols;

/// Pass 2: rewrites references into encoded bytes.
pub mod rewriter;

/// Little-endian and wraparound displacement encoders.
pub mod encode;

/// Post-pass address assertions on well-known labels.
pub mod checks;

use self::{
    checks::SanityRule,
    rewriter::{PaddingPolicy, Rewriter},
};

#[derive(Debug, thiserror::Error)]
pub enum AssemblerError {
    #[error("Symbol error: {0}")]
    Symbol(#[from] symbols::SymbolError),
    #[error("Rewrite error: {0}")]
    Rewrite(#[from] rewriter::RewriteError),
    #[error("Sanity check failed: {0}")]
    Check(#[from] checks::CheckError),
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for one assembly run.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Address the loader places the first output byte at; seeds both
    /// address counters.
    pub base_address: u32,
    pub padding: PaddingPolicy,
    /// Fail on references to undefined labels instead of passing them
    /// through.
    pub strict: bool,
    pub rules: Vec<SanityRule>,
}

/// Utility function for translating a hex2 stream into hex0 text.
///
/// Output is written to `out` as it is produced. A duplicate label aborts
/// before anything is written; sanity rules run only after the final line
/// has been flushed, so a violated rule leaves the finished (but invalid)
/// output behind.
#[tracing::instrument(skip(input, out))]
pub fn assemble<W: Write>(
    input: &str,
    out: &mut W,
    options: &Options,
) -> Result<(), AssemblerError> {
    let lines = lexer::lex(input);
    let symbol_table = scanner::index_labels(&lines, options.base_address)?;

    let mut rewriter = Rewriter::new(
        &symbol_table,
        options.base_address,
        options.padding,
        options.strict,
    );
    rewriter.rewrite(&lines, out)?;
    out.flush()?;

    checks::verify(&symbol_table, &options.rules)?;

    Ok(())
}

/// Convenience wrapper returning the hex0 text as a string.
pub fn assemble_to_string(input: &str, options: &Options) -> Result<String, AssemblerError> {
    let mut out = Vec::new();
    assemble(input, &mut out, options)?;
    Ok(String::from_utf8(out).expect("output is valid UTF-8"))
}
