/// Transforms symbolic "hex2" source into loader-ready "hex0" text.
///
/// The steps are:
/// 1. **Lexing** - classifying lines and converting content into tokens
/// 2. **Scanning** - pass 1: binding labels to output addresses
/// 3. **Rewriting** - pass 2: substituting label references with their
///    encoded bytes and commenting out label definitions
pub mod assembler;
