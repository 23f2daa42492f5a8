use crate::assembler::{
    lexer::{Line, SourceLine},
    symbols::{Symbol, SymbolError, SymbolTable},
};

/// First pass: bind every label definition to the running output address.
///
/// The address starts at `base_address` and advances by each content line's
/// byte width. A label takes the address of the first content byte that
/// follows its definition, so forward references resolve once the whole
/// input has been scanned.
#[tracing::instrument(skip(lines))]
pub fn index_labels(lines: &[SourceLine], base_address: u32) -> Result<SymbolTable, SymbolError> {
    let mut symbol_table = SymbolTable::new();
    let mut current_addr = base_address;

    for line in lines {
        match &line.line {
            Line::Label(name) => symbol_table.new_symbol(Symbol {
                name: name.clone(),
                address: current_addr,
            })?,
            Line::Content(_) => current_addr = current_addr.wrapping_add(line.byte_width()),
        }
    }

    Ok(symbol_table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::lexer::lex;

    use pretty_assertions::assert_eq;

    #[test]
    fn test_label_addresses() {
        let input = "\
:start
B8 00
:after_two
66 B8 &start
:end
";
        let symbol_table = index_labels(&lex(input), 0x7C00).unwrap();
        assert_eq!(symbol_table.symbols.len(), 3);
        assert_eq!(symbol_table.symbols[0].name, "start");
        assert_eq!(symbol_table.symbols[0].address, 0x7C00);
        assert_eq!(symbol_table.symbols[1].name, "after_two");
        assert_eq!(symbol_table.symbols[1].address, 0x7C02);
        // 2 bytes, then 2 pairs + a 4-byte reference
        assert_eq!(symbol_table.symbols[2].name, "end");
        assert_eq!(symbol_table.symbols[2].address, 0x7C08);
    }

    #[test]
    fn test_comments_contribute_nothing() {
        let input = "\
# leading comment
:first
AA BB ; two bytes
:second
";
        let symbol_table = index_labels(&lex(input), 0x0100).unwrap();
        assert_eq!(symbol_table.find_symbol("first").unwrap().address, 0x0100);
        assert_eq!(symbol_table.find_symbol("second").unwrap().address, 0x0102);
    }

    #[test]
    fn test_forward_reference_width() {
        // The reference advances the counter by its encoded width even
        // though `later` is not yet defined at that point.
        let input = "\
:early
@later
00
:later
";
        let symbol_table = index_labels(&lex(input), 0x0000).unwrap();
        assert_eq!(symbol_table.find_symbol("early").unwrap().address, 0x0000);
        assert_eq!(symbol_table.find_symbol("later").unwrap().address, 0x0003);
    }

    #[test]
    fn test_duplicate_label() {
        let input = "\
:twice
00
:twice
";
        assert_eq!(
            index_labels(&lex(input), 0x0000).unwrap_err(),
            SymbolError::LabelAlreadyDefined("twice".to_string())
        );
    }
}
