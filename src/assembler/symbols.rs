use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SymbolError {
    #[error("Duplicate label definition: {0}")]
    LabelAlreadyDefined(String),
    #[error("Reference to undefined label: {0}")]
    UndefinedLabel(String),
}

/// A label bound to its resolved output address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Name of the label, without the `:` marker
    pub name: String,
    /// Absolute address of the first content byte after the definition
    pub address: u32,
}

/// The symbol table maps labels to addresses.
///
/// It is filled once by the scanner pass and read-only afterwards.
#[derive(Debug, Default)]
pub struct SymbolTable {
    pub symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable {
            symbols: Vec::new(),
        }
    }

    #[tracing::instrument]
    pub fn find_symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|symbol| symbol.name == name)
    }

    #[tracing::instrument]
    pub fn new_symbol(&mut self, symbol: Symbol) -> Result<(), SymbolError> {
        if self.find_symbol(&symbol.name).is_some() {
            return Err(SymbolError::LabelAlreadyDefined(symbol.name));
        }
        self.symbols.push(symbol);
        Ok(())
    }
}
