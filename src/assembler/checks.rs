use thiserror::Error;

use crate::assembler::symbols::SymbolTable;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CheckError {
    #[error("Label {label} at {address:#06X} is not aligned to {alignment} bytes")]
    Misaligned {
        label: String,
        address: u32,
        alignment: u32,
    },
    #[error("Label {label} at {address:#06X} is not at a permitted address")]
    ForbiddenAddress { label: String, address: u32 },
}

/// Constraint on a label's resolved address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// The address must be a multiple of the given value. Hardware
    /// descriptor tables require 16.
    Aligned(u32),
    /// The address must equal one of the listed values.
    OneOf(Vec<u32>),
}

/// A named post-pass assertion against the finished symbol table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanityRule {
    pub label: String,
    pub constraint: Constraint,
}

impl SanityRule {
    pub fn aligned(label: &str, alignment: u32) -> SanityRule {
        SanityRule {
            label: label.to_string(),
            constraint: Constraint::Aligned(alignment),
        }
    }

    pub fn one_of(label: &str, addresses: Vec<u32>) -> SanityRule {
        SanityRule {
            label: label.to_string(),
            constraint: Constraint::OneOf(addresses),
        }
    }
}

/// Verify every rule whose label is present in the table.
///
/// Rules naming absent labels are skipped. These checks run after the
/// output has been written; a violation flags the already-emitted file as
/// invalid through the process exit code.
#[tracing::instrument(skip(symbol_table))]
pub fn verify(symbol_table: &SymbolTable, rules: &[SanityRule]) -> Result<(), CheckError> {
    for rule in rules {
        let symbol = match symbol_table.find_symbol(&rule.label) {
            Some(symbol) => symbol,
            None => continue,
        };
        match &rule.constraint {
            Constraint::Aligned(alignment) => {
                if symbol.address % alignment != 0 {
                    return Err(CheckError::Misaligned {
                        label: symbol.name.clone(),
                        address: symbol.address,
                        alignment: *alignment,
                    });
                }
            }
            Constraint::OneOf(addresses) => {
                if !addresses.contains(&symbol.address) {
                    return Err(CheckError::ForbiddenAddress {
                        label: symbol.name.clone(),
                        address: symbol.address,
                    });
                }
            }
        }
    }

    Ok(())
}
