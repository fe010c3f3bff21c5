// Asm6502 - A cross-assembler for the MOS 6502 creating C64 binaries
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! The global symbol table.
//!
//! Labels and assignments share one flat namespace. A symbol is defined
//! once with its final value and never replaced.

use std::collections::BTreeMap;

use thiserror::Error;

/// A defined symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The symbol name.
    pub name: String,
    /// The symbol value.
    pub value: u32,
    /// Line of the definition (1-indexed).
    pub line: usize,
    /// Column of the definition (1-indexed).
    pub column: usize,
}

/// A second definition of an existing symbol was attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("symbol '{}' is already defined at {}:{}", .previous.name, .previous.line, .previous.column)]
pub struct DuplicateSymbol {
    /// The definition that stays in the table.
    pub previous: Symbol,
}

/// Symbol table mapping names to values.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: BTreeMap<String, Symbol>,
}

impl SymbolTable {
    /// Create a new empty symbol table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a symbol by name.
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Define a new symbol.
    ///
    /// Fails without touching the table if the name already exists.
    pub fn define(
        &mut self,
        name: &str,
        line: usize,
        column: usize,
        value: u32,
    ) -> Result<(), DuplicateSymbol> {
        if let Some(previous) = self.symbols.get(name) {
            return Err(DuplicateSymbol {
                previous: previous.clone(),
            });
        }

        tracing::debug!(symbol = name, value, line, "defined symbol");
        self.symbols.insert(
            name.to_string(),
            Symbol {
                name: name.to_string(),
                value,
                line,
                column,
            },
        );
        Ok(())
    }

    /// Iterate over all symbols, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    /// Get the number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_resolve() {
        let mut table = SymbolTable::new();
        table.define("start", 2, 1, 0x1000).unwrap();

        let symbol = table.resolve("start").unwrap();
        assert_eq!(symbol.value, 0x1000);
        assert_eq!((symbol.line, symbol.column), (2, 1));
        assert!(table.resolve("missing").is_none());
    }

    #[test]
    fn test_redefinition_is_rejected() {
        let mut table = SymbolTable::new();
        table.define("X", 1, 5, 1).unwrap();

        let err = table.define("X", 3, 5, 2).unwrap_err();
        assert_eq!(err.previous.line, 1);
        assert_eq!(err.previous.column, 5);
        assert_eq!(table.resolve("X").unwrap().value, 1);
        assert_eq!(err.to_string(), "symbol 'X' is already defined at 1:5");
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut table = SymbolTable::new();
        table.define("loop", 1, 1, 1).unwrap();
        assert!(table.define("LOOP", 2, 1, 2).is_ok());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_iter_is_sorted() {
        let mut table = SymbolTable::new();
        table.define("zeta", 1, 1, 1).unwrap();
        table.define("alpha", 2, 1, 2).unwrap();
        let names: Vec<_> = table.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
