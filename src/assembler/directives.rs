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

//! Directive handling: origin, data lists, labels and assignments.
//!
//! Directives need their operands right away. Nothing here is deferred.

use super::emit::EmitHelpers;
use super::memory::MAX_ADDRESS;
use super::symbol_table::DuplicateSymbol;
use super::Assembler;
use crate::ast::{Directive, DirectiveKind};
use crate::error::{AsmError, ErrorCode, Location};

/// Element size of a data directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataWidth {
    /// `.BYTE`
    Byte,
    /// `.WORD`, little-endian.
    Word,
    /// `.DBYTE`, big-endian.
    DoubleByte,
}

impl DataWidth {
    /// Largest value an element can hold.
    pub fn max_value(&self) -> u32 {
        match self {
            DataWidth::Byte => 0xFF,
            DataWidth::Word | DataWidth::DoubleByte => 0xFFFF,
        }
    }
}

/// Extension trait for directive handling.
pub trait DirectiveHandler {
    /// Handle a directive, consuming the line's expressions.
    fn handle_directive(&mut self, directive: &Directive);

    /// Move the program counter.
    fn set_origin(&mut self, directive: &Directive);

    /// Emit every expression of the line as data.
    fn emit_data(&mut self, width: DataWidth);

    /// Define a symbol, reporting a redefinition.
    fn define_symbol(&mut self, name: &str, value: u32, location: Location);
}

impl DirectiveHandler for Assembler {
    fn handle_directive(&mut self, directive: &Directive) {
        match &directive.kind {
            DirectiveKind::Org(_) => self.set_origin(directive),
            DirectiveKind::Byte(_) => self.emit_data(DataWidth::Byte),
            DirectiveKind::Word(_) => self.emit_data(DataWidth::Word),
            DirectiveKind::Dbyte(_) => self.emit_data(DataWidth::DoubleByte),
            DirectiveKind::Assign { name, .. } => {
                let Some(value) = self.expressions.pop() else {
                    self.internal_error(format!("No value for symbol \"{}\"", name), directive.loc);
                    return;
                };

                match value.evaluate(&self.symbols) {
                    Ok(Some(resolved)) => self.define_symbol(name, resolved, directive.loc),
                    Ok(None) => self.errors.push(
                        AsmError::new(
                            ErrorCode::MissingSymbol,
                            format!("Symbol or expression \"{}\" could not be resolved.", value),
                            directive.loc,
                        )
                        .with_hint("assignments may only use symbols defined above them"),
                    ),
                    Err(err) => self.arithmetic_error(err),
                }
            }
        }
    }

    fn set_origin(&mut self, directive: &Directive) {
        let Some(origin) = self.expressions.pop() else {
            self.internal_error("No address for .ORG", directive.loc);
            return;
        };

        match origin.evaluate(&self.symbols) {
            Ok(Some(address)) if address > MAX_ADDRESS => self.errors.push(
                AsmError::new(
                    ErrorCode::ValueOutOfRange,
                    format!(
                        "Value \"{}\" is out of its supported value range: [0,{}].",
                        address, MAX_ADDRESS
                    ),
                    origin.location,
                )
                .with_hint(".ORG takes a 16-bit address"),
            ),
            Ok(Some(address)) => {
                tracing::trace!(address = format!("${:04x}", address), "origin");
                self.current_address = address;
                self.line_start = Some(address);
            }
            Ok(None) => tracing::warn!(
                line = directive.loc.line,
                origin = %origin,
                "ignoring .ORG with unresolved address"
            ),
            Err(err) => self.arithmetic_error(err),
        }
    }

    fn emit_data(&mut self, width: DataWidth) {
        let items: Vec<_> = self.expressions.drain(..).collect();
        let max = width.max_value();

        for item in items {
            match item.evaluate(&self.symbols) {
                Ok(Some(value)) if value > max => self.errors.push(AsmError::new(
                    ErrorCode::ValueOutOfRange,
                    format!(
                        "Value \"{}\" is out of its supported value range: [0,{}].",
                        value, max
                    ),
                    item.location,
                )),
                Ok(Some(value)) => match width {
                    DataWidth::Byte => self.emit_byte(value as u8),
                    DataWidth::Word => self.emit_word_le(value as u16),
                    DataWidth::DoubleByte => self.emit_word_be(value as u16),
                },
                Ok(None) => tracing::warn!(
                    line = item.location.line,
                    item = %item,
                    "skipping unresolved data item"
                ),
                Err(err) => self.arithmetic_error(err),
            }
        }
    }

    fn define_symbol(&mut self, name: &str, value: u32, location: Location) {
        if let Err(DuplicateSymbol { previous }) =
            self.symbols
                .define(name, location.line, location.column, value)
        {
            let message = format!(
                "Redefinition of Symbol \"{}\" detected. See previous definition at {}:{}:{}",
                name, self.file, previous.line, previous.column
            );
            self.errors
                .push(AsmError::new(ErrorCode::DuplicateSymbol, message, location));
        }
    }
}
