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

//! Instruction encoding.
//!
//! Operands are evaluated as soon as the instruction is seen. Known values
//! are written directly, picking the zero-page opcode when one exists and
//! the value fits into a byte. Unknown values reserve the full width and
//! are patched after the walk; such sites never get the zero-page form.

use super::emit::EmitHelpers;
use super::expression::Expression;
use super::opcodes::{self, OpcodePair};
use super::resolve::{BranchPatch, DeferredPatch};
use super::Assembler;
use crate::ast::{AddressingMode, Statement};
use crate::error::Location;

/// Extension trait for instruction encoding.
pub trait InstructionEncoder {
    /// Encode one instruction, consuming its operand expression.
    fn encode_statement(&mut self, statement: &Statement);

    /// Encode a relative branch. The offset is always resolved later.
    fn encode_branch(&mut self, opcode: u8, statement: &Statement);

    /// Encode an instruction whose operand is always one byte.
    fn encode_byte_operand(&mut self, opcode: u8, statement: &Statement);

    /// Encode an instruction with a zero-page and a two-byte address form.
    fn encode_address_operand(&mut self, pair: OpcodePair, statement: &Statement);

    /// Register a deferred operand.
    fn defer(&mut self, opcode: u8, width: u32, expression: Expression, location: Location);
}

impl InstructionEncoder for Assembler {
    fn encode_statement(&mut self, statement: &Statement) {
        let pair = opcodes::opcodes_for(&statement.mnemonic, statement.mode);
        if pair.is_empty() {
            self.internal_error(
                format!(
                    "No opcode for {} in {} addressing",
                    statement.mnemonic,
                    statement.mode.description()
                ),
                statement.loc,
            );
            return;
        }

        match statement.mode {
            AddressingMode::Implied => {
                if let Some(opcode) = pair.full {
                    self.emit_byte(opcode);
                }
            }
            AddressingMode::Relative => {
                if let Some(opcode) = pair.full {
                    self.encode_branch(opcode, statement);
                }
            }
            AddressingMode::Immediate
            | AddressingMode::IndexedIndirect
            | AddressingMode::IndirectIndexed => {
                if let Some(opcode) = pair.full {
                    self.encode_byte_operand(opcode, statement);
                }
            }
            AddressingMode::IndexedX
            | AddressingMode::IndexedY
            | AddressingMode::Absolute
            | AddressingMode::Indirect => self.encode_address_operand(pair, statement),
        }
    }

    fn encode_branch(&mut self, opcode: u8, statement: &Statement) {
        let Some(target) = self.pop_operand(statement) else {
            return;
        };

        self.emit_byte(opcode);
        let address = self.reserve(1);
        tracing::debug!(
            mnemonic = %statement.mnemonic,
            target = %target,
            address = format!("${:04x}", address),
            "registered branch"
        );
        self.branches.push(BranchPatch { address, target });
    }

    fn encode_byte_operand(&mut self, opcode: u8, statement: &Statement) {
        let Some(operand) = self.pop_operand(statement) else {
            return;
        };

        match operand.evaluate(&self.symbols) {
            Ok(Some(value)) => {
                if value > 0xFF {
                    self.operand_too_large(&operand, value, 0xFF, statement.loc);
                }
                self.emit_byte(opcode);
                self.emit_byte((value & 0xFF) as u8);
            }
            Ok(None) => self.defer(opcode, 2, operand, statement.loc),
            Err(err) => {
                self.arithmetic_error(err);
                self.reserve(2);
            }
        }
    }

    fn encode_address_operand(&mut self, pair: OpcodePair, statement: &Statement) {
        let Some(operand) = self.pop_operand(statement) else {
            return;
        };

        match operand.evaluate(&self.symbols) {
            Ok(Some(value)) => match (pair.zero_page, pair.full) {
                (Some(zero_page), _) if value <= 0xFF => {
                    self.emit_byte(zero_page);
                    self.emit_byte(value as u8);
                }
                (_, Some(full)) => {
                    if value > 0xFFFF {
                        self.operand_too_large(&operand, value, 0xFFFF, statement.loc);
                        self.reserve(3);
                    } else {
                        self.emit_byte(full);
                        self.emit_word_le(value as u16);
                    }
                }
                (Some(_), None) => {
                    self.operand_too_large(&operand, value, 0xFF, statement.loc);
                    self.reserve(2);
                }
                (None, None) => self.internal_error(
                    format!("No opcode for {}", statement.mnemonic),
                    statement.loc,
                ),
            },
            Ok(None) => match (pair.full, pair.zero_page) {
                (Some(full), _) => self.defer(full, 3, operand, statement.loc),
                (None, Some(zero_page)) => self.defer(zero_page, 2, operand, statement.loc),
                (None, None) => self.internal_error(
                    format!("No opcode for {}", statement.mnemonic),
                    statement.loc,
                ),
            },
            Err(err) => {
                self.arithmetic_error(err);
                self.reserve(if pair.full.is_some() { 3 } else { 2 });
            }
        }
    }

    fn defer(&mut self, opcode: u8, width: u32, expression: Expression, location: Location) {
        let address = self.reserve(width);
        tracing::debug!(
            operand = %expression,
            width,
            address = format!("${:04x}", address),
            "deferred operand"
        );
        self.deferred.push(DeferredPatch {
            opcode,
            width,
            expression,
            address,
            location,
        });
    }
}
