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

//! Directive and instruction nodes of the parse tree.

use super::Expr;
use crate::error::Location;

/// An assembler directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// The kind of directive.
    pub kind: DirectiveKind,
    /// Where the directive starts.
    pub loc: Location,
}

/// The kind of directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveKind {
    /// `.ORG expr` - move the program counter.
    Org(Expr),
    /// `.BYTE item, ...` - emit single bytes.
    Byte(Vec<DataItem>),
    /// `.WORD item, ...` - emit little-endian words.
    Word(Vec<DataItem>),
    /// `.DBYTE item, ...` - emit big-endian words.
    Dbyte(Vec<DataItem>),
    /// `NAME = expr` - define a symbol.
    Assign { name: String, value: Expr },
}

impl DirectiveKind {
    /// Get the directive name as written after the dot.
    pub fn name(&self) -> &'static str {
        match self {
            DirectiveKind::Org(_) => "ORG",
            DirectiveKind::Byte(_) => "BYTE",
            DirectiveKind::Word(_) => "WORD",
            DirectiveKind::Dbyte(_) => "DBYTE",
            DirectiveKind::Assign { .. } => "=",
        }
    }
}

/// One entry of a data directive list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataItem {
    /// An expression.
    Expr(Expr),
    /// A string literal, one value per character.
    Str { text: String, loc: Location },
}

/// The addressing mode of an instruction, as decided by its syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// No operand, or the accumulator (`ASL A`).
    Implied,
    /// `#expr`
    Immediate,
    /// Branch target.
    Relative,
    /// `expr,X`
    IndexedX,
    /// `expr,Y`
    IndexedY,
    /// `expr`
    Absolute,
    /// `[expr]`
    Indirect,
    /// `[expr,X]`
    IndexedIndirect,
    /// `[expr],Y`
    IndirectIndexed,
}

impl AddressingMode {
    /// Check if the mode takes an operand expression.
    pub fn has_operand(&self) -> bool {
        !matches!(self, AddressingMode::Implied)
    }

    /// Get a human-readable description of this mode.
    pub fn description(&self) -> &'static str {
        match self {
            AddressingMode::Implied => "implied",
            AddressingMode::Immediate => "immediate",
            AddressingMode::Relative => "relative",
            AddressingMode::IndexedX => "X-indexed",
            AddressingMode::IndexedY => "Y-indexed",
            AddressingMode::Absolute => "absolute",
            AddressingMode::Indirect => "indirect",
            AddressingMode::IndexedIndirect => "indexed-indirect",
            AddressingMode::IndirectIndexed => "indirect-indexed",
        }
    }
}

/// A machine instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Upper-case mnemonic.
    pub mnemonic: String,
    /// The addressing mode.
    pub mode: AddressingMode,
    /// The operand, absent for implied instructions.
    pub operand: Option<Expr>,
    /// Where the mnemonic starts.
    pub loc: Location,
}
