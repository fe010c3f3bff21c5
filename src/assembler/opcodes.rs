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

//! MOS 6502 opcode tables.
//!
//! One table per addressing-mode category, mapping the upper-case mnemonic
//! to its opcode byte. Categories with a zero-page variant have a second
//! table holding the one-byte-address opcodes.

use crate::ast::AddressingMode;

/// A mnemonic to opcode table.
pub type OpcodeTable = &'static [(&'static str, u8)];

/// Implied and accumulator instructions.
pub const IMPLIED: OpcodeTable = &[
    ("BRK", 0x00), ("PHP", 0x08), ("ASL", 0x0A), ("CLC", 0x18), ("PLP", 0x28), ("ROL", 0x2A),
    ("SEC", 0x38), ("RTI", 0x40), ("PHA", 0x48), ("LSR", 0x4A), ("CLI", 0x58), ("RTS", 0x60),
    ("PLA", 0x68), ("ROR", 0x6A), ("SEI", 0x78), ("DEY", 0x88), ("TXA", 0x8A), ("TYA", 0x98),
    ("TXS", 0x9A), ("TAY", 0xA8), ("TAX", 0xAA), ("CLV", 0xB8), ("TSX", 0xBA), ("INY", 0xC8),
    ("DEX", 0xCA), ("CLD", 0xD8), ("INX", 0xE8), ("NOP", 0xEA), ("SED", 0xF8),
];

/// Immediate (`#expr`) instructions.
pub const IMMEDIATE: OpcodeTable = &[
    ("ORA", 0x09), ("AND", 0x29), ("EOR", 0x49), ("ADC", 0x69), ("LDY", 0xA0), ("LDX", 0xA2),
    ("LDA", 0xA9), ("CPY", 0xC0), ("CMP", 0xC9), ("CPX", 0xE0), ("SBC", 0xE9),
];

/// Relative branches.
pub const RELATIVE: OpcodeTable = &[
    ("BPL", 0x10), ("BMI", 0x30), ("BVC", 0x50), ("BVS", 0x70), ("BCC", 0x90), ("BCS", 0xB0),
    ("BNE", 0xD0), ("BEQ", 0xF0),
];

/// Absolute,X instructions.
pub const INDEXED_X: OpcodeTable = &[
    ("ORA", 0x1D), ("ASL", 0x1E), ("AND", 0x3D), ("ROL", 0x3E), ("EOR", 0x5D), ("LSR", 0x5E),
    ("ADC", 0x7D), ("ROR", 0x7E), ("STA", 0x9D), ("LDY", 0xBC), ("LDA", 0xBD), ("CMP", 0xDD),
    ("DEC", 0xDE), ("SBC", 0xFD), ("INC", 0xFE),
];

/// Zero page,X instructions.
pub const INDEXED_X_ZERO_PAGE: OpcodeTable = &[
    ("ORA", 0x15), ("ASL", 0x16), ("AND", 0x35), ("ROL", 0x36), ("EOR", 0x55), ("LSR", 0x56),
    ("ADC", 0x75), ("ROR", 0x76), ("STY", 0x94), ("STA", 0x95), ("LDY", 0xB4), ("LDA", 0xB5),
    ("CMP", 0xD5), ("DEC", 0xD6), ("SBC", 0xF5), ("INC", 0xF6),
];

/// Absolute,Y instructions.
pub const INDEXED_Y: OpcodeTable = &[
    ("ORA", 0x19), ("AND", 0x39), ("EOR", 0x59), ("ADC", 0x79), ("STA", 0x99), ("LDA", 0xB9),
    ("LDX", 0xBE), ("CMP", 0xD9), ("SBC", 0xF9),
];

/// Zero page,Y instructions.
pub const INDEXED_Y_ZERO_PAGE: OpcodeTable = &[("STX", 0x96), ("LDX", 0xB6)];

/// Absolute instructions.
pub const ABSOLUTE: OpcodeTable = &[
    ("ORA", 0x0D), ("ASL", 0x0E), ("JSR", 0x20), ("BIT", 0x2C), ("AND", 0x2D), ("ROL", 0x2E),
    ("JMP", 0x4C), ("EOR", 0x4D), ("LSR", 0x4E), ("ADC", 0x6D), ("ROR", 0x6E), ("STY", 0x8C),
    ("STA", 0x8D), ("STX", 0x8E), ("LDY", 0xAC), ("LDA", 0xAD), ("LDX", 0xAE), ("CPY", 0xCC),
    ("CMP", 0xCD), ("DEC", 0xCE), ("CPX", 0xEC), ("SBC", 0xED), ("INC", 0xEE),
];

/// Zero page instructions.
pub const ABSOLUTE_ZERO_PAGE: OpcodeTable = &[
    ("ORA", 0x05), ("ASL", 0x06), ("BIT", 0x24), ("AND", 0x25), ("ROL", 0x26), ("EOR", 0x45),
    ("LSR", 0x46), ("ADC", 0x65), ("ROR", 0x66), ("STY", 0x84), ("STA", 0x85), ("STX", 0x86),
    ("LDY", 0xA4), ("LDA", 0xA5), ("LDX", 0xA6), ("CPY", 0xC4), ("CMP", 0xC5), ("DEC", 0xC6),
    ("CPX", 0xE4), ("SBC", 0xE5), ("INC", 0xE6),
];

/// `[zp,X]` instructions.
pub const INDEXED_INDIRECT: OpcodeTable = &[
    ("ORA", 0x01), ("AND", 0x21), ("EOR", 0x41), ("ADC", 0x61), ("STA", 0x81), ("LDA", 0xA1),
    ("CMP", 0xC1), ("SBC", 0xE1),
];

/// `[zp],Y` instructions.
pub const INDIRECT_INDEXED: OpcodeTable = &[
    ("ORA", 0x11), ("AND", 0x31), ("EOR", 0x51), ("ADC", 0x71), ("STA", 0x91), ("LDA", 0xB1),
    ("CMP", 0xD1), ("SBC", 0xF1),
];

/// `JMP [addr]`, the only indirect instruction.
pub const JMP_INDIRECT: u8 = 0x6C;

/// Every table, for mnemonic lookups.
const ALL_TABLES: [OpcodeTable; 11] = [
    IMPLIED,
    IMMEDIATE,
    RELATIVE,
    INDEXED_X,
    INDEXED_X_ZERO_PAGE,
    INDEXED_Y,
    INDEXED_Y_ZERO_PAGE,
    ABSOLUTE,
    ABSOLUTE_ZERO_PAGE,
    INDEXED_INDIRECT,
    INDIRECT_INDEXED,
];

/// The opcodes available to one mnemonic in one addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpcodePair {
    /// The regular opcode (two-byte address for the indexed/absolute forms).
    pub full: Option<u8>,
    /// The zero-page opcode, where the mode has one.
    pub zero_page: Option<u8>,
}

impl OpcodePair {
    /// Check if neither opcode exists.
    pub fn is_empty(&self) -> bool {
        self.full.is_none() && self.zero_page.is_none()
    }
}

/// Look up a mnemonic in a table.
pub fn lookup(table: OpcodeTable, mnemonic: &str) -> Option<u8> {
    table
        .iter()
        .find(|(name, _)| *name == mnemonic)
        .map(|&(_, opcode)| opcode)
}

/// Check if a word is a known mnemonic (case-insensitive).
pub fn is_mnemonic(word: &str) -> bool {
    let upper = word.to_ascii_uppercase();
    upper == "JMP" || ALL_TABLES.iter().any(|table| lookup(*table, &upper).is_some())
}

/// Check if a mnemonic is a relative branch.
pub fn is_branch(mnemonic: &str) -> bool {
    lookup(RELATIVE, mnemonic).is_some()
}

/// Check if a mnemonic exists only in implied form.
pub fn is_implied_only(mnemonic: &str) -> bool {
    lookup(IMPLIED, mnemonic).is_some()
        && ALL_TABLES[1..]
            .iter()
            .all(|table| lookup(*table, mnemonic).is_none())
}

/// Get the opcodes of a mnemonic in an addressing mode.
pub fn opcodes_for(mnemonic: &str, mode: AddressingMode) -> OpcodePair {
    let single = |table: OpcodeTable| OpcodePair {
        full: lookup(table, mnemonic),
        zero_page: None,
    };
    let paired = |table: OpcodeTable, zp_table: OpcodeTable| OpcodePair {
        full: lookup(table, mnemonic),
        zero_page: lookup(zp_table, mnemonic),
    };

    match mode {
        AddressingMode::Implied => single(IMPLIED),
        AddressingMode::Immediate => single(IMMEDIATE),
        AddressingMode::Relative => single(RELATIVE),
        AddressingMode::IndexedX => paired(INDEXED_X, INDEXED_X_ZERO_PAGE),
        AddressingMode::IndexedY => paired(INDEXED_Y, INDEXED_Y_ZERO_PAGE),
        AddressingMode::Absolute => paired(ABSOLUTE, ABSOLUTE_ZERO_PAGE),
        AddressingMode::Indirect => OpcodePair {
            full: (mnemonic == "JMP").then_some(JMP_INDIRECT),
            zero_page: None,
        },
        AddressingMode::IndexedIndirect => single(INDEXED_INDIRECT),
        AddressingMode::IndirectIndexed => single(INDIRECT_INDEXED),
    }
}

/// Check if a mnemonic supports an addressing mode.
pub fn supports(mnemonic: &str, mode: AddressingMode) -> bool {
    !opcodes_for(mnemonic, mode).is_empty()
}
