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

//! Emit helper methods for the assembler.
//!
//! This module provides low-level byte emission into the payload:
//! - Single bytes and words in both byte orders
//! - Reserving placeholder bytes for operands resolved later
//! - Patching already reserved bytes in place

use super::memory::UNMAPPED_BYTE;
use super::Assembler;

/// Extension trait for low-level byte emission.
///
/// Every emitted byte is written at the program counter, which then
/// advances by one. The first byte of a line fixes the line's start address.
pub trait EmitHelpers {
    /// Emit a single byte.
    fn emit_byte(&mut self, byte: u8);

    /// Emit a 16-bit word, least significant byte first.
    fn emit_word_le(&mut self, word: u16);

    /// Emit a 16-bit word, most significant byte first.
    fn emit_word_be(&mut self, word: u16);

    /// Reserve `width` placeholder bytes and return the address of the first one.
    fn reserve(&mut self, width: u32) -> u32;

    /// Overwrite a byte without moving the program counter.
    fn patch_byte(&mut self, address: u32, byte: u8);
}

impl EmitHelpers for Assembler {
    fn emit_byte(&mut self, byte: u8) {
        if self.line_start.is_none() {
            self.line_start = Some(self.current_address);
        }
        if self.payload.insert(self.current_address, byte).is_some() {
            self.line_overwrites = true;
        }
        self.current_address = self.current_address.wrapping_add(1);
    }

    fn emit_word_le(&mut self, word: u16) {
        let [lo, hi] = word.to_le_bytes();
        self.emit_byte(lo);
        self.emit_byte(hi);
    }

    fn emit_word_be(&mut self, word: u16) {
        let [hi, lo] = word.to_be_bytes();
        self.emit_byte(hi);
        self.emit_byte(lo);
    }

    fn reserve(&mut self, width: u32) -> u32 {
        let address = self.current_address;
        for _ in 0..width {
            self.emit_byte(UNMAPPED_BYTE);
        }
        address
    }

    fn patch_byte(&mut self, address: u32, byte: u8) {
        self.payload.insert(address, byte);
    }
}
