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

//! Number literal conversion for the lexer.
//!
//! This module converts the matched literal text into values:
//! - Decimal numbers
//! - Hexadecimal numbers ($ prefix)
//! - Binary numbers (% prefix)
//! - Character literals ('c')
//!
//! A conversion returning `None` makes the lexer report the slice as an
//! invalid number, which happens when the value does not fit 32 bits.

use logos::Lexer;

use super::Token;

/// Convert a decimal literal.
pub(crate) fn decimal(lex: &mut Lexer<Token>) -> Option<u32> {
    lex.slice().parse().ok()
}

/// Convert a `$`-prefixed hexadecimal literal.
pub(crate) fn hexadecimal(lex: &mut Lexer<Token>) -> Option<u32> {
    u32::from_str_radix(&lex.slice()[1..], 16).ok()
}

/// Convert a `%`-prefixed binary literal.
pub(crate) fn binary(lex: &mut Lexer<Token>) -> Option<u32> {
    u32::from_str_radix(&lex.slice()[1..], 2).ok()
}

/// Convert a quoted character literal to its character code.
pub(crate) fn character(lex: &mut Lexer<Token>) -> Option<u32> {
    lex.slice().chars().nth(1).map(u32::from)
}
