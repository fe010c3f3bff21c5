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

//! Lexer module for the assembler.
//!
//! This module tokenizes assembly source into a stream of tokens.
//! It handles:
//! - Identifiers (labels, symbols, mnemonics, directive names)
//! - Number literals (decimal, hex with $, binary with %)
//! - String and character literals
//! - Operators and punctuation
//! - Comments (starting with ;)
//!
//! Newlines are kept as tokens; all other whitespace is skipped.

mod numbers;
mod tokens;

pub use tokens::Token;

use logos::Logos;

use crate::error::{AsmError, ErrorCode, LineIndex, Span};

/// Tokenize source code into a vector of tokens.
///
/// Every lexical error of the source is reported, not just the first one.
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>, Vec<AsmError>> {
    let index = LineIndex::new(source);
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                let slice = lexer.slice();
                let (code, message) = classify(slice);

                let span = if code == ErrorCode::UnterminatedString {
                    // The rest of the line belongs to the broken string.
                    let rest = lexer.remainder();
                    let skip = rest.find('\n').unwrap_or(rest.len());
                    lexer.bump(skip);
                    Span::new(span.start, span.end + skip)
                } else {
                    span
                };

                errors.push(AsmError::new(code, message, index.locate(span)));
            }
        }
    }

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

/// Pick the error code for a slice the lexer could not match.
fn classify(slice: &str) -> (ErrorCode, String) {
    match slice.chars().next() {
        Some(c) if c.is_ascii_digit() || c == '$' || c == '%' => (
            ErrorCode::InvalidNumber,
            format!("Invalid number literal '{}' (values are limited to 32 bits)", slice),
        ),
        Some('"') => (
            ErrorCode::UnterminatedString,
            "Unterminated string literal".to_string(),
        ),
        Some('\'') => (
            ErrorCode::InvalidCharLiteral,
            "Invalid character literal, expected a single character in quotes".to_string(),
        ),
        Some(c) => (
            ErrorCode::InvalidCharacter,
            format!("Unexpected character '{}'", c),
        ),
        None => (
            ErrorCode::InvalidCharacter,
            "Unexpected end of input".to_string(),
        ),
    }
}
