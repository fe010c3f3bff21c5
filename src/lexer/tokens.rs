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

//! Token definitions for 6502 assembly source.

use logos::Logos;

use super::numbers;

/// A token of 6502 assembly source.
///
/// Mnemonics, directive names and index registers are plain identifiers;
/// the parser decides what they mean from context.
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r";[^\n]*")]
pub enum Token {
    // Literals
    /// Numeric literal (decimal, `$` hexadecimal or `%` binary).
    #[regex(r"[0-9]+", numbers::decimal)]
    #[regex(r"\$[0-9a-fA-F]+", numbers::hexadecimal)]
    #[regex(r"%[01]+", numbers::binary)]
    Number(u32),
    /// Character literal, stored as its character code.
    #[regex(r"'[^'\n]'", numbers::character)]
    Char(u32),
    /// String literal without the surrounding quotes.
    #[regex(r#""[^"\n]*""#, |lex| {
        let slice = lex.slice();
        slice[1..slice.len() - 1].to_string()
    })]
    String(String),
    /// Identifier (label, symbol, mnemonic, directive or register name).
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Arithmetic operators
    /// `+` - addition.
    #[token("+")]
    Plus,
    /// `-` - subtraction.
    #[token("-")]
    Minus,
    /// `*` - multiplication.
    #[token("*")]
    Star,
    /// `/` - division.
    #[token("/")]
    Slash,
    /// `%` - modulo.
    #[token("%")]
    Percent,

    // Punctuation
    #[token(".")]
    Dot,
    #[token("#")]
    Hash,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("=")]
    Equal,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,

    /// Line separator.
    #[token("\n")]
    Newline,
}

impl Token {
    /// Check if this token can start an expression.
    pub fn starts_expression(&self) -> bool {
        matches!(
            self,
            Token::Number(_) | Token::Char(_) | Token::Identifier(_) | Token::LeftParen
        )
    }

    /// Check if this token is an arithmetic operator.
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Token::Plus | Token::Minus | Token::Star | Token::Slash | Token::Percent
        )
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Char(c) => match char::from_u32(*c) {
                Some(ch) => write!(f, "'{}'", ch),
                None => write!(f, "character {}", c),
            },
            Token::String(s) => write!(f, "\"{}\"", s),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Dot => write!(f, "."),
            Token::Hash => write!(f, "#"),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::Equal => write!(f, "="),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::Newline => write!(f, "newline"),
        }
    }
}
