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

//! Parser helper methods for token stream navigation and error handling.
//!
//! This module provides utility methods for the parser including:
//! - Token stream navigation (peek, advance, check)
//! - Token matching and expectation
//! - Source locations and terminal texts
//! - Error creation and recovery

use super::Parser;
use crate::error::{AsmError, ErrorCode, Location, Span};
use crate::lexer::Token;

/// Trait for parser helper operations.
pub trait ParserHelpers<'a> {
    /// Check if we've reached the end of the token stream.
    fn is_at_end(&self) -> bool;

    /// Check if the current token ends a physical line.
    fn at_line_end(&self) -> bool;

    /// Peek at the current token without advancing.
    fn peek(&self) -> Option<&Token>;

    /// Peek at the current token's span.
    fn peek_span(&self) -> Option<Span>;

    /// Peek at a token ahead by n positions.
    fn peek_ahead(&self, n: usize) -> Option<&Token>;

    /// Get the previous token's span (for error reporting).
    fn previous_span(&self) -> Span;

    /// Advance to the next token and return the current one.
    fn advance(&mut self) -> Option<(Token, Span)>;

    /// Check if the current token matches the expected type.
    fn check(&self, expected: &Token) -> bool;

    /// Check if the current token is an identifier followed by `next`.
    fn check_identifier_followed_by(&self, next: &Token) -> bool;

    /// Consume the current token if it matches the expected type.
    fn match_token(&mut self, expected: &Token) -> bool;

    /// Expect the current token to match, or return an error.
    fn expect(&mut self, expected: &Token, message: &str) -> Result<(Token, Span), AsmError>;

    /// Skip newlines.
    fn skip_newlines(&mut self);

    /// Skip to the next newline after an error.
    fn synchronize(&mut self);

    /// Resolve a span to a source location.
    fn location(&self, span: Span) -> Location;

    /// Location of the current token (or the end of input).
    fn current_location(&self) -> Location;

    /// Source texts of the tokens consumed since `from`.
    fn terminals(&self, from: usize, merge_index_registers: bool) -> Vec<String>;

    /// Create an error at the current position.
    fn error(&self, code: ErrorCode, message: impl Into<String>) -> AsmError;
}

impl<'a> ParserHelpers<'a> for Parser<'a> {
    fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    fn at_line_end(&self) -> bool {
        self.is_at_end() || self.check(&Token::Newline)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|(t, _)| t)
    }

    fn peek_span(&self) -> Option<Span> {
        self.tokens.get(self.position).map(|(_, s)| *s)
    }

    fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n).map(|(t, _)| t)
    }

    fn previous_span(&self) -> Span {
        if self.position > 0 {
            self.tokens[self.position - 1].1
        } else if let Some((_, span)) = self.tokens.first() {
            *span
        } else {
            Span::new(0, 0)
        }
    }

    fn advance(&mut self) -> Option<(Token, Span)> {
        let result = self.tokens.get(self.position).cloned();
        if result.is_some() {
            self.position += 1;
        }
        result
    }

    fn check(&self, expected: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    fn check_identifier_followed_by(&self, next: &Token) -> bool {
        matches!(self.peek(), Some(Token::Identifier(_)))
            && self
                .peek_ahead(1)
                .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(next))
    }

    fn match_token(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token, message: &str) -> Result<(Token, Span), AsmError> {
        if self.check(expected) {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }

        let (code, found) = match self.peek() {
            Some(token) => (ErrorCode::UnexpectedToken, token.to_string()),
            None => (ErrorCode::UnexpectedEndOfFile, "end of file".to_string()),
        };
        Err(self.error(code, format!("{}, found {}", message, found)))
    }

    fn skip_newlines(&mut self) {
        while self.check(&Token::Newline) {
            self.advance();
        }
    }

    fn synchronize(&mut self) {
        while !self.at_line_end() {
            self.advance();
        }
    }

    fn location(&self, span: Span) -> Location {
        self.index.locate(span)
    }

    fn current_location(&self) -> Location {
        match self.peek_span() {
            Some(span) => self.location(span),
            None => {
                let end = self.previous_span().end;
                self.location(Span::new(end, end))
            }
        }
    }

    fn terminals(&self, from: usize, merge_index_registers: bool) -> Vec<String> {
        let mut texts: Vec<String> = Vec::new();
        let mut pending_comma = false;

        for (token, span) in &self.tokens[from..self.position] {
            let text = &self.source[span.start..span.end];
            if pending_comma {
                pending_comma = false;
                if is_index_register(token) {
                    if let Some(comma) = texts.last_mut() {
                        comma.push_str(text);
                        continue;
                    }
                }
            }
            if merge_index_registers && *token == Token::Comma {
                pending_comma = true;
            }
            texts.push(text.to_string());
        }

        texts
    }

    fn error(&self, code: ErrorCode, message: impl Into<String>) -> AsmError {
        AsmError::new(code, message, self.current_location())
    }
}

/// Check if a token names the X or Y index register.
pub(crate) fn is_index_register(token: &Token) -> bool {
    matches!(token, Token::Identifier(name) if name.eq_ignore_ascii_case("x") || name.eq_ignore_ascii_case("y"))
}
