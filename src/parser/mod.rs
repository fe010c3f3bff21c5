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

//! Parser module for the assembler.
//!
//! This module parses a token stream into a parse tree of logical lines.
//! It uses recursive descent; syntax errors are collected and the parser
//! resumes at the next newline.
//!
//! # Module Structure
//!
//! - `expressions` - Operand expression parsing (ExpressionParser trait)
//! - `helpers` - Token stream navigation and error handling (ParserHelpers trait)
//! - `lines` - Labels, directives and assignments (LineParser trait)
//! - `statements` - Instructions and addressing modes (StatementParser trait)

// Submodules
pub mod expressions;
pub mod helpers;
pub mod lines;
pub mod statements;

// Internal imports from submodules
use helpers::ParserHelpers;
use lines::LineParser;

use crate::ast::Program;
use crate::error::{AsmError, LineIndex, Span};
use crate::lexer::Token;

/// The parser state.
pub struct Parser<'a> {
    /// The source the tokens were read from.
    pub(crate) source: &'a str,
    /// The token stream to parse.
    pub(crate) tokens: &'a [(Token, Span)],
    /// Current position in the token stream.
    pub(crate) position: usize,
    /// Offset to line/column mapping of the source.
    pub(crate) index: LineIndex,
    /// Syntax errors collected so far.
    pub(crate) errors: Vec<AsmError>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given token stream.
    pub fn new(source: &'a str, tokens: &'a [(Token, Span)]) -> Self {
        Self {
            source,
            tokens,
            position: 0,
            index: LineIndex::new(source),
            errors: Vec::new(),
        }
    }

    // ========================================
    // Program Parsing
    // ========================================

    /// Parse the complete program, recovering from syntax errors.
    pub fn parse(&mut self) -> Program {
        let mut program = Program::new();

        loop {
            self.skip_newlines();
            if self.is_at_end() {
                break;
            }

            match self.parse_line() {
                Ok(line) => program.add_line(line),
                Err(error) => {
                    tracing::debug!(line = error.line, "syntax error, skipping to next line");
                    self.errors.push(error);
                    self.synchronize();
                }
            }
        }

        program
    }

    /// Take the collected syntax errors.
    pub fn take_errors(&mut self) -> Vec<AsmError> {
        std::mem::take(&mut self.errors)
    }
}

/// Parse a token stream into a program and the list of syntax errors.
///
/// The program holds every line that parsed cleanly, even when errors
/// were found elsewhere.
pub fn parse(source: &str, tokens: &[(Token, Span)]) -> (Program, Vec<AsmError>) {
    let mut parser = Parser::new(source, tokens);
    let program = parser.parse();
    (program, parser.take_errors())
}
