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

//! Instruction parsing for the parser.
//!
//! The addressing mode is decided by the operand syntax alone:
//! - nothing or `A`: implied / accumulator
//! - `#expr`: immediate
//! - `expr`, `expr,X`, `expr,Y`: absolute and indexed
//! - `[expr]`, `[expr,X]`, `[expr],Y`: indirect forms
//!
//! Branch mnemonics always take a relative operand.

use super::expressions::ExpressionParser;
use super::helpers::{is_index_register, ParserHelpers};
use super::Parser;
use crate::assembler::opcodes;
use crate::ast::{AddressingMode, Expr, Statement};
use crate::error::{AsmError, ErrorCode};
use crate::lexer::Token;

/// Extension trait for instruction parsing.
pub trait StatementParser {
    /// Parse a mnemonic and its operand.
    fn parse_statement(&mut self) -> Result<Statement, AsmError>;

    /// Check if the tokens after a mnemonic form an operand.
    fn operand_follows(&self) -> bool;

    /// Parse the `X` or `Y` after a comma.
    fn parse_index_register(&mut self) -> Result<char, AsmError>;
}

impl<'a> StatementParser for Parser<'a> {
    fn parse_statement(&mut self) -> Result<Statement, AsmError> {
        let loc = self.current_location();
        let word = match self.peek() {
            Some(Token::Identifier(word)) => word.clone(),
            _ => {
                return Err(self.error(ErrorCode::UnexpectedToken, "Expected instruction"));
            }
        };

        let mnemonic = word.to_ascii_uppercase();
        if !opcodes::is_mnemonic(&mnemonic) {
            return Err(self.error(
                ErrorCode::UnknownMnemonic,
                format!("Unknown mnemonic '{}'", word),
            ));
        }
        self.advance();

        let (mode, operand): (AddressingMode, Option<Expr>) = if opcodes::is_branch(&mnemonic) {
            (AddressingMode::Relative, Some(self.parse_expression()?))
        } else if opcodes::is_implied_only(&mnemonic) || !self.operand_follows() {
            (AddressingMode::Implied, None)
        } else if matches!(self.peek(), Some(Token::Identifier(a)) if a.eq_ignore_ascii_case("a"))
            && opcodes::supports(&mnemonic, AddressingMode::Implied)
        {
            // Accumulator form shares the implied opcode.
            self.advance();
            (AddressingMode::Implied, None)
        } else if self.match_token(&Token::Hash) {
            (AddressingMode::Immediate, Some(self.parse_expression()?))
        } else if self.match_token(&Token::LeftBracket) {
            let operand = self.parse_expression()?;
            if self.match_token(&Token::Comma) {
                let register = self.parse_index_register()?;
                if register != 'X' {
                    return Err(self.error(
                        ErrorCode::InvalidAddressingMode,
                        "Indexed indirect addressing requires the X register",
                    ));
                }
                self.expect(&Token::RightBracket, "Expected ']' after index register")?;
                (AddressingMode::IndexedIndirect, Some(operand))
            } else {
                self.expect(&Token::RightBracket, "Expected ']' after indirect address")?;
                if self.match_token(&Token::Comma) {
                    let register = self.parse_index_register()?;
                    if register != 'Y' {
                        return Err(self.error(
                            ErrorCode::InvalidAddressingMode,
                            "Indirect indexed addressing requires the Y register",
                        ));
                    }
                    (AddressingMode::IndirectIndexed, Some(operand))
                } else {
                    (AddressingMode::Indirect, Some(operand))
                }
            }
        } else {
            let operand = self.parse_expression()?;
            if self.match_token(&Token::Comma) {
                match self.parse_index_register()? {
                    'X' => (AddressingMode::IndexedX, Some(operand)),
                    _ => (AddressingMode::IndexedY, Some(operand)),
                }
            } else {
                (AddressingMode::Absolute, Some(operand))
            }
        };

        if !opcodes::supports(&mnemonic, mode) {
            return Err(AsmError::new(
                ErrorCode::InvalidAddressingMode,
                format!(
                    "{} does not support {} addressing",
                    mnemonic,
                    mode.description()
                ),
                loc,
            ));
        }

        Ok(Statement {
            mnemonic,
            mode,
            operand,
            loc,
        })
    }

    fn operand_follows(&self) -> bool {
        match self.peek() {
            None | Some(Token::Newline) | Some(Token::Dot) => false,
            Some(Token::Identifier(name)) => {
                let starts_next_line = self.check_identifier_followed_by(&Token::Colon)
                    || self.check_identifier_followed_by(&Token::Equal);
                !starts_next_line && !opcodes::is_mnemonic(name)
            }
            Some(_) => true,
        }
    }

    fn parse_index_register(&mut self) -> Result<char, AsmError> {
        match self.peek() {
            Some(token) if is_index_register(token) => {
                let register = match token {
                    Token::Identifier(name) if name.eq_ignore_ascii_case("x") => 'X',
                    _ => 'Y',
                };
                self.advance();
                Ok(register)
            }
            Some(token) => Err(self.error(
                ErrorCode::UnexpectedToken,
                format!("Expected index register X or Y, found {}", token),
            )),
            None => Err(self.error(
                ErrorCode::UnexpectedEndOfFile,
                "Expected index register X or Y, found end of file",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_stmt(source: &str) -> Result<Statement, AsmError> {
        let tokens = tokenize(source).unwrap();
        let mut parser = Parser::new(source, &tokens);
        parser.parse_statement()
    }

    fn mode_of(source: &str) -> AddressingMode {
        parse_stmt(source).unwrap().mode
    }

    #[test]
    fn test_addressing_modes() {
        assert_eq!(mode_of("RTS"), AddressingMode::Implied);
        assert_eq!(mode_of("ASL A"), AddressingMode::Implied);
        assert_eq!(mode_of("asl"), AddressingMode::Implied);
        assert_eq!(mode_of("LDA #$01"), AddressingMode::Immediate);
        assert_eq!(mode_of("BNE loop"), AddressingMode::Relative);
        assert_eq!(mode_of("LDA $D020"), AddressingMode::Absolute);
        assert_eq!(mode_of("STA ($D020 + 1)"), AddressingMode::Absolute);
        assert_eq!(mode_of("LDA table,X"), AddressingMode::IndexedX);
        assert_eq!(mode_of("LDX $FD,y"), AddressingMode::IndexedY);
        assert_eq!(mode_of("JMP [vector]"), AddressingMode::Indirect);
        assert_eq!(mode_of("STA [ptr,X]"), AddressingMode::IndexedIndirect);
        assert_eq!(mode_of("LDA [ptr],Y"), AddressingMode::IndirectIndexed);
    }

    #[test]
    fn test_mnemonic_is_upper_cased() {
        let statement = parse_stmt("lda #1").unwrap();
        assert_eq!(statement.mnemonic, "LDA");
    }

    #[test]
    fn test_mnemonic_ends_implied_operand() {
        let tokens = tokenize("ASL NOP").unwrap();
        let mut parser = Parser::new("ASL NOP", &tokens);
        let statement = parser.parse_statement().unwrap();
        assert_eq!(statement.mode, AddressingMode::Implied);
        assert_eq!(parser.peek(), Some(&Token::Identifier("NOP".to_string())));
    }

    #[test]
    fn test_unknown_mnemonic() {
        let err = parse_stmt("RTE").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownMnemonic);
    }

    #[test]
    fn test_invalid_addressing_mode() {
        let err = parse_stmt("STA #1").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidAddressingMode);

        let err = parse_stmt("LDA [ptr]").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidAddressingMode);

        let err = parse_stmt("LDA [ptr,Y]").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidAddressingMode);
    }

    #[test]
    fn test_missing_index_register() {
        let err = parse_stmt("LDA $10,").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedEndOfFile);
    }
}
