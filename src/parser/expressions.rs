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

//! Expression parsing for the parser.
//!
//! This module provides expression parsing functionality:
//! - Additive and multiplicative binary operators (left-associative)
//! - Primary expressions (numbers, characters, symbols, grouping)

use super::helpers::ParserHelpers;
use super::Parser;
use crate::ast::{BinaryOp, Expr, ExprKind};
use crate::error::{AsmError, ErrorCode};
use crate::lexer::Token;

/// Extension trait for expression parsing.
pub trait ExpressionParser {
    /// Parse an expression.
    fn parse_expression(&mut self) -> Result<Expr, AsmError>;

    /// Parse a multiplicative expression.
    fn parse_term(&mut self) -> Result<Expr, AsmError>;

    /// Parse a primary expression.
    fn parse_factor(&mut self) -> Result<Expr, AsmError>;
}

impl<'a> Parser<'a> {
    fn try_parse_additive_op(&mut self) -> Option<BinaryOp> {
        let op = match self.peek()? {
            Token::Plus => BinaryOp::Add,
            Token::Minus => BinaryOp::Sub,
            _ => return None,
        };
        self.advance();
        Some(op)
    }

    fn try_parse_multiplicative_op(&mut self) -> Option<BinaryOp> {
        let op = match self.peek()? {
            Token::Star => BinaryOp::Mul,
            Token::Slash => BinaryOp::Div,
            Token::Percent => BinaryOp::Mod,
            _ => return None,
        };
        self.advance();
        Some(op)
    }
}

/// Combine two operands into a binary expression located at the left operand.
fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    let loc = left.loc.through(&right.loc);
    Expr::new(
        ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        loc,
    )
}

impl<'a> ExpressionParser for Parser<'a> {
    fn parse_expression(&mut self) -> Result<Expr, AsmError> {
        let mut left = self.parse_term()?;

        while let Some(op) = self.try_parse_additive_op() {
            let right = self.parse_term()?;
            left = binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, AsmError> {
        let mut left = self.parse_factor()?;

        while let Some(op) = self.try_parse_multiplicative_op() {
            let right = self.parse_factor()?;
            left = binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expr, AsmError> {
        let found = match self.peek() {
            Some(token) => token.to_string(),
            None => {
                return Err(self.error(
                    ErrorCode::UnexpectedEndOfFile,
                    "Expected expression, found end of file",
                ))
            }
        };

        let loc = self.current_location();
        match self.peek() {
            Some(Token::Number(value)) | Some(Token::Char(value)) => {
                let value = *value;
                self.advance();
                Ok(Expr::new(ExprKind::Number(value), loc))
            }
            Some(Token::Identifier(name)) => {
                let name = name.clone();
                self.advance();
                Ok(Expr::new(ExprKind::Symbol(name), loc))
            }
            Some(Token::LeftParen) => {
                self.advance();
                let inner = self.parse_expression()?;
                let (_, close) = self.expect(&Token::RightParen, "Expected ')' after expression")?;
                let loc = loc.through(&self.location(close));
                Ok(Expr::new(ExprKind::Grouped(Box::new(inner)), loc))
            }
            _ => Err(self.error(
                ErrorCode::ExpectedExpression,
                format!("Expected expression, found {}", found),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_expr(source: &str) -> Result<Expr, AsmError> {
        let tokens = tokenize(source).unwrap();
        let mut parser = Parser::new(source, &tokens);
        parser.parse_expression()
    }

    #[test]
    fn test_precedence() {
        let expr = parse_expr("1 + 2 * 3").unwrap();
        if let ExprKind::Binary { op, right, .. } = &expr.kind {
            assert_eq!(*op, BinaryOp::Add);
            assert!(matches!(
                right.kind,
                ExprKind::Binary {
                    op: BinaryOp::Mul,
                    ..
                }
            ));
        } else {
            panic!("Expected binary op");
        }
    }

    #[test]
    fn test_left_associative() {
        let expr = parse_expr("10 - 4 - 3").unwrap();
        if let ExprKind::Binary { left, op, .. } = &expr.kind {
            assert_eq!(*op, BinaryOp::Sub);
            assert!(matches!(
                left.kind,
                ExprKind::Binary {
                    op: BinaryOp::Sub,
                    ..
                }
            ));
        } else {
            panic!("Expected binary op");
        }
    }

    #[test]
    fn test_grouping_and_symbols() {
        let expr = parse_expr("(irqhnd % 256)").unwrap();
        assert!(matches!(expr.kind, ExprKind::Grouped(_)));
        assert_eq!(expr.loc.span.start, 0);
        assert_eq!(expr.loc.span.end, 14);
        assert_eq!(expr.to_string(), "(irqhnd % 256)");
    }

    #[test]
    fn test_character_literal() {
        let expr = parse_expr("'A' + 1").unwrap();
        assert_eq!(expr.to_string(), "65 + 1");
    }

    #[test]
    fn test_missing_operand() {
        let err = parse_expr("1 +").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedEndOfFile);

        let err = parse_expr("1 + ]").unwrap_err();
        assert_eq!(err.code, ErrorCode::ExpectedExpression);
    }

    #[test]
    fn test_unclosed_group() {
        let err = parse_expr("(1 + 2").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnexpectedEndOfFile);
    }
}
