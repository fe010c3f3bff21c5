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

//! Operand expressions and their evaluation.
//!
//! Expressions are built bottom-up while a line is walked and evaluated
//! against the symbol table as often as needed. Evaluation has three
//! outcomes:
//! - `Ok(Some(value))` when every symbol is known
//! - `Ok(None)` when a symbol is not (yet) defined
//! - `Err(ArithmeticError)` on division or modulo by zero

use thiserror::Error;

use super::symbol_table::SymbolTable;
use crate::ast::BinaryOp;
use crate::error::Location;

/// Division or modulo by zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} by zero in expression \"{expression}\"", operation_name(.op))]
pub struct ArithmeticError {
    /// The failing operator.
    pub op: BinaryOp,
    /// Text of the failing sub-expression.
    pub expression: String,
    /// Where the failing sub-expression starts.
    pub location: Location,
}

fn operation_name(op: &BinaryOp) -> &'static str {
    match op {
        BinaryOp::Div => "Division",
        _ => "Modulo",
    }
}

/// An immutable expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    /// The kind of expression.
    pub kind: ExpressionKind,
    /// Where the expression starts.
    pub location: Location,
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionKind {
    /// A literal value.
    Numeric(u32),
    /// A reference to a label or assigned symbol.
    SymbolRef(String),
    /// A binary operation.
    BinaryOp {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    /// Create a literal.
    pub fn numeric(value: u32, location: Location) -> Self {
        Self {
            kind: ExpressionKind::Numeric(value),
            location,
        }
    }

    /// Create a symbol reference.
    pub fn symbol_ref(name: impl Into<String>, location: Location) -> Self {
        Self {
            kind: ExpressionKind::SymbolRef(name.into()),
            location,
        }
    }

    /// Create a binary operation.
    pub fn binary(op: BinaryOp, left: Expression, right: Expression, location: Location) -> Self {
        Self {
            kind: ExpressionKind::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            location,
        }
    }

    /// Evaluate against the symbol table.
    ///
    /// Arithmetic wraps at 32 bits. An unresolved operand makes the whole
    /// operation unresolved, even when the other operand is a zero divisor.
    pub fn evaluate(&self, symbols: &SymbolTable) -> Result<Option<u32>, ArithmeticError> {
        match &self.kind {
            ExpressionKind::Numeric(value) => Ok(Some(*value)),
            ExpressionKind::SymbolRef(name) => Ok(symbols.resolve(name).map(|s| s.value)),
            ExpressionKind::BinaryOp { op, left, right } => {
                let (Some(lhs), Some(rhs)) = (left.evaluate(symbols)?, right.evaluate(symbols)?)
                else {
                    return Ok(None);
                };

                let value = match op {
                    BinaryOp::Add => lhs.wrapping_add(rhs),
                    BinaryOp::Sub => lhs.wrapping_sub(rhs),
                    BinaryOp::Mul => lhs.wrapping_mul(rhs),
                    BinaryOp::Div | BinaryOp::Mod => {
                        if rhs == 0 {
                            return Err(ArithmeticError {
                                op: *op,
                                expression: self.to_string(),
                                location: self.location,
                            });
                        }
                        if *op == BinaryOp::Div {
                            lhs / rhs
                        } else {
                            lhs % rhs
                        }
                    }
                };
                Ok(Some(value))
            }
        }
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ExpressionKind::Numeric(value) => write!(f, "{}", value),
            ExpressionKind::SymbolRef(name) => write!(f, "{}", name),
            ExpressionKind::BinaryOp { op, left, right } => {
                write_operand(f, left)?;
                write!(f, " {} ", op)?;
                write_operand(f, right)
            }
        }
    }
}

/// Write a nested operation in parentheses so the text keeps its grouping.
fn write_operand(f: &mut std::fmt::Formatter<'_>, operand: &Expression) -> std::fmt::Result {
    match operand.kind {
        ExpressionKind::BinaryOp { .. } => write!(f, "({})", operand),
        _ => write!(f, "{}", operand),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(value: u32) -> Expression {
        Expression::numeric(value, Location::default())
    }

    fn sym(name: &str) -> Expression {
        Expression::symbol_ref(name, Location::default())
    }

    fn bin(op: BinaryOp, left: Expression, right: Expression) -> Expression {
        Expression::binary(op, left, right, Location::default())
    }

    #[test]
    fn test_numeric() {
        let table = SymbolTable::new();
        assert_eq!(num(42).evaluate(&table), Ok(Some(42)));
    }

    #[test]
    fn test_symbol_resolution_is_lazy() {
        let mut table = SymbolTable::new();
        let expr = bin(BinaryOp::Add, sym("later"), num(1));
        assert_eq!(expr.evaluate(&table), Ok(None));

        table.define("later", 1, 1, 0x1003).unwrap();
        assert_eq!(expr.evaluate(&table), Ok(Some(0x1004)));
        assert_eq!(expr.evaluate(&table), Ok(Some(0x1004)));
    }

    #[test]
    fn test_operators() {
        let table = SymbolTable::new();
        assert_eq!(bin(BinaryOp::Sub, num(2), num(1)).evaluate(&table), Ok(Some(1)));
        assert_eq!(bin(BinaryOp::Mul, num(6), num(7)).evaluate(&table), Ok(Some(42)));
        assert_eq!(bin(BinaryOp::Div, num(0x2345), num(256)).evaluate(&table), Ok(Some(0x23)));
        assert_eq!(bin(BinaryOp::Mod, num(0x2345), num(256)).evaluate(&table), Ok(Some(0x45)));
    }

    #[test]
    fn test_wrapping_arithmetic() {
        let table = SymbolTable::new();
        assert_eq!(
            bin(BinaryOp::Sub, num(0), num(1)).evaluate(&table),
            Ok(Some(u32::MAX))
        );
        assert_eq!(
            bin(BinaryOp::Add, num(u32::MAX), num(2)).evaluate(&table),
            Ok(Some(1))
        );
    }

    #[test]
    fn test_division_by_zero() {
        let table = SymbolTable::new();
        let err = bin(BinaryOp::Div, num(4), num(0)).evaluate(&table).unwrap_err();
        assert_eq!(err.op, BinaryOp::Div);
        assert_eq!(err.to_string(), "Division by zero in expression \"4 / 0\"");

        let err = bin(BinaryOp::Mod, num(4), num(0)).evaluate(&table).unwrap_err();
        assert_eq!(err.op, BinaryOp::Mod);
    }

    #[test]
    fn test_unresolved_operand_wins_over_zero_divisor() {
        let table = SymbolTable::new();
        assert_eq!(bin(BinaryOp::Div, sym("x"), num(0)).evaluate(&table), Ok(None));
    }

    #[test]
    fn test_display() {
        let expr = bin(
            BinaryOp::Div,
            bin(BinaryOp::Add, sym("table"), num(1)),
            num(256),
        );
        assert_eq!(expr.to_string(), "(table + 1) / 256");
    }
}
