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

//! Post-order traversal of the parse tree.
//!
//! Every construct is reported to a [`ParseTreeListener`] after all of its
//! children, so operand expressions arrive before the statement that uses
//! them and every line ends with [`ParseTreeListener::exit_line`].

use super::{BinaryOp, DataItem, Directive, DirectiveKind, Expr, ExprKind, Label, Line, LineBody, Program, Statement};
use crate::error::Location;

/// Callbacks invoked while walking a [`Program`].
///
/// All callbacks default to doing nothing.
pub trait ParseTreeListener {
    /// A numeric or character literal.
    fn exit_number(&mut self, _value: u32, _loc: Location) {}

    /// A symbol reference.
    fn exit_symbol(&mut self, _name: &str, _loc: Location) {}

    /// A binary operation, after both operands.
    fn exit_binary(&mut self, _op: BinaryOp, _loc: Location) {}

    /// A string literal inside a data directive.
    fn exit_string(&mut self, _text: &str, _loc: Location) {}

    /// A label definition.
    fn exit_label(&mut self, _label: &Label) {}

    /// A directive, after its operands.
    fn exit_directive(&mut self, _directive: &Directive) {}

    /// An instruction, after its operand.
    fn exit_statement(&mut self, _statement: &Statement) {}

    /// The end of a logical line.
    fn exit_line(&mut self, _line: &Line) {}
}

/// Walk the program in source order, reporting every construct to `listener`.
pub fn walk<L: ParseTreeListener + ?Sized>(program: &Program, listener: &mut L) {
    for line in &program.lines {
        walk_line(line, listener);
    }
}

fn walk_line<L: ParseTreeListener + ?Sized>(line: &Line, listener: &mut L) {
    if let Some(label) = &line.label {
        listener.exit_label(label);
    }

    match &line.body {
        Some(LineBody::Directive(directive)) => {
            match &directive.kind {
                DirectiveKind::Org(expr) => walk_expr(expr, listener),
                DirectiveKind::Assign { value, .. } => walk_expr(value, listener),
                DirectiveKind::Byte(items)
                | DirectiveKind::Word(items)
                | DirectiveKind::Dbyte(items) => {
                    for item in items {
                        match item {
                            DataItem::Expr(expr) => walk_expr(expr, listener),
                            DataItem::Str { text, loc } => listener.exit_string(text, *loc),
                        }
                    }
                }
            }
            listener.exit_directive(directive);
        }
        Some(LineBody::Statement(statement)) => {
            if let Some(operand) = &statement.operand {
                walk_expr(operand, listener);
            }
            listener.exit_statement(statement);
        }
        None => {}
    }

    listener.exit_line(line);
}

fn walk_expr<L: ParseTreeListener + ?Sized>(expr: &Expr, listener: &mut L) {
    match &expr.kind {
        ExprKind::Number(value) => listener.exit_number(*value, expr.loc),
        ExprKind::Symbol(name) => listener.exit_symbol(name, expr.loc),
        ExprKind::Binary { left, op, right } => {
            walk_expr(left, listener);
            walk_expr(right, listener);
            listener.exit_binary(*op, expr.loc);
        }
        ExprKind::Grouped(inner) => walk_expr(inner, listener),
    }
}
