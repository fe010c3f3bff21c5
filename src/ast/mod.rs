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

//! Parse tree definitions for the assembler.
//!
//! This module defines the data structures that represent a parsed source
//! file and the listener interface used to walk them.

mod expr;
mod stmt;
pub mod walk;

pub use expr::*;
pub use stmt::*;
pub use walk::{walk, ParseTreeListener};

use crate::error::Location;

/// A complete parsed source file.
#[derive(Debug, Clone, Default)]
pub struct Program {
    /// The logical lines, in source order.
    pub lines: Vec<Line>,
}

impl Program {
    /// Create a new empty program.
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add a line to the program.
    pub fn add_line(&mut self, line: Line) {
        self.lines.push(line);
    }
}

/// A logical line: an optional label followed by an optional body.
///
/// Several logical lines may share one physical source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// The label defined by this line.
    pub label: Option<Label>,
    /// The directive or instruction.
    pub body: Option<LineBody>,
    /// Source texts of the body's terminals, for listings.
    pub terminals: Vec<String>,
    /// Where the line starts.
    pub loc: Location,
}

/// A label definition (`name:`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// The label name.
    pub name: String,
    /// Where the label starts.
    pub loc: Location,
}

/// The body of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineBody {
    /// An assembler directive.
    Directive(Directive),
    /// A machine instruction.
    Statement(Statement),
}
