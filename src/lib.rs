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

//! Asm6502 Assembler Library
//!
//! This library assembles MOS 6502 source code into memory images for the
//! Commodore 64.
//!
//! # Modules
//!
//! - [`error`] - Error types and error reporting
//! - [`lexer`] - Tokenization of source code
//! - [`parser`] - Parsing tokens into a parse tree
//! - [`ast`] - Parse tree definitions and the tree walk
//! - [`assembler`] - Symbols, encoding, forward references and memory blocks
//! - [`output`] - PRG, D64, listing and BASIC loader output
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! let source = ".ORG $C000\nLDA #$00\nSTA $D020\nRTS\n";
//! match asm6502::assemble(source) {
//!     Ok(assembly) => {
//!         asm6502::output::write_prg(&assembly.prg_image(), Path::new("border.prg")).ok();
//!     }
//!     Err(errors) => {
//!         for error in &errors {
//!             eprintln!("{}", asm6502::format_error(error));
//!         }
//!     }
//! }
//! ```

pub mod assembler;
pub mod ast;
pub mod error;
pub mod lexer;
pub mod output;
pub mod parser;

// Re-export commonly used types
pub use assembler::memory::{CodeLine, MemBlock, MemBlocks};
pub use assembler::symbol_table::{Symbol, SymbolTable};
pub use assembler::{assemble, assemble_named, Assembler, Assembly};
pub use ast::Program;
pub use error::{format_error, render_report, AsmError, ErrorCode, Location, Result, Span};
pub use lexer::Token;

/// The version of the assembler.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the assembler.
pub const NAME: &str = "Asm6502";
