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

//! Machine code listings.
//!
//! One row per code line:
//!
//! ```text
//! 0x1000:0xa9,0x00        start       LDA #$00
//! ```
//!
//! The byte dump is padded to column 24, the label to column 36.

use crate::assembler::memory::{CodeLine, MemBlocks};
use crate::assembler::symbol_table::SymbolTable;

const LABEL_COLUMN: usize = 24;
const TEXT_COLUMN: usize = 36;

/// Join terminal texts, leaving out the space after `.` and `#` and
/// before anything starting with a comma.
pub fn pretty_print<S: AsRef<str>>(terminals: &[S]) -> String {
    let mut out = String::new();
    let mut previous: Option<&str> = None;

    for terminal in terminals {
        let text = terminal.as_ref();
        let glued = match previous {
            None => true,
            Some(prev) => prev == "." || prev == "#" || text.starts_with(','),
        };
        if !glued {
            out.push(' ');
        }
        out.push_str(text);
        previous = Some(text);
    }

    out
}

/// Hex dump of a line's bytes (`0xaaaa:0xbb,0xbb `), empty for lines without bytes.
pub fn byte_dump(code_line: &CodeLine, mem_blocks: &MemBlocks) -> String {
    if code_line.length == 0 {
        return String::new();
    }

    let bytes: Vec<String> = (0..code_line.length)
        .map(|offset| {
            let byte = mem_blocks.byte_at(code_line.start_address.wrapping_add(offset));
            format!("0x{:02x}", byte)
        })
        .collect();

    format!("0x{:04x}:{} ", code_line.start_address, bytes.join(","))
}

fn pad_to(out: &mut String, row_start: usize, column: usize) {
    while out.len() - row_start < column {
        out.push(' ');
    }
}

/// Render the listing of all code lines.
///
/// Without `include_assembly` only the byte dumps of lines that produced
/// bytes are written.
pub fn render_listing(
    code_lines: &[CodeLine],
    mem_blocks: &MemBlocks,
    include_assembly: bool,
) -> String {
    let mut out = String::new();

    for code_line in code_lines {
        let dump = byte_dump(code_line, mem_blocks);
        if !include_assembly {
            if !dump.is_empty() {
                out.push_str(dump.trim_end());
                out.push('\n');
            }
            continue;
        }

        let row_start = out.len();
        out.push_str(&dump);
        pad_to(&mut out, row_start, LABEL_COLUMN);
        if let Some(label) = &code_line.label {
            out.push_str(label);
        }
        pad_to(&mut out, row_start, TEXT_COLUMN);
        out.push_str(&code_line.text);
        out.push('\n');
    }

    out
}

/// Render the symbol table, one `name = $value (line:column)` row per symbol.
pub fn symbol_dump(symbols: &SymbolTable) -> String {
    symbols
        .iter()
        .map(|symbol| {
            format!(
                "{} = ${:04x} ({}:{})\n",
                symbol.name, symbol.value, symbol.line, symbol.column
            )
        })
        .collect()
}
