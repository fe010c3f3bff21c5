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

//! BASIC loader listings.
//!
//! The loader is a short `READ`/`POKE` loop followed by `DATA` lines:
//! the number of blocks, then per block its start address, its length and
//! its bytes, four per line.

use std::fmt::Write;

use crate::assembler::memory::MemBlocks;

const LOADER: [&str; 10] = [
    "100 read nb",
    "110 for bi = 1 to nb",
    "120 read addr",
    "130 read nby",
    "140 for byi = 1 to nby",
    "150 read byvl",
    "160 poke addr+byi-1, byvl",
    "170 next byi",
    "180 next bi",
    "190 end",
];

const FIRST_DATA_LINE: u32 = 200;
const LINE_STEP: u32 = 10;
const BYTES_PER_LINE: usize = 4;

/// Render the BASIC loader for a set of memory blocks.
pub fn basic_loader(mem_blocks: &MemBlocks) -> String {
    let mut out = String::new();
    for line in LOADER {
        out.push_str(line);
        out.push('\n');
    }

    let mut line_nr = FIRST_DATA_LINE;
    let mut next_line = || {
        let current = line_nr;
        line_nr += LINE_STEP;
        current
    };

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{} rem number of mem blocks", next_line());
    let _ = writeln!(out, "{} data {}", next_line(), mem_blocks.len());

    for block in mem_blocks.iter() {
        let _ = writeln!(out, "{} rem block start number bytes", next_line());
        let _ = write!(out, "{} data {}, {}", next_line(), block.start_address, block.len());

        for (i, byte) in block.bytes.iter().enumerate() {
            if i % BYTES_PER_LINE == 0 {
                let _ = write!(out, "\n{} data ", next_line());
            }
            let _ = write!(out, "{:>3}", byte);
            if i % BYTES_PER_LINE != BYTES_PER_LINE - 1 && i + 1 < block.len() {
                out.push(',');
            }
        }
        out.push('\n');
    }

    out
}
