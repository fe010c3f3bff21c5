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

//! Output module for the assembler.
//!
//! This module turns an assembled program into files and text:
//! - PRG files (load address plus bytes)
//! - D64 disk images holding the PRG file
//! - Machine code listings
//! - BASIC loader listings

pub mod basic;
pub mod d64;
pub mod listing;
mod prg;

pub use basic::basic_loader;
pub use d64::write_d64;
pub use listing::{pretty_print, render_listing, symbol_dump};
pub use prg::{read_prg, split_prg, write_prg};

use std::path::Path;

/// Determine the output format from a file extension.
pub fn format_from_extension(path: &Path) -> Option<OutputFormat> {
    match path.extension()?.to_str()?.to_lowercase().as_str() {
        "prg" => Some(OutputFormat::Prg),
        "d64" => Some(OutputFormat::D64),
        _ => None,
    }
}

/// The binary output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// PRG file.
    Prg,
    /// D64 disk image with the PRG file on it.
    D64,
}

/// Write a PRG image to a file in the given format.
pub fn write_output(
    image: &[u8],
    path: &Path,
    format: OutputFormat,
    program_name: &str,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Prg => write_prg(image, path),
        OutputFormat::D64 => write_d64(image, path, program_name),
    }
}
