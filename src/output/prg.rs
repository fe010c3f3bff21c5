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

//! PRG files.
//!
//! A PRG file is a 2-byte little-endian load address followed by the bytes
//! to load there. Images built by the assembler already carry the address.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Write a PRG image as is.
pub fn write_prg(image: &[u8], path: &Path) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(image)?;
    Ok(())
}

/// Split a PRG image into its load address and body.
pub fn split_prg(data: &[u8]) -> io::Result<(u16, &[u8])> {
    match data {
        [lo, hi, body @ ..] => Ok((u16::from_le_bytes([*lo, *hi]), body)),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "PRG file too short",
        )),
    }
}

/// Read a PRG file and return the load address and body.
pub fn read_prg(path: &Path) -> io::Result<(u16, Vec<u8>)> {
    let data = std::fs::read(path)?;
    let (load_address, body) = split_prg(&data)?;
    Ok((load_address, body.to_vec()))
}
