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

//! Address space model: the sparse payload, per-line records and the
//! contiguous memory blocks derived from them.

use std::collections::BTreeMap;

/// Value returned for addresses outside every block.
pub const UNMAPPED_BYTE: u8 = 0xFF;

/// Highest address of the 6502 address space.
pub const MAX_ADDRESS: u32 = 0xFFFF;

/// Sparse byte-addressed memory written during assembly.
///
/// Later writes to an address replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    bytes: BTreeMap<u32, u8>,
}

impl Payload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a byte, returning the byte it replaced.
    pub fn insert(&mut self, address: u32, byte: u8) -> Option<u8> {
        self.bytes.insert(address, byte)
    }

    /// Read a byte.
    pub fn get(&self, address: u32) -> Option<u8> {
        self.bytes.get(&address).copied()
    }

    /// Get the number of written addresses.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The record of one source line that was assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeLine {
    /// Address of the first byte (the program counter for empty lines).
    pub start_address: u32,
    /// Number of bytes the line produced.
    pub length: u32,
    /// The label defined on the line.
    pub label: Option<String>,
    /// Pretty-printed directive or instruction.
    pub text: String,
    /// Source line number (1-indexed).
    pub line: usize,
}

impl CodeLine {
    /// Address one past the last byte of the line.
    pub fn end_address(&self) -> u32 {
        self.start_address.wrapping_add(self.length)
    }
}

/// A contiguous run of bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemBlock {
    /// Address of the first byte.
    pub start_address: u32,
    /// The bytes of the block.
    pub bytes: Vec<u8>,
}

impl MemBlock {
    /// Create a block.
    pub fn new(start_address: u32, bytes: Vec<u8>) -> Self {
        Self {
            start_address,
            bytes,
        }
    }

    /// Get the number of bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the block holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Address one past the last byte.
    pub fn end_address(&self) -> u32 {
        self.start_address.wrapping_add(self.bytes.len() as u32)
    }

    /// Check if an absolute address lies inside the block.
    pub fn contains(&self, address: u32) -> bool {
        address >= self.start_address && address < self.end_address()
    }
}

/// Memory blocks sorted by start address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemBlocks {
    blocks: Vec<MemBlock>,
}

impl MemBlocks {
    /// Wrap blocks that are already in the wanted order.
    pub fn new(blocks: Vec<MemBlock>) -> Self {
        Self { blocks }
    }

    /// Coalesce code lines into blocks.
    ///
    /// A line continues the current block when it starts where the previous
    /// line ended; otherwise it opens a new one. Blocks are sorted by start
    /// address afterwards.
    pub fn build(code_lines: &[CodeLine], payload: &Payload) -> Self {
        let mut blocks = Vec::new();
        let mut current: Vec<u8> = Vec::new();
        let mut current_start = 0u32;
        let mut previous: Option<&CodeLine> = None;

        for code_line in code_lines {
            let adjacent = previous.is_some_and(|p| p.end_address() == code_line.start_address);
            if !adjacent {
                if !current.is_empty() {
                    blocks.push(MemBlock::new(current_start, std::mem::take(&mut current)));
                }
                current_start = code_line.start_address;
            }

            for offset in 0..code_line.length {
                let address = code_line.start_address.wrapping_add(offset);
                current.push(payload.get(address).unwrap_or(UNMAPPED_BYTE));
            }

            previous = Some(code_line);
        }

        if !current.is_empty() {
            blocks.push(MemBlock::new(current_start, current));
        }

        blocks.sort_by_key(|block| block.start_address);
        tracing::debug!(blocks = blocks.len(), "built memory blocks");

        Self { blocks }
    }

    /// Read the byte at an absolute address.
    ///
    /// Addresses outside every block read as [`UNMAPPED_BYTE`].
    pub fn byte_at(&self, address: u32) -> u8 {
        self.blocks
            .iter()
            .find(|block| block.contains(address))
            .map_or(UNMAPPED_BYTE, |block| {
                block.bytes[(address - block.start_address) as usize]
            })
    }

    /// Serialize into a PRG image.
    ///
    /// The image holds the little-endian start address of the first block,
    /// every block in address order with `0xFF` filling the gaps, and one
    /// trailing zero byte. Without blocks only the zero byte remains.
    pub fn prg_image(&self) -> Vec<u8> {
        let mut image = Vec::new();

        if let Some(first) = self.blocks.first() {
            image.extend_from_slice(&(first.start_address as u16).to_le_bytes());

            for (i, block) in self.blocks.iter().enumerate() {
                image.extend_from_slice(&block.bytes);

                if let Some(next) = self.blocks.get(i + 1) {
                    let end = block.end_address();
                    if next.start_address >= end {
                        let gap = (next.start_address - end) as usize;
                        image.extend(std::iter::repeat(UNMAPPED_BYTE).take(gap));
                    } else {
                        tracing::warn!(
                            block = format!("${:04x}", block.start_address),
                            next = format!("${:04x}", next.start_address),
                            "memory blocks overlap, writing them back to back"
                        );
                    }
                }
            }
        }

        image.push(0x00);
        image
    }

    /// Get the blocks.
    pub fn blocks(&self) -> &[MemBlock] {
        &self.blocks
    }

    /// Iterate over the blocks.
    pub fn iter(&self) -> impl Iterator<Item = &MemBlock> {
        self.blocks.iter()
    }

    /// Get the number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if there are no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(start_address: u32, length: u32) -> CodeLine {
        CodeLine {
            start_address,
            length,
            label: None,
            text: String::new(),
            line: 1,
        }
    }

    fn payload_with(address: u32, bytes: &[u8]) -> Payload {
        let mut payload = Payload::new();
        for (i, &byte) in bytes.iter().enumerate() {
            payload.insert(address + i as u32, byte);
        }
        payload
    }

    #[test]
    fn test_adjacent_lines_coalesce() {
        let mut payload = payload_with(0x1000, &[1, 2, 3, 4, 5]);
        payload.insert(0x2000, 9);
        let lines = vec![line(0x1000, 2), line(0x1002, 3), line(0x2000, 1)];

        let blocks = MemBlocks::build(&lines, &payload);
        assert_eq!(
            blocks.blocks(),
            &[
                MemBlock::new(0x1000, vec![1, 2, 3, 4, 5]),
                MemBlock::new(0x2000, vec![9])
            ]
        );
    }

    #[test]
    fn test_empty_lines_do_not_split_blocks() {
        let payload = payload_with(0x1000, &[1, 2]);
        let lines = vec![line(0x1000, 1), line(0x1001, 0), line(0x1001, 1)];

        let blocks = MemBlocks::build(&lines, &payload);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks.blocks()[0].bytes, vec![1, 2]);
    }

    #[test]
    fn test_blocks_are_sorted() {
        let mut payload = payload_with(0x3000, &[3]);
        payload.insert(0x1000, 1);
        let lines = vec![line(0x3000, 1), line(0x1000, 1)];

        let blocks = MemBlocks::build(&lines, &payload);
        let starts: Vec<u32> = blocks.iter().map(|b| b.start_address).collect();
        assert_eq!(starts, vec![0x1000, 0x3000]);
    }

    #[test]
    fn test_byte_at() {
        let blocks = MemBlocks::new(vec![MemBlock::new(0x00FC, vec![0, 1, 0x45, 0x23])]);
        assert_eq!(blocks.byte_at(0x00FE), 0x45);
        assert_eq!(blocks.byte_at(0x00FB), UNMAPPED_BYTE);
        assert_eq!(blocks.byte_at(0x0100), UNMAPPED_BYTE);
    }

    #[test]
    fn test_prg_image_pads_gaps() {
        let blocks = MemBlocks::new(vec![
            MemBlock::new(0x1000, vec![0x60]),
            MemBlock::new(0x1003, vec![0xEA]),
        ]);
        assert_eq!(
            blocks.prg_image(),
            vec![0x00, 0x10, 0x60, 0xFF, 0xFF, 0xEA, 0x00]
        );
    }

    #[test]
    fn test_prg_image_of_nothing() {
        assert_eq!(MemBlocks::default().prg_image(), vec![0x00]);
    }

    #[test]
    fn test_prg_image_with_overlap() {
        let blocks = MemBlocks::new(vec![
            MemBlock::new(0x1000, vec![1, 2, 3]),
            MemBlock::new(0x1001, vec![4]),
        ]);
        assert_eq!(blocks.prg_image(), vec![0x00, 0x10, 1, 2, 3, 4, 0x00]);
    }
}
