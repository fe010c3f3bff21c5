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

//! D64 disk images.
//!
//! A D64 file is a sector dump of a 1541 floppy: 35 tracks of 17 to 21
//! sectors with 256 bytes each. Track 18 holds the BAM (sector 0) and the
//! directory (sector 1). Files are chains of sectors whose first two bytes
//! link to the next sector.

use std::fs;
use std::io;
use std::path::Path;

/// Total size of a D64 image in bytes.
pub const D64_SIZE: usize = 174_848;

/// Number of tracks on a 1541 disk.
pub const NUM_TRACKS: u8 = 35;

/// Track holding the BAM and the directory.
pub const DIRECTORY_TRACK: u8 = 18;

/// Bytes per sector.
const SECTOR_SIZE: usize = 256;

/// Payload bytes per file sector (the rest is the link).
const SECTOR_PAYLOAD: usize = SECTOR_SIZE - 2;

/// Directory entries per directory sector.
const DIRECTORY_ENTRIES: usize = 8;

/// Directory entry size.
const ENTRY_SIZE: usize = 32;

/// Closed PRG file type.
const FILE_TYPE_PRG: u8 = 0x82;

/// Shifted space, the padding character of names.
const PAD: u8 = 0xA0;

/// Sectors on a track (0 for tracks that do not exist).
pub const fn sectors_in_track(track: u8) -> u8 {
    match track {
        1..=17 => 21,
        18..=24 => 19,
        25..=30 => 18,
        31..=35 => 17,
        _ => 0,
    }
}

/// Byte offset of a sector in the image.
pub fn sector_offset(track: u8, sector: u8) -> Option<usize> {
    if sector >= sectors_in_track(track) {
        return None;
    }
    Some((track_offset(track) + sector as usize) * SECTOR_SIZE)
}

/// Number of sectors before the first sector of `track`.
const fn track_offset(track: u8) -> usize {
    let mut sectors = 0usize;
    let mut t = 1;
    while t < track {
        sectors += sectors_in_track(t) as usize;
        t += 1;
    }
    sectors
}

const BAM_OFFSET: usize = track_offset(DIRECTORY_TRACK) * SECTOR_SIZE;
const DIRECTORY_OFFSET: usize = BAM_OFFSET + SECTOR_SIZE;

/// Offset of the BAM entry of a track.
const fn bam_entry(track: u8) -> usize {
    BAM_OFFSET + 4 + (track as usize - 1) * 4
}

/// Convert a name to 16 upper-case, padded bytes.
fn disk_name_bytes(name: &str) -> [u8; 16] {
    let mut bytes = [PAD; 16];
    for (slot, c) in bytes.iter_mut().zip(name.bytes()) {
        *slot = c.to_ascii_uppercase();
    }
    bytes
}

/// A 1541 disk image under construction.
#[derive(Debug, Clone)]
pub struct D64Image {
    data: Vec<u8>,
    /// Next sector to try when allocating.
    cursor: (u8, u8),
}

impl D64Image {
    /// Create a formatted, empty disk.
    pub fn new(disk_name: &str) -> Self {
        let mut image = Self {
            data: vec![0; D64_SIZE],
            cursor: (1, 0),
        };
        image.format(disk_name);
        image
    }

    fn format(&mut self, disk_name: &str) {
        let bam = BAM_OFFSET;
        self.data[bam] = DIRECTORY_TRACK;
        self.data[bam + 1] = 1;
        self.data[bam + 2] = b'A';

        for track in 1..=NUM_TRACKS {
            let sectors = sectors_in_track(track);
            let entry = bam_entry(track);
            self.data[entry] = sectors;
            let free = (1u32 << sectors) - 1;
            self.data[entry + 1..entry + 4].copy_from_slice(&free.to_le_bytes()[..3]);
        }
        self.mark_used(DIRECTORY_TRACK, 0);
        self.mark_used(DIRECTORY_TRACK, 1);

        self.data[bam + 0x90..bam + 0xA0].copy_from_slice(&disk_name_bytes(disk_name));
        self.data[bam + 0xA0..bam + 0xAB].copy_from_slice(&[
            PAD, PAD, b'0', b'1', PAD, b'2', b'A', PAD, PAD, PAD, PAD,
        ]);

        self.data[DIRECTORY_OFFSET + 1] = 0xFF;
    }

    fn is_free(&self, track: u8, sector: u8) -> bool {
        let byte = bam_entry(track) + 1 + (sector / 8) as usize;
        self.data[byte] & (1 << (sector % 8)) != 0
    }

    fn mark_used(&mut self, track: u8, sector: u8) {
        if !self.is_free(track, sector) {
            return;
        }
        let entry = bam_entry(track);
        self.data[entry] -= 1;
        self.data[entry + 1 + (sector / 8) as usize] &= !(1 << (sector % 8));
    }

    /// Allocate the next free sector outside the directory track.
    fn allocate(&mut self) -> Option<(u8, u8)> {
        let (mut track, mut sector) = self.cursor;
        while track <= NUM_TRACKS {
            if track != DIRECTORY_TRACK && sector < sectors_in_track(track) {
                if self.is_free(track, sector) {
                    self.mark_used(track, sector);
                    self.cursor = (track, sector + 1);
                    return Some((track, sector));
                }
                sector += 1;
            } else {
                track += 1;
                sector = 0;
            }
        }
        None
    }

    /// Count the free sectors outside the directory track.
    pub fn free_sectors(&self) -> usize {
        (1..=NUM_TRACKS)
            .filter(|&track| track != DIRECTORY_TRACK)
            .map(|track| self.data[bam_entry(track)] as usize)
            .sum()
    }

    /// Store a PRG file (load address included) on the disk.
    pub fn add_prg(&mut self, name: &str, prg: &[u8]) -> io::Result<()> {
        let entry = (0..DIRECTORY_ENTRIES)
            .map(|i| DIRECTORY_OFFSET + i * ENTRY_SIZE)
            .find(|&offset| self.data[offset + 2] == 0)
            .ok_or_else(|| io::Error::other("directory full"))?;

        let chunks: Vec<&[u8]> = prg.chunks(SECTOR_PAYLOAD).collect();
        if chunks.len() > self.free_sectors() {
            return Err(io::Error::other("disk full"));
        }

        let mut sectors = Vec::with_capacity(chunks.len());
        for _ in &chunks {
            sectors.push(self.allocate().ok_or_else(|| io::Error::other("disk full"))?);
        }

        for (i, chunk) in chunks.iter().enumerate() {
            let (track, sector) = sectors[i];
            let offset = sector_offset(track, sector)
                .ok_or_else(|| io::Error::other("sector outside of the disk"))?;
            let link = match sectors.get(i + 1) {
                Some(&next) => next,
                // Last sector: track 0, then the index of the last used byte.
                None => (0, (chunk.len() + 1) as u8),
            };
            self.data[offset] = link.0;
            self.data[offset + 1] = link.1;
            self.data[offset + 2..offset + 2 + chunk.len()].copy_from_slice(chunk);
        }

        let (first_track, first_sector) = sectors.first().copied().unwrap_or((0, 0));
        self.data[entry + 2] = FILE_TYPE_PRG;
        self.data[entry + 3] = first_track;
        self.data[entry + 4] = first_sector;
        self.data[entry + 5..entry + 21].copy_from_slice(&disk_name_bytes(name));
        self.data[entry + 0x1E..entry + 0x20]
            .copy_from_slice(&(sectors.len() as u16).to_le_bytes());

        tracing::debug!(name, sectors = sectors.len(), "added file to disk image");
        Ok(())
    }

    /// Get the raw image.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Write the image to a file.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        fs::write(path, &self.data)
    }
}

/// Write a PRG image as the only file of a new disk.
pub fn write_d64(prg: &[u8], path: &Path, program_name: &str) -> io::Result<()> {
    let mut image = D64Image::new(program_name);
    image.add_prg(program_name, prg)?;
    image.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sectors_per_track() {
        assert_eq!(sectors_in_track(0), 0);
        assert_eq!(sectors_in_track(1), 21);
        assert_eq!(sectors_in_track(18), 19);
        assert_eq!(sectors_in_track(35), 17);
        assert_eq!(sectors_in_track(36), 0);
    }

    #[test]
    fn test_layout_constants() {
        assert_eq!(BAM_OFFSET, 0x16500);
        assert_eq!(sector_offset(18, 1), Some(DIRECTORY_OFFSET));
        assert_eq!(sector_offset(35, 16), Some(D64_SIZE - SECTOR_SIZE));
        assert!(sector_offset(1, 21).is_none());
    }

    #[test]
    fn test_empty_disk() {
        let image = D64Image::new("demo");
        let data = image.as_bytes();
        assert_eq!(data.len(), D64_SIZE);
        assert_eq!(&data[BAM_OFFSET..BAM_OFFSET + 3], &[18, 1, b'A']);
        assert_eq!(&data[BAM_OFFSET + 0x90..BAM_OFFSET + 0x94], b"DEMO");
        assert_eq!(data[bam_entry(18)], 17);
        assert_eq!(image.free_sectors(), 664);
    }

    #[test]
    fn test_add_small_file() {
        let mut image = D64Image::new("demo");
        image.add_prg("prog", &[0x00, 0x10, 0x60, 0x00]).unwrap();

        let data = image.as_bytes();
        assert_eq!(data[DIRECTORY_OFFSET + 2], FILE_TYPE_PRG);
        assert_eq!(&data[DIRECTORY_OFFSET + 3..DIRECTORY_OFFSET + 5], &[1, 0]);
        assert_eq!(&data[DIRECTORY_OFFSET + 5..DIRECTORY_OFFSET + 9], b"PROG");

        let sector = sector_offset(1, 0).unwrap();
        assert_eq!(&data[sector..sector + 6], &[0, 5, 0x00, 0x10, 0x60, 0x00]);
        assert_eq!(image.free_sectors(), 663);
    }

    #[test]
    fn test_file_spanning_sectors() {
        let mut image = D64Image::new("demo");
        let prg = vec![0xEA; 300];
        image.add_prg("big", &prg).unwrap();

        let data = image.as_bytes();
        let first = sector_offset(1, 0).unwrap();
        assert_eq!(&data[first..first + 2], &[1, 1]);
        let second = sector_offset(1, 1).unwrap();
        assert_eq!(&data[second..second + 2], &[0, (300 - 254 + 1) as u8]);
        assert_eq!(data[DIRECTORY_OFFSET + 0x1E], 2);
    }

    #[test]
    fn test_directory_full() {
        let mut image = D64Image::new("demo");
        for i in 0..DIRECTORY_ENTRIES {
            image.add_prg(&format!("f{}", i), &[0x00]).unwrap();
        }
        assert!(image.add_prg("one more", &[0x00]).is_err());
    }
}
