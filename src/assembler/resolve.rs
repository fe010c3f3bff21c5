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

//! Forward reference resolution.
//!
//! This module handles:
//! - Deferred operands (reserved 2 or 3 byte instructions)
//! - Relative branch offsets
//! - PatchResolver trait running both passes after the walk

use super::emit::EmitHelpers;
use super::expression::Expression;
use super::Assembler;
use crate::error::{AsmError, ErrorCode, Location};

/// An instruction whose operand could not be evaluated when it was encountered.
#[derive(Debug, Clone)]
pub struct DeferredPatch {
    /// The opcode to write.
    pub opcode: u8,
    /// Reserved bytes, opcode included (2 or 3).
    pub width: u32,
    /// The operand expression.
    pub expression: Expression,
    /// Address of the opcode byte.
    pub address: u32,
    /// Where the instruction starts.
    pub location: Location,
}

/// A relative branch waiting for its offset.
#[derive(Debug, Clone)]
pub struct BranchPatch {
    /// Address of the offset byte.
    pub address: u32,
    /// The branch target.
    pub target: Expression,
}

/// Extension trait for the resolution passes.
pub trait PatchResolver {
    /// Evaluate every deferred operand against the final symbol table and
    /// patch the reserved bytes.
    fn resolve_deferred(&mut self);

    /// Compute and patch the offset byte of every branch.
    fn resolve_branch_targets(&mut self);
}

impl PatchResolver for Assembler {
    fn resolve_deferred(&mut self) {
        let patches = std::mem::take(&mut self.deferred);
        tracing::trace!(count = patches.len(), "resolving deferred operands");

        for patch in patches {
            let value = match patch.expression.evaluate(&self.symbols) {
                Ok(Some(value)) => value,
                Ok(None) => {
                    self.errors.push(AsmError::new(
                        ErrorCode::MissingSymbol,
                        format!(
                            "Symbol or expression \"{}\" could not be resolved.",
                            patch.expression
                        ),
                        patch.location,
                    ));
                    continue;
                }
                Err(err) => {
                    self.arithmetic_error(err);
                    continue;
                }
            };

            let max = operand_max(patch.width);
            self.patch_byte(patch.address, patch.opcode);
            if value > max {
                self.operand_too_large(&patch.expression, value, max, patch.location);
                continue;
            }

            self.patch_byte(patch.address + 1, (value & 0xFF) as u8);
            if patch.width == 3 {
                self.patch_byte(patch.address + 2, ((value >> 8) & 0xFF) as u8);
            }
        }
    }

    fn resolve_branch_targets(&mut self) {
        let patches = std::mem::take(&mut self.branches);
        tracing::trace!(count = patches.len(), "resolving branch targets");

        for patch in patches {
            let target = match patch.target.evaluate(&self.symbols) {
                Ok(Some(target)) => target,
                Ok(None) => {
                    self.errors.push(AsmError::new(
                        ErrorCode::UnresolvedBranchTarget,
                        format!(
                            "Symbol or expression \"{}\" could not be resolved",
                            patch.target
                        ),
                        patch.target.location,
                    ));
                    continue;
                }
                Err(err) => {
                    self.arithmetic_error(err);
                    continue;
                }
            };

            // Offsets count from the byte after the offset byte.
            let origin = patch.address.wrapping_add(1);
            let offset = i64::from(target) - i64::from(origin);
            if !(-128..=127).contains(&offset) {
                self.errors.push(
                    AsmError::new(
                        ErrorCode::BranchTargetTooFar,
                        format!(
                            "Branch at address 0x{:x} is too far away from the branch target \"{}\" at address 0x{:x}.",
                            origin, patch.target, target
                        ),
                        patch.target.location,
                    )
                    .with_hint(format!("the offset is {}, branches reach -128 to 127", offset)),
                );
                continue;
            }

            self.patch_byte(patch.address, offset as i8 as u8);
        }
    }
}

/// Largest operand value that fits an instruction of `width` bytes.
pub(crate) fn operand_max(width: u32) -> u32 {
    if width >= 3 {
        0xFFFF
    } else {
        0xFF
    }
}
