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

//! The semantic assembly pass.
//!
//! The [`Assembler`] listens to a single forward walk over the parse tree.
//! Operand expressions are collected per line on a small stack, the
//! directive or instruction that ends the line consumes them. After the
//! walk, deferred operands and then branch offsets are patched, and the
//! code lines are coalesced into memory blocks.
//!
//! # Module Structure
//!
//! - `opcodes` - Opcode tables per addressing mode
//! - `symbol_table` - Global symbol table
//! - `expression` - Operand expressions and their evaluation
//! - `memory` - Payload, code lines and memory blocks
//! - `emit` - Byte emission (EmitHelpers trait)
//! - `encode` - Instruction encoding (InstructionEncoder trait)
//! - `directives` - Directives, labels and assignments (DirectiveHandler trait)
//! - `resolve` - Deferred operands and branches (PatchResolver trait)

pub mod expression;
pub mod memory;
pub mod opcodes;
pub mod symbol_table;

mod directives;
mod emit;
mod encode;
mod resolve;

use directives::DirectiveHandler;
use encode::InstructionEncoder;
use expression::{ArithmeticError, Expression};
use memory::{CodeLine, MemBlocks, Payload};
use resolve::{BranchPatch, DeferredPatch, PatchResolver};
use symbol_table::SymbolTable;

use crate::ast::{self, BinaryOp, Directive, Label, Line, ParseTreeListener, Program, Statement};
use crate::error::{AsmError, ErrorCode, Errors, Location, DEFAULT_FILE_NAME};
use crate::output;
use crate::{lexer, parser};

/// The result of a successful assembly run.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// The generated memory blocks, sorted by address.
    pub mem_blocks: MemBlocks,
    /// One record per logical source line.
    pub code_lines: Vec<CodeLine>,
    /// Every label and assigned symbol.
    pub symbols: SymbolTable,
}

impl Assembly {
    /// Serialize into a PRG image.
    pub fn prg_image(&self) -> Vec<u8> {
        self.mem_blocks.prg_image()
    }

    /// Render the machine code listing.
    pub fn listing(&self, include_assembly: bool) -> String {
        output::render_listing(&self.code_lines, &self.mem_blocks, include_assembly)
    }

    /// Render the BASIC loader listing.
    pub fn basic_loader(&self) -> String {
        output::basic_loader(&self.mem_blocks)
    }
}

/// The assembler state for one run.
///
/// An instance is consumed by [`Assembler::assemble`]; assembling another
/// source needs a new instance.
pub struct Assembler {
    /// File name used in diagnostics.
    pub(crate) file: String,
    /// Labels and assignments.
    pub(crate) symbols: SymbolTable,
    /// Every byte written so far.
    pub(crate) payload: Payload,
    /// Finished lines.
    pub(crate) code_lines: Vec<CodeLine>,
    /// Expressions of the current line, in the order they were built.
    pub(crate) expressions: Vec<Expression>,
    /// The program counter.
    pub(crate) current_address: u32,
    /// Address of the first byte of the current line.
    pub(crate) line_start: Option<u32>,
    /// Whether the current line wrote over earlier bytes.
    pub(crate) line_overwrites: bool,
    /// Operands to patch after the walk.
    pub(crate) deferred: Vec<DeferredPatch>,
    /// Branches to patch after the walk.
    pub(crate) branches: Vec<BranchPatch>,
    /// Collected diagnostics.
    pub(crate) errors: Errors,
}

impl Assembler {
    /// Create an assembler reporting diagnostics for `file`.
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            symbols: SymbolTable::new(),
            payload: Payload::new(),
            code_lines: Vec::new(),
            expressions: Vec::new(),
            current_address: 0,
            line_start: None,
            line_overwrites: false,
            deferred: Vec::new(),
            branches: Vec::new(),
            errors: Errors::new(),
        }
    }

    /// Assemble a parsed program.
    ///
    /// `syntax_errors` are reported first; the walk still runs so that
    /// semantic errors of the well-formed lines are reported too. Any error
    /// suppresses the result.
    pub fn assemble(
        mut self,
        program: &Program,
        syntax_errors: Vec<AsmError>,
    ) -> Result<Assembly, Vec<AsmError>> {
        self.errors.extend(syntax_errors);

        tracing::trace!(lines = program.lines.len(), "walking parse tree");
        ast::walk(program, &mut self);

        self.resolve_deferred();
        self.resolve_branch_targets();

        if self.errors.has_errors() {
            let mut errors = self.errors.into_vec();
            errors.sort_by_key(|error| (error.line, error.column));
            let file = self.file;
            return Err(errors
                .into_iter()
                .map(|error| error.with_file(file.as_str()))
                .collect());
        }

        tracing::trace!(code_lines = self.code_lines.len(), "building memory blocks");
        let mem_blocks = MemBlocks::build(&self.code_lines, &self.payload);

        Ok(Assembly {
            mem_blocks,
            code_lines: self.code_lines,
            symbols: self.symbols,
        })
    }

    /// Pop the operand of an instruction.
    pub(crate) fn pop_operand(&mut self, statement: &Statement) -> Option<Expression> {
        let operand = self.expressions.pop();
        if operand.is_none() {
            self.internal_error(
                format!("{} has no operand expression", statement.mnemonic),
                statement.loc,
            );
        }
        operand
    }

    pub(crate) fn internal_error(&mut self, message: impl Into<String>, location: Location) {
        self.errors
            .push(AsmError::new(ErrorCode::InternalError, message, location));
    }

    pub(crate) fn arithmetic_error(&mut self, err: ArithmeticError) {
        self.errors.push(AsmError::new(
            ErrorCode::ArithmeticError,
            err.to_string(),
            err.location,
        ));
    }

    pub(crate) fn operand_too_large(
        &mut self,
        operand: &Expression,
        value: u32,
        max: u32,
        location: Location,
    ) {
        self.errors.push(
            AsmError::new(
                ErrorCode::OperandTooLarge,
                format!(
                    "Operand \"{}\" with value \"{}\" is out of its supported value range: [0,{}].",
                    operand, value, max
                ),
                location,
            )
            .with_hint(if max == 0xFF {
                "this addressing mode takes a single byte operand"
            } else {
                "operands are at most 16 bits wide"
            }),
        );
    }
}

impl ParseTreeListener for Assembler {
    fn exit_number(&mut self, value: u32, loc: Location) {
        self.expressions.push(Expression::numeric(value, loc));
    }

    fn exit_symbol(&mut self, name: &str, loc: Location) {
        self.expressions.push(Expression::symbol_ref(name, loc));
    }

    fn exit_binary(&mut self, op: BinaryOp, loc: Location) {
        let (Some(right), Some(left)) = (self.expressions.pop(), self.expressions.pop()) else {
            self.internal_error(format!("Missing operand for '{}'", op), loc);
            return;
        };
        self.expressions
            .push(Expression::binary(op, left, right, loc));
    }

    fn exit_string(&mut self, text: &str, loc: Location) {
        for c in text.chars() {
            self.expressions.push(Expression::numeric(c as u32, loc));
        }
    }

    fn exit_label(&mut self, label: &Label) {
        self.define_symbol(&label.name, self.current_address, label.loc);
    }

    fn exit_directive(&mut self, directive: &Directive) {
        self.handle_directive(directive);
    }

    fn exit_statement(&mut self, statement: &Statement) {
        self.encode_statement(statement);
    }

    fn exit_line(&mut self, line: &Line) {
        let start_address = self.line_start.unwrap_or(self.current_address);
        let length = self.current_address.wrapping_sub(start_address);

        if length > 0 && self.current_address > memory::MAX_ADDRESS + 1 {
            self.errors.push(
                AsmError::new(
                    ErrorCode::ValueOutOfRange,
                    format!(
                        "Line at address 0x{:04x} extends past the end of the address space at 0x{:04x}.",
                        start_address,
                        memory::MAX_ADDRESS
                    ),
                    line.loc,
                )
                .with_hint("move the code with .ORG to a lower address"),
            );
        }

        if self.line_overwrites {
            tracing::warn!(
                line = line.loc.line,
                address = format!("${:04x}", start_address),
                "line overwrites bytes written before"
            );
        }

        self.code_lines.push(CodeLine {
            start_address,
            length,
            label: line.label.as_ref().map(|label| label.name.clone()),
            text: output::pretty_print(&line.terminals),
            line: line.loc.line,
        });

        self.expressions.clear();
        self.line_start = None;
        self.line_overwrites = false;
    }
}

/// Assemble source code.
///
/// Diagnostics name the file `<input>`.
pub fn assemble(source: &str) -> Result<Assembly, Vec<AsmError>> {
    assemble_named(source, DEFAULT_FILE_NAME)
}

/// Assemble source code read from `file_name`.
///
/// Returns either the assembled program or every diagnostic, sorted by
/// position. Lexical errors stop the run before parsing.
pub fn assemble_named(source: &str, file_name: &str) -> Result<Assembly, Vec<AsmError>> {
    let tokens = lexer::tokenize(source).map_err(|errors| {
        errors
            .into_iter()
            .map(|error| error.with_file(file_name))
            .collect::<Vec<_>>()
    })?;
    tracing::trace!(tokens = tokens.len(), "tokenized");

    let (program, syntax_errors) = parser::parse(source, &tokens);
    Assembler::new(file_name).assemble(&program, syntax_errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(source: &str) -> Vec<(u32, Vec<u8>)> {
        let assembly = assemble(source).unwrap_or_else(|errors| panic!("{:?}", errors));
        assembly
            .mem_blocks
            .iter()
            .map(|block| (block.start_address, block.bytes.clone()))
            .collect()
    }

    fn error_codes(source: &str) -> Vec<ErrorCode> {
        match assemble(source) {
            Ok(_) => panic!("expected errors for {:?}", source),
            Err(errors) => errors.into_iter().map(|e| e.code).collect(),
        }
    }

    // ========================================
    // Encoding Tests
    // ========================================

    #[test]
    fn test_end_to_end() {
        assert_eq!(
            blocks(".ORG $1000\nLDA #$00\nSTA $D020\nRTS"),
            vec![(0x1000, vec![0xA9, 0x00, 0x8D, 0x20, 0xD0, 0x60])]
        );
    }

    #[test]
    fn test_forward_jump() {
        let assembly = assemble(".ORG $1000\nJMP later\nlater: RTS").unwrap();
        assert_eq!(assembly.symbols.resolve("later").map(|s| s.value), Some(0x1003));
        assert_eq!(
            assembly.mem_blocks.blocks()[0].bytes,
            vec![0x4C, 0x03, 0x10, 0x60]
        );
    }

    #[test]
    fn test_zero_page_selection() {
        assert_eq!(
            blocks(".ORG $1000\nLDA $FE\nLDA $FE,X\nLDX $FE,Y\nLDA $1234,Y"),
            vec![(0x1000, vec![0xA5, 0xFE, 0xB5, 0xFE, 0xB6, 0xFE, 0xB9, 0x34, 0x12])]
        );
    }

    #[test]
    fn test_forward_zero_page_reference_uses_full_width() {
        assert_eq!(
            blocks(".ORG $1000\nLDA zp\nRTS\nzp = $FE"),
            vec![(0x1000, vec![0xAD, 0xFE, 0x00, 0x60])]
        );
    }

    #[test]
    fn test_indirect_jump_never_uses_zero_page() {
        assert_eq!(
            blocks(".ORG $1000\nJMP [$20]"),
            vec![(0x1000, vec![0x6C, 0x20, 0x00])]
        );
    }

    #[test]
    fn test_accumulator_form() {
        assert_eq!(blocks(".ORG $1000\nASL A\nROR"), vec![(0x1000, vec![0x0A, 0x6A])]);
    }

    #[test]
    fn test_data_directives() {
        assert_eq!(
            blocks(".ORG $C000\n.BYTE 1, \"AB\", 'c'\n.WORD $1234\n.DBYTE $1234"),
            vec![(0xC000, vec![1, 0x41, 0x42, 0x63, 0x34, 0x12, 0x12, 0x34])]
        );
    }

    #[test]
    fn test_labels_do_not_split_blocks() {
        assert_eq!(
            blocks(".ORG $1000\nNOP\nhere:\nCONST = 3\nNOP"),
            vec![(0x1000, vec![0xEA, 0xEA])]
        );
    }

    #[test]
    fn test_org_gap_starts_new_block() {
        assert_eq!(
            blocks(".ORG $1000\nRTS\n.ORG $2000\nRTS"),
            vec![(0x1000, vec![0x60]), (0x2000, vec![0x60])]
        );
    }

    #[test]
    fn test_unresolved_org_is_ignored() {
        assert_eq!(
            blocks(".ORG $1000\nNOP\n.ORG later\nNOP\nlater:"),
            vec![(0x1000, vec![0xEA, 0xEA])]
        );
    }

    #[test]
    fn test_org_overwrite_last_write_wins() {
        assert_eq!(
            blocks(".ORG $1000\n.BYTE 1, 2, 3\n.ORG $1001\n.BYTE 9"),
            vec![(0x1000, vec![1, 9, 3]), (0x1001, vec![9])]
        );
    }

    // ========================================
    // Branch Tests
    // ========================================

    #[test]
    fn test_branch_backward_and_forward() {
        assert_eq!(
            blocks(".ORG $1000\nloop: DEY\nBNE loop\nBEQ done\nNOP\ndone: RTS"),
            vec![(0x1000, vec![0x88, 0xD0, 0xFD, 0xF0, 0x01, 0xEA, 0x60])]
        );
    }

    #[test]
    fn test_branch_offset_127() {
        // BNE at $1000, offset byte at $1001, origin $1002, target $1002 + 127.
        let source = ".ORG $1000\nBNE target\n.ORG $1081\ntarget: RTS";
        let assembly = assemble(source).unwrap();
        assert_eq!(assembly.mem_blocks.byte_at(0x1001), 0x7F);
    }

    #[test]
    fn test_branch_offset_128_is_too_far() {
        let source = ".ORG $1000\nBNE target\n.ORG $1082\ntarget: RTS";
        assert_eq!(error_codes(source), vec![ErrorCode::BranchTargetTooFar]);
    }

    #[test]
    fn test_branch_offset_minus_128() {
        let source = ".ORG $1000\ntarget: RTS\n.ORG $107E\nBNE target";
        let assembly = assemble(source).unwrap();
        assert_eq!(assembly.mem_blocks.byte_at(0x107F), 0x80);
    }

    #[test]
    fn test_branch_offset_minus_129_is_too_far() {
        let source = ".ORG $1000\ntarget: RTS\n.ORG $107F\nBNE target";
        assert_eq!(error_codes(source), vec![ErrorCode::BranchTargetTooFar]);
    }

    #[test]
    fn test_branch_too_far_message() {
        let errors = assemble(".ORG $1000\nBMI far\n.ORG $2000\nfar: RTS").unwrap_err();
        assert_eq!(
            errors[0].message,
            "Branch at address 0x1002 is too far away from the branch target \"far\" at address 0x2000."
        );
        assert_eq!(errors[0].line, 2);
    }

    // ========================================
    // Error Tests
    // ========================================

    #[test]
    fn test_value_out_of_range_emits_nothing() {
        let errors = assemble(".ORG $1000\n.BYTE $100").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::ValueOutOfRange);
        assert_eq!(errors[0].line, 2);
        assert_eq!(
            errors[0].message,
            "Value \"256\" is out of its supported value range: [0,255]."
        );
    }

    #[test]
    fn test_code_ending_at_top_of_memory() {
        assert_eq!(blocks(".ORG $FFFF\nNOP"), vec![(0xFFFF, vec![0xEA])]);
    }

    #[test]
    fn test_code_past_top_of_memory() {
        let errors = assemble(".ORG $FFFF\nNOP\nNOP").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::ValueOutOfRange);
        assert_eq!(errors[0].line, 3);
        assert_eq!(
            errors[0].message,
            "Line at address 0x10000 extends past the end of the address space at 0xffff."
        );
    }

    #[test]
    fn test_assignment_needs_resolved_value() {
        assert_eq!(
            error_codes("A1 = LATER + 1\nLATER = 2"),
            vec![ErrorCode::MissingSymbol]
        );
    }

    #[test]
    fn test_division_by_zero() {
        let errors = assemble(".ORG $1000\nLDA #(4 / 0)").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::ArithmeticError);
        assert_eq!(errors[0].line, 2);
    }

    #[test]
    fn test_errors_carry_file_name() {
        let errors = assemble_named("LDA #BAR", "prog.asm").unwrap_err();
        assert_eq!(errors[0].file, "prog.asm");
        assert_eq!(errors[0].code, ErrorCode::MissingSymbol);
    }

    #[test]
    fn test_immediate_operand_too_large() {
        assert_eq!(
            error_codes("FOO = $100\n.ORG $1000\nLDA #FOO"),
            vec![ErrorCode::OperandTooLarge]
        );
    }

    #[test]
    fn test_zero_page_only_mode_too_large() {
        assert_eq!(
            error_codes(".ORG $1000\nSTX $1234,Y"),
            vec![ErrorCode::OperandTooLarge]
        );
    }

    #[test]
    fn test_syntax_and_semantic_errors_are_merged() {
        assert_eq!(
            error_codes("LDA #\nJMP nowhere"),
            vec![ErrorCode::ExpectedExpression, ErrorCode::MissingSymbol]
        );
    }

    // ========================================
    // Output Tests
    // ========================================

    #[test]
    fn test_listing_rows() {
        let assembly = assemble(".ORG $1000\nstart: LDA #$00\nRTS").unwrap();
        let listing = assembly.listing(true);
        let rows: Vec<_> = listing.lines().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].trim(), ".ORG $1000");
        assert_eq!(rows[1], "0x1000:0xa9,0x00        start       LDA #$00");
        assert_eq!(rows[2], "0x1002:0x60                         RTS");
    }

    #[test]
    fn test_empty_program() {
        let assembly = assemble("; nothing here\n").unwrap();
        assert!(assembly.mem_blocks.is_empty());
        assert_eq!(assembly.prg_image(), vec![0x00]);
    }
}
