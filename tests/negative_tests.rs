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

//! Negative/Error tests for the Asm6502 assembler.
//!
//! These tests verify that the assembler rejects invalid programs, reports
//! every error on the right line and never returns a memory image together
//! with errors.

use asm6502::{assemble, assemble_named, lexer, AsmError, ErrorCode};
use pretty_assertions::assert_eq;
use test_case::test_case;

fn errors_of(source: &str) -> Vec<AsmError> {
    match assemble(source) {
        Ok(assembly) => panic!(
            "expected errors, got {} memory block(s)",
            assembly.mem_blocks.len()
        ),
        Err(errors) => errors,
    }
}

fn error_lines(source: &str) -> Vec<usize> {
    errors_of(source).iter().map(|e| e.line).collect()
}

fn error_codes(source: &str) -> Vec<ErrorCode> {
    errors_of(source).iter().map(|e| e.code).collect()
}

// ============================================================================
// Lexer Error Tests
// ============================================================================

#[test_case("LDA #@\n", ErrorCode::InvalidCharacter; "at_sign")]
#[test_case("LDA #`\n", ErrorCode::InvalidCharacter; "backtick")]
#[test_case(".BYTE \"open\n", ErrorCode::UnterminatedString; "unterminated_string")]
#[test_case("LDA #$1FFFFFFFF\n", ErrorCode::InvalidNumber; "number_too_large")]
fn test_lexer_errors(source: &str, expected: ErrorCode) {
    let errors = lexer::tokenize(source).unwrap_err();
    assert_eq!(errors[0].code, expected);
    assert_eq!(error_codes(source)[0], expected);
}

#[test]
fn test_lexer_reports_all_errors() {
    let errors = lexer::tokenize("LDA #@\nLDX #`\n").unwrap_err();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].line, 1);
    assert_eq!(errors[1].line, 2);
}

// ============================================================================
// Syntax Error Tests
// ============================================================================

#[test_case(".ORG $1000\nRTE\n", ErrorCode::UnknownMnemonic; "unknown_mnemonic")]
#[test_case(".ORGX $1000\n", ErrorCode::UnknownDirective; "unknown_directive")]
#[test_case("JMP #$10\n", ErrorCode::InvalidAddressingMode; "jmp_immediate")]
#[test_case("STA #$10\n", ErrorCode::InvalidAddressingMode; "sta_immediate")]
#[test_case("LDA [ptr,Y]\n", ErrorCode::InvalidAddressingMode; "indexed_indirect_with_y")]
#[test_case("LDA [ptr],X\n", ErrorCode::InvalidAddressingMode; "indirect_indexed_with_x")]
#[test_case("LDA $10,Z\n", ErrorCode::UnexpectedToken; "bad_index_register")]
#[test_case("LDA (1 + 2\n", ErrorCode::UnexpectedToken; "unclosed_paren")]
#[test_case("LDA #\n", ErrorCode::ExpectedExpression; "missing_operand")]
#[test_case(": RTS\n", ErrorCode::UnexpectedToken; "stray_colon")]
fn test_syntax_errors(source: &str, expected: ErrorCode) {
    assert_eq!(error_codes(source), vec![expected]);
}

#[test]
fn test_unknown_command_detected() {
    let source = ".ORG $1000\nRTE\n";
    assert_eq!(error_lines(source), vec![2]);
}

#[test]
fn test_parser_recovers_after_syntax_error() {
    let source = ".ORG $1000\nRTE\nLDA #\nRTS\nFOO\n";
    assert_eq!(error_lines(source), vec![2, 3, 5]);
}

// ============================================================================
// Semantic Error Tests
// ============================================================================

#[test]
fn test_duplicate_jump_labels_detected() {
    let source = ".ORG $1000 \n\
                  \x20   duplicatedJumpLabel: LDA#$01 \n\
                  \x20   duplicatedJumpLabel: LDA#$02 \n";

    let errors = errors_of(source);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 3);
    assert_eq!(errors[0].code, ErrorCode::DuplicateSymbol);
    assert_eq!(
        errors[0].message,
        "Redefinition of Symbol \"duplicatedJumpLabel\" detected. See previous definition at <input>:2:5"
    );
}

#[test]
fn test_duplicate_symbols_detected() {
    let source = "    FOO=42\n    BAR=43\n    FOO=44\n    .ORG $1000 \n    LDA#$01 \n";
    assert_eq!(error_lines(source), vec![3]);
    assert_eq!(error_codes(source), vec![ErrorCode::DuplicateSymbol]);
}

#[test]
fn test_label_clashing_with_assignment() {
    let source = "start = $C000\n.ORG $1000\nstart: RTS\n";
    assert_eq!(error_codes(source), vec![ErrorCode::DuplicateSymbol]);
}

#[test]
fn test_data_directives_out_of_range() {
    let source = "        .ORG $1000 \n\
                  \x20       .BYTE $01 \n\
                  \x20       .BYTE $100 \n\
                  \x20       .WORD $FFFE \n\
                  \x20       .WORD $FFFE1 \n\
                  \x20       .DBYTE $1234 \n\
                  \x20       .WORD $12345 \n";

    assert_eq!(error_lines(source), vec![3, 5, 7]);
    assert!(error_codes(source)
        .iter()
        .all(|code| *code == ErrorCode::ValueOutOfRange));
}

#[test]
fn test_byte_out_of_range_message() {
    let errors = errors_of(".ORG $1000\n.BYTE $100\n");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message,
        "Value \"256\" is out of its supported value range: [0,255]."
    );
}

#[test]
fn test_usage_of_undefined_symbols() {
    let source = "        FOO=$12 \n\
                  \x20       .ORG $1000 \n\
                  \x20       LDA #FOO \n\
                  \x20       LDA FOO \n\
                  \x20       LDA #BAR \n\
                  \x20       LDA BAR \n\
                  \x20       JMP [FOO]\n\
                  \x20       JMP [BAR]\n";

    assert_eq!(error_lines(source), vec![5, 6, 8]);
    assert!(error_codes(source)
        .iter()
        .all(|code| *code == ErrorCode::MissingSymbol));
}

#[test]
fn test_unresolved_forward_jump_and_branch_targets() {
    let source = "        .ORG $1000 \n\
                  \x20       INY \n\
                  \x20       BMI skip_unresolved \n\
                  \x20       LDY #$00 \n\
                  skip:   TYA \n\
                  \x20       JMP skip2_unresolved \n\
                  \x20       NOP \n\
                  skip2:  RTS \n";

    assert_eq!(error_lines(source), vec![3, 6]);
    assert_eq!(
        error_codes(source),
        vec![ErrorCode::UnresolvedBranchTarget, ErrorCode::MissingSymbol]
    );
}

#[test]
fn test_branch_target_too_far_away() {
    let source = "            .ORG $1000 \n\
                  \x20           INY \n\
                  \x20           BMI far_away \n\
                  \x20           .ORG $2000 \n\
                  far_away:   RTS \n";

    let errors = errors_of(source);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 3);
    assert_eq!(errors[0].code, ErrorCode::BranchTargetTooFar);
    assert_eq!(
        errors[0].message,
        "Branch at address 0x1003 is too far away from the branch target \"far_away\" at address 0x2000."
    );
}

#[test]
fn test_operands_too_large() {
    let source = "            MY_OPERAND = $100 \n\
                  \x20           .ORG $1000 \n\
                  \x20           LDA #MY_OPERAND \n\
                  \x20           LDA [MY_OPERAND],Y \n\
                  \x20           LDA [MY_OPERAND,X] \n\
                  \x20           RTS \n";

    assert_eq!(error_lines(source), vec![3, 4, 5]);
    assert!(error_codes(source)
        .iter()
        .all(|code| *code == ErrorCode::OperandTooLarge));
}

#[test]
fn test_resolved_operands_too_large() {
    let source = "            .ORG $1000 \n\
                  \x20           LDA #MY_OPERAND \n\
                  \x20           LDA [MY_OPERAND],Y \n\
                  \x20           LDA [MY_OPERAND,X] \n\
                  \x20           RTS \n\
                  \x20           MY_OPERAND = $100 \n";

    assert_eq!(error_lines(source), vec![2, 3, 4]);
    assert!(error_codes(source)
        .iter()
        .all(|code| *code == ErrorCode::OperandTooLarge));
}

#[test_case(".ORG $1000\nLDA #(1 / 0)\n"; "division")]
#[test_case(".ORG $1000\nLDA #(1 % 0)\n"; "modulo")]
#[test_case(".ORG $1000\n.BYTE 4 / (2 - 2)\n"; "data_item")]
fn test_division_by_zero(source: &str) {
    assert_eq!(error_codes(source), vec![ErrorCode::ArithmeticError]);
}

#[test]
fn test_assignment_of_unresolved_symbol() {
    let source = "FOO = BAR\nBAR = 1\n";
    assert_eq!(error_codes(source), vec![ErrorCode::MissingSymbol]);
    assert_eq!(error_lines(source), vec![1]);
}

#[test]
fn test_origin_above_address_space() {
    let errors = errors_of(".ORG $10000\nNOP\n");
    assert_eq!(errors.len(), 1);
    assert_eq!((errors[0].line, errors[0].column), (1, 6));
    assert_eq!(errors[0].code, ErrorCode::ValueOutOfRange);
    assert_eq!(
        errors[0].message,
        "Value \"65536\" is out of its supported value range: [0,65535]."
    );
}

#[test]
fn test_code_running_past_address_space() {
    let source = ".ORG $FFFF\nNOP\nNOP\n";
    assert_eq!(error_lines(source), vec![3]);
    assert_eq!(error_codes(source), vec![ErrorCode::ValueOutOfRange]);
}

#[test]
fn test_far_origin_never_reaches_the_image() {
    let source = ".ORG $0\nNOP\n.ORG $1000000\nNOP\n";
    assert_eq!(error_lines(source), vec![3]);
    assert_eq!(error_codes(source), vec![ErrorCode::ValueOutOfRange]);
}

#[test]
fn test_label_before_syntax_error_stays_defined() {
    let source = "here: LDA #\nJMP here\n";
    assert_eq!(error_codes(source), vec![ErrorCode::ExpectedExpression]);
    assert_eq!(error_lines(source), vec![1]);
}

// ============================================================================
// Error Reporting
// ============================================================================

#[test]
fn test_errors_are_sorted_by_position() {
    let source = ".ORG $1000\nJMP nowhere\nLDA #$100\n.BYTE $100\n";
    assert_eq!(error_lines(source), vec![2, 3, 4]);
}

#[test]
fn test_errors_carry_file_name() {
    let errors = assemble_named(".ORG $1000\nRTE\n", "demo.asm").unwrap_err();
    assert_eq!(errors[0].file, "demo.asm");
    assert!(errors[0].to_string().starts_with("demo.asm:2:1: error:"));
}

#[test]
fn test_error_column() {
    let errors = errors_of(".ORG $1000\n    LDA #$100\n");
    assert_eq!((errors[0].line, errors[0].column), (2, 5));
}
