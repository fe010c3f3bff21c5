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

//! Error types for the assembler.
//!
//! Every diagnostic, lexical, syntactic or semantic, is an [`AsmError`]
//! pinned to a file, line and column. Errors are collected, never thrown:
//! an assembly run either yields a memory image or a non-empty error list.

use std::ops::Range;
use thiserror::Error;

use ariadne::{Config, Label, Report, ReportKind, Source};

/// The file name used when no source file is known.
pub const DEFAULT_FILE_NAME: &str = "<input>";

/// A source span representing a range in the source code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Get the length of this span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans into one that covers both.
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// Where a syntactic construct starts: 1-based line and column plus its byte span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte range of the construct.
    pub span: Span,
}

impl Location {
    /// Create a new location.
    pub fn new(line: usize, column: usize, span: Span) -> Self {
        Self { line, column, span }
    }

    /// Extend the span of this location to cover `other` as well.
    pub fn through(&self, other: &Location) -> Location {
        Location {
            line: self.line,
            column: self.column,
            span: self.span.merge(&other.span),
        }
    }
}

/// Maps byte offsets to line/column pairs.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the first character of every line.
    line_starts: Vec<usize>,
    /// Length of the indexed source.
    len: usize,
}

impl LineIndex {
    /// Index the line starts of `source`.
    pub fn new(source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// Resolve a span to the location of its first byte.
    pub fn locate(&self, span: Span) -> Location {
        let offset = span.start.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        Location::new(line + 1, offset - self.line_starts[line] + 1, span)
    }
}

/// Error codes for the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lexical errors (E001-E010)
    InvalidCharacter,
    InvalidNumber,
    UnterminatedString,
    InvalidCharLiteral,

    // Syntax errors (E100-E110)
    UnexpectedToken,
    UnexpectedEndOfFile,
    ExpectedExpression,
    UnknownMnemonic,
    UnknownDirective,
    InvalidAddressingMode,

    // Semantic errors (E200-E210)
    DuplicateSymbol,
    MissingSymbol,
    UnresolvedBranchTarget,
    BranchTargetTooFar,
    ValueOutOfRange,
    OperandTooLarge,
    ArithmeticError,
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            // Lexical errors
            ErrorCode::InvalidCharacter => "E001",
            ErrorCode::InvalidNumber => "E002",
            ErrorCode::UnterminatedString => "E003",
            ErrorCode::InvalidCharLiteral => "E004",

            // Syntax errors
            ErrorCode::UnexpectedToken => "E100",
            ErrorCode::UnexpectedEndOfFile => "E101",
            ErrorCode::ExpectedExpression => "E102",
            ErrorCode::UnknownMnemonic => "E103",
            ErrorCode::UnknownDirective => "E104",
            ErrorCode::InvalidAddressingMode => "E105",

            // Semantic errors
            ErrorCode::DuplicateSymbol => "E200",
            ErrorCode::MissingSymbol => "E201",
            ErrorCode::UnresolvedBranchTarget => "E202",
            ErrorCode::BranchTargetTooFar => "E203",
            ErrorCode::ValueOutOfRange => "E204",
            ErrorCode::OperandTooLarge => "E205",
            ErrorCode::ArithmeticError => "E206",
            ErrorCode::InternalError => "E299",
        }
    }

    /// Whether this code is raised by the lexer or the parser.
    pub fn is_syntax(&self) -> bool {
        self.code() < "E200"
    }
}

/// An assembler diagnostic with source location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}:{line}:{column}: error: {message}")]
pub struct AsmError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// The source file name.
    pub file: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// The source span where the error occurred.
    pub span: Span,
    /// Optional hint for fixing the error.
    pub hint: Option<String>,
}

impl AsmError {
    /// Create a new error at the given location.
    pub fn new(code: ErrorCode, message: impl Into<String>, location: Location) -> Self {
        Self {
            code,
            message: message.into(),
            file: DEFAULT_FILE_NAME.to_string(),
            line: location.line,
            column: location.column,
            span: location.span,
            hint: None,
        }
    }

    /// Add a hint to this error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Attribute this error to a source file.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    /// Get the error code string.
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }
}

/// Result type for assembler operations.
pub type Result<T> = std::result::Result<T, AsmError>;

/// Format an error as a single compiler-style line (`file:line:col: error: msg`).
pub fn format_error(error: &AsmError) -> String {
    let mut output = format!("{} [{}]", error, error.code_str());
    if let Some(hint) = &error.hint {
        output.push_str(&format!(" (hint: {})", hint));
    }
    output
}

/// Render an error as a multi-line report with a source excerpt.
pub fn render_report(error: &AsmError, source: &str, color: bool) -> String {
    let file = error.file.clone();
    let start = error.span.start.min(source.len());
    let end = error.span.end.clamp(start, source.len());

    let mut label = Label::new((file.clone(), start..end)).with_message(&error.message);
    if color {
        label = label.with_color(ariadne::Color::Red);
    }

    let mut builder = Report::build(ReportKind::Error, file.clone(), start)
        .with_config(Config::default().with_color(color))
        .with_code(error.code_str())
        .with_message(&error.message)
        .with_label(label);
    if let Some(hint) = &error.hint {
        builder = builder.with_help(hint);
    }

    let mut output = Vec::new();
    let written = builder
        .finish()
        .write((file, Source::from(source)), &mut output);
    match written {
        Ok(()) => String::from_utf8_lossy(&output).into_owned(),
        Err(_) => format!("{}\n", format_error(error)),
    }
}

/// A collection of assembler errors, in the order they were raised.
#[derive(Debug, Default, Clone)]
pub struct Errors {
    errors: Vec<AsmError>,
}

impl Errors {
    /// Create a new empty error collection.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error to the collection.
    pub fn push(&mut self, error: AsmError) {
        self.errors.push(error);
    }

    /// Append all errors of another collection.
    pub fn extend(&mut self, errors: impl IntoIterator<Item = AsmError>) {
        self.errors.extend(errors);
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get an iterator over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &AsmError> {
        self.errors.iter()
    }

    /// Convert into a vector of errors.
    pub fn into_vec(self) -> Vec<AsmError> {
        self.errors
    }
}

impl IntoIterator for Errors {
    type Item = AsmError;
    type IntoIter = std::vec::IntoIter<AsmError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
