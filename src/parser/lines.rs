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

//! Line and directive parsing for the parser.
//!
//! This module handles:
//! - Label definitions (`name:`)
//! - Directives (`.ORG`, `.BYTE`, `.WORD`, `.DBYTE`)
//! - Symbol assignments (`NAME = expr`)

use super::expressions::ExpressionParser;
use super::helpers::ParserHelpers;
use super::statements::StatementParser;
use super::Parser;
use crate::ast::{DataItem, Directive, DirectiveKind, Label, Line, LineBody};
use crate::error::{AsmError, ErrorCode};
use crate::lexer::Token;

/// Extension trait for line parsing.
pub trait LineParser {
    /// Parse one logical line.
    fn parse_line(&mut self) -> Result<Line, AsmError>;

    /// Parse whatever follows the optional label of a line.
    fn parse_line_body(&mut self) -> Result<Option<LineBody>, AsmError>;

    /// Parse a `.NAME ...` directive.
    fn parse_directive(&mut self) -> Result<Directive, AsmError>;

    /// Parse a `NAME = expr` assignment.
    fn parse_assignment(&mut self) -> Result<Directive, AsmError>;

    /// Parse the comma separated items of a data directive.
    fn parse_data_list(&mut self) -> Result<Vec<DataItem>, AsmError>;
}

impl<'a> LineParser for Parser<'a> {
    fn parse_line(&mut self) -> Result<Line, AsmError> {
        let loc = self.current_location();

        let label = if self.check_identifier_followed_by(&Token::Colon) {
            let label_loc = self.current_location();
            let name = match self.advance() {
                Some((Token::Identifier(name), _)) => name,
                _ => return Err(self.error(ErrorCode::UnexpectedToken, "Expected label")),
            };
            self.advance();
            Some(Label {
                name,
                loc: label_loc,
            })
        } else {
            None
        };

        let body_start = self.position;
        let body = match self.parse_line_body() {
            Ok(body) => body,
            // A broken body keeps its label defined.
            Err(error) if label.is_some() => {
                self.errors.push(error);
                self.synchronize();
                None
            }
            Err(error) => return Err(error),
        };

        let is_statement = matches!(body, Some(LineBody::Statement(_)));
        let terminals = self.terminals(body_start, is_statement);

        Ok(Line {
            label,
            body,
            terminals,
            loc,
        })
    }

    fn parse_line_body(&mut self) -> Result<Option<LineBody>, AsmError> {
        if self.at_line_end() || self.check_identifier_followed_by(&Token::Colon) {
            Ok(None)
        } else if self.check(&Token::Dot) {
            Ok(Some(LineBody::Directive(self.parse_directive()?)))
        } else if self.check_identifier_followed_by(&Token::Equal) {
            Ok(Some(LineBody::Directive(self.parse_assignment()?)))
        } else if matches!(self.peek(), Some(Token::Identifier(_))) {
            Ok(Some(LineBody::Statement(self.parse_statement()?)))
        } else {
            let found = self.peek().map_or(String::new(), |t| t.to_string());
            Err(self.error(
                ErrorCode::UnexpectedToken,
                format!("Expected label, directive or instruction, found {}", found),
            ))
        }
    }

    fn parse_directive(&mut self) -> Result<Directive, AsmError> {
        let loc = self.current_location();
        self.expect(&Token::Dot, "Expected '.'")?;

        let name = match self.peek() {
            Some(Token::Identifier(name)) => name.clone(),
            _ => {
                return Err(self.error(
                    ErrorCode::UnknownDirective,
                    "Expected directive name after '.'",
                ))
            }
        };

        let kind = match name.to_ascii_uppercase().as_str() {
            "ORG" => {
                self.advance();
                DirectiveKind::Org(self.parse_expression()?)
            }
            "BYTE" => {
                self.advance();
                DirectiveKind::Byte(self.parse_data_list()?)
            }
            "WORD" => {
                self.advance();
                DirectiveKind::Word(self.parse_data_list()?)
            }
            "DBYTE" => {
                self.advance();
                DirectiveKind::Dbyte(self.parse_data_list()?)
            }
            _ => {
                return Err(self.error(
                    ErrorCode::UnknownDirective,
                    format!("Unknown directive '.{}'", name),
                ))
            }
        };

        Ok(Directive { kind, loc })
    }

    fn parse_assignment(&mut self) -> Result<Directive, AsmError> {
        let loc = self.current_location();
        let name = match self.advance() {
            Some((Token::Identifier(name), _)) => name,
            _ => return Err(self.error(ErrorCode::UnexpectedToken, "Expected symbol name")),
        };
        self.expect(&Token::Equal, "Expected '=' after symbol name")?;
        let value = self.parse_expression()?;

        Ok(Directive {
            kind: DirectiveKind::Assign { name, value },
            loc,
        })
    }

    fn parse_data_list(&mut self) -> Result<Vec<DataItem>, AsmError> {
        let mut items = Vec::new();

        loop {
            let loc = self.current_location();
            if let Some(Token::String(text)) = self.peek() {
                let text = text.clone();
                self.advance();
                items.push(DataItem::Str { text, loc });
            } else {
                items.push(DataItem::Expr(self.parse_expression()?));
            }

            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExprKind, Program};
    use crate::parser::parse;

    fn parse_ok(source: &str) -> Program {
        let tokens = crate::lexer::tokenize(source).unwrap();
        let (program, errors) = parse(source, &tokens);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        program
    }

    #[test]
    fn test_label_and_statement() {
        let program = parse_ok("loop: DEY");
        let line = &program.lines[0];
        assert_eq!(line.label.as_ref().map(|l| l.name.as_str()), Some("loop"));
        assert!(matches!(line.body, Some(LineBody::Statement(_))));
        assert_eq!(line.terminals, vec!["DEY"]);
    }

    #[test]
    fn test_org_directive() {
        let program = parse_ok(".org $1000");
        match &program.lines[0].body {
            Some(LineBody::Directive(Directive {
                kind: DirectiveKind::Org(expr),
                ..
            })) => assert_eq!(expr.kind, ExprKind::Number(0x1000)),
            other => panic!("Expected .ORG, got {:?}", other),
        }
        assert_eq!(program.lines[0].terminals, vec![".", "org", "$1000"]);
    }

    #[test]
    fn test_data_list_with_string() {
        let program = parse_ok(".BYTE \"HI\", $0D, 0");
        match &program.lines[0].body {
            Some(LineBody::Directive(Directive {
                kind: DirectiveKind::Byte(items),
                ..
            })) => {
                assert_eq!(items.len(), 3);
                assert!(matches!(&items[0], DataItem::Str { text, .. } if text == "HI"));
            }
            other => panic!("Expected .BYTE, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment() {
        let program = parse_ok("FOO=42");
        match &program.lines[0].body {
            Some(LineBody::Directive(Directive {
                kind: DirectiveKind::Assign { name, value },
                ..
            })) => {
                assert_eq!(name, "FOO");
                assert_eq!(value.kind, ExprKind::Number(42));
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_index_register_terminals_are_merged() {
        let program = parse_ok("STA [ptr],Y");
        assert_eq!(program.lines[0].terminals, vec!["STA", "[", "ptr", "]", ",Y"]);
    }

    #[test]
    fn test_data_list_commas_stay_separate() {
        let program = parse_ok(".BYTE 1, x");
        assert_eq!(program.lines[0].terminals, vec![".", "BYTE", "1", ",", "x"]);
    }

    #[test]
    fn test_label_survives_broken_body() {
        let source = "here: LDA #\nJMP here";
        let tokens = crate::lexer::tokenize(source).unwrap();
        let (program, errors) = parse(source, &tokens);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::ExpectedExpression);
        assert_eq!(program.lines.len(), 2);
        assert_eq!(
            program.lines[0].label.as_ref().map(|l| l.name.as_str()),
            Some("here")
        );
        assert!(program.lines[0].body.is_none());
    }

    #[test]
    fn test_unknown_directive() {
        let tokens = crate::lexer::tokenize(".FILL 3").unwrap();
        let (_, errors) = parse(".FILL 3", &tokens);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::UnknownDirective);
    }
}
