//! Type annotation parsing.
//!
//! Annotations are a single keyword: `int`, `real`, `str`, `bool` or `none`.

use crate::{ast::types::Type, errors::errors::DiagnosticKind};

use super::parser::{ParseResult, Parser};

pub fn parse_type(parser: &mut Parser) -> ParseResult<Type> {
    match Type::from_token_kind(parser.current_token_kind()) {
        Some(type_) => {
            parser.advance();
            Ok(type_)
        }
        None => {
            let token = parser.current_token().lexeme();
            Err(parser.error(DiagnosticKind::UnexpectedToken {
                token,
                message: String::from("expect type"),
            }))
        }
    }
}
