//! Type system definitions for the AST.
//!
//! The language has five primitive types and no composite types. Types
//! appear in the AST as annotations on declarations and are what the type
//! checker infers for expressions.

use std::fmt::Display;

use crate::lexer::tokens::{Token, TokenKind, TokenValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Real,
    Bool,
    Str,
    None,
}

impl Type {
    /// Maps a type keyword to its type.
    pub fn from_token_kind(kind: TokenKind) -> Option<Type> {
        match kind {
            TokenKind::Int => Some(Type::Int),
            TokenKind::Real => Some(Type::Real),
            TokenKind::Bool => Some(Type::Bool),
            TokenKind::Str => Some(Type::Str),
            TokenKind::None => Some(Type::None),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Real)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Real => write!(f, "real"),
            Type::Bool => write!(f, "bool"),
            Type::Str => write!(f, "str"),
            Type::None => write!(f, "none"),
        }
    }
}

/// Formats a list of types as `int, str`.
pub fn format_types(types: &[Type]) -> String {
    types
        .iter()
        .map(|type_| type_.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The value of a literal, as stored for constants.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Real(f64),
    Str(String),
    Bool(bool),
    None,
}

impl LiteralValue {
    /// Reads the value of a literal token. Returns `None` for any other token.
    pub fn from_token(token: &Token) -> Option<LiteralValue> {
        match (token.kind, &token.value) {
            (TokenKind::IntLiteral, Some(TokenValue::Int(value))) => Some(LiteralValue::Int(*value)),
            (TokenKind::RealLiteral, Some(TokenValue::Real(value))) => {
                Some(LiteralValue::Real(*value))
            }
            (TokenKind::StringLiteral, Some(TokenValue::Str(value))) => {
                Some(LiteralValue::Str(value.clone()))
            }
            (TokenKind::True, _) => Some(LiteralValue::Bool(true)),
            (TokenKind::False, _) => Some(LiteralValue::Bool(false)),
            (TokenKind::None, _) => Some(LiteralValue::None),
            _ => None,
        }
    }

    pub fn get_type(&self) -> Type {
        match self {
            LiteralValue::Int(_) => Type::Int,
            LiteralValue::Real(_) => Type::Real,
            LiteralValue::Str(_) => Type::Str,
            LiteralValue::Bool(_) => Type::Bool,
            LiteralValue::None => Type::None,
        }
    }
}

impl Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralValue::Int(value) => write!(f, "{}", value),
            LiteralValue::Real(value) => write!(f, "{}", value),
            LiteralValue::Str(value) => write!(f, "'{}'", value),
            LiteralValue::Bool(value) => write!(f, "{}", value),
            LiteralValue::None => write!(f, "none"),
        }
    }
}
