use std::fmt::Display;

use thiserror::Error;

use crate::{ast::types::Type, symbols::SymbolId, Position};

/// A recoverable problem found in the user's program.
///
/// Diagnostics are collected by every stage and never abort compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    position: Position,
}

/// The stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Lexical,
    Parse,
    Semantic,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, position: Position) -> Self {
        Diagnostic { kind, position }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_kind(&self) -> &DiagnosticKind {
        &self.kind
    }

    pub fn line(&self) -> u32 {
        self.position.0
    }

    pub fn file(&self) -> &str {
        &self.position.1
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn stage(&self) -> Stage {
        match &self.kind {
            DiagnosticKind::InvalidCharacter { .. }
            | DiagnosticKind::UnterminatedString
            | DiagnosticKind::UnterminatedMultilineString
            | DiagnosticKind::InvalidEscape { .. }
            | DiagnosticKind::IntegerTooLarge { .. } => Stage::Lexical,
            DiagnosticKind::UnexpectedToken { .. }
            | DiagnosticKind::ExpectedExpression { .. }
            | DiagnosticKind::InvalidAssignmentTarget
            | DiagnosticKind::UninitializedVariable { .. }
            | DiagnosticKind::ConstantNotLiteral { .. }
            | DiagnosticKind::TooManyArguments
            | DiagnosticKind::TooManyParameters
            | DiagnosticKind::AlreadyDeclared { .. }
            | DiagnosticKind::FunctionAlreadyDeclared { .. } => Stage::Parse,
            _ => Stage::Semantic,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.kind {
            DiagnosticKind::InvalidCharacter { .. } => "InvalidCharacter",
            DiagnosticKind::UnterminatedString => "UnterminatedString",
            DiagnosticKind::UnterminatedMultilineString => "UnterminatedMultilineString",
            DiagnosticKind::InvalidEscape { .. } => "InvalidEscape",
            DiagnosticKind::IntegerTooLarge { .. } => "IntegerTooLarge",
            DiagnosticKind::UnexpectedToken { .. } => "UnexpectedToken",
            DiagnosticKind::ExpectedExpression { .. } => "ExpectedExpression",
            DiagnosticKind::InvalidAssignmentTarget => "InvalidAssignmentTarget",
            DiagnosticKind::UninitializedVariable { .. } => "UninitializedVariable",
            DiagnosticKind::ConstantNotLiteral { .. } => "ConstantNotLiteral",
            DiagnosticKind::TooManyArguments => "TooManyArguments",
            DiagnosticKind::TooManyParameters => "TooManyParameters",
            DiagnosticKind::AlreadyDeclared { .. } => "AlreadyDeclared",
            DiagnosticKind::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            DiagnosticKind::UndefinedVariable { .. } => "UndefinedVariable",
            DiagnosticKind::TypeNotKnown { .. } => "TypeNotKnown",
            DiagnosticKind::UnaryTypeMismatch { .. } => "UnaryTypeMismatch",
            DiagnosticKind::BinaryTypeMismatch { .. } => "BinaryTypeMismatch",
            DiagnosticKind::TypeMatchError { .. } => "TypeMatchError",
            DiagnosticKind::ConditionNotBool { .. } => "ConditionNotBool",
            DiagnosticKind::NotCallable => "NotCallable",
            DiagnosticKind::NoMatchingOverload { .. } => "NoMatchingOverload",
            DiagnosticKind::AssignToConstant { .. } => "AssignToConstant",
            DiagnosticKind::VoidFunctionReturningValue => "VoidFunctionReturningValue",
            DiagnosticKind::MissingReturnValue { .. } => "MissingReturnValue",
            DiagnosticKind::ReturnOutsideFunction => "ReturnOutsideFunction",
            DiagnosticKind::JumpOutsideLoop { .. } => "JumpOutsideLoop",
            DiagnosticKind::MissingReturn { .. } => "MissingReturn",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.kind {
            DiagnosticKind::InvalidCharacter { .. } => ErrorTip::None,
            DiagnosticKind::UnterminatedString => ErrorTip::Suggestion(String::from(
                "Close the string with the same quote it was opened with",
            )),
            DiagnosticKind::UnterminatedMultilineString => ErrorTip::Suggestion(String::from(
                "Close the string with three matching quotes",
            )),
            DiagnosticKind::InvalidEscape { sequence } => ErrorTip::Suggestion(format!(
                "`{}` needs two hexadecimal digits, e.g. `\\x41`",
                sequence
            )),
            DiagnosticKind::IntegerTooLarge { literal } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                literal
            )),
            DiagnosticKind::UnexpectedToken { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            DiagnosticKind::ExpectedExpression { .. } => ErrorTip::None,
            DiagnosticKind::InvalidAssignmentTarget => ErrorTip::Suggestion(String::from(
                "Only variables can appear on the left of `=`",
            )),
            DiagnosticKind::UninitializedVariable { name } => {
                ErrorTip::Suggestion(format!("Give `{}` a value: `let {} = ...`", name, name))
            }
            DiagnosticKind::ConstantNotLiteral { name } => ErrorTip::Suggestion(format!(
                "Constant `{}` must be initialised with a literal value",
                name
            )),
            DiagnosticKind::TooManyArguments => ErrorTip::None,
            DiagnosticKind::TooManyParameters => ErrorTip::None,
            DiagnosticKind::AlreadyDeclared { name } => {
                ErrorTip::Suggestion(format!("`{}` already declared in this scope", name))
            }
            DiagnosticKind::FunctionAlreadyDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` already declared", function))
            }
            DiagnosticKind::UndefinedVariable { name } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", name))
            }
            DiagnosticKind::TypeNotKnown { name } => ErrorTip::Suggestion(format!(
                "Declare `{}` with an explicit type or move its use below the declaration",
                name
            )),
            DiagnosticKind::UnaryTypeMismatch { .. } => ErrorTip::None,
            DiagnosticKind::BinaryTypeMismatch { .. } => ErrorTip::None,
            DiagnosticKind::TypeMatchError { expected, received } => ErrorTip::Suggestion(
                format!("Expected type `{}`, received `{}`", expected, received),
            ),
            DiagnosticKind::ConditionNotBool { received, .. } => ErrorTip::Suggestion(format!(
                "Conditions must be `bool`, received `{}`",
                received
            )),
            DiagnosticKind::NotCallable => ErrorTip::None,
            DiagnosticKind::NoMatchingOverload { function, arguments } => {
                ErrorTip::Suggestion(format!(
                    "No function `{}` takes ({})",
                    function, arguments
                ))
            }
            DiagnosticKind::AssignToConstant { name } => {
                ErrorTip::Suggestion(format!("Declare `{}` with `let` to reassign it", name))
            }
            DiagnosticKind::VoidFunctionReturningValue => ErrorTip::Suggestion(String::from(
                "Add a return type with `-> type` after the parameters",
            )),
            DiagnosticKind::MissingReturnValue { expected } => {
                ErrorTip::Suggestion(format!("Return a value of type `{}`", expected))
            }
            DiagnosticKind::ReturnOutsideFunction => ErrorTip::None,
            DiagnosticKind::JumpOutsideLoop { .. } => ErrorTip::None,
            DiagnosticKind::MissingReturn { function } => ErrorTip::Suggestion(format!(
                "Every path through `{}` must end in a `return`",
                function
            )),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.position.1, self.position.0, self.kind)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    // Lexical
    #[error("invalid character '{character}'")]
    InvalidCharacter { character: char },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated multi-line string literal")]
    UnterminatedMultilineString,
    #[error("invalid escape sequence `{sequence}`")]
    InvalidEscape { sequence: String },
    #[error("integer literal `{literal}` is too large")]
    IntegerTooLarge { literal: String },

    // Syntax
    #[error("{message}, found {token}")]
    UnexpectedToken { token: String, message: String },
    #[error("expect expression, found {token}")]
    ExpectedExpression { token: String },
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("variable `{name}` must be initialized")]
    UninitializedVariable { name: String },
    #[error("constant `{name}` must be initialized with a literal")]
    ConstantNotLiteral { name: String },
    #[error("can't have more than 65535 arguments")]
    TooManyArguments,
    #[error("can't have more than 65535 parameters")]
    TooManyParameters,
    #[error("`{name}` is already declared in this scope")]
    AlreadyDeclared { name: String },
    #[error("function `{function}` already declared")]
    FunctionAlreadyDeclared { function: String },

    // Semantic
    #[error("undefined variable `{name}`")]
    UndefinedVariable { name: String },
    #[error("`{name}` is used before its type is known")]
    TypeNotKnown { name: String },
    #[error("operator `{operator}` cannot be applied to `{operand}`")]
    UnaryTypeMismatch { operator: String, operand: Type },
    #[error("operator `{operator}` cannot be applied to `{left}` and `{right}`")]
    BinaryTypeMismatch {
        operator: String,
        left: Type,
        right: Type,
    },
    #[error("type mismatch: expected `{expected}`, received `{received}`")]
    TypeMatchError { expected: Type, received: Type },
    #[error("{construct} condition must be `bool`, received `{received}`")]
    ConditionNotBool { construct: String, received: Type },
    #[error("can only call functions")]
    NotCallable,
    #[error("no matching overload for `{function}({arguments})`")]
    NoMatchingOverload { function: String, arguments: String },
    #[error("cannot assign to constant `{name}`")]
    AssignToConstant { name: String },
    #[error("void function returning value")]
    VoidFunctionReturningValue,
    #[error("missing return value of type `{expected}`")]
    MissingReturnValue { expected: Type },
    #[error("return outside of function")]
    ReturnOutsideFunction,
    #[error("`{keyword}` outside of loop")]
    JumpOutsideLoop { keyword: String },
    #[error("not all code paths in `{function}` return a value")]
    MissingReturn { function: String },
}

/// Rejections raised by the symbol table when a declaration collides.
///
/// The parser turns these into diagnostics with the offending name attached.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    #[error("symbol {symbol} already declared in this scope")]
    AlreadyDeclared { symbol: SymbolId },
    #[error("function {symbol} already declared with the same parameter types")]
    FunctionAlreadyDeclared { symbol: SymbolId },
}

/// Faults in the compiler itself. These abort the current operation and
/// never describe a problem in the user's program.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    #[error("internal compiler error: scope {index} does not exist")]
    UnknownScope { index: u32 },
    #[error("internal compiler error: symbol {symbol} is not a variable of scope {scope}")]
    NotAVariable { symbol: SymbolId, scope: u32 },
}
