use crate::{
    lexer::tokens::{Token, TokenKind},
    symbols::{scope::FunctionSignature, ScopeIndex, SymbolId},
};

use super::{ast::{Expr, Stmt}, types::Type};

/// A braced block, or the single statement of a one-line `if`/`while` body.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub scope: ScopeIndex,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub name: String,
    pub symbol: SymbolId,
    pub explicit_type: Option<Type>,
    pub initializer: Expr,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstDeclStmt {
    pub name: String,
    pub symbol: SymbolId,
    pub explicit_type: Type,
    pub initializer: Expr,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub symbol: SymbolId,
    pub type_: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDeclStmt {
    pub name: String,
    pub signature: FunctionSignature,
    /// Scope holding the parameters and the body's declarations.
    pub scope: ScopeIndex,
    pub parameters: Vec<Parameter>,
    pub return_type: Type,
    pub body: Vec<Stmt>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    /// `else` body; an `elif` chain is a nested `If` here.
    pub else_branch: Option<Box<Stmt>>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub line: u32,
}

/// `break` or `continue`.
#[derive(Debug, Clone, PartialEq)]
pub struct JumpStmt {
    pub token: Token,
}

impl JumpStmt {
    pub fn is_break(&self) -> bool {
        self.token.kind == TokenKind::Break
    }
}
