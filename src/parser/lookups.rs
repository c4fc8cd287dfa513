use std::collections::HashMap;

use crate::{
    ast::ast::{Expr, Stmt},
    lexer::tokens::TokenKind,
};

use super::{
    expr::*,
    parser::{ParseResult, Parser},
    stmt::*,
};

/// Operator precedence, lowest first.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    LogicalOr,
    LogicalAnd,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Call,
    Primary,
}

pub type StmtHandler = fn(&mut Parser) -> ParseResult<Stmt>;
pub type NUDHandler = fn(&mut Parser) -> ParseResult<Expr>;
pub type LEDHandler = fn(&mut Parser, Expr, BindingPower) -> ParseResult<Expr>;

pub fn create_token_lookups(parser: &mut Parser) {
    parser.led(TokenKind::Assignment, BindingPower::Assignment, parse_assignment_expr);

    // Logical
    parser.led(TokenKind::Or, BindingPower::LogicalOr, parse_logical_expr);
    parser.led(TokenKind::And, BindingPower::LogicalAnd, parse_logical_expr);

    // Equality and relational
    parser.led(TokenKind::Equals, BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::NotEquals, BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::Less, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::LessEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Greater, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::GreaterEquals, BindingPower::Relational, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);

    parser.led(TokenKind::OpenParen, BindingPower::Call, parse_call_expr);

    // Literals and symbols
    parser.nud(TokenKind::IntLiteral, parse_literal_expr);
    parser.nud(TokenKind::RealLiteral, parse_literal_expr);
    parser.nud(TokenKind::StringLiteral, parse_literal_expr);
    parser.nud(TokenKind::True, parse_literal_expr);
    parser.nud(TokenKind::False, parse_literal_expr);
    parser.nud(TokenKind::None, parse_literal_expr);
    parser.nud(TokenKind::Identifier, parse_variable_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::Dash, parse_unary_expr);
    parser.nud(TokenKind::Not, parse_unary_expr);

    // Statements
    parser.stmt(TokenKind::Const, parse_const_decl_stmt);
    parser.stmt(TokenKind::Let, parse_var_decl_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::OpenCurly, parse_block_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
    parser.stmt(TokenKind::Break, parse_jump_stmt);
    parser.stmt(TokenKind::Continue, parse_jump_stmt);
    parser.stmt(TokenKind::Def, parse_fn_decl_stmt);
}

// Dispatch tables owned by each parser, keyed by the current token kind
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
