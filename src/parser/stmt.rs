use crate::{
    ast::{
        ast::{Expr, Stmt},
        statements::{
            BlockStmt, ConstDeclStmt, ExpressionStmt, FnDeclStmt, IfStmt, JumpStmt, Parameter,
            ReturnStmt, VarDeclStmt, WhileStmt,
        },
        types::Type,
    },
    errors::errors::DiagnosticKind,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    symbols::scope::FunctionSignature,
};

use super::{
    parser::{ParseFailure, ParseResult, Parser, MAX_ARGUMENTS},
    types::parse_type,
};

/// Parses statements until `EOF`, or until the closing `}` when `in_block` is set.
///
/// This is where syntax errors are recovered from: an abandoned statement
/// puts the scope cursor back and the parser skips to the next boundary.
pub fn parse_statements(parser: &mut Parser, in_block: bool) -> Vec<Stmt> {
    let mut body = vec![];

    loop {
        while parser.match_kind(TokenKind::Semicolon) {}

        match parser.current_token_kind() {
            TokenKind::EOF => break,
            TokenKind::CloseCurly if in_block => break,
            TokenKind::CloseCurly => {
                parser.report(DiagnosticKind::UnexpectedToken {
                    token: String::from("}"),
                    message: String::from("unmatched '}'"),
                });
                parser.advance();
                continue;
            }
            _ => {}
        }

        let scope = parser.symbol_table().current_scope();
        match parse_stmt(parser) {
            Ok(stmt) => body.push(stmt),
            Err(ParseFailure) => {
                parser.restore_scope(scope);
                parser.synchronize();
            }
        }
    }

    body
}

pub fn parse_stmt(parser: &mut Parser) -> ParseResult<Stmt> {
    if let Some(stmt_fn) = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        return stmt_fn(parser);
    }

    let expression = parse_expr(parser, BindingPower::Default)?;
    parser.expect_terminator("expect ';' after expression")?;

    Ok(Stmt::Expression(ExpressionStmt { expression }))
}

fn expect_name(parser: &mut Parser, message: &str) -> ParseResult<(String, u32)> {
    let token = parser.expect(TokenKind::Identifier, message)?;
    Ok((token.as_str().unwrap_or_default().to_string(), token.line))
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> ParseResult<Stmt> {
    let start_line = parser.advance().line;
    let (name, line) = expect_name(parser, "expect variable name")?;

    let explicit_type = if parser.match_kind(TokenKind::Colon) {
        Some(parse_type(parser)?)
    } else {
        None
    };

    let symbol = parser.intern(&name);
    parser.declare_variable(symbol, &name, explicit_type, line)?;

    let initializer = match parse_initializer(parser, &name) {
        Ok(initializer) => initializer,
        Err(failure) => {
            parser.symbol_table_mut().abandon_variable(symbol);
            return Err(failure);
        }
    };
    parser.symbol_table_mut().initialize_variable(symbol);

    Ok(Stmt::Variable(VarDeclStmt {
        name,
        symbol,
        explicit_type,
        initializer,
        line: start_line,
    }))
}

fn parse_initializer(parser: &mut Parser, name: &str) -> ParseResult<Expr> {
    if !parser.match_kind(TokenKind::Assignment) {
        return Err(parser.error(DiagnosticKind::UninitializedVariable {
            name: name.to_string(),
        }));
    }

    let initializer = parse_expr(parser, BindingPower::Default)?;
    parser.expect_terminator("expect ';' after variable declaration")?;
    Ok(initializer)
}

pub fn parse_const_decl_stmt(parser: &mut Parser) -> ParseResult<Stmt> {
    let start_line = parser.advance().line;
    let (name, line) = expect_name(parser, "expect constant name")?;

    parser.expect(TokenKind::Colon, "expect ':' and a type after constant name")?;
    let explicit_type = parse_type(parser)?;
    parser.expect(TokenKind::Assignment, "expect constant value")?;

    let initializer = parse_expr(parser, BindingPower::Default)?;
    let value = match &initializer {
        Expr::Literal(literal) => literal.value.clone(),
        _ => {
            return Err(parser.error_at(
                DiagnosticKind::ConstantNotLiteral { name },
                initializer.line(),
            ))
        }
    };
    parser.expect_terminator("expect ';' after constant declaration")?;

    let symbol = parser.intern(&name);
    parser.declare_constant(symbol, &name, value, explicit_type, line)?;

    Ok(Stmt::Constant(ConstDeclStmt {
        name,
        symbol,
        explicit_type,
        initializer,
        line: start_line,
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> ParseResult<Stmt> {
    let line = parser.advance().line;

    let value = if parser.current_token().is_one_of_many(&[
        TokenKind::Semicolon,
        TokenKind::CloseCurly,
        TokenKind::EOF,
    ]) {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };
    parser.expect_terminator("expect ';' after return value")?;

    Ok(Stmt::Return(ReturnStmt { value, line }))
}

/// Parses `{ ... }` in a new scope.
fn parse_block(parser: &mut Parser, message: &str) -> ParseResult<BlockStmt> {
    parser.expect(TokenKind::OpenCurly, message)?;

    let scope = parser.symbol_table_mut().begin_scope();
    let body = parse_statements(parser, true);
    parser.expect(TokenKind::CloseCurly, "expect '}' after block")?;
    parser.symbol_table_mut().exit_scope();

    Ok(BlockStmt { body, scope })
}

pub fn parse_block_stmt(parser: &mut Parser) -> ParseResult<Stmt> {
    Ok(Stmt::Block(parse_block(parser, "expect '{'")?))
}

/// The body of `if`, `elif`, `else` and `while`: a block, or `: statement` on one line.
fn parse_branch_body(parser: &mut Parser, construct: &str) -> ParseResult<Stmt> {
    if parser.match_kind(TokenKind::Colon) {
        let scope = parser.symbol_table_mut().begin_scope();
        let stmt = parse_stmt(parser)?;
        parser.symbol_table_mut().exit_scope();

        return Ok(Stmt::Block(BlockStmt {
            body: vec![stmt],
            scope,
        }));
    }

    let message = format!("expect '{{' or ':' after {} condition", construct);
    Ok(Stmt::Block(parse_block(parser, &message)?))
}

fn parse_if_rest(parser: &mut Parser, line: u32) -> ParseResult<Stmt> {
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.match_kind(TokenKind::Semicolon);
    let then_branch = parse_branch_body(parser, "if")?;

    // A newline after `}` puts a `;` in front of `else`/`elif`.
    if parser.current_token_kind() == TokenKind::Semicolon
        && matches!(parser.peek_kind(1), TokenKind::Else | TokenKind::Elif)
    {
        parser.advance();
    }

    let else_branch = match parser.current_token_kind() {
        TokenKind::Elif => {
            let elif_line = parser.advance().line;
            Some(Box::new(parse_if_rest(parser, elif_line)?))
        }
        TokenKind::Else => {
            parser.advance();
            parser.match_kind(TokenKind::Semicolon);
            if parser.current_token_kind() == TokenKind::Colon {
                Some(Box::new(parse_branch_body(parser, "else")?))
            } else {
                Some(Box::new(parse_stmt(parser)?))
            }
        }
        _ => None,
    };

    Ok(Stmt::If(IfStmt {
        condition,
        then_branch: Box::new(then_branch),
        else_branch,
        line,
    }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> ParseResult<Stmt> {
    let line = parser.advance().line;
    parse_if_rest(parser, line)
}

pub fn parse_while_stmt(parser: &mut Parser) -> ParseResult<Stmt> {
    let line = parser.advance().line;

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.match_kind(TokenKind::Semicolon);
    let body = parse_branch_body(parser, "while")?;

    Ok(Stmt::While(WhileStmt {
        condition,
        body: Box::new(body),
        line,
    }))
}

pub fn parse_jump_stmt(parser: &mut Parser) -> ParseResult<Stmt> {
    let token = parser.advance().clone();
    let message = format!("expect ';' after '{}'", token.kind);
    parser.expect_terminator(&message)?;

    Ok(Stmt::Jump(JumpStmt { token }))
}

/// `def name(a: int, b: str) -> type { ... }`
///
/// Parameters and body share one scope. The signature is declared in the
/// enclosing scope once the body is parsed.
pub fn parse_fn_decl_stmt(parser: &mut Parser) -> ParseResult<Stmt> {
    let line = parser.advance().line;
    let (name, _) = expect_name(parser, "expect function name")?;
    parser.expect(TokenKind::OpenParen, "expect '(' after function name")?;

    let scope = parser.symbol_table_mut().begin_scope();
    let mut parameters = vec![];

    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            if parameters.len() == MAX_ARGUMENTS {
                parser.report(DiagnosticKind::TooManyParameters);
            }

            let (parameter_name, parameter_line) = expect_name(parser, "expect parameter name")?;
            parser.expect(TokenKind::Colon, "expect ':' after parameter name")?;
            let type_ = parse_type(parser)?;

            let symbol = parser.intern(&parameter_name);
            parser.declare_parameter(symbol, &parameter_name, type_, parameter_line)?;
            parameters.push(Parameter {
                name: parameter_name,
                symbol,
                type_,
            });

            if !parser.match_kind(TokenKind::Comma) {
                break;
            }
        }
    }

    parser.expect(TokenKind::CloseParen, "expect ')' after parameters")?;

    let return_type = if parser.match_kind(TokenKind::Arrow) {
        parse_type(parser)?
    } else {
        Type::None
    };

    parser.expect(TokenKind::OpenCurly, "expect '{' before function body")?;
    let body = parse_statements(parser, true);
    parser.expect(TokenKind::CloseCurly, "expect '}' after function body")?;
    parser.symbol_table_mut().exit_scope();

    let symbol = parser.intern(&name);
    let parameter_types: Vec<Type> = parameters.iter().map(|parameter| parameter.type_).collect();
    let signature = FunctionSignature::new(symbol, parameter_types.clone());

    if parser
        .symbol_table_mut()
        .register_function(symbol, return_type, parameter_types)
        .is_err()
    {
        parser.report_at(
            DiagnosticKind::FunctionAlreadyDeclared {
                function: name.clone(),
            },
            line,
        );
    }

    Ok(Stmt::Function(FnDeclStmt {
        name,
        signature,
        scope,
        parameters,
        return_type,
        body,
        line,
    }))
}
