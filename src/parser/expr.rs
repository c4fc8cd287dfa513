use crate::{
    ast::{
        ast::Expr,
        expressions::{
            AssignmentExpr, BinaryExpr, BinaryOperator, CallExpr, GroupingExpr, LiteralExpr,
            LogicalExpr, LogicalOperator, UnaryExpr, UnaryOperator, VariableExpr,
        },
        types::LiteralValue,
    },
    errors::errors::DiagnosticKind,
    lexer::tokens::TokenKind,
};

use super::{
    lookups::BindingPower,
    parser::{ParseResult, Parser, MAX_ARGUMENTS},
};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> ParseResult<Expr> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_nud_lookup().get(&token_kind).copied() else {
        let token = parser.current_token().lexeme();
        return Err(parser.error(DiagnosticKind::ExpectedExpression { token }));
    };

    let mut left = nud_fn(parser)?;

    // While the next operator binds tighter than the caller, keep extending lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let Some(led_fn) = parser.get_led_lookup().get(&token_kind).copied() else {
            break;
        };
        left = led_fn(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_literal_expr(parser: &mut Parser) -> ParseResult<Expr> {
    let token = parser.advance().clone();

    match LiteralValue::from_token(&token) {
        Some(value) => Ok(Expr::Literal(LiteralExpr { token, value })),
        None => Err(parser.error_at(
            DiagnosticKind::ExpectedExpression {
                token: token.lexeme(),
            },
            token.line,
        )),
    }
}

pub fn parse_variable_expr(parser: &mut Parser) -> ParseResult<Expr> {
    let token = parser.advance().clone();
    let name = token.as_str().unwrap_or_default().to_string();
    let symbol = parser.intern(&name);
    let scope = parser
        .symbol_table()
        .resolve_value(symbol)
        .map(|(scope, _)| scope);

    Ok(Expr::Variable(VariableExpr {
        name,
        symbol,
        scope,
        line: token.line,
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> ParseResult<Expr> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen, "expect ')' after expression")?;

    Ok(Expr::Grouping(GroupingExpr {
        inner: Box::new(expr),
    }))
}

pub fn parse_unary_expr(parser: &mut Parser) -> ParseResult<Expr> {
    let operator_token = parser.advance().clone();
    let operator = if operator_token.kind == TokenKind::Not {
        UnaryOperator::Not
    } else {
        UnaryOperator::Negate
    };
    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Unary(UnaryExpr {
        operator,
        operand: Box::new(operand),
        line: operator_token.line,
    }))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> ParseResult<Expr> {
    let operator_token = parser.advance().clone();
    let operator = match operator_token.kind {
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Dash => BinaryOperator::Subtract,
        TokenKind::Star => BinaryOperator::Multiply,
        TokenKind::Slash => BinaryOperator::Divide,
        TokenKind::Equals => BinaryOperator::Equal,
        TokenKind::NotEquals => BinaryOperator::NotEqual,
        TokenKind::Less => BinaryOperator::Less,
        TokenKind::LessEquals => BinaryOperator::LessEqual,
        TokenKind::Greater => BinaryOperator::Greater,
        _ => BinaryOperator::GreaterEqual,
    };

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        operator,
        left: Box::new(left),
        right: Box::new(right),
        line: operator_token.line,
    }))
}

pub fn parse_logical_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> ParseResult<Expr> {
    let operator_token = parser.advance().clone();
    let operator = if operator_token.kind == TokenKind::And {
        LogicalOperator::And
    } else {
        LogicalOperator::Or
    };

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Logical(LogicalExpr {
        operator,
        left: Box::new(left),
        right: Box::new(right),
        line: operator_token.line,
    }))
}

/// Right associative: `a = b = c` assigns `c` to `b`, then to `a`.
pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> ParseResult<Expr> {
    let operator_token = parser.advance().clone();
    let value = parse_expr(parser, BindingPower::Default)?;

    match left {
        Expr::Variable(target) => {
            parser.symbol_table_mut().initialize_variable(target.symbol);

            Ok(Expr::Assignment(AssignmentExpr {
                target: target.name,
                symbol: target.symbol,
                scope: target.scope,
                value: Box::new(value),
                line: operator_token.line,
            }))
        }
        other => {
            parser.report_at(DiagnosticKind::InvalidAssignmentTarget, operator_token.line);
            Ok(other)
        }
    }
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> ParseResult<Expr> {
    parser.advance();

    let mut arguments = vec![];

    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            if arguments.len() == MAX_ARGUMENTS {
                parser.report(DiagnosticKind::TooManyArguments);
            }
            arguments.push(parse_expr(parser, BindingPower::Default)?);

            if !parser.match_kind(TokenKind::Comma) {
                break;
            }
        }
    }

    let paren = parser.expect(TokenKind::CloseParen, "expect ')' after arguments")?;

    Ok(Expr::Call(CallExpr {
        callee: Box::new(left),
        paren,
        arguments,
    }))
}
