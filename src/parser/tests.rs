//! Unit tests for the parser module.
//!
//! This module contains tests for parsing the language constructs and for
//! the symbol table the parser builds alongside the AST.

use std::rc::Rc;

use crate::{
    ast::{
        ast::{Expr, ExprType, Stmt, StmtType},
        expressions::{BinaryOperator, LogicalOperator, UnaryOperator},
        types::{LiteralValue, Type},
    },
    errors::errors::DiagnosticKind,
    lexer::lexer::tokenize,
    symbols::{scope::FunctionSignature, ScopeIndex},
};

use super::parser::{parse, ParseOutput, MAX_ARGUMENTS};

fn parse_source(source: &str) -> ParseOutput {
    let (tokens, diagnostics) = tokenize(source, Some("test.sc".to_string()));
    assert!(diagnostics.is_empty(), "lexer diagnostics: {:?}", diagnostics);
    parse(tokens, Rc::new("test.sc".to_string()))
}

fn parse_clean(source: &str) -> ParseOutput {
    let output = parse_source(source);
    assert!(
        output.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        output.diagnostics
    );
    output
}

fn kinds(output: &ParseOutput) -> Vec<DiagnosticKind> {
    output
        .diagnostics
        .iter()
        .map(|diagnostic| diagnostic.get_kind().clone())
        .collect()
}

fn expression(stmt: &Stmt) -> &Expr {
    match stmt {
        Stmt::Expression(stmt) => &stmt.expression,
        other => panic!("expected expression statement, found {:?}", other),
    }
}

#[test]
fn test_parse_variable_declaration() {
    let output = parse_clean("let x = 42");

    assert_eq!(output.statements.len(), 1);
    let Stmt::Variable(decl) = &output.statements[0] else {
        panic!("expected variable declaration");
    };
    assert_eq!(decl.name, "x");
    assert_eq!(decl.explicit_type, None);
    assert_eq!(decl.initializer.get_expr_type(), ExprType::Literal);

    let variable = output.symbol_table.get_variable(decl.symbol).unwrap();
    assert_eq!(variable.declared_type, None);
    assert!(output
        .symbol_table
        .scope(ScopeIndex::ROOT)
        .unwrap()
        .is_initialized(decl.symbol));
}

#[test]
fn test_parse_typed_variable_declaration() {
    let output = parse_clean("let ratio: real = 1.5\n");

    let Stmt::Variable(decl) = &output.statements[0] else {
        panic!("expected variable declaration");
    };
    assert_eq!(decl.explicit_type, Some(Type::Real));
    assert_eq!(
        output.symbol_table.get_variable(decl.symbol).unwrap().declared_type,
        Some(Type::Real)
    );
}

#[test]
fn test_parse_const_declaration() {
    let output = parse_clean("const LIMIT: int = 10");

    let Stmt::Constant(decl) = &output.statements[0] else {
        panic!("expected constant declaration");
    };
    assert_eq!(decl.explicit_type, Type::Int);

    let constant = output.symbol_table.get_constant(decl.symbol).unwrap();
    assert_eq!(constant.value, LiteralValue::Int(10));
    assert_eq!(constant.type_, Type::Int);
}

#[test]
fn test_const_requires_literal() {
    let output = parse_source("const A: int = 1 + 2\nlet b = 1\n");

    assert_eq!(
        kinds(&output),
        vec![DiagnosticKind::ConstantNotLiteral {
            name: "A".to_string()
        }]
    );
    assert_eq!(output.statements.len(), 1);
    assert_eq!(output.statements[0].get_stmt_type(), StmtType::VarDeclStmt);
}

#[test]
fn test_const_requires_type() {
    let output = parse_source("const A = 1");

    assert!(matches!(
        kinds(&output)[..],
        [DiagnosticKind::UnexpectedToken { .. }]
    ));
}

#[test]
fn test_missing_initializer_recovers_on_next_line() {
    let output = parse_source("let x: int\nlet y = 2\n");

    assert_eq!(
        kinds(&output),
        vec![DiagnosticKind::UninitializedVariable {
            name: "x".to_string()
        }]
    );
    assert_eq!(output.diagnostics[0].line(), 1);
    assert_eq!(output.statements.len(), 1);
}

#[test]
fn test_syntax_error_does_not_hide_next_statement() {
    let output = parse_source("let a = 1 +;\nlet b = 2\nlet c = )\n");

    let found = kinds(&output);
    assert_eq!(found.len(), 2);
    assert!(found
        .iter()
        .all(|kind| matches!(kind, DiagnosticKind::ExpectedExpression { .. })));
    assert_eq!(output.diagnostics[0].line(), 1);
    assert_eq!(output.diagnostics[1].line(), 3);
    assert_eq!(output.statements.len(), 1);
}

#[test]
fn test_precedence_multiplication_binds_tighter() {
    let output = parse_clean("1 + 2 * 3");

    let Expr::Binary(add) = expression(&output.statements[0]) else {
        panic!("expected binary expression");
    };
    assert_eq!(add.operator, BinaryOperator::Add);
    let Expr::Binary(multiply) = add.right.as_ref() else {
        panic!("expected binary expression on the right");
    };
    assert_eq!(multiply.operator, BinaryOperator::Multiply);
}

#[test]
fn test_grouping_overrides_precedence() {
    let output = parse_clean("(1 + 2) * 3");

    let Expr::Binary(multiply) = expression(&output.statements[0]) else {
        panic!("expected binary expression");
    };
    assert_eq!(multiply.operator, BinaryOperator::Multiply);
    assert_eq!(multiply.left.get_expr_type(), ExprType::Grouping);
}

#[test]
fn test_unary_binds_tighter_than_binary() {
    let output = parse_clean("-1 + 2\nnot true and false\n");

    let Expr::Binary(add) = expression(&output.statements[0]) else {
        panic!("expected binary expression");
    };
    let Expr::Unary(negate) = add.left.as_ref() else {
        panic!("expected unary operand");
    };
    assert_eq!(negate.operator, UnaryOperator::Negate);

    let Expr::Logical(and) = expression(&output.statements[1]) else {
        panic!("expected logical expression");
    };
    assert_eq!(and.operator, LogicalOperator::And);
    assert_eq!(and.left.get_expr_type(), ExprType::Unary);
}

#[test]
fn test_and_binds_tighter_than_or() {
    let output = parse_clean("true or false and true");

    let Expr::Logical(or) = expression(&output.statements[0]) else {
        panic!("expected logical expression");
    };
    assert_eq!(or.operator, LogicalOperator::Or);
    assert_eq!(or.right.get_expr_type(), ExprType::Logical);
}

#[test]
fn test_comparison_below_arithmetic() {
    let output = parse_clean("1 + 2 < 4 == true");

    let Expr::Binary(equal) = expression(&output.statements[0]) else {
        panic!("expected binary expression");
    };
    assert_eq!(equal.operator, BinaryOperator::Equal);
    let Expr::Binary(less) = equal.left.as_ref() else {
        panic!("expected comparison");
    };
    assert_eq!(less.operator, BinaryOperator::Less);
    assert_eq!(less.left.get_expr_type(), ExprType::Binary);
}

#[test]
fn test_assignment_is_right_associative() {
    let output = parse_clean("let a = 1\nlet b = 2\na = b = 3\n");

    let Expr::Assignment(outer) = expression(&output.statements[2]) else {
        panic!("expected assignment");
    };
    assert_eq!(outer.target, "a");
    let Expr::Assignment(inner) = outer.value.as_ref() else {
        panic!("expected nested assignment");
    };
    assert_eq!(inner.target, "b");
}

#[test]
fn test_invalid_assignment_target() {
    let output = parse_source("1 = 2");

    assert_eq!(kinds(&output), vec![DiagnosticKind::InvalidAssignmentTarget]);
    assert_eq!(output.statements.len(), 1);
    assert_eq!(
        expression(&output.statements[0]).get_expr_type(),
        ExprType::Literal
    );
}

#[test]
fn test_parse_call() {
    let output = parse_clean("println(1)\nprintln()\n");

    let Expr::Call(call) = expression(&output.statements[0]) else {
        panic!("expected call");
    };
    assert_eq!(call.arguments.len(), 1);
    assert_eq!(call.paren.line, 1);
    assert_eq!(call.callee.get_expr_type(), ExprType::Variable);

    let Expr::Call(call) = expression(&output.statements[1]) else {
        panic!("expected call");
    };
    assert!(call.arguments.is_empty());
    assert_eq!(call.paren.line, 2);
}

#[test]
fn test_unclosed_call() {
    let output = parse_source("println(1\nlet x = 2\n");

    assert!(matches!(
        kinds(&output)[..],
        [DiagnosticKind::UnexpectedToken { .. }]
    ));
    assert_eq!(output.statements.len(), 1);
}

#[test]
fn test_parse_if_else_statement() {
    let output = parse_clean("if true {\n  1\n}\nelse {\n  2\n}\n");

    assert_eq!(output.statements.len(), 1);
    let Stmt::If(stmt) = &output.statements[0] else {
        panic!("expected if statement");
    };
    assert_eq!(stmt.then_branch.get_stmt_type(), StmtType::BlockStmt);
    assert_eq!(
        stmt.else_branch.as_ref().map(|branch| branch.get_stmt_type()),
        Some(StmtType::BlockStmt)
    );
}

#[test]
fn test_elif_nests_if() {
    let output = parse_clean("if true: 1\nelif false: 2\nelse: 3\n");

    let Stmt::If(stmt) = &output.statements[0] else {
        panic!("expected if statement");
    };
    let Some(Stmt::If(elif)) = stmt.else_branch.as_deref() else {
        panic!("expected elif as nested if");
    };
    assert_eq!(elif.line, 2);
    assert!(elif.else_branch.is_some());
}

#[test]
fn test_one_line_body_gets_its_own_scope() {
    let output = parse_clean("if true: let y = 1\n");

    let Stmt::If(stmt) = &output.statements[0] else {
        panic!("expected if statement");
    };
    let Stmt::Block(block) = stmt.then_branch.as_ref() else {
        panic!("expected wrapped block");
    };
    assert_eq!(block.body.len(), 1);
    assert_ne!(block.scope, ScopeIndex::ROOT);

    let y = output.names.get("y").unwrap();
    assert!(output.symbol_table.get_variable(y).is_none());
    assert!(output
        .symbol_table
        .scope(block.scope)
        .unwrap()
        .variable(y)
        .is_some());
}

#[test]
fn test_parse_while_loop() {
    let output = parse_clean("let x = 0\nwhile x < 10 { x = x + 1; break }\n");

    let Stmt::While(stmt) = &output.statements[1] else {
        panic!("expected while statement");
    };
    let Stmt::Block(body) = stmt.body.as_ref() else {
        panic!("expected block body");
    };
    assert_eq!(body.body.len(), 2);
    let Stmt::Jump(jump) = &body.body[1] else {
        panic!("expected jump");
    };
    assert!(jump.is_break());
}

#[test]
fn test_parse_function_declaration() {
    let output = parse_clean("def add(a: int, b: int) -> int {\n  return a + b\n}\n");

    let Stmt::Function(function) = &output.statements[0] else {
        panic!("expected function declaration");
    };
    assert_eq!(function.name, "add");
    assert_eq!(function.return_type, Type::Int);
    assert_eq!(function.parameters.len(), 2);
    assert_eq!(function.body.len(), 1);

    let scope = output.symbol_table.scope(function.scope).unwrap();
    assert_eq!(scope.parent, Some(ScopeIndex::ROOT));
    assert_eq!(scope.parameter_count(), 2);
    assert_eq!(
        scope.parameter(function.parameters[1].symbol).unwrap().index,
        1
    );

    let add = output.names.get("add").unwrap();
    let signature = FunctionSignature::new(add, vec![Type::Int, Type::Int]);
    assert_eq!(function.signature, signature);
    assert_eq!(
        output.symbol_table.get_function(&signature).unwrap().return_type,
        Type::Int
    );
}

#[test]
fn test_function_defaults_to_none() {
    let output = parse_clean("def log(message: str) { return }\n");

    let Stmt::Function(function) = &output.statements[0] else {
        panic!("expected function declaration");
    };
    assert_eq!(function.return_type, Type::None);
    let Stmt::Return(stmt) = &function.body[0] else {
        panic!("expected return");
    };
    assert!(stmt.value.is_none());
}

#[test]
fn test_duplicate_function_signature() {
    let output = parse_source("def f(a: int) {}\ndef f(a: int) {}\n");

    assert_eq!(
        kinds(&output),
        vec![DiagnosticKind::FunctionAlreadyDeclared {
            function: "f".to_string()
        }]
    );
    assert_eq!(output.diagnostics[0].line(), 2);
    assert_eq!(output.statements.len(), 2);
}

#[test]
fn test_overloads_by_parameter_types() {
    let output = parse_clean("def f(a: int) {}\ndef f(a: str) {}\n");

    let f = output.names.get("f").unwrap();
    assert_eq!(output.symbol_table.functions_named(f).len(), 2);
}

#[test]
fn test_redeclaration_in_same_scope() {
    let output = parse_source("let a = 1\nlet a = 2\n");

    assert_eq!(
        kinds(&output),
        vec![DiagnosticKind::AlreadyDeclared {
            name: "a".to_string()
        }]
    );
    assert_eq!(output.diagnostics[0].line(), 2);
    assert_eq!(output.statements.len(), 1);
}

#[test]
fn test_shadowing_in_inner_block() {
    let output = parse_clean("let a = 1\n{\n  let a = 'x'\n}\n");

    let Stmt::Block(block) = &output.statements[1] else {
        panic!("expected block");
    };
    assert_eq!(
        output.symbol_table.scope(block.scope).unwrap().parent,
        Some(ScopeIndex::ROOT)
    );
}

#[test]
fn test_error_inside_function_body_recovers() {
    let output = parse_source("def f() {\n  let = 1\n  let b = 2\n}\nlet c = 3\n");

    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].line(), 2);
    assert_eq!(output.statements.len(), 2);

    let Stmt::Function(function) = &output.statements[0] else {
        panic!("expected function declaration");
    };
    assert_eq!(function.body.len(), 1);

    let c = output.names.get("c").unwrap();
    assert!(output
        .symbol_table
        .scope(ScopeIndex::ROOT)
        .unwrap()
        .variable(c)
        .is_some());
}

#[test]
fn test_unmatched_closing_brace() {
    let output = parse_source("}\nlet a = 1\n");

    assert!(matches!(
        kinds(&output)[..],
        [DiagnosticKind::UnexpectedToken { .. }]
    ));
    assert_eq!(output.statements.len(), 1);
}

#[test]
fn test_unclosed_block_reports_and_terminates() {
    let output = parse_source("{\n  let a = 1\n");

    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.symbol_table.current_scope(), ScopeIndex::ROOT);
}

#[test]
fn test_builtins_are_declared() {
    let output = parse_clean("");

    let println = output.names.get("println").unwrap();
    assert!(output
        .symbol_table
        .get_function(&FunctionSignature::new(println, vec![Type::Str]))
        .is_some());
}

#[test]
fn test_names_bind_where_they_are_written() {
    let output = parse_source("let a = 1\n{\n  a\n  let a = 'x'\n  a\n}\nb\n");

    let Stmt::Block(block) = &output.statements[1] else {
        panic!("expected block");
    };
    let scopes: Vec<_> = [&block.body[0], &block.body[2], &output.statements[2]]
        .into_iter()
        .map(|stmt| match expression(stmt) {
            Expr::Variable(variable) => variable.scope,
            other => panic!("expected variable, found {:?}", other),
        })
        .collect();

    assert_eq!(scopes, vec![Some(ScopeIndex::ROOT), Some(block.scope), None]);
}

#[test]
fn test_assignment_keeps_binding_of_target() {
    let output = parse_clean("let a = 1\n{\n  a = 2\n  let a = 'x'\n}\n");

    let Stmt::Block(block) = &output.statements[1] else {
        panic!("expected block");
    };
    let Expr::Assignment(assignment) = expression(&block.body[0]) else {
        panic!("expected assignment");
    };
    assert_eq!(assignment.scope, Some(ScopeIndex::ROOT));
}

#[test]
fn test_failed_declaration_is_abandoned() {
    let output = parse_source("let a\nlet b = )\nlet c = 1\n");

    assert_eq!(output.diagnostics.len(), 2);
    assert_eq!(output.statements.len(), 1);

    let a = output.names.get("a").unwrap();
    let b = output.names.get("b").unwrap();
    let c = output.names.get("c").unwrap();
    assert!(output.symbol_table.is_abandoned(ScopeIndex::ROOT, a));
    assert!(output.symbol_table.is_abandoned(ScopeIndex::ROOT, b));
    assert!(!output.symbol_table.is_abandoned(ScopeIndex::ROOT, c));
}

#[test]
fn test_too_many_arguments() {
    let arguments = vec!["1"; MAX_ARGUMENTS + 1].join(", ");
    let output = parse_source(&format!("f({})\n", arguments));

    assert_eq!(kinds(&output), vec![DiagnosticKind::TooManyArguments]);
    assert_eq!(output.statements.len(), 1);
    let Expr::Call(call) = expression(&output.statements[0]) else {
        panic!("expected call");
    };
    assert_eq!(call.arguments.len(), MAX_ARGUMENTS + 1);
}

#[test]
fn test_too_many_parameters() {
    let parameters: Vec<String> = (0..=MAX_ARGUMENTS)
        .map(|index| format!("p{}: int", index))
        .collect();
    let output = parse_source(&format!("def f({}) {{ }}\n", parameters.join(", ")));

    assert_eq!(kinds(&output), vec![DiagnosticKind::TooManyParameters]);
    assert_eq!(output.statements.len(), 1);
    let Stmt::Function(function) = &output.statements[0] else {
        panic!("expected function declaration");
    };
    assert_eq!(function.parameters.len(), MAX_ARGUMENTS + 1);
    assert_eq!(
        output
            .symbol_table
            .scope(function.scope)
            .unwrap()
            .parameter_count(),
        MAX_ARGUMENTS + 1
    );
}
