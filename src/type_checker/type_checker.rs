use std::{collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    ast::{
        ast::{Expr, Stmt},
        expressions::{
            AssignmentExpr, BinaryExpr, BinaryOperator, CallExpr, LogicalExpr, UnaryExpr,
            UnaryOperator, VariableExpr,
        },
        statements::{
            BlockStmt, ConstDeclStmt, FnDeclStmt, IfStmt, JumpStmt, ReturnStmt, VarDeclStmt,
            WhileStmt,
        },
        types::{format_types, Type},
    },
    errors::errors::{Diagnostic, DiagnosticKind, InternalError},
    symbols::{
        scope::{FunctionSignature, ValueSymbol},
        symbol_table::SymbolTable,
        ScopeIndex, SymbolId,
    },
    Position,
};

use super::control_flow::always_returns;

/// Walks checked statements and records semantic diagnostics.
///
/// The checker borrows the parser's symbol table, re-enters its scopes by
/// index and writes the inferred type of every untyped `let` back into it.
#[derive(Debug)]
pub struct TypeChecker<'a> {
    symbol_table: &'a mut SymbolTable,
    file: Rc<String>,
    diagnostics: Vec<Diagnostic>,
    /// Types of untyped variables whose `let` has been checked in this run.
    /// `None` means the initializer had no type because of an earlier error.
    inferred: HashMap<(ScopeIndex, SymbolId), Option<Type>>,
    /// Return types of the enclosing functions, innermost last.
    function_stack: Vec<Type>,
    loop_depth: usize,
}

impl<'a> TypeChecker<'a> {
    pub fn new(symbol_table: &'a mut SymbolTable, file: Rc<String>) -> Self {
        symbol_table.reset_scope();

        TypeChecker {
            symbol_table,
            file,
            diagnostics: vec![],
            inferred: HashMap::new(),
            function_stack: vec![],
            loop_depth: 0,
        }
    }

    pub fn check(&mut self, stmt: &Stmt) -> Result<(), InternalError> {
        type_check_stmt(self, stmt)
    }

    #[tracing::instrument(skip_all, fields(statements = statements.len()))]
    pub fn check_all(&mut self, statements: &[Stmt]) -> Result<(), InternalError> {
        for stmt in statements {
            self.check(stmt)?;
        }

        debug!(diagnostics = self.diagnostics.len(), "type checked");
        Ok(())
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn report(&mut self, kind: DiagnosticKind, line: u32) {
        self.diagnostics
            .push(Diagnostic::new(kind, Position(line, Rc::clone(&self.file))));
    }

    /// The value the parser bound a name to, looked up in its declaring scope.
    fn declaration(
        &self,
        scope: Option<ScopeIndex>,
        symbol: SymbolId,
    ) -> Option<(ScopeIndex, ValueSymbol)> {
        let scope = scope?;
        self.symbol_table
            .value_in(scope, symbol)
            .map(|value| (scope, value))
    }

    /// Type of a value declared as `symbol` in `scope`.
    ///
    /// Untyped variables only have a type once their `let` has been checked.
    fn value_type(
        &mut self,
        scope: ScopeIndex,
        symbol: SymbolId,
        value: &ValueSymbol,
        name: &str,
        line: u32,
    ) -> Option<Type> {
        match value {
            ValueSymbol::Variable(variable) => match variable.declared_type {
                Some(type_) => Some(type_),
                None => match self.inferred.get(&(scope, symbol)) {
                    Some(type_) => *type_,
                    None if self.symbol_table.is_abandoned(scope, symbol) => None,
                    None => {
                        self.report(
                            DiagnosticKind::TypeNotKnown {
                                name: name.to_string(),
                            },
                            line,
                        );
                        None
                    }
                },
            },
            ValueSymbol::Parameter(parameter) => Some(parameter.type_),
            ValueSymbol::Constant(constant) => Some(constant.type_),
        }
    }

    /// Checks `body` inside the scope the parser recorded for it.
    fn in_scope(&mut self, scope: ScopeIndex, body: &[Stmt]) -> Result<(), InternalError> {
        self.symbol_table.enter_scope(scope)?;
        for stmt in body {
            type_check_stmt(self, stmt)?;
        }
        self.symbol_table.exit_scope();

        Ok(())
    }
}

pub fn type_check_expr(type_checker: &mut TypeChecker, expr: &Expr) -> Option<Type> {
    match expr {
        Expr::Literal(literal) => Some(literal.value.get_type()),
        Expr::Grouping(grouping) => type_check_expr(type_checker, &grouping.inner),
        Expr::Variable(variable) => type_check_variable(type_checker, variable),
        Expr::Unary(unary) => type_check_unary(type_checker, unary),
        Expr::Binary(binary) => type_check_binary(type_checker, binary),
        Expr::Logical(logical) => type_check_logical(type_checker, logical),
        Expr::Assignment(assignment) => type_check_assignment(type_checker, assignment),
        Expr::Call(call) => type_check_call(type_checker, call),
    }
}

fn type_check_variable(type_checker: &mut TypeChecker, variable: &VariableExpr) -> Option<Type> {
    match type_checker.declaration(variable.scope, variable.symbol) {
        Some((scope, value)) => type_checker.value_type(
            scope,
            variable.symbol,
            &value,
            &variable.name,
            variable.line,
        ),
        None => {
            type_checker.report(
                DiagnosticKind::UndefinedVariable {
                    name: variable.name.clone(),
                },
                variable.line,
            );
            None
        }
    }
}

fn type_check_unary(type_checker: &mut TypeChecker, unary: &UnaryExpr) -> Option<Type> {
    let operand = type_check_expr(type_checker, &unary.operand)?;

    let result = match unary.operator {
        UnaryOperator::Negate if operand.is_numeric() => Some(operand),
        UnaryOperator::Not if operand == Type::Bool => Some(Type::Bool),
        _ => None,
    };

    if result.is_none() {
        type_checker.report(
            DiagnosticKind::UnaryTypeMismatch {
                operator: unary.operator.to_string(),
                operand,
            },
            unary.line,
        );
    }
    result
}

fn type_check_binary(type_checker: &mut TypeChecker, binary: &BinaryExpr) -> Option<Type> {
    let left = type_check_expr(type_checker, &binary.left);
    let right = type_check_expr(type_checker, &binary.right);
    let (left, right) = (left?, right?);

    let result = if binary.operator.is_arithmetic() {
        match (left, right) {
            (Type::Str, Type::Str) if binary.operator == BinaryOperator::Add => Some(Type::Str),
            (Type::Int, Type::Int) => Some(Type::Int),
            (left, right) if left.is_numeric() && right.is_numeric() => Some(Type::Real),
            _ => None,
        }
    } else if binary.operator.is_comparison() {
        (left.is_numeric() && right.is_numeric()).then_some(Type::Bool)
    } else {
        (left == right).then_some(Type::Bool)
    };

    if result.is_none() {
        type_checker.report(
            DiagnosticKind::BinaryTypeMismatch {
                operator: binary.operator.to_string(),
                left,
                right,
            },
            binary.line,
        );
    }
    result
}

fn type_check_logical(type_checker: &mut TypeChecker, logical: &LogicalExpr) -> Option<Type> {
    let left = type_check_expr(type_checker, &logical.left);
    let right = type_check_expr(type_checker, &logical.right);
    let (left, right) = (left?, right?);

    if left == Type::Bool && right == Type::Bool {
        return Some(Type::Bool);
    }

    type_checker.report(
        DiagnosticKind::BinaryTypeMismatch {
            operator: logical.operator.to_string(),
            left,
            right,
        },
        logical.line,
    );
    None
}

fn type_check_assignment(
    type_checker: &mut TypeChecker,
    assignment: &AssignmentExpr,
) -> Option<Type> {
    let value = type_check_expr(type_checker, &assignment.value);

    let Some((scope, target)) = type_checker.declaration(assignment.scope, assignment.symbol)
    else {
        type_checker.report(
            DiagnosticKind::UndefinedVariable {
                name: assignment.target.clone(),
            },
            assignment.line,
        );
        return None;
    };

    if let ValueSymbol::Constant(_) = target {
        type_checker.report(
            DiagnosticKind::AssignToConstant {
                name: assignment.target.clone(),
            },
            assignment.line,
        );
        return value;
    }

    let target = type_checker.value_type(
        scope,
        assignment.symbol,
        &target,
        &assignment.target,
        assignment.line,
    );

    if let (Some(expected), Some(received)) = (target, value) {
        if expected != received {
            type_checker.report(
                DiagnosticKind::TypeMatchError { expected, received },
                assignment.line,
            );
        }
    }
    value
}

fn type_check_call(type_checker: &mut TypeChecker, call: &CallExpr) -> Option<Type> {
    let mut argument_types = Vec::with_capacity(call.arguments.len());
    let mut arguments_known = true;
    for argument in call.arguments.iter() {
        match type_check_expr(type_checker, argument) {
            Some(type_) => argument_types.push(type_),
            None => arguments_known = false,
        }
    }

    let Expr::Variable(callee) = call.callee.as_ref() else {
        type_check_expr(type_checker, &call.callee);
        type_checker.report(DiagnosticKind::NotCallable, call.paren.line);
        return None;
    };

    if !arguments_known {
        return None;
    }

    let signature = FunctionSignature::new(callee.symbol, argument_types);
    if let Some(function) = type_checker.symbol_table.get_function(&signature) {
        return Some(function.return_type);
    }

    let overloads = type_checker.symbol_table.functions_named(callee.symbol).len();
    debug!(function = %callee.name, overloads, "no overload matched");

    let kind = if overloads == 0 && callee.scope.is_some() {
        DiagnosticKind::NotCallable
    } else {
        DiagnosticKind::NoMatchingOverload {
            function: callee.name.clone(),
            arguments: format_types(&signature.parameter_types),
        }
    };
    type_checker.report(kind, call.paren.line);
    None
}

pub fn type_check_stmt(type_checker: &mut TypeChecker, stmt: &Stmt) -> Result<(), InternalError> {
    match stmt {
        Stmt::Block(block) => type_check_block(type_checker, block),
        Stmt::Expression(expression) => {
            type_check_expr(type_checker, &expression.expression);
            Ok(())
        }
        Stmt::Variable(decl) => type_check_var_decl(type_checker, decl),
        Stmt::Constant(decl) => {
            type_check_const_decl(type_checker, decl);
            Ok(())
        }
        Stmt::Function(function) => type_check_fn_decl(type_checker, function),
        Stmt::Return(stmt) => {
            type_check_return(type_checker, stmt);
            Ok(())
        }
        Stmt::If(stmt) => type_check_if(type_checker, stmt),
        Stmt::While(stmt) => type_check_while(type_checker, stmt),
        Stmt::Jump(jump) => {
            type_check_jump(type_checker, jump);
            Ok(())
        }
    }
}

pub fn type_check_block(
    type_checker: &mut TypeChecker,
    block: &BlockStmt,
) -> Result<(), InternalError> {
    type_checker.in_scope(block.scope, &block.body)
}

fn type_check_var_decl(
    type_checker: &mut TypeChecker,
    decl: &VarDeclStmt,
) -> Result<(), InternalError> {
    let initializer = type_check_expr(type_checker, &decl.initializer);

    match decl.explicit_type {
        Some(expected) => {
            if let Some(received) = initializer.filter(|received| *received != expected) {
                type_checker.report(
                    DiagnosticKind::TypeMatchError { expected, received },
                    decl.line,
                );
            }
        }
        None => {
            let scope = type_checker.symbol_table.current_scope();
            type_checker
                .inferred
                .insert((scope, decl.symbol), initializer);
            type_checker
                .symbol_table
                .set_inferred_type(scope, decl.symbol, initializer)?;
        }
    }

    Ok(())
}

fn type_check_const_decl(type_checker: &mut TypeChecker, decl: &ConstDeclStmt) {
    let expected = decl.explicit_type;
    if let Some(received) =
        type_check_expr(type_checker, &decl.initializer).filter(|received| *received != expected)
    {
        type_checker.report(DiagnosticKind::TypeMatchError { expected, received }, decl.line);
    }
}

fn type_check_fn_decl(
    type_checker: &mut TypeChecker,
    function: &FnDeclStmt,
) -> Result<(), InternalError> {
    let enclosing_loop_depth = std::mem::take(&mut type_checker.loop_depth);
    type_checker.function_stack.push(function.return_type);

    let checked = type_checker.in_scope(function.scope, &function.body);

    type_checker.function_stack.pop();
    type_checker.loop_depth = enclosing_loop_depth;
    checked?;

    if function.return_type != Type::None && !always_returns(&function.body) {
        type_checker.report(
            DiagnosticKind::MissingReturn {
                function: function.name.clone(),
            },
            function.line,
        );
    }

    Ok(())
}

fn type_check_return(type_checker: &mut TypeChecker, stmt: &ReturnStmt) {
    let value = stmt
        .value
        .as_ref()
        .map(|value| type_check_expr(type_checker, value));

    let Some(expected) = type_checker.function_stack.last().copied() else {
        type_checker.report(DiagnosticKind::ReturnOutsideFunction, stmt.line);
        return;
    };

    match (expected, value) {
        (Type::None, None) => {}
        (Type::None, Some(_)) => {
            type_checker.report(DiagnosticKind::VoidFunctionReturningValue, stmt.line)
        }
        (expected, None) => {
            type_checker.report(DiagnosticKind::MissingReturnValue { expected }, stmt.line)
        }
        (expected, Some(Some(received))) if received != expected => {
            type_checker.report(DiagnosticKind::TypeMatchError { expected, received }, stmt.line)
        }
        _ => {}
    }
}

fn type_check_condition(type_checker: &mut TypeChecker, condition: &Expr, construct: &str) {
    if let Some(received) =
        type_check_expr(type_checker, condition).filter(|received| *received != Type::Bool)
    {
        type_checker.report(
            DiagnosticKind::ConditionNotBool {
                construct: construct.to_string(),
                received,
            },
            condition.line(),
        );
    }
}

fn type_check_if(type_checker: &mut TypeChecker, stmt: &IfStmt) -> Result<(), InternalError> {
    type_check_condition(type_checker, &stmt.condition, "if");
    type_check_stmt(type_checker, &stmt.then_branch)?;
    if let Some(else_branch) = &stmt.else_branch {
        type_check_stmt(type_checker, else_branch)?;
    }

    Ok(())
}

fn type_check_while(
    type_checker: &mut TypeChecker,
    stmt: &WhileStmt,
) -> Result<(), InternalError> {
    type_check_condition(type_checker, &stmt.condition, "while");

    type_checker.loop_depth += 1;
    let checked = type_check_stmt(type_checker, &stmt.body);
    type_checker.loop_depth -= 1;

    checked
}

fn type_check_jump(type_checker: &mut TypeChecker, jump: &JumpStmt) {
    if type_checker.loop_depth == 0 {
        type_checker.report(
            DiagnosticKind::JumpOutsideLoop {
                keyword: if jump.is_break() { "break" } else { "continue" }.to_string(),
            },
            jump.token.line,
        );
    }
}

/// Type checks `statements` against `symbol_table` and returns the diagnostics.
pub fn type_check(
    statements: &[Stmt],
    symbol_table: &mut SymbolTable,
    file: Rc<String>,
) -> Result<Vec<Diagnostic>, InternalError> {
    let mut type_checker = TypeChecker::new(symbol_table, file);
    type_checker.check_all(statements)?;

    Ok(type_checker.into_diagnostics())
}
