use super::{
    expressions::{
        AssignmentExpr, BinaryExpr, CallExpr, GroupingExpr, LiteralExpr, LogicalExpr, UnaryExpr,
        VariableExpr,
    },
    statements::{
        BlockStmt, ConstDeclStmt, ExpressionStmt, FnDeclStmt, IfStmt, JumpStmt, ReturnStmt,
        VarDeclStmt, WhileStmt,
    },
};

/// Statement Types
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum StmtType {
    BlockStmt,
    ExpressionStmt,
    VarDeclStmt,
    ConstDeclStmt,
    FnDeclStmt,
    ReturnStmt,
    IfStmt,
    WhileStmt,
    JumpStmt,
}

/// A statement of the AST.
///
/// The set of statements is closed, so consumers match on the variants
/// directly. Nothing mutates a statement once the parser has built it.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(BlockStmt),
    Expression(ExpressionStmt),
    Variable(VarDeclStmt),
    Constant(ConstDeclStmt),
    Function(FnDeclStmt),
    Return(ReturnStmt),
    If(IfStmt),
    While(WhileStmt),
    Jump(JumpStmt),
}

impl Stmt {
    /// Returns the type of the statement.
    pub fn get_stmt_type(&self) -> StmtType {
        match self {
            Stmt::Block(_) => StmtType::BlockStmt,
            Stmt::Expression(_) => StmtType::ExpressionStmt,
            Stmt::Variable(_) => StmtType::VarDeclStmt,
            Stmt::Constant(_) => StmtType::ConstDeclStmt,
            Stmt::Function(_) => StmtType::FnDeclStmt,
            Stmt::Return(_) => StmtType::ReturnStmt,
            Stmt::If(_) => StmtType::IfStmt,
            Stmt::While(_) => StmtType::WhileStmt,
            Stmt::Jump(_) => StmtType::JumpStmt,
        }
    }

    /// Returns the line the statement starts on, if it has one of its own.
    pub fn line(&self) -> Option<u32> {
        match self {
            Stmt::Block(block) => block.body.first().and_then(Stmt::line),
            Stmt::Expression(stmt) => Some(stmt.expression.line()),
            Stmt::Variable(stmt) => Some(stmt.line),
            Stmt::Constant(stmt) => Some(stmt.line),
            Stmt::Function(stmt) => Some(stmt.line),
            Stmt::Return(stmt) => Some(stmt.line),
            Stmt::If(stmt) => Some(stmt.line),
            Stmt::While(stmt) => Some(stmt.line),
            Stmt::Jump(stmt) => Some(stmt.token.line),
        }
    }
}

/// Expression Types
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ExprType {
    Literal,
    Variable,
    Grouping,
    Unary,
    Binary,
    Logical,
    Assignment,
    Call,
}

/// An expression of the AST.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(LiteralExpr),
    Variable(VariableExpr),
    Grouping(GroupingExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Logical(LogicalExpr),
    Assignment(AssignmentExpr),
    Call(CallExpr),
}

impl Expr {
    /// Returns the expression type of the expression.
    pub fn get_expr_type(&self) -> ExprType {
        match self {
            Expr::Literal(_) => ExprType::Literal,
            Expr::Variable(_) => ExprType::Variable,
            Expr::Grouping(_) => ExprType::Grouping,
            Expr::Unary(_) => ExprType::Unary,
            Expr::Binary(_) => ExprType::Binary,
            Expr::Logical(_) => ExprType::Logical,
            Expr::Assignment(_) => ExprType::Assignment,
            Expr::Call(_) => ExprType::Call,
        }
    }

    /// The source line diagnostics about this expression point at.
    pub fn line(&self) -> u32 {
        match self {
            Expr::Literal(expr) => expr.token.line,
            Expr::Variable(expr) => expr.line,
            Expr::Grouping(expr) => expr.inner.line(),
            Expr::Unary(expr) => expr.line,
            Expr::Binary(expr) => expr.line,
            Expr::Logical(expr) => expr.line,
            Expr::Assignment(expr) => expr.line,
            Expr::Call(expr) => expr.paren.line,
        }
    }
}
