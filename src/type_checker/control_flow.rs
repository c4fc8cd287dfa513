use crate::ast::ast::Stmt;

/// True if every path through `body` ends in a `return`.
///
/// Loops are never assumed to run, so a `return` inside a `while` body does
/// not count.
pub fn always_returns(body: &[Stmt]) -> bool {
    body.iter().any(stmt_always_returns)
}

fn stmt_always_returns(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Return(_) => true,
        Stmt::Block(block) => always_returns(&block.body),
        Stmt::If(if_stmt) => match &if_stmt.else_branch {
            Some(else_branch) => {
                stmt_always_returns(&if_stmt.then_branch) && stmt_always_returns(else_branch)
            }
            None => false,
        },
        _ => false,
    }
}
