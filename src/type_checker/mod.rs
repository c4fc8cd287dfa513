//! Type checking and semantic analysis module.
//!
//! This module walks the AST produced by the parser, re-entering the scopes
//! recorded in the symbol table, while:
//!
//! - Verifying type correctness of expressions and statements
//! - Inferring the type of variables declared without one
//! - Resolving calls against the visible overloads
//! - Checking returns, loop jumps and conditions
//!
//! Every problem is recorded as a diagnostic and checking continues.

pub mod control_flow;
pub mod type_checker;

#[cfg(test)]
mod tests;
