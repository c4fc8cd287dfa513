//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. It uses a Pratt parser for expressions
//! with proper operator precedence and handles:
//!
//! - Statement parsing (declarations, functions, control flow)
//! - Expression parsing (binary ops, function calls, literals)
//! - Type annotations
//! - Error recovery and reporting
//!
//! Scopes and symbols are declared in the symbol table while parsing, so
//! the output is both the statements and the table the type checker uses.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
