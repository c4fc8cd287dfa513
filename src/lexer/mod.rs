//! Lexical analysis module for the front end.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - Newline-sensitive statement terminators
//! - Comments and whitespace handling
//! - Lexical diagnostics, reported without stopping the scan

pub mod lexer;
pub mod tokens;
