//! Error types and error handling for the front end.
//!
//! This module defines the error types used throughout compilation.
//! It includes:
//!
//! - Diagnostics with source position information
//! - Specific diagnostic variants for the lexical, syntax and semantic stages
//! - Symbol table and internal compiler errors
//! - Helpful error messages and suggestions

pub mod errors;
