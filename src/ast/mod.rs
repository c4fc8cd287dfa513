/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The statement and expression enums and their tags
/// - expressions: Payloads of the expression variants and the operators
/// - statements: Payloads of the statement variants
/// - types: The primitive types and literal values
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
