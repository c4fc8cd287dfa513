//! Functions every program can call without declaring them.

use crate::ast::types::Type;

use super::{interner::SymbolInterner, symbol_table::SymbolTable};

/// Name, parameter types and return type of each built-in overload.
pub const BUILTIN_FUNCTIONS: &[(&str, &[Type], Type)] = &[
    ("println", &[Type::Str], Type::None),
    ("println", &[Type::Int], Type::None),
    ("println", &[Type::Real], Type::None),
    ("println", &[Type::Bool], Type::None),
];

/// Declares the built-in overloads in the root scope of `table`.
pub fn register_builtins(table: &mut SymbolTable, interner: &mut SymbolInterner) {
    for (name, parameter_types, return_type) in BUILTIN_FUNCTIONS {
        let symbol = interner.intern(name);
        table
            .register_function(symbol, *return_type, parameter_types.to_vec())
            .expect("built-in signatures are distinct");
    }
}
