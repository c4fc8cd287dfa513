//! Lexically scoped symbol table.
//!
//! Scopes live in an arena owned by [`symbol_table::SymbolTable`] and point to
//! their parent by index. The parser creates every scope and declares every
//! symbol while it builds the AST; the type checker later re-enters the same
//! scopes by index and records inferred variable types.
//!
//! Names are interned per compilation unit by [`interner::SymbolInterner`], so
//! the same name declared in two scopes shares one [`SymbolId`] and lookups
//! climb the parent chain by id.

use crate::MK_ID;

pub mod builtins;
pub mod interner;
pub mod scope;
pub mod symbol_table;


MK_ID!(SymbolId);
MK_ID!(ScopeIndex);

impl ScopeIndex {
    pub const ROOT: ScopeIndex = ScopeIndex(0);
}
