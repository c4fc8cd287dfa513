use tracing::debug;

use crate::{
    ast::types::{LiteralValue, Type},
    errors::errors::{InternalError, SymbolError},
};

use super::{
    scope::{
        ConstantSymbol, FunctionSignature, FunctionSymbol, ParameterSymbol, Scope, ValueSymbol,
        VariableSymbol,
    },
    ScopeIndex, SymbolId,
};

/// Arena of scopes plus a cursor pointing at the current one.
///
/// The root scope sits at index 0 and every other scope has a parent with a
/// smaller index, so the parent chain always ends at the root. Scopes are
/// never removed.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    current: ScopeIndex,
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::new(ScopeIndex::ROOT, None)],
            current: ScopeIndex::ROOT,
        }
    }

    /// Opens a child of the current scope and makes it current.
    pub fn begin_scope(&mut self) -> ScopeIndex {
        let index = ScopeIndex::from_raw(self.scopes.len() as u32);
        self.scopes.push(Scope::new(index, Some(self.current)));
        debug!(scope = %index, parent = %self.current, "begin scope");
        self.current = index;
        index
    }

    /// Moves the cursor to the parent of the current scope. No-op at the root.
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.current_scope_ref().parent {
            debug!(scope = %self.current, parent = %parent, "exit scope");
            self.current = parent;
        }
    }

    /// Re-enters a scope created earlier.
    pub fn enter_scope(&mut self, index: ScopeIndex) -> Result<(), InternalError> {
        if index.index() >= self.scopes.len() {
            return Err(InternalError::UnknownScope {
                index: index.to_raw(),
            });
        }

        self.current = index;
        Ok(())
    }

    pub fn reset_scope(&mut self) {
        self.current = ScopeIndex::ROOT;
    }

    pub fn current_scope(&self) -> ScopeIndex {
        self.current
    }

    pub fn scope(&self, index: ScopeIndex) -> Option<&Scope> {
        self.scopes.get(index.index())
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    fn current_scope_ref(&self) -> &Scope {
        &self.scopes[self.current.index()]
    }

    fn current_scope_mut(&mut self) -> &mut Scope {
        let index = self.current.index();
        &mut self.scopes[index]
    }

    /// The current scope followed by each of its ancestors up to the root.
    fn ancestors(&self) -> impl Iterator<Item = &Scope> {
        std::iter::successors(Some(self.current_scope_ref()), move |scope| {
            scope.parent.map(|parent| &self.scopes[parent.index()])
        })
    }

    pub fn register_variable(
        &mut self,
        symbol: SymbolId,
        declared_type: Option<Type>,
    ) -> Result<&VariableSymbol, SymbolError> {
        self.current_scope_mut().add_variable(symbol, declared_type)
    }

    pub fn register_parameter(
        &mut self,
        symbol: SymbolId,
        type_: Type,
    ) -> Result<&ParameterSymbol, SymbolError> {
        self.current_scope_mut().add_parameter(symbol, type_)
    }

    pub fn register_constant(
        &mut self,
        symbol: SymbolId,
        value: LiteralValue,
        type_: Type,
    ) -> Result<&ConstantSymbol, SymbolError> {
        self.current_scope_mut().add_constant(symbol, value, type_)
    }

    pub fn register_function(
        &mut self,
        symbol: SymbolId,
        return_type: Type,
        parameter_types: Vec<Type>,
    ) -> Result<FunctionSignature, SymbolError> {
        self.current_scope_mut()
            .add_function(symbol, return_type, parameter_types)
    }

    pub fn get_variable(&self, symbol: SymbolId) -> Option<&VariableSymbol> {
        self.ancestors().find_map(|scope| scope.variable(symbol))
    }

    pub fn get_parameter(&self, symbol: SymbolId) -> Option<&ParameterSymbol> {
        self.ancestors().find_map(|scope| scope.parameter(symbol))
    }

    pub fn get_constant(&self, symbol: SymbolId) -> Option<&ConstantSymbol> {
        self.ancestors().find_map(|scope| scope.constant(symbol))
    }

    pub fn get_function(&self, signature: &FunctionSignature) -> Option<&FunctionSymbol> {
        self.ancestors().find_map(|scope| scope.function(signature))
    }

    /// Every overload of `symbol` visible from the current scope, nearest first.
    pub fn functions_named(&self, symbol: SymbolId) -> Vec<(&FunctionSignature, &FunctionSymbol)> {
        self.ancestors()
            .flat_map(|scope| {
                scope
                    .functions()
                    .filter(move |(signature, _)| signature.symbol == symbol)
            })
            .collect()
    }

    /// Finds the nearest scope declaring `symbol` as a variable, parameter or constant.
    pub fn resolve_value(&self, symbol: SymbolId) -> Option<(ScopeIndex, ValueSymbol)> {
        self.ancestors()
            .find_map(|scope| scope.value(symbol).map(|value| (scope.index, value)))
    }

    /// The value `symbol` names in exactly `scope`, without climbing to parents.
    pub fn value_in(&self, scope: ScopeIndex, symbol: SymbolId) -> Option<ValueSymbol> {
        self.scope(scope).and_then(|scope| scope.value(symbol))
    }

    /// True if the current scope already declares `symbol` in a value namespace.
    pub fn declared_in_current(&self, symbol: SymbolId) -> bool {
        self.current_scope_ref().declares_value(symbol)
    }

    /// Marks the nearest variable named `symbol` as assigned.
    pub fn initialize_variable(&mut self, symbol: SymbolId) -> bool {
        let Some(index) = self
            .ancestors()
            .find(|scope| scope.variable(symbol).is_some())
            .map(|scope| scope.index)
        else {
            return false;
        };

        self.scopes[index.index()].mark_initialized(symbol)
    }

    /// Flags the current scope's variable `symbol` as declared by a statement
    /// that was dropped, so uses of it do not report a missing type.
    pub fn abandon_variable(&mut self, symbol: SymbolId) -> bool {
        self.current_scope_mut().mark_abandoned(symbol)
    }

    pub fn is_abandoned(&self, scope: ScopeIndex, symbol: SymbolId) -> bool {
        self.scope(scope).is_some_and(|scope| scope.is_abandoned(symbol))
    }

    /// The nearest variable named `symbol` that has been assigned a value.
    pub fn get_initialized_variable(&self, symbol: SymbolId) -> Option<&VariableSymbol> {
        self.ancestors()
            .find(|scope| scope.is_initialized(symbol))
            .and_then(|scope| scope.variable(symbol))
    }

    /// Records the type the checker inferred for a variable of `scope`.
    pub fn set_inferred_type(
        &mut self,
        scope: ScopeIndex,
        symbol: SymbolId,
        type_: Option<Type>,
    ) -> Result<(), InternalError> {
        let variable = self
            .scopes
            .get_mut(scope.index())
            .ok_or(InternalError::UnknownScope {
                index: scope.to_raw(),
            })?
            .variable_mut(symbol)
            .ok_or(InternalError::NotAVariable {
                symbol,
                scope: scope.to_raw(),
            })?;

        variable.inferred_type = type_;
        Ok(())
    }
}
