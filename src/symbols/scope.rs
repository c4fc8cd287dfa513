use std::collections::{hash_map::Entry, HashMap, HashSet};

use crate::{
    ast::types::{LiteralValue, Type},
    errors::errors::SymbolError,
};

use super::{ScopeIndex, SymbolId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableSymbol {
    pub declared_type: Option<Type>,
    /// Written by the type checker for variables declared without a type.
    pub inferred_type: Option<Type>,
}

impl VariableSymbol {
    pub fn type_(&self) -> Option<Type> {
        self.declared_type.or(self.inferred_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSymbol {
    /// Zero-based slot in the function's parameter list.
    pub index: usize,
    pub type_: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantSymbol {
    pub value: LiteralValue,
    pub type_: Type,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSymbol {
    pub return_type: Type,
    pub parameter_types: Vec<Type>,
}

/// The key overloads are told apart by: a name and the exact parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionSignature {
    pub symbol: SymbolId,
    pub parameter_types: Vec<Type>,
}

impl FunctionSignature {
    pub fn new(symbol: SymbolId, parameter_types: Vec<Type>) -> Self {
        FunctionSignature {
            symbol,
            parameter_types,
        }
    }
}

/// Any symbol that can appear as a value in an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSymbol {
    Variable(VariableSymbol),
    Parameter(ParameterSymbol),
    Constant(ConstantSymbol),
}

impl ValueSymbol {
    pub fn type_(&self) -> Option<Type> {
        match self {
            ValueSymbol::Variable(variable) => variable.type_(),
            ValueSymbol::Parameter(parameter) => Some(parameter.type_),
            ValueSymbol::Constant(constant) => Some(constant.type_),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub index: ScopeIndex,
    pub parent: Option<ScopeIndex>,
    variables: HashMap<SymbolId, VariableSymbol>,
    parameters: HashMap<SymbolId, ParameterSymbol>,
    constants: HashMap<SymbolId, ConstantSymbol>,
    functions: HashMap<FunctionSignature, FunctionSymbol>,
    initialized: HashSet<SymbolId>,
    /// Variables whose declaring statement was dropped after a syntax error.
    abandoned: HashSet<SymbolId>,
    parameter_count: usize,
}

impl Scope {
    pub fn new(index: ScopeIndex, parent: Option<ScopeIndex>) -> Self {
        Scope {
            index,
            parent,
            variables: HashMap::new(),
            parameters: HashMap::new(),
            constants: HashMap::new(),
            functions: HashMap::new(),
            initialized: HashSet::new(),
            abandoned: HashSet::new(),
            parameter_count: 0,
        }
    }

    pub fn add_variable(
        &mut self,
        symbol: SymbolId,
        declared_type: Option<Type>,
    ) -> Result<&VariableSymbol, SymbolError> {
        match self.variables.entry(symbol) {
            Entry::Occupied(_) => Err(SymbolError::AlreadyDeclared { symbol }),
            Entry::Vacant(slot) => Ok(slot.insert(VariableSymbol {
                declared_type,
                inferred_type: None,
            })),
        }
    }

    pub fn add_parameter(
        &mut self,
        symbol: SymbolId,
        type_: Type,
    ) -> Result<&ParameterSymbol, SymbolError> {
        match self.parameters.entry(symbol) {
            Entry::Occupied(_) => Err(SymbolError::AlreadyDeclared { symbol }),
            Entry::Vacant(slot) => {
                let index = self.parameter_count;
                self.parameter_count += 1;
                Ok(slot.insert(ParameterSymbol { index, type_ }))
            }
        }
    }

    pub fn add_constant(
        &mut self,
        symbol: SymbolId,
        value: LiteralValue,
        type_: Type,
    ) -> Result<&ConstantSymbol, SymbolError> {
        match self.constants.entry(symbol) {
            Entry::Occupied(_) => Err(SymbolError::AlreadyDeclared { symbol }),
            Entry::Vacant(slot) => Ok(slot.insert(ConstantSymbol { value, type_ })),
        }
    }

    pub fn add_function(
        &mut self,
        symbol: SymbolId,
        return_type: Type,
        parameter_types: Vec<Type>,
    ) -> Result<FunctionSignature, SymbolError> {
        let signature = FunctionSignature::new(symbol, parameter_types.clone());

        match self.functions.entry(signature.clone()) {
            Entry::Occupied(_) => Err(SymbolError::FunctionAlreadyDeclared { symbol }),
            Entry::Vacant(slot) => {
                slot.insert(FunctionSymbol {
                    return_type,
                    parameter_types,
                });
                Ok(signature)
            }
        }
    }

    pub fn variable(&self, symbol: SymbolId) -> Option<&VariableSymbol> {
        self.variables.get(&symbol)
    }

    pub(crate) fn variable_mut(&mut self, symbol: SymbolId) -> Option<&mut VariableSymbol> {
        self.variables.get_mut(&symbol)
    }

    pub fn parameter(&self, symbol: SymbolId) -> Option<&ParameterSymbol> {
        self.parameters.get(&symbol)
    }

    pub fn constant(&self, symbol: SymbolId) -> Option<&ConstantSymbol> {
        self.constants.get(&symbol)
    }

    pub fn function(&self, signature: &FunctionSignature) -> Option<&FunctionSymbol> {
        self.functions.get(signature)
    }

    pub fn functions(&self) -> impl Iterator<Item = (&FunctionSignature, &FunctionSymbol)> {
        self.functions.iter()
    }

    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    /// The symbol as a value, checking variables, then parameters, then constants.
    pub fn value(&self, symbol: SymbolId) -> Option<ValueSymbol> {
        if let Some(variable) = self.variables.get(&symbol) {
            return Some(ValueSymbol::Variable(*variable));
        }
        if let Some(parameter) = self.parameters.get(&symbol) {
            return Some(ValueSymbol::Parameter(*parameter));
        }
        self.constants
            .get(&symbol)
            .map(|constant| ValueSymbol::Constant(constant.clone()))
    }

    pub fn declares_value(&self, symbol: SymbolId) -> bool {
        self.variables.contains_key(&symbol)
            || self.parameters.contains_key(&symbol)
            || self.constants.contains_key(&symbol)
    }

    /// Returns false if `symbol` is not a variable of this scope.
    pub fn mark_initialized(&mut self, symbol: SymbolId) -> bool {
        if !self.variables.contains_key(&symbol) {
            return false;
        }

        self.initialized.insert(symbol);
        true
    }

    pub fn is_initialized(&self, symbol: SymbolId) -> bool {
        self.initialized.contains(&symbol)
    }

    /// Returns false if `symbol` is not a variable of this scope.
    pub fn mark_abandoned(&mut self, symbol: SymbolId) -> bool {
        if !self.variables.contains_key(&symbol) {
            return false;
        }

        self.abandoned.insert(symbol);
        true
    }

    pub fn is_abandoned(&self, symbol: SymbolId) -> bool {
        self.abandoned.contains(&symbol)
    }
}
