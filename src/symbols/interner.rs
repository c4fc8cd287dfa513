use std::collections::HashMap;

use super::SymbolId;

/// Hands out one [`SymbolId`] per distinct name, in order of first sight.
#[derive(Debug, Default, Clone)]
pub struct SymbolInterner {
    ids: HashMap<String, SymbolId>,
    names: Vec<String>,
}

impl SymbolInterner {
    pub fn new() -> Self {
        SymbolInterner::default()
    }

    /// Returns the id of `name`, allocating the next one if it is new.
    pub fn intern(&mut self, name: &str) -> SymbolId {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }

        let id = SymbolId::from_raw(self.names.len() as u32);
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        id
    }

    pub fn get(&self, name: &str) -> Option<SymbolId> {
        self.ids.get(name).copied()
    }

    pub fn resolve(&self, id: SymbolId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
