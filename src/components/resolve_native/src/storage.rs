use crate::{StorageError, SymbolLookup};
use indexmap::IndexMap;
use native_symbols::{NameKind, NativeName, SymbolGraph, SymbolRef};
use std::collections::HashMap;

/// In-memory storage of global symbols, addressed by name.
///
/// Symbols stored here live in the storage's own graph. Looking up a symbol
/// gives back the key it was stored under.
#[derive(Clone, Debug, Default)]
pub struct BasicSymbolStorage {
    graph: SymbolGraph,
    defined: IndexMap<String, SymbolRef>,
    typedefs: IndexMap<String, SymbolRef>,
    procedures: IndexMap<String, SymbolRef>,
    constants: IndexMap<String, SymbolRef>,
    enum_values: IndexMap<String, SymbolRef>,
}

impl BasicSymbolStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage over symbols that already exist in `graph`, with none of them stored yet.
    pub fn with_graph(graph: SymbolGraph) -> Self {
        Self {
            graph,
            ..Default::default()
        }
    }

    pub fn graph_mut(&mut self) -> &mut SymbolGraph {
        &mut self.graph
    }

    pub fn defined_types(&self) -> impl Iterator<Item = SymbolRef> + '_ {
        self.defined.values().copied()
    }

    pub fn typedefs(&self) -> impl Iterator<Item = SymbolRef> + '_ {
        self.typedefs.values().copied()
    }

    pub fn procedures(&self) -> impl Iterator<Item = SymbolRef> + '_ {
        self.procedures.values().copied()
    }

    pub fn constants(&self) -> impl Iterator<Item = SymbolRef> + '_ {
        self.constants.values().copied()
    }

    pub fn enum_values(&self) -> impl Iterator<Item = SymbolRef> + '_ {
        self.enum_values.values().copied()
    }

    pub fn count(&self) -> usize {
        self.defined.len()
            + self.typedefs.len()
            + self.procedures.len()
            + self.constants.len()
            + self.enum_values.len()
    }

    /// Stores a symbol of this storage's graph under its name and kind.
    ///
    /// Adding an enum stores its values too. Symbols that are not global,
    /// such as pointers or members, are refused.
    pub fn add(&mut self, key: SymbolRef) -> Result<(), StorageError> {
        let name = self.native_name(key)?;

        let map = match name.kind {
            NameKind::Struct | NameKind::Union | NameKind::Enum | NameKind::FunctionPointer => {
                &mut self.defined
            }
            NameKind::TypeDef => &mut self.typedefs,
            NameKind::Procedure => &mut self.procedures,
            NameKind::Constant => &mut self.constants,
            NameKind::EnumValue => &mut self.enum_values,
        };

        if map.contains_key(&name.name) {
            return Err(StorageError::DuplicateName(name));
        }

        map.insert(name.name, key);

        let values = self.graph[key].enum_values().to_vec();

        for value in values {
            let value_name = self.graph[value].name.clone();
            self.enum_values.entry(value_name).or_insert(value);
        }

        Ok(())
    }

    /// Copies a global symbol, along with everything it refers to, out of
    /// `source` and stores the copy.
    ///
    /// `imported` maps keys of `source` to their copies and should be reused
    /// across imports from the same source, so that shared symbols are
    /// copied once.
    pub fn import(
        &mut self,
        source: &SymbolGraph,
        key: SymbolRef,
        imported: &mut HashMap<SymbolRef, SymbolRef>,
    ) -> Result<SymbolRef, StorageError> {
        let name = native_name_in(source, key)?;

        if self.contains(&name) {
            return Err(StorageError::DuplicateName(name));
        }

        let copy = self
            .graph
            .import(source, key, imported)
            .ok_or(StorageError::NotGlobal(name.name))?;

        self.add(copy)?;
        Ok(copy)
    }

    pub fn contains(&self, name: &NativeName) -> bool {
        let map = match name.kind {
            NameKind::Struct | NameKind::Union | NameKind::Enum | NameKind::FunctionPointer => {
                &self.defined
            }
            NameKind::TypeDef => &self.typedefs,
            NameKind::Procedure => &self.procedures,
            NameKind::Constant => &self.constants,
            NameKind::EnumValue => &self.enum_values,
        };

        map.contains_key(&name.name)
    }

    fn native_name(&self, key: SymbolRef) -> Result<NativeName, StorageError> {
        native_name_in(&self.graph, key)
    }
}

/// Name a global symbol is stored under.
pub(crate) fn native_name_in(
    graph: &SymbolGraph,
    key: SymbolRef,
) -> Result<NativeName, StorageError> {
    let symbol = graph
        .get(key)
        .ok_or_else(|| StorageError::NotGlobal("<null>".into()))?;

    NameKind::from_symbol_kind(symbol.kind())
        .map(|kind| NativeName::new(kind, symbol.name.clone()))
        .ok_or_else(|| StorageError::NotGlobal(symbol.name.clone()))
}

impl SymbolLookup for BasicSymbolStorage {
    fn graph(&self) -> &SymbolGraph {
        &self.graph
    }

    fn try_find_defined(&self, name: &str) -> Option<SymbolRef> {
        self.defined.get(name).copied()
    }

    fn try_find_typedef(&self, name: &str) -> Option<SymbolRef> {
        self.typedefs.get(name).copied()
    }

    fn try_find_procedure(&self, name: &str) -> Option<SymbolRef> {
        self.procedures.get(name).copied()
    }

    fn try_find_constant(&self, name: &str) -> Option<SymbolRef> {
        self.constants.get(name).copied()
    }

    fn try_find_enum_value(&self, name: &str) -> Option<SymbolRef> {
        self.enum_values.get(name).copied()
    }

    fn native_names(&self) -> Vec<NativeName> {
        self.defined
            .values()
            .chain(self.typedefs.values())
            .chain(self.procedures.values())
            .chain(self.constants.values())
            .chain(self.enum_values.values())
            .filter_map(|key| native_name_in(&self.graph, *key).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use native_symbols::ConstantKind;

    #[test]
    fn enum_values_are_stored_with_their_enum() {
        let mut storage = BasicSymbolStorage::new();

        let graph = storage.graph_mut();
        let enumeration = graph.enumeration("e1");
        let v1 = graph.add_enum_value(enumeration, "v1", "1");
        graph.add_enum_value(enumeration, "v2", "v1 + 1");

        assert!(storage.add(enumeration).is_ok());
        assert_eq!(storage.count(), 3);
        assert_eq!(storage.try_find_defined("e1"), Some(enumeration));
        assert_eq!(storage.try_find_enum_value("v1"), Some(v1));
        assert_eq!(
            storage.native_names(),
            vec![
                NativeName::new(NameKind::Enum, "e1"),
                NativeName::new(NameKind::EnumValue, "v1"),
                NativeName::new(NameKind::EnumValue, "v2"),
            ]
        );
    }

    #[test]
    fn duplicates_are_refused() {
        let mut storage = BasicSymbolStorage::new();

        let graph = storage.graph_mut();
        let first = graph.structure("s1");
        let second = graph.union("s1");
        let typedef = graph.typedef("s1", Some(first));

        assert!(storage.add(first).is_ok());
        assert_eq!(
            storage.add(second),
            Err(StorageError::DuplicateName(NativeName::new(
                NameKind::Union,
                "s1"
            )))
        );
        assert!(storage.add(typedef).is_ok());
        assert_eq!(storage.count(), 2);
    }

    #[test]
    fn imports_copy_the_whole_symbol() {
        let mut source = SymbolGraph::new();
        let constant = source.constant("FOO", "BAR + 1", ConstantKind::Macro);

        let mut storage = BasicSymbolStorage::new();
        let mut imported = HashMap::new();

        let copy = storage.import(&source, constant, &mut imported);
        assert!(copy.is_ok());
        assert_eq!(storage.try_find_constant("FOO"), copy.ok());
        assert_eq!(storage.graph().print(imported[&constant]), source.print(constant));

        assert!(storage.import(&source, constant, &mut imported).is_err());
        assert_eq!(storage.graph().len(), source.len());
    }

    #[test]
    fn only_global_symbols_are_stored() {
        let mut storage = BasicSymbolStorage::new();
        let pointer = {
            let graph = storage.graph_mut();
            let target = graph.named("foo");
            graph.pointer(target)
        };

        assert_eq!(storage.add(pointer), Err(StorageError::NotGlobal("*".into())));
        assert_eq!(storage.count(), 0);
    }
}
