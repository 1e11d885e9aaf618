use crate::{
    BasicSymbolStorage, StorageError, SymbolLookup,
    iterator::{SymbolRelationship, find_all_native_symbol_relationships, find_all_native_symbols},
};
use analyze_native::NativeCodeAnalyzerResult;
use diagnostics::Diagnostics;
use native_symbols::{Builtin, NameKind, NativeSymbolKind, SymbolData, SymbolGraph, SymbolRef};
use std::collections::HashMap;

/// Which map of a lookup a name is searched in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum Namespace {
    Defined,
    TypeDef,
    Procedure,
    Constant,
    EnumValue,
}

/// Symbols being gathered from a header, able to resolve the names they use.
///
/// Names that are not declared locally are looked for in a chain of other
/// lookups, in order. Whatever is found there is copied into this bag the
/// first time it is asked for, and the answer is remembered.
pub struct NativeSymbolBag<'a> {
    storage: BasicSymbolStorage,
    chain: Vec<&'a dyn SymbolLookup>,
    cache: HashMap<(Namespace, String), Option<SymbolRef>>,
    imported: Vec<HashMap<SymbolRef, SymbolRef>>,
}

impl<'a> NativeSymbolBag<'a> {
    pub fn new(chain: Vec<&'a dyn SymbolLookup>) -> Self {
        Self::with_graph(SymbolGraph::new(), chain)
    }

    /// Bag over symbols already created in `graph`. None of them are added yet.
    pub fn with_graph(graph: SymbolGraph, chain: Vec<&'a dyn SymbolLookup>) -> Self {
        let imported = chain.iter().map(|_| HashMap::new()).collect();

        Self {
            storage: BasicSymbolStorage::with_graph(graph),
            chain,
            cache: HashMap::new(),
            imported,
        }
    }

    /// Adds everything an analysis found, reporting names declared twice.
    ///
    /// Macros are added as constants.
    pub fn create_from(
        mut result: NativeCodeAnalyzerResult,
        chain: Vec<&'a dyn SymbolLookup>,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let constants = result.convert_macros_to_constants();
        diagnostics.append(result.diagnostics);

        let mut bag = Self::with_graph(result.graph, chain);

        for constant in constants {
            if bag.add_constant(constant).is_err() {
                let name = &bag.graph()[constant].name;
                diagnostics.push_error(format!("Duplicate NativeConstant Name: {}", name), None);
            }
        }

        for symbol in result.symbols {
            let (added, label) = match symbol.name.kind {
                NameKind::Struct | NameKind::Union | NameKind::Enum | NameKind::FunctionPointer => {
                    (bag.add_defined_type(symbol.symbol), "NativeDefinedType")
                }
                NameKind::TypeDef => (bag.add_typedef(symbol.symbol), "NativeTypeDef"),
                NameKind::Procedure => (bag.add_procedure(symbol.symbol), "NativeProcedure"),

                // Stored along with their enum
                NameKind::Constant | NameKind::EnumValue => continue,
            };

            if added.is_err() {
                diagnostics.push_error(
                    format!("Duplicate {} Name: {}", label, symbol.name.name),
                    None,
                );
            }
        }

        bag
    }

    pub fn graph(&self) -> &SymbolGraph {
        self.storage.graph()
    }

    pub fn graph_mut(&mut self) -> &mut SymbolGraph {
        self.storage.graph_mut()
    }

    /// Symbols added to this bag, not counting those copied from the chain.
    pub fn storage(&self) -> &BasicSymbolStorage {
        &self.storage
    }

    pub fn count(&self) -> usize {
        self.storage.count()
    }

    pub fn add_defined_type(&mut self, key: SymbolRef) -> Result<(), StorageError> {
        self.add_checked(key, |kind| kind.is_defined_type())
    }

    pub fn add_typedef(&mut self, key: SymbolRef) -> Result<(), StorageError> {
        self.add_checked(key, |kind| kind.is_type_def())
    }

    pub fn add_procedure(&mut self, key: SymbolRef) -> Result<(), StorageError> {
        self.add_checked(key, |kind| kind.is_procedure())
    }

    pub fn add_constant(&mut self, key: SymbolRef) -> Result<(), StorageError> {
        self.add_checked(key, |kind| kind.is_constant())
    }

    fn add_checked(
        &mut self,
        key: SymbolRef,
        is_expected: impl Fn(NameKind) -> bool,
    ) -> Result<(), StorageError> {
        let symbol = self
            .graph()
            .get(key)
            .ok_or_else(|| StorageError::NotGlobal("<null>".into()))?;

        match NameKind::from_symbol_kind(symbol.kind()) {
            Some(kind) if is_expected(kind) => self.storage.add(key),
            _ => Err(StorageError::NotGlobal(symbol.name.clone())),
        }
    }

    pub fn try_find_defined(&mut self, name: &str) -> Option<SymbolRef> {
        self.try_find(Namespace::Defined, name)
    }

    pub fn try_find_typedef(&mut self, name: &str) -> Option<SymbolRef> {
        self.try_find(Namespace::TypeDef, name)
    }

    pub fn try_find_procedure(&mut self, name: &str) -> Option<SymbolRef> {
        self.try_find(Namespace::Procedure, name)
    }

    pub fn try_find_constant(&mut self, name: &str) -> Option<SymbolRef> {
        self.try_find(Namespace::Constant, name)
    }

    pub fn try_find_enum_value(&mut self, name: &str) -> Option<SymbolRef> {
        self.try_find(Namespace::EnumValue, name)
    }

    fn try_find(&mut self, namespace: Namespace, name: &str) -> Option<SymbolRef> {
        find_in(&self.storage, namespace, name).or_else(|| self.pull(namespace, name))
    }

    /// Copies a symbol in from the first lookup of the chain that has it.
    fn pull(&mut self, namespace: Namespace, name: &str) -> Option<SymbolRef> {
        let cache_key = (namespace, name.to_string());

        if let Some(cached) = self.cache.get(&cache_key) {
            return *cached;
        }

        let mut found = None;

        for (index, lookup) in self.chain.iter().copied().enumerate() {
            let Some(key) = find_in(lookup, namespace, name) else {
                continue;
            };

            found = self
                .storage
                .graph_mut()
                .import(lookup.graph(), key, &mut self.imported[index]);
            break;
        }

        self.cache.insert(cache_key, found);
        found
    }

    /// Finds the type a name refers to, checking in order:
    ///
    /// 1. this bag's defined types, then its typedefs
    /// 2. the chained lookups' defined types, then their typedefs
    /// 3. builtins such as `unsigned int`
    ///
    /// The first match wins even when a qualified reference needs another
    /// kind, so a local `typedef int s1;` hides a chained `struct s1`.
    fn find_type(&mut self, name: &str) -> Option<SymbolRef> {
        if let Some(local) = find_in(&self.storage, Namespace::Defined, name)
            .or_else(|| find_in(&self.storage, Namespace::TypeDef, name))
        {
            return Some(local);
        }

        if let Some(pulled) = self
            .pull(Namespace::Defined, name)
            .or_else(|| self.pull(Namespace::TypeDef, name))
        {
            return Some(pulled);
        }

        Builtin::from_name(name).map(|builtin| self.graph_mut().builtin(builtin))
    }

    /// Finds what a name used as a value refers to: a constant, then an enum value.
    fn find_value(&mut self, name: &str) -> Option<SymbolRef> {
        if let Some(local) = find_in(&self.storage, Namespace::Constant, name)
            .or_else(|| find_in(&self.storage, Namespace::EnumValue, name))
        {
            return Some(local);
        }

        self.pull(Namespace::Constant, name)
            .or_else(|| self.pull(Namespace::EnumValue, name))
    }

    /// Finds what a named type refers to.
    ///
    /// A name written as `struct x`, `union x` or `enum x` only matches a
    /// defined type of that kind. `class x` is taken as `struct x`.
    fn resolve_named_type(&mut self, key: SymbolRef) -> Option<SymbolRef> {
        let symbol = self.graph().get(key)?;

        let SymbolData::Named(named) = &symbol.data else {
            return None;
        };

        let name = symbol.name.clone();
        let qualification = named.qualification.clone();
        let found = self.find_type(&name)?;

        let Some(qualification) = qualification.filter(|q| !q.is_empty()) else {
            return Some(found);
        };

        let expected = match qualification.as_str() {
            "struct" | "class" => NativeSymbolKind::StructType,
            "union" => NativeSymbolKind::UnionType,
            "enum" => NativeSymbolKind::EnumType,
            _ => return None,
        };

        (self.graph()[found].kind() == expected).then_some(found)
    }

    /// Binds every named type and every name in a value expression that can
    /// be bound, repeating until nothing more can be.
    ///
    /// A name qualified with `struct`, `union` or `enum` that is declared
    /// nowhere stands for an opaque type. Returns whether everything could be
    /// resolved. Only the names still unresolved at the end are reported.
    pub fn try_resolve_symbols_and_values(&mut self, diagnostics: &mut Diagnostics) -> bool {
        loop {
            let (progress, failures) = self.resolve_pass(diagnostics);

            if progress {
                continue;
            }

            let succeeded = failures.is_empty();

            for failure in failures {
                diagnostics.push_error(failure, None);
            }

            return succeeded;
        }
    }

    /// Returns whether anything was bound, along with what could not be.
    fn resolve_pass(&mut self, diagnostics: &mut Diagnostics) -> (bool, Vec<String>) {
        let mut progress = false;
        let mut failures = Vec::new();

        for key in self.find_unresolved_symbols() {
            let Some(symbol) = self.graph().get(key) else {
                continue;
            };

            match &symbol.data {
                SymbolData::Named(named) => {
                    let is_qualified = named
                        .qualification
                        .as_ref()
                        .is_some_and(|qualification| !qualification.is_empty());

                    let display_name = self.graph().display_name(key);

                    if let Some(target) = self.resolve_named_type(key) {
                        self.graph_mut().bind(key, target);
                        progress = true;
                    } else if is_qualified {
                        diagnostics.push_warning(
                            format!("Treating '{}' as pointer to opaque type", display_name),
                            None,
                        );

                        let opaque = self.graph_mut().opaque();
                        self.graph_mut().bind(key, opaque);
                        progress = true;
                    } else {
                        failures.push(format!("Failed to resolve name '{}'", display_name));
                    }
                }
                SymbolData::Value(value) => {
                    let name = symbol.name.clone();
                    let is_type = value.is_symbol_type();

                    let target = if is_type {
                        self.find_type(&name)
                    } else {
                        self.find_value(&name)
                    };

                    match target {
                        Some(target) => {
                            self.graph_mut().bind(key, target);
                            progress = true;
                        }
                        None => failures.push(format!("Failed to resolve value '{}'", name)),
                    }
                }
                _ => failures.push(format!(
                    "Failed to resolve {} -> '{}'",
                    symbol.kind(),
                    self.graph().display_name(key)
                )),
            }
        }

        (progress, failures)
    }

    fn find_unresolved_symbols(&self) -> Vec<SymbolRef> {
        find_all_native_symbols(self.graph(), self.roots())
            .into_iter()
            .filter(|key| {
                self.graph()
                    .get(*key)
                    .is_some_and(|symbol| !symbol.is_immediately_resolved())
            })
            .collect()
    }

    /// Values reachable from this bag's symbols that are not bound yet.
    pub fn find_unresolved_native_values(&self) -> Vec<SymbolRef> {
        self.find_unresolved_symbols()
            .into_iter()
            .filter(|key| self.graph()[*key].data.is_value())
            .collect()
    }

    /// Relationships leading to a symbol reachable from this bag that is not
    /// bound yet, such as a pointer to an unknown type name.
    pub fn find_unresolved_native_symbol_relationships(&self) -> Vec<SymbolRelationship> {
        self.find_all_reachable_native_symbol_relationships()
            .into_iter()
            .filter(|relationship| {
                self.graph()
                    .get(relationship.symbol)
                    .is_some_and(|symbol| !symbol.is_immediately_resolved())
            })
            .collect()
    }

    pub fn find_all_reachable_native_symbols(&self) -> Vec<SymbolRef> {
        find_all_native_symbols(self.graph(), self.roots())
    }

    pub fn find_all_reachable_native_symbol_relationships(&self) -> Vec<SymbolRelationship> {
        find_all_native_symbol_relationships(self.graph(), self.roots())
    }

    fn roots(&self) -> Vec<SymbolRef> {
        self.storage
            .defined_types()
            .chain(self.storage.typedefs())
            .chain(self.storage.procedures())
            .chain(self.storage.constants())
            .collect()
    }

    pub fn find_resolved_defined_types(&self) -> Vec<SymbolRef> {
        self.find_resolved(self.storage.defined_types())
    }

    pub fn find_resolved_typedefs(&self) -> Vec<SymbolRef> {
        self.find_resolved(self.storage.typedefs())
    }

    pub fn find_resolved_procedures(&self) -> Vec<SymbolRef> {
        self.find_resolved(self.storage.procedures())
    }

    pub fn find_resolved_constants(&self) -> Vec<SymbolRef> {
        self.find_resolved(self.storage.constants())
    }

    /// Every resolved symbol of this bag: defined types, typedefs, constants
    /// and procedures, in that order.
    pub fn find_resolved_native_symbols(&self) -> Vec<SymbolRef> {
        let mut resolved = self.find_resolved_defined_types();
        resolved.extend(self.find_resolved_typedefs());
        resolved.extend(self.find_resolved_constants());
        resolved.extend(self.find_resolved_procedures());
        resolved
    }

    fn find_resolved(&self, keys: impl Iterator<Item = SymbolRef>) -> Vec<SymbolRef> {
        let mut memo = HashMap::new();
        keys.filter(|key| self.is_resolved(*key, &mut memo))
            .collect()
    }

    /// Whether everything below `key` is bound.
    ///
    /// `memo` holds `None` for the symbols being explored, which count as
    /// resolved when met again. Any unresolved symbol in the cycle is still
    /// found through another path.
    fn is_resolved(&self, key: SymbolRef, memo: &mut HashMap<SymbolRef, Option<bool>>) -> bool {
        if let Some(known) = memo.get(&key) {
            return known.unwrap_or(true);
        }

        let Some(symbol) = self.graph().get(key) else {
            return false;
        };

        let children = symbol.children();

        if children.is_empty() {
            return true;
        }

        memo.insert(key, None);

        let resolved = children.into_iter().all(|child| {
            self.graph()
                .get(child)
                .is_some_and(|child_symbol| child_symbol.is_immediately_resolved())
                && self.is_resolved(child, memo)
        });

        memo.insert(key, Some(resolved));
        resolved
    }

    /// Copies every fully resolved symbol of this bag into `storage`.
    pub fn save_to_storage(&self, storage: &mut BasicSymbolStorage) -> Result<(), StorageError> {
        let mut imported = HashMap::new();

        for key in self
            .find_resolved_constants()
            .into_iter()
            .chain(self.find_resolved_defined_types())
            .chain(self.find_resolved_typedefs())
            .chain(self.find_resolved_procedures())
        {
            storage.import(self.graph(), key, &mut imported)?;
        }

        Ok(())
    }
}

fn find_in(lookup: &dyn SymbolLookup, namespace: Namespace, name: &str) -> Option<SymbolRef> {
    match namespace {
        Namespace::Defined => lookup.try_find_defined(name),
        Namespace::TypeDef => lookup.try_find_typedef(name),
        Namespace::Procedure => lookup.try_find_procedure(name),
        Namespace::Constant => lookup.try_find_constant(name),
        Namespace::EnumValue => lookup.try_find_enum_value(name),
    }
}
