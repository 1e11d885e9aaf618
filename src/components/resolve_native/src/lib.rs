mod bag;
mod equality;
mod error;
mod iterator;
mod storage;
mod transform;

pub use bag::NativeSymbolBag;
pub use equality::{EqualityMode, are_equal, are_equal_recursive, are_equal_top_level};
pub use error::StorageError;
pub use iterator::{
    SymbolRelationship, find_all_native_symbol_relationships, find_all_native_symbols,
    find_all_reachable_defined_types,
};
pub use native_symbols::{generate_anonymous_name, is_anonymous_name};
use native_symbols::{NativeName, SymbolGraph, SymbolRef};
pub use storage::BasicSymbolStorage;
pub use transform::{collapse_named_types, collapse_typedefs, rename_type_symbol};

/// Read access to a set of named global symbols.
///
/// Every key handed out refers into `graph()`.
pub trait SymbolLookup {
    fn graph(&self) -> &SymbolGraph;

    /// Struct, union, enum or function pointer
    fn try_find_defined(&self, name: &str) -> Option<SymbolRef>;

    fn try_find_typedef(&self, name: &str) -> Option<SymbolRef>;
    fn try_find_procedure(&self, name: &str) -> Option<SymbolRef>;
    fn try_find_constant(&self, name: &str) -> Option<SymbolRef>;
    fn try_find_enum_value(&self, name: &str) -> Option<SymbolRef>;

    fn native_names(&self) -> Vec<NativeName>;
}
