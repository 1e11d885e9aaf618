mod builtin;
mod display;
mod graph;
mod kind;
mod name;
mod printer;
mod sal;
mod symbol;
mod value;

pub use builtin::{Builtin, BuiltinType};
pub use graph::SymbolGraph;
pub use kind::{CallingConvention, ConstantKind, NativeSymbolCategory, NativeSymbolKind};
pub use name::{NameKind, NativeName, generate_anonymous_name, is_anonymous_name};
pub use sal::SalEntryType;
use slotmap::new_key_type;
pub use symbol::{
    Composite, Enumeration, FunctionPointer, NamedType, NativeSymbol, Procedure, Signature,
    SymbolData,
};
pub use value::{NativeValue, NativeValueKind, ValueExpression};

new_key_type! {
    pub struct SymbolRef;
}
