use build_pp::{Macro, MacroKind};
use diagnostics::Diagnostics;
use indexmap::IndexMap;
use native_symbols::{ConstantKind, NativeName, SymbolGraph, SymbolRef};

/// A declaration found at the top level of the analyzed text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeGlobalSymbol {
    pub name: NativeName,
    pub symbol: SymbolRef,
}

#[derive(Debug)]
pub struct NativeCodeAnalyzerResult {
    /// Macros in place once the whole text was read
    pub macros: IndexMap<String, Macro>,

    pub graph: SymbolGraph,

    /// Defined types, typedefs, procedures and enum values, in that order
    pub symbols: Vec<NativeGlobalSymbol>,

    pub diagnostics: Diagnostics,
}

impl NativeCodeAnalyzerResult {
    /// Creates a constant in `graph` for every macro.
    ///
    /// Function-like macros keep their signature as a quoted string value.
    pub fn convert_macros_to_constants(&mut self) -> Vec<SymbolRef> {
        self.macros
            .values()
            .map(|define| match &define.kind {
                MacroKind::Object => {
                    self.graph
                        .constant(&define.name, &define.value, ConstantKind::Macro)
                }
                MacroKind::Method(method) => self.graph.constant(
                    &define.name,
                    &method.signature(),
                    ConstantKind::MacroMethod,
                ),
            })
            .collect()
    }
}
