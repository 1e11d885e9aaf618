use crate::iterator::{find_all_native_symbol_relationships, find_all_native_symbols};
use native_symbols::{NativeSymbolCategory, SymbolData, SymbolGraph, SymbolRef};

/// Points the parents of every bound named type below `root` at the type it names.
pub fn collapse_named_types(graph: &mut SymbolGraph, root: SymbolRef) {
    collapse(graph, root, SymbolData::is_named);
}

/// Points the parents of every bound typedef below `root` at the type it stands for.
pub fn collapse_typedefs(graph: &mut SymbolGraph, root: SymbolRef) {
    collapse(graph, root, SymbolData::is_type_def);
}

fn collapse(graph: &mut SymbolGraph, root: SymbolRef, is_collapsed: impl Fn(&SymbolData) -> bool) {
    for relationship in find_all_native_symbol_relationships(graph, [root]) {
        let Some(parent) = relationship.parent else {
            continue;
        };

        let Some(child) = graph.get(relationship.symbol) else {
            continue;
        };

        if !is_collapsed(&child.data) {
            continue;
        }

        if let Some(real_type) = child.real_type() {
            if let Some(parent) = graph.get_mut(parent) {
                parent.replace_child(relationship.symbol, real_type);
            }
        }
    }
}

/// Renames the defined types and named types below `root` called `old_name`.
pub fn rename_type_symbol(graph: &mut SymbolGraph, root: SymbolRef, old_name: &str, new_name: &str) {
    for key in find_all_native_symbols(graph, [root]) {
        let Some(symbol) = graph.get_mut(key) else {
            continue;
        };

        let is_type_name =
            symbol.category() == NativeSymbolCategory::Defined || symbol.data.is_named();

        if is_type_name && symbol.name == old_name {
            symbol.name = new_name.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use native_symbols::{Builtin, BuiltinType};

    #[test]
    fn collapsing() {
        let mut graph = SymbolGraph::new();

        let int = graph.builtin(Builtin::new(BuiltinType::Int32));
        let typedef = graph.typedef("INT", Some(int));
        let named = graph.named("INT");
        graph.bind(named, typedef);

        let pointer = graph.pointer(named);
        let structure = graph.structure("s1");
        graph.add_member(structure, "m1", pointer);

        collapse_named_types(&mut graph, structure);
        assert_eq!(graph.print(structure), "s1(m1(*(INT(int))))");

        collapse_typedefs(&mut graph, structure);
        assert_eq!(graph.print(structure), "s1(m1(*(int)))");
    }

    #[test]
    fn unbound_names_are_kept() {
        let mut graph = SymbolGraph::new();

        let named = graph.named("DWORD");
        let pointer = graph.pointer(named);

        collapse_named_types(&mut graph, pointer);
        assert_eq!(graph.print(pointer), "*(DWORD)");
    }

    #[test]
    fn renaming() {
        let mut graph = SymbolGraph::new();

        let structure = graph.structure("s1");
        let named = graph.qualified("struct", "s1");
        let pointer = graph.pointer(named);
        graph.add_member(structure, "s1", pointer);

        rename_type_symbol(&mut graph, structure, "s1", "s2");
        assert_eq!(graph.print(structure), "s2(s1(*(s2)))");
    }
}
