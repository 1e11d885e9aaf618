use itertools::Itertools;
use native_symbols::{NativeSymbolCategory, SymbolGraph, SymbolRef};
use std::collections::{HashSet, VecDeque};

/// A symbol together with the symbol it was reached from. Roots have no parent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SymbolRelationship {
    pub parent: Option<SymbolRef>,
    pub symbol: SymbolRef,
}

/// Every parent and child pair reachable from `roots`, breadth first.
///
/// A symbol reached through several parents appears once per parent, but its
/// own children are only visited once.
pub fn find_all_native_symbol_relationships(
    graph: &SymbolGraph,
    roots: impl IntoIterator<Item = SymbolRef>,
) -> Vec<SymbolRelationship> {
    let roots = roots.into_iter().collect_vec();

    let mut found = roots
        .iter()
        .map(|root| SymbolRelationship {
            parent: None,
            symbol: *root,
        })
        .collect_vec();

    let mut visited = HashSet::new();
    let mut to_visit = VecDeque::from(roots);

    while let Some(current) = to_visit.pop_front() {
        if !visited.insert(current) {
            continue;
        }

        let Some(symbol) = graph.get(current) else {
            continue;
        };

        for child in symbol.children() {
            found.push(SymbolRelationship {
                parent: Some(current),
                symbol: child,
            });
            to_visit.push_back(child);
        }
    }

    found
}

/// Every symbol reachable from `roots`, each listed once.
pub fn find_all_native_symbols(
    graph: &SymbolGraph,
    roots: impl IntoIterator<Item = SymbolRef>,
) -> Vec<SymbolRef> {
    find_all_native_symbol_relationships(graph, roots)
        .into_iter()
        .map(|relationship| relationship.symbol)
        .unique()
        .collect()
}

pub fn find_all_reachable_defined_types(graph: &SymbolGraph, root: SymbolRef) -> Vec<SymbolRef> {
    find_all_native_symbols(graph, [root])
        .into_iter()
        .filter(|key| {
            graph
                .get(*key)
                .is_some_and(|symbol| symbol.category() == NativeSymbolCategory::Defined)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use native_symbols::{Builtin, BuiltinType};

    #[test]
    fn cycles_are_visited_once() {
        let mut graph = SymbolGraph::new();

        let node = graph.structure("node");
        let named = graph.qualified("struct", "node");
        graph.bind(named, node);
        let pointer = graph.pointer(named);
        let next = graph.add_member(node, "next", pointer);

        let relationships = find_all_native_symbol_relationships(&graph, [node]);

        assert_eq!(
            relationships,
            vec![
                SymbolRelationship {
                    parent: None,
                    symbol: node
                },
                SymbolRelationship {
                    parent: Some(node),
                    symbol: next
                },
                SymbolRelationship {
                    parent: Some(next),
                    symbol: pointer
                },
                SymbolRelationship {
                    parent: Some(pointer),
                    symbol: named
                },
                SymbolRelationship {
                    parent: Some(named),
                    symbol: node
                },
            ]
        );

        assert_eq!(
            find_all_native_symbols(&graph, [node]),
            vec![node, next, pointer, named]
        );
    }

    #[test]
    fn reachable_defined_types() {
        let mut graph = SymbolGraph::new();

        let inner = graph.union("u1");
        let int = graph.builtin(Builtin::new(BuiltinType::Int32));
        graph.add_member(inner, "i", int);

        let outer = graph.structure("s1");
        graph.add_member(outer, "u", inner);

        assert_eq!(
            find_all_reachable_defined_types(&graph, outer),
            vec![outer, inner]
        );
        assert_eq!(find_all_reachable_defined_types(&graph, int), vec![]);
    }
}
