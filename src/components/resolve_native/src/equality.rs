use crate::iterator::find_all_reachable_defined_types;
use indexmap::IndexMap;
use native_symbols::{NativeSymbol, NativeSymbolCategory, SymbolData, SymbolGraph, SymbolRef};
use std::collections::HashSet;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EqualityMode {
    /// Nested defined types are compared by name only
    TopLevel,

    /// Every defined type reachable from either side must match up by name
    Recursive,
}

pub fn are_equal(
    mode: EqualityMode,
    left_graph: &SymbolGraph,
    left: SymbolRef,
    right_graph: &SymbolGraph,
    right: SymbolRef,
) -> bool {
    match mode {
        EqualityMode::TopLevel => are_equal_top_level(left_graph, left, right_graph, right),
        EqualityMode::Recursive => are_equal_recursive(left_graph, left, right_graph, right),
    }
}

pub fn are_equal_top_level(
    left_graph: &SymbolGraph,
    left: SymbolRef,
    right_graph: &SymbolGraph,
    right: SymbolRef,
) -> bool {
    Comparer::new(left_graph, right_graph).top_level(left, right)
}

pub fn are_equal_recursive(
    left_graph: &SymbolGraph,
    left: SymbolRef,
    right_graph: &SymbolGraph,
    right: SymbolRef,
) -> bool {
    if !are_equal_top_level(left_graph, left, right_graph, right) {
        return false;
    }

    let left_defined = defined_types_by_name(left_graph, left);
    let right_defined = defined_types_by_name(right_graph, right);

    left_defined.len() == right_defined.len()
        && left_defined.iter().all(|(name, left)| {
            right_defined.get(name).is_some_and(|right| {
                are_equal_top_level(left_graph, *left, right_graph, *right)
            })
        })
}

/// Reachable defined types, keeping the first one seen for each name.
///
/// Anonymous types go by the order they are reached in instead.
fn defined_types_by_name(graph: &SymbolGraph, root: SymbolRef) -> IndexMap<String, SymbolRef> {
    let mut by_name = IndexMap::new();
    let mut anonymous = 0;

    for key in find_all_reachable_defined_types(graph, root) {
        let symbol = &graph[key];

        let name = if symbol.is_anonymous() {
            anonymous += 1;
            format!("<anonymous {}>", anonymous)
        } else {
            symbol.name.clone()
        };

        by_name.entry(name).or_insert(key);
    }

    by_name
}

struct Comparer<'a> {
    left: &'a SymbolGraph,
    right: &'a SymbolGraph,
    visited: HashSet<(SymbolRef, SymbolRef)>,
}

impl<'a> Comparer<'a> {
    fn new(left: &'a SymbolGraph, right: &'a SymbolGraph) -> Self {
        Self {
            left,
            right,
            visited: HashSet::new(),
        }
    }

    fn top_level(&mut self, left: SymbolRef, right: SymbolRef) -> bool {
        let left = self.left.dig_through_named_types(left);
        let right = self.right.dig_through_named_types(right);

        let (Some(left_symbol), Some(right_symbol)) = (self.left.get(left), self.right.get(right))
        else {
            return false;
        };

        if left_symbol.kind() != right_symbol.kind() || !self.core(left, right) {
            return false;
        }

        if left_symbol.category() != NativeSymbolCategory::Defined {
            return true;
        }

        let left_members = left_symbol.members();
        let right_members = right_symbol.members();

        left_members.len() == right_members.len()
            && left_members
                .iter()
                .zip(right_members)
                .all(|(left, right)| self.member(*left, *right))
    }

    fn member(&mut self, left: SymbolRef, right: SymbolRef) -> bool {
        let (Some(left), Some(right)) = (self.left.get(left), self.right.get(right)) else {
            return false;
        };

        let (SymbolData::Member { ty: left_type }, SymbolData::Member { ty: right_type }) =
            (&left.data, &right.data)
        else {
            return false;
        };

        left.name == right.name && self.core(*left_type, *right_type)
    }

    fn core(&mut self, left: SymbolRef, right: SymbolRef) -> bool {
        let left = self.left.dig_through_named_types(left);
        let right = self.right.dig_through_named_types(right);

        if !self.visited.insert((left, right)) {
            return true;
        }

        let (Some(left_symbol), Some(right_symbol)) = (self.left.get(left), self.right.get(right))
        else {
            return false;
        };

        if left_symbol.kind() != right_symbol.kind() {
            // An unbound name matches the defined type it names
            let is_name_of_defined = (left_symbol.data.is_named()
                && right_symbol.category() == NativeSymbolCategory::Defined)
                || (left_symbol.category() == NativeSymbolCategory::Defined
                    && right_symbol.data.is_named());

            return is_name_of_defined && left_symbol.name == right_symbol.name;
        }

        match left_symbol.category() {
            NativeSymbolCategory::Defined => self.defined(left_symbol, right_symbol),
            NativeSymbolCategory::Proxy => self.proxy(left_symbol, right_symbol),
            NativeSymbolCategory::Specialized => specialized(left_symbol, right_symbol),
            NativeSymbolCategory::Procedure | NativeSymbolCategory::Extra => false,
        }
    }

    fn defined(&self, left: &NativeSymbol, right: &NativeSymbol) -> bool {
        let both_anonymous = left.is_anonymous() && right.is_anonymous();

        if !both_anonymous && left.name != right.name {
            return false;
        }

        let left_values = left.enum_values();
        let right_values = right.enum_values();

        left_values.len() == right_values.len()
            && left_values
                .iter()
                .zip(right_values)
                .all(|(left, right)| self.enum_value(*left, *right))
    }

    fn enum_value(&self, left: SymbolRef, right: SymbolRef) -> bool {
        let (Some(left), Some(right)) = (self.left.get(left), self.right.get(right)) else {
            return false;
        };

        let (
            SymbolData::EnumValue {
                value: left_value, ..
            },
            SymbolData::EnumValue {
                value: right_value, ..
            },
        ) = (&left.data, &right.data)
        else {
            return false;
        };

        left.name == right.name
            && expression_text(self.left, *left_value) == expression_text(self.right, *right_value)
    }

    fn proxy(&mut self, left: &NativeSymbol, right: &NativeSymbol) -> bool {
        let same_shape = match (&left.data, &right.data) {
            (
                SymbolData::Array {
                    element_count: left_count,
                    ..
                },
                SymbolData::Array {
                    element_count: right_count,
                    ..
                },
            ) => left_count == right_count,
            (SymbolData::Named(_), SymbolData::Named(_))
            | (SymbolData::TypeDef { .. }, SymbolData::TypeDef { .. }) => left.name == right.name,
            (SymbolData::Pointer { .. }, SymbolData::Pointer { .. }) => true,
            _ => false,
        };

        if !same_shape {
            return false;
        }

        match (left.real_type(), right.real_type()) {
            (None, None) => true,
            (Some(left), Some(right)) => self.core(left, right),
            _ => false,
        }
    }
}

fn specialized(left: &NativeSymbol, right: &NativeSymbol) -> bool {
    match (&left.data, &right.data) {
        (SymbolData::BitVector { size: left }, SymbolData::BitVector { size: right }) => {
            left == right
        }
        (SymbolData::Builtin(left), SymbolData::Builtin(right)) => {
            left.builtin_type == right.builtin_type
        }
        (SymbolData::Opaque, SymbolData::Opaque) => true,
        _ => false,
    }
}

fn expression_text(graph: &SymbolGraph, key: SymbolRef) -> Option<&str> {
    match &graph.get(key)?.data {
        SymbolData::ValueExpression(expression) => Some(&expression.expression),
        _ => None,
    }
}
