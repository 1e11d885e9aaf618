use crate::{
    Builtin, CallingConvention, Composite, ConstantKind, Enumeration, FunctionPointer,
    NamedType, NativeSymbol, NativeValue, Procedure, SalEntryType, Signature, SymbolData,
    SymbolRef, ValueExpression, generate_anonymous_name, value::read_values,
};
use slotmap::SlotMap;
use std::{
    collections::HashMap,
    ops::{Index, IndexMut},
};

/// Arena holding symbols that refer to each other by key.
///
/// References may form cycles, such as a struct holding a pointer to itself.
#[derive(Clone, Debug)]
pub struct SymbolGraph {
    symbols: SlotMap<SymbolRef, NativeSymbol>,
}

impl Default for SymbolGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolGraph {
    pub fn new() -> Self {
        Self {
            symbols: SlotMap::with_key(),
        }
    }

    pub fn insert(&mut self, symbol: NativeSymbol) -> SymbolRef {
        self.symbols.insert(symbol)
    }

    pub fn get(&self, key: SymbolRef) -> Option<&NativeSymbol> {
        self.symbols.get(key)
    }

    pub fn get_mut(&mut self, key: SymbolRef) -> Option<&mut NativeSymbol> {
        self.symbols.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn builtin(&mut self, builtin: Builtin) -> SymbolRef {
        self.insert(NativeSymbol::new(
            builtin.builtin_type.name(),
            SymbolData::Builtin(builtin),
        ))
    }

    pub fn pointer(&mut self, real_type: SymbolRef) -> SymbolRef {
        self.insert(NativeSymbol::new(
            "*",
            SymbolData::Pointer {
                real_type: Some(real_type),
            },
        ))
    }

    pub fn array(&mut self, real_type: SymbolRef, element_count: Option<usize>) -> SymbolRef {
        self.insert(NativeSymbol::new(
            "[]",
            SymbolData::Array {
                real_type: Some(real_type),
                element_count,
            },
        ))
    }

    /// Unbound reference to a type by name.
    pub fn named(&mut self, name: impl Into<String>) -> SymbolRef {
        self.named_type(name, NamedType::default())
    }

    pub fn qualified(
        &mut self,
        qualification: impl Into<String>,
        name: impl Into<String>,
    ) -> SymbolRef {
        self.named_type(
            name,
            NamedType {
                qualification: Some(qualification.into()),
                ..Default::default()
            },
        )
    }

    pub fn named_type(&mut self, name: impl Into<String>, named: NamedType) -> SymbolRef {
        self.insert(NativeSymbol::new(name, SymbolData::Named(named)))
    }

    pub fn typedef(&mut self, name: impl Into<String>, real_type: Option<SymbolRef>) -> SymbolRef {
        self.insert(NativeSymbol::new(name, SymbolData::TypeDef { real_type }))
    }

    pub fn bit_vector(&mut self, size: usize) -> SymbolRef {
        self.insert(NativeSymbol::new(
            "<bitvector>",
            SymbolData::BitVector { size },
        ))
    }

    pub fn opaque(&mut self) -> SymbolRef {
        self.insert(NativeSymbol::new("Opaque", SymbolData::Opaque))
    }

    /// Struct with no members yet. An empty name makes it anonymous.
    pub fn structure(&mut self, name: &str) -> SymbolRef {
        let (name, is_anonymous) = defined_name(name);

        self.insert(NativeSymbol::new(
            name,
            SymbolData::Struct(Composite {
                members: Vec::new(),
                is_anonymous,
            }),
        ))
    }

    pub fn union(&mut self, name: &str) -> SymbolRef {
        let (name, is_anonymous) = defined_name(name);

        self.insert(NativeSymbol::new(
            name,
            SymbolData::Union(Composite {
                members: Vec::new(),
                is_anonymous,
            }),
        ))
    }

    pub fn enumeration(&mut self, name: &str) -> SymbolRef {
        let (name, is_anonymous) = defined_name(name);

        self.insert(NativeSymbol::new(
            name,
            SymbolData::Enum(Enumeration {
                values: Vec::new(),
                is_anonymous,
            }),
        ))
    }

    pub fn function_pointer(
        &mut self,
        name: &str,
        signature: SymbolRef,
        calling_convention: CallingConvention,
    ) -> SymbolRef {
        let (name, is_anonymous) = defined_name(name);

        self.insert(NativeSymbol::new(
            name,
            SymbolData::FunctionPointer(FunctionPointer {
                signature,
                calling_convention,
                is_anonymous,
            }),
        ))
    }

    pub fn procedure(
        &mut self,
        name: impl Into<String>,
        signature: SymbolRef,
        calling_convention: CallingConvention,
    ) -> SymbolRef {
        self.insert(NativeSymbol::new(
            name,
            SymbolData::Procedure(Procedure {
                signature,
                calling_convention,
            }),
        ))
    }

    pub fn signature(
        &mut self,
        return_type: SymbolRef,
        return_sal: SymbolRef,
        parameters: Vec<SymbolRef>,
    ) -> SymbolRef {
        self.insert(NativeSymbol::new(
            "Sig",
            SymbolData::Signature(Signature {
                return_type,
                return_sal,
                parameters,
            }),
        ))
    }

    pub fn parameter(&mut self, name: impl Into<String>, ty: SymbolRef, sal: SymbolRef) -> SymbolRef {
        self.insert(NativeSymbol::new(name, SymbolData::Parameter { ty, sal }))
    }

    pub fn member(&mut self, name: impl Into<String>, ty: SymbolRef) -> SymbolRef {
        self.insert(NativeSymbol::new(name, SymbolData::Member { ty }))
    }

    /// Appends a member to a struct or union.
    pub fn add_member(&mut self, composite: SymbolRef, name: impl Into<String>, ty: SymbolRef) -> SymbolRef {
        let member = self.member(name, ty);

        if let Some(SymbolData::Struct(composite) | SymbolData::Union(composite)) =
            self.get_mut(composite).map(|symbol| &mut symbol.data)
        {
            composite.members.push(member);
        }

        member
    }

    /// Appends a value to an enum.
    pub fn add_enum_value(
        &mut self,
        enumeration: SymbolRef,
        name: impl Into<String>,
        expression: &str,
    ) -> SymbolRef {
        let enum_name = self
            .get(enumeration)
            .map(|symbol| symbol.name.clone())
            .unwrap_or_default();

        let value = self.value_expression(expression);
        let key = self.insert(NativeSymbol::new(
            name,
            SymbolData::EnumValue { enum_name, value },
        ));

        if let Some(SymbolData::Enum(enumeration)) =
            self.get_mut(enumeration).map(|symbol| &mut symbol.data)
        {
            enumeration.values.push(key);
        }

        key
    }

    pub fn sal_attribute(&mut self, entries: &[(SalEntryType, String)]) -> SymbolRef {
        let entries = entries
            .iter()
            .map(|(entry_type, text)| self.sal_entry(*entry_type, text.clone()))
            .collect();

        self.insert(NativeSymbol::new("Sal", SymbolData::SalAttribute { entries }))
    }

    pub fn empty_sal(&mut self) -> SymbolRef {
        self.sal_attribute(&[])
    }

    pub fn sal_entry(&mut self, entry_type: SalEntryType, text: impl Into<String>) -> SymbolRef {
        self.insert(NativeSymbol::new(
            entry_type.to_string(),
            SymbolData::SalEntry {
                entry_type,
                text: text.into(),
            },
        ))
    }

    /// Reads `expression` into a value expression with one child per leaf.
    pub fn value_expression(&mut self, expression: &str) -> SymbolRef {
        let read = read_values(expression);
        let is_parsable = read.is_some();

        let values = read
            .unwrap_or_default()
            .into_iter()
            .map(|(name, value)| self.value(name, value))
            .collect();

        self.insert(NativeSymbol::new(
            "Value",
            SymbolData::ValueExpression(ValueExpression {
                expression: expression.trim().to_string(),
                values,
                is_parsable,
            }),
        ))
    }

    pub fn value(&mut self, name: impl Into<String>, value: NativeValue) -> SymbolRef {
        self.insert(NativeSymbol::new(name, SymbolData::Value(value)))
    }

    pub fn constant(&mut self, name: impl Into<String>, value: &str, kind: ConstantKind) -> SymbolRef {
        // A method macro is kept as text, it is not an expression
        let value = match kind {
            ConstantKind::Macro => self.value_expression(value),
            ConstantKind::MacroMethod => self.value_expression(&format!("\"{}\"", value)),
        };

        self.insert(NativeSymbol::new(name, SymbolData::Constant { value, kind }))
    }

    /// Points a proxy, or a name inside a value expression, at `target`.
    /// Returns false when `key` holds no such reference.
    pub fn bind(&mut self, key: SymbolRef, target: SymbolRef) -> bool {
        let Some(symbol) = self.get_mut(key) else {
            return false;
        };

        if let Some(real_type) = symbol.real_type_mut() {
            *real_type = Some(target);
            return true;
        }

        match symbol.value_mut().and_then(|value| value.bound_mut()) {
            Some(bound) => {
                *bound = Some(target);
                true
            }
            None => false,
        }
    }

    /// Follows bound named types down to what they name.
    pub fn dig_through_named_types(&self, key: SymbolRef) -> SymbolRef {
        self.dig(key, |data| data.is_named())
    }

    /// Follows bound named types and typedefs down to the type they stand for.
    pub fn dig_through_typedefs_and_named_types(&self, key: SymbolRef) -> SymbolRef {
        self.dig(key, |data| data.is_named() || data.is_type_def())
    }

    fn dig(&self, key: SymbolRef, through: impl Fn(&SymbolData) -> bool) -> SymbolRef {
        let mut current = key;

        // Bounded, typedefs may form cycles
        for _ in 0..self.symbols.len() {
            let Some(symbol) = self.get(current) else {
                break;
            };

            if !through(&symbol.data) {
                break;
            }

            match symbol.real_type() {
                Some(real_type) => current = real_type,
                None => break,
            }
        }

        current
    }

    /// Copies `key` and everything it refers to from `source` into this graph.
    ///
    /// `imported` maps keys of `source` to their copies, so a symbol reached
    /// twice, or reached again by a later import sharing the same map, is
    /// copied once.
    pub fn import(
        &mut self,
        source: &SymbolGraph,
        key: SymbolRef,
        imported: &mut HashMap<SymbolRef, SymbolRef>,
    ) -> Option<SymbolRef> {
        if let Some(existing) = imported.get(&key) {
            return Some(*existing);
        }

        source.get(key)?;

        let mut pending = vec![key];
        let mut copies = Vec::new();

        while let Some(next) = pending.pop() {
            if imported.contains_key(&next) {
                continue;
            }

            let Some(symbol) = source.get(next) else {
                continue;
            };

            let copy = self.insert(symbol.clone());
            imported.insert(next, copy);
            copies.push(copy);

            pending.extend(
                symbol
                    .references()
                    .into_iter()
                    .filter(|reference| !imported.contains_key(reference)),
            );
        }

        // Copies still point into `source`, redirect them
        for copy in copies {
            if let Some(symbol) = self.get_mut(copy) {
                symbol.for_each_reference_mut(|reference| {
                    if let Some(target) = imported.get(reference) {
                        *reference = *target;
                    }
                });
            }
        }

        imported.get(&key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolRef, &NativeSymbol)> {
        self.symbols.iter()
    }
}

impl Index<SymbolRef> for SymbolGraph {
    type Output = NativeSymbol;

    fn index(&self, key: SymbolRef) -> &Self::Output {
        &self.symbols[key]
    }
}

impl IndexMut<SymbolRef> for SymbolGraph {
    fn index_mut(&mut self, key: SymbolRef) -> &mut Self::Output {
        &mut self.symbols[key]
    }
}

fn defined_name(name: &str) -> (String, bool) {
    if name.is_empty() {
        (generate_anonymous_name(), true)
    } else {
        (name.to_string(), false)
    }
}
