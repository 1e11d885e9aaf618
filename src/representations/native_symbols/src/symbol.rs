use crate::{
    Builtin, CallingConvention, ConstantKind, NativeSymbolCategory, NativeSymbolKind, NativeValue,
    SalEntryType, SymbolRef, ValueExpression,
};
use derive_more::IsVariant;

#[derive(Clone, Debug, PartialEq)]
pub struct NativeSymbol {
    pub name: String,
    pub data: SymbolData,
}

#[derive(Clone, Debug, PartialEq, IsVariant)]
pub enum SymbolData {
    Struct(Composite),
    Union(Composite),
    Enum(Enumeration),
    FunctionPointer(FunctionPointer),
    Array {
        real_type: Option<SymbolRef>,
        element_count: Option<usize>,
    },
    Pointer {
        real_type: Option<SymbolRef>,
    },
    Named(NamedType),
    TypeDef {
        real_type: Option<SymbolRef>,
    },
    Builtin(Builtin),
    BitVector {
        size: usize,
    },
    Opaque,
    Procedure(Procedure),
    Signature(Signature),
    Parameter {
        ty: SymbolRef,
        sal: SymbolRef,
    },
    Member {
        ty: SymbolRef,
    },
    EnumValue {
        enum_name: String,
        value: SymbolRef,
    },
    Constant {
        value: SymbolRef,
        kind: ConstantKind,
    },
    SalAttribute {
        entries: Vec<SymbolRef>,
    },
    SalEntry {
        entry_type: SalEntryType,
        text: String,
    },
    ValueExpression(ValueExpression),
    Value(NativeValue),
}

/// Body of a struct or union.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Composite {
    pub members: Vec<SymbolRef>,
    pub is_anonymous: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Enumeration {
    pub values: Vec<SymbolRef>,
    pub is_anonymous: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionPointer {
    pub signature: SymbolRef,
    pub calling_convention: CallingConvention,
    pub is_anonymous: bool,
}

/// Reference to a type by name, such as `struct foo` or `DWORD`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NamedType {
    pub qualification: Option<String>,
    pub is_const: bool,
    pub real_type: Option<SymbolRef>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Procedure {
    pub signature: SymbolRef,
    pub calling_convention: CallingConvention,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    pub return_type: SymbolRef,
    pub return_sal: SymbolRef,
    pub parameters: Vec<SymbolRef>,
}

impl NativeSymbol {
    pub fn new(name: impl Into<String>, data: SymbolData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn kind(&self) -> NativeSymbolKind {
        match &self.data {
            SymbolData::Struct(_) => NativeSymbolKind::StructType,
            SymbolData::Union(_) => NativeSymbolKind::UnionType,
            SymbolData::Enum(_) => NativeSymbolKind::EnumType,
            SymbolData::FunctionPointer(_) => NativeSymbolKind::FunctionPointer,
            SymbolData::Array { .. } => NativeSymbolKind::ArrayType,
            SymbolData::Pointer { .. } => NativeSymbolKind::PointerType,
            SymbolData::Named(_) => NativeSymbolKind::NamedType,
            SymbolData::TypeDef { .. } => NativeSymbolKind::TypeDefType,
            SymbolData::Builtin(_) => NativeSymbolKind::BuiltinType,
            SymbolData::BitVector { .. } => NativeSymbolKind::BitVectorType,
            SymbolData::Opaque => NativeSymbolKind::OpaqueType,
            SymbolData::Procedure(_) => NativeSymbolKind::Procedure,
            SymbolData::Signature(_) => NativeSymbolKind::ProcedureSignature,
            SymbolData::Parameter { .. } => NativeSymbolKind::Parameter,
            SymbolData::Member { .. } => NativeSymbolKind::Member,
            SymbolData::EnumValue { .. } => NativeSymbolKind::EnumNameValue,
            SymbolData::Constant { .. } => NativeSymbolKind::Constant,
            SymbolData::SalAttribute { .. } => NativeSymbolKind::SalAttribute,
            SymbolData::SalEntry { .. } => NativeSymbolKind::SalEntry,
            SymbolData::ValueExpression(_) => NativeSymbolKind::ValueExpression,
            SymbolData::Value(_) => NativeSymbolKind::Value,
        }
    }

    pub fn category(&self) -> NativeSymbolCategory {
        self.kind().category()
    }

    pub fn is_anonymous(&self) -> bool {
        match &self.data {
            SymbolData::Struct(composite) | SymbolData::Union(composite) => composite.is_anonymous,
            SymbolData::Enum(enumeration) => enumeration.is_anonymous,
            SymbolData::FunctionPointer(function_pointer) => function_pointer.is_anonymous,
            _ => false,
        }
    }

    pub fn set_anonymous(&mut self, anonymous: bool) {
        match &mut self.data {
            SymbolData::Struct(composite) | SymbolData::Union(composite) => {
                composite.is_anonymous = anonymous
            }
            SymbolData::Enum(enumeration) => enumeration.is_anonymous = anonymous,
            SymbolData::FunctionPointer(function_pointer) => {
                function_pointer.is_anonymous = anonymous
            }
            _ => (),
        }
    }

    /// Type a proxy stands in for, once bound.
    pub fn real_type(&self) -> Option<SymbolRef> {
        match &self.data {
            SymbolData::Array { real_type, .. }
            | SymbolData::Pointer { real_type }
            | SymbolData::TypeDef { real_type }
            | SymbolData::Named(NamedType { real_type, .. }) => *real_type,
            _ => None,
        }
    }

    pub fn real_type_mut(&mut self) -> Option<&mut Option<SymbolRef>> {
        match &mut self.data {
            SymbolData::Array { real_type, .. }
            | SymbolData::Pointer { real_type }
            | SymbolData::TypeDef { real_type }
            | SymbolData::Named(NamedType { real_type, .. }) => Some(real_type),
            _ => None,
        }
    }

    /// Members of a struct or union, empty for anything else.
    pub fn members(&self) -> &[SymbolRef] {
        match &self.data {
            SymbolData::Struct(composite) | SymbolData::Union(composite) => &composite.members,
            _ => &[],
        }
    }

    /// Values of an enum, empty for anything else.
    pub fn enum_values(&self) -> &[SymbolRef] {
        match &self.data {
            SymbolData::Enum(enumeration) => &enumeration.values,
            _ => &[],
        }
    }

    pub fn signature(&self) -> Option<SymbolRef> {
        match &self.data {
            SymbolData::Procedure(procedure) => Some(procedure.signature),
            SymbolData::FunctionPointer(function_pointer) => Some(function_pointer.signature),
            _ => None,
        }
    }

    /// Symbols below this one, in the order they are printed and visited.
    pub fn children(&self) -> Vec<SymbolRef> {
        match &self.data {
            SymbolData::Struct(composite) | SymbolData::Union(composite) => {
                composite.members.clone()
            }
            SymbolData::Enum(enumeration) => enumeration.values.clone(),
            SymbolData::FunctionPointer(function_pointer) => vec![function_pointer.signature],
            SymbolData::Array { real_type, .. }
            | SymbolData::Pointer { real_type }
            | SymbolData::TypeDef { real_type }
            | SymbolData::Named(NamedType { real_type, .. }) => real_type.iter().copied().collect(),
            SymbolData::Builtin(_)
            | SymbolData::BitVector { .. }
            | SymbolData::Opaque
            | SymbolData::SalAttribute { .. }
            | SymbolData::SalEntry { .. } => Vec::new(),
            SymbolData::Procedure(procedure) => vec![procedure.signature],
            SymbolData::Signature(signature) => {
                let mut children = vec![signature.return_type, signature.return_sal];
                children.extend(&signature.parameters);
                children
            }
            SymbolData::Parameter { ty, sal } => vec![*ty, *sal],
            SymbolData::Member { ty } => vec![*ty],
            SymbolData::EnumValue { value, .. } | SymbolData::Constant { value, .. } => {
                vec![*value]
            }
            SymbolData::ValueExpression(expression) => expression.values.clone(),
            SymbolData::Value(value) => value.bound().into_iter().collect(),
        }
    }

    /// Every symbol this one refers to, including SAL entries, which are not children.
    pub(crate) fn references(&self) -> Vec<SymbolRef> {
        match &self.data {
            SymbolData::SalAttribute { entries } => entries.clone(),
            _ => self.children(),
        }
    }

    /// Points every reference to `old` at `new` instead. Returns whether anything changed.
    pub fn replace_child(&mut self, old: SymbolRef, new: SymbolRef) -> bool {
        let mut replaced = false;

        self.for_each_reference_mut(|reference| {
            if *reference == old {
                *reference = new;
                replaced = true;
            }
        });

        replaced
    }

    pub(crate) fn for_each_reference_mut(&mut self, mut f: impl FnMut(&mut SymbolRef)) {
        match &mut self.data {
            SymbolData::Struct(composite) | SymbolData::Union(composite) => {
                composite.members.iter_mut().for_each(f)
            }
            SymbolData::Enum(enumeration) => enumeration.values.iter_mut().for_each(f),
            SymbolData::FunctionPointer(function_pointer) => f(&mut function_pointer.signature),
            SymbolData::Array { real_type, .. }
            | SymbolData::Pointer { real_type }
            | SymbolData::TypeDef { real_type }
            | SymbolData::Named(NamedType { real_type, .. }) => real_type.iter_mut().for_each(f),
            SymbolData::Builtin(_)
            | SymbolData::BitVector { .. }
            | SymbolData::Opaque
            | SymbolData::SalEntry { .. } => (),
            SymbolData::Procedure(procedure) => f(&mut procedure.signature),
            SymbolData::Signature(signature) => {
                f(&mut signature.return_type);
                f(&mut signature.return_sal);
                signature.parameters.iter_mut().for_each(f);
            }
            SymbolData::Parameter { ty, sal } => {
                f(ty);
                f(sal);
            }
            SymbolData::Member { ty } => f(ty),
            SymbolData::EnumValue { value, .. } | SymbolData::Constant { value, .. } => f(value),
            SymbolData::SalAttribute { entries } => entries.iter_mut().for_each(f),
            SymbolData::ValueExpression(expression) => expression.values.iter_mut().for_each(f),
            SymbolData::Value(value) => {
                if let Some(Some(bound)) = value.bound_mut() {
                    f(bound);
                }
            }
        }
    }

    /// Whether every reference this symbol holds directly is bound.
    pub fn is_immediately_resolved(&self) -> bool {
        match &self.data {
            SymbolData::Array { real_type, .. }
            | SymbolData::Pointer { real_type }
            | SymbolData::TypeDef { real_type }
            | SymbolData::Named(NamedType { real_type, .. }) => real_type.is_some(),
            SymbolData::Member { .. } => !self.name.is_empty(),
            SymbolData::Value(value) => value.is_resolved(),
            _ => true,
        }
    }

    pub fn value(&self) -> Option<&NativeValue> {
        match &self.data {
            SymbolData::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut NativeValue> {
        match &mut self.data {
            SymbolData::Value(value) => Some(value),
            _ => None,
        }
    }
}
