use derive_more::{Display, IsVariant};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, IsVariant)]
pub enum NativeSymbolKind {
    StructType,
    EnumType,
    UnionType,
    ArrayType,
    PointerType,
    BuiltinType,
    TypeDefType,
    BitVectorType,
    NamedType,
    Procedure,
    ProcedureSignature,
    FunctionPointer,
    Parameter,
    Member,
    EnumNameValue,
    Constant,
    SalEntry,
    SalAttribute,
    ValueExpression,
    Value,
    OpaqueType,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, IsVariant)]
pub enum NativeSymbolCategory {
    Defined,
    Proxy,
    Specialized,
    Procedure,
    Extra,
}

impl NativeSymbolKind {
    pub fn category(&self) -> NativeSymbolCategory {
        match self {
            Self::StructType | Self::EnumType | Self::UnionType | Self::FunctionPointer => {
                NativeSymbolCategory::Defined
            }
            Self::ArrayType | Self::PointerType | Self::TypeDefType | Self::NamedType => {
                NativeSymbolCategory::Proxy
            }
            Self::BuiltinType | Self::BitVectorType | Self::OpaqueType => {
                NativeSymbolCategory::Specialized
            }
            Self::Procedure => NativeSymbolCategory::Procedure,
            Self::ProcedureSignature
            | Self::Parameter
            | Self::Member
            | Self::EnumNameValue
            | Self::Constant
            | Self::SalEntry
            | Self::SalAttribute
            | Self::ValueExpression
            | Self::Value => NativeSymbolCategory::Extra,
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(
            self.category(),
            NativeSymbolCategory::Defined
                | NativeSymbolCategory::Proxy
                | NativeSymbolCategory::Specialized
        )
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Display, IsVariant)]
pub enum CallingConvention {
    #[default]
    WinApi,
    StdCall,
    Cdecl,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, IsVariant)]
pub enum ConstantKind {
    Macro,
    MacroMethod,
}
