use crate::NativeSymbolKind;
use derive_more::{Display, IsVariant};
use regex::Regex;
use std::sync::{
    LazyLock,
    atomic::{AtomicU64, Ordering},
};

/// Namespace a stored symbol is found in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, IsVariant)]
pub enum NameKind {
    Struct,
    Union,
    Enum,
    FunctionPointer,
    TypeDef,
    Procedure,
    Constant,
    EnumValue,
}

impl NameKind {
    pub fn from_symbol_kind(kind: NativeSymbolKind) -> Option<Self> {
        Some(match kind {
            NativeSymbolKind::StructType => Self::Struct,
            NativeSymbolKind::UnionType => Self::Union,
            NativeSymbolKind::EnumType => Self::Enum,
            NativeSymbolKind::FunctionPointer => Self::FunctionPointer,
            NativeSymbolKind::TypeDefType => Self::TypeDef,
            NativeSymbolKind::Procedure => Self::Procedure,
            NativeSymbolKind::Constant => Self::Constant,
            NativeSymbolKind::EnumNameValue => Self::EnumValue,
            _ => return None,
        })
    }

    pub fn is_defined_type(&self) -> bool {
        matches!(
            self,
            Self::Struct | Self::Union | Self::Enum | Self::FunctionPointer
        )
    }
}

/// Identity of a symbol within a storage.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("{kind} {name}")]
pub struct NativeName {
    pub kind: NameKind,
    pub name: String,
}

impl NativeName {
    pub fn new(kind: NameKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

static ANONYMOUS_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Anonymous_((\w+_){4})(\w+)$").expect("anonymous name pattern is valid")
});

static ANONYMOUS_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Produces a name for a type declared without one, unique within the process.
pub fn generate_anonymous_name() -> String {
    let count = ANONYMOUS_COUNTER.fetch_add(1, Ordering::Relaxed);
    let process = u64::from(std::process::id());

    format!(
        "Anonymous_{:08x}_{:04x}_{:04x}_{:04x}_{:012x}",
        process & 0xffff_ffff,
        (count >> 48) & 0xffff,
        (count >> 32) & 0xffff,
        (count >> 16) & 0xffff,
        count & 0xffff_ffff_ffff,
    )
}

pub fn is_anonymous_name(name: &str) -> bool {
    ANONYMOUS_NAME.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_names() {
        let first = generate_anonymous_name();
        let second = generate_anonymous_name();

        assert_ne!(first, second);
        assert!(is_anonymous_name(&first));
        assert!(is_anonymous_name(&second));
        assert!(!is_anonymous_name("foo"));
        assert!(!is_anonymous_name("Anonymous"));
        assert!(!is_anonymous_name("Anonymous_a_b"));
    }
}
