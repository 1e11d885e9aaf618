use derive_more::IsVariant;
use native_symbols::NativeName;
use std::fmt::Display;

/// Why a symbol could not be stored.
#[derive(Clone, Debug, PartialEq, Eq, IsVariant)]
pub enum StorageError {
    /// Another symbol of the same kind already goes by this name
    DuplicateName(NativeName),
    NotGlobal(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::DuplicateName(name) => write!(f, "Duplicate name: {}", name),
            StorageError::NotGlobal(name) => write!(f, "'{}' is not a global symbol", name),
        }
    }
}

impl std::error::Error for StorageError {}
