use derive_more::IsVariant;
use native_token::TokenKind;
use std::fmt::Display;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, IsVariant)]
pub enum BuiltinType {
    Boolean,
    Byte,
    Int16,
    Int32,
    Int64,
    Char,
    WChar,
    Float,
    Double,
    Void,
}

impl BuiltinType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Int16 => "short",
            Self::Int32 => "int",
            Self::Int64 => "__int64",
            Self::Char => "char",
            Self::WChar => "wchar",
            Self::Float => "float",
            Self::Double => "double",
            Self::Void => "void",
        }
    }

    /// Builtin named by a type keyword. `long` and `signed` alone mean `int`.
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::BooleanKeyword => Self::Boolean,
            TokenKind::ByteKeyword => Self::Byte,
            TokenKind::Int16Keyword => Self::Int16,
            TokenKind::IntKeyword | TokenKind::LongKeyword | TokenKind::SignedKeyword => {
                Self::Int32
            }
            TokenKind::Int64Keyword => Self::Int64,
            TokenKind::CharKeyword => Self::Char,
            TokenKind::WCharKeyword => Self::WChar,
            TokenKind::FloatKeyword => Self::Float,
            TokenKind::DoubleKeyword => Self::Double,
            TokenKind::VoidKeyword => Self::Void,
            _ => return None,
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Builtin {
    pub builtin_type: BuiltinType,
    pub is_unsigned: bool,
}

impl Builtin {
    pub fn new(builtin_type: BuiltinType) -> Self {
        Self {
            builtin_type,
            is_unsigned: false,
        }
    }

    pub fn unsigned(builtin_type: BuiltinType) -> Self {
        Self {
            builtin_type,
            is_unsigned: true,
        }
    }

    /// Recognizes the C spellings of builtin types, with an optional
    /// `signed` or `unsigned` in front.
    pub fn from_name(name: &str) -> Option<Self> {
        let mut words = name.split_whitespace().peekable();
        let mut is_unsigned = false;
        let mut saw_sign = false;

        while let Some(word) = words.peek() {
            match *word {
                "unsigned" => is_unsigned = true,
                "signed" => (),
                _ => break,
            }

            saw_sign = true;
            words.next();
        }

        let rest = words.collect::<Vec<_>>().join(" ");

        let builtin_type = match rest.as_str() {
            "" if saw_sign => BuiltinType::Int32,
            "long long" | "long long int" => BuiltinType::Int64,
            "long int" => BuiltinType::Int32,
            "short int" => BuiltinType::Int16,
            "long double" => BuiltinType::Double,
            word => Self::type_from_word(word)?,
        };

        Some(Self {
            builtin_type,
            is_unsigned,
        })
    }

    fn type_from_word(word: &str) -> Option<BuiltinType> {
        Some(match word {
            "bool" | "boolean" => BuiltinType::Boolean,
            "byte" => BuiltinType::Byte,
            "short" | "__int16" => BuiltinType::Int16,
            "int" | "long" | "__int32" => BuiltinType::Int32,
            "__int64" => BuiltinType::Int64,
            "char" => BuiltinType::Char,
            "wchar" | "wchar_t" => BuiltinType::WChar,
            "float" => BuiltinType::Float,
            "double" => BuiltinType::Double,
            "void" => BuiltinType::Void,
            _ => return None,
        })
    }
}

impl Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_unsigned {
            write!(f, "unsigned ")?;
        }

        write!(f, "{}", self.builtin_type.name())
    }
}
