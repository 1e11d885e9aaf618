use crate::Token;
use derive_more::{Display, IsVariant};
use line_column::Location;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, IsVariant)]
pub enum TokenKind {
    EndOfStream,

    // Preprocessor directives
    PoundDefine,
    PoundInclude,
    PoundPragma,
    PoundIf,
    PoundIfdef,
    PoundIfndef,
    PoundElse,
    PoundElseIf,
    PoundEndIf,
    PoundUndef,
    PoundError,

    // Delimiters
    BraceOpen,
    BraceClose,
    ParenOpen,
    ParenClose,
    BracketOpen,
    BracketClose,
    Comma,
    Semicolon,
    Colon,
    DoubleQuote,
    SingleQuote,
    Asterisk,
    Period,
    Bang,
    Ampersand,
    Pipe,
    BackSlash,
    Pound,

    // Operators
    OpAssign,
    OpEquals,
    OpNotEquals,
    OpGreaterThan,
    OpLessThan,
    OpGreaterThanOrEqual,
    OpLessThanOrEqual,
    OpBoolAnd,
    OpBoolOr,
    OpPlus,
    OpMinus,
    OpDivide,
    OpModulus,
    OpShiftLeft,
    OpShiftRight,

    WhiteSpace,
    NewLine,
    LineComment,
    BlockComment,
    Word,
    Text,
    QuotedStringAnsi,
    QuotedStringUnicode,
    CharacterAnsi,
    CharacterUnicode,
    Number,
    HexNumber,

    // Reserved words
    StructKeyword,
    UnionKeyword,
    EnumKeyword,
    ClassKeyword,
    TypedefKeyword,
    DeclSpec,
    VolatileKeyword,
    InlineKeyword,
    ClrCallKeyword,
    Pointer32Keyword,
    Pointer64Keyword,
    ConstKeyword,
    TrueKeyword,
    FalseKeyword,
    CDeclarationCallKeyword,
    StandardCallKeyword,
    PascalCallKeyword,
    WinApiCallKeyword,
    PublicKeyword,
    PrivateKeyword,
    ProtectedKeyword,
    SignedKeyword,
    UnsignedKeyword,

    // Type words
    BooleanKeyword,
    ByteKeyword,
    Int16Keyword,
    IntKeyword,
    LongKeyword,
    Int64Keyword,
    CharKeyword,
    WCharKeyword,
    FloatKeyword,
    DoubleKeyword,
    VoidKeyword,
}

impl TokenKind {
    pub fn at(self, value: impl Into<String>, location: Location) -> Token {
        Token::new(self, value, location)
    }

    pub fn is_keyword(&self) -> bool {
        self.is_reserved() || self.is_type_keyword()
    }

    fn is_reserved(&self) -> bool {
        matches!(
            self,
            Self::StructKeyword
                | Self::UnionKeyword
                | Self::EnumKeyword
                | Self::ClassKeyword
                | Self::TypedefKeyword
                | Self::DeclSpec
                | Self::VolatileKeyword
                | Self::InlineKeyword
                | Self::ClrCallKeyword
                | Self::Pointer32Keyword
                | Self::Pointer64Keyword
                | Self::ConstKeyword
                | Self::TrueKeyword
                | Self::FalseKeyword
                | Self::CDeclarationCallKeyword
                | Self::StandardCallKeyword
                | Self::PascalCallKeyword
                | Self::WinApiCallKeyword
                | Self::PublicKeyword
                | Self::PrivateKeyword
                | Self::ProtectedKeyword
        )
    }

    /// Words that name a builtin type, or modify one.
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            Self::BooleanKeyword
                | Self::ByteKeyword
                | Self::Int16Keyword
                | Self::IntKeyword
                | Self::LongKeyword
                | Self::Int64Keyword
                | Self::CharKeyword
                | Self::WCharKeyword
                | Self::FloatKeyword
                | Self::DoubleKeyword
                | Self::VoidKeyword
                | Self::SignedKeyword
                | Self::UnsignedKeyword
        )
    }

    pub fn is_any_word(&self) -> bool {
        *self == Self::Word || self.is_keyword()
    }

    pub fn is_call_type_modifier(&self) -> bool {
        matches!(
            self,
            Self::ClrCallKeyword
                | Self::InlineKeyword
                | Self::CDeclarationCallKeyword
                | Self::StandardCallKeyword
                | Self::PascalCallKeyword
                | Self::WinApiCallKeyword
        )
    }

    pub fn is_access_modifier(&self) -> bool {
        matches!(
            self,
            Self::PublicKeyword | Self::PrivateKeyword | Self::ProtectedKeyword
        )
    }

    pub fn is_preprocessor_directive(&self) -> bool {
        matches!(
            self,
            Self::PoundDefine
                | Self::PoundInclude
                | Self::PoundPragma
                | Self::PoundIf
                | Self::PoundIfdef
                | Self::PoundIfndef
                | Self::PoundElse
                | Self::PoundElseIf
                | Self::PoundEndIf
                | Self::PoundUndef
                | Self::PoundError
        )
    }

    pub fn is_conditional_directive(&self) -> bool {
        matches!(
            self,
            Self::PoundIf
                | Self::PoundIfdef
                | Self::PoundIfndef
                | Self::PoundElse
                | Self::PoundElseIf
                | Self::PoundEndIf
        )
    }

    pub fn is_number_literal(&self) -> bool {
        matches!(self, Self::Number | Self::HexNumber)
    }

    pub fn is_character_literal(&self) -> bool {
        matches!(self, Self::CharacterAnsi | Self::CharacterUnicode)
    }

    pub fn is_quoted_string(&self) -> bool {
        matches!(self, Self::QuotedStringAnsi | Self::QuotedStringUnicode)
    }

    pub fn is_boolean_literal(&self) -> bool {
        matches!(self, Self::TrueKeyword | Self::FalseKeyword)
    }

    pub fn is_binary_operation(&self) -> bool {
        self.precedence() > 0
    }

    /// Binding power of a binary operator, zero for anything else.
    pub fn precedence(&self) -> usize {
        match self {
            Self::Asterisk | Self::OpDivide | Self::OpModulus => 10,
            Self::OpPlus | Self::OpMinus => 9,
            Self::OpShiftLeft | Self::OpShiftRight => 8,
            Self::OpLessThan
            | Self::OpLessThanOrEqual
            | Self::OpGreaterThan
            | Self::OpGreaterThanOrEqual => 7,
            Self::OpEquals | Self::OpNotEquals => 6,
            Self::Ampersand => 5,
            Self::Pipe => 4,
            Self::OpBoolAnd => 3,
            Self::OpBoolOr => 2,
            Self::OpAssign => 1,
            _ => 0,
        }
    }
}
