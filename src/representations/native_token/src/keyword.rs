use crate::TokenKind;

/// Classifies a word that has special meaning to the declaration parser.
pub fn reserved_word(word: &str) -> Option<TokenKind> {
    Some(match word {
        "struct" => TokenKind::StructKeyword,
        "union" => TokenKind::UnionKeyword,
        "typedef" => TokenKind::TypedefKeyword,
        "enum" => TokenKind::EnumKeyword,
        "class" => TokenKind::ClassKeyword,
        "__declspec" => TokenKind::DeclSpec,
        "volatile" => TokenKind::VolatileKeyword,
        "__inline" | "__forceinline" | "inline" => TokenKind::InlineKeyword,
        "__clrcall" => TokenKind::ClrCallKeyword,
        "__ptr32" => TokenKind::Pointer32Keyword,
        "__ptr64" => TokenKind::Pointer64Keyword,
        "const" => TokenKind::ConstKeyword,
        "false" => TokenKind::FalseKeyword,
        "true" => TokenKind::TrueKeyword,
        "_cdecl" | "__cdecl" => TokenKind::CDeclarationCallKeyword,
        "__stdcall" => TokenKind::StandardCallKeyword,
        "__pascal" => TokenKind::PascalCallKeyword,
        "__winapi" => TokenKind::WinApiCallKeyword,
        "public" => TokenKind::PublicKeyword,
        "private" => TokenKind::PrivateKeyword,
        "protected" => TokenKind::ProtectedKeyword,
        "signed" => TokenKind::SignedKeyword,
        "unsigned" => TokenKind::UnsignedKeyword,
        "boolean" | "bool" => TokenKind::BooleanKeyword,
        "byte" => TokenKind::ByteKeyword,
        "short" | "__int16" => TokenKind::Int16Keyword,
        "int" | "__int32" => TokenKind::IntKeyword,
        "long" => TokenKind::LongKeyword,
        "__int64" => TokenKind::Int64Keyword,
        "char" => TokenKind::CharKeyword,
        "wchar" => TokenKind::WCharKeyword,
        "float" => TokenKind::FloatKeyword,
        "double" => TokenKind::DoubleKeyword,
        "void" => TokenKind::VoidKeyword,
        _ => return None,
    })
}

/// Classifies the word following a `#`, returning the directive kind and its canonical spelling.
pub fn pound_directive(word: &str) -> Option<(TokenKind, &'static str)> {
    Some(match word.to_ascii_lowercase().as_str() {
        "define" => (TokenKind::PoundDefine, "define"),
        "include" => (TokenKind::PoundInclude, "include"),
        "pragma" => (TokenKind::PoundPragma, "pragma"),
        "if" => (TokenKind::PoundIf, "if"),
        "ifdef" => (TokenKind::PoundIfdef, "ifdef"),
        "ifndef" => (TokenKind::PoundIfndef, "ifndef"),
        "else" => (TokenKind::PoundElse, "else"),
        "elseif" | "elif" => (TokenKind::PoundElseIf, "elseif"),
        "endif" => (TokenKind::PoundEndIf, "endif"),
        "undef" | "undefine" => (TokenKind::PoundUndef, "undef"),
        "error" => (TokenKind::PoundError, "error"),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_words_are_case_sensitive() {
        assert_eq!(reserved_word("__forceinline"), Some(TokenKind::InlineKeyword));
        assert_eq!(reserved_word("__int32"), Some(TokenKind::IntKeyword));
        assert_eq!(reserved_word("Struct"), None);
        assert_eq!(reserved_word("foo"), None);
    }

    #[test]
    fn pound_aliases() {
        assert_eq!(
            pound_directive("elif"),
            Some((TokenKind::PoundElseIf, "elseif"))
        );
        assert_eq!(
            pound_directive("UNDEFINE"),
            Some((TokenKind::PoundUndef, "undef"))
        );
        assert_eq!(pound_directive("warning"), None);
    }
}
