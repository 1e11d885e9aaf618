use native_token::TokenKind;
use regex::Regex;
use std::sync::LazyLock;

static DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9.]+(e[0-9]+)?(([UFL]+)|(u?i64))?$").expect("decimal pattern")
});

static HEXADECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^0x[0-9a-f.]+(e[0-9]+)?(([UFL]+)|(u?i64))?$").expect("hexadecimal pattern")
});

/// Determines whether a scanned word is a numeric literal, and which kind.
pub fn classify_number(word: &str) -> Option<TokenKind> {
    if DECIMAL.is_match(word) {
        Some(TokenKind::Number)
    } else if HEXADECIMAL.is_match(word) {
        Some(TokenKind::HexNumber)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies() {
        assert_eq!(classify_number("42"), Some(TokenKind::Number));
        assert_eq!(classify_number("1.5e3F"), Some(TokenKind::Number));
        assert_eq!(classify_number("0X1fUi64"), Some(TokenKind::HexNumber));
        assert_eq!(classify_number("1.a"), None);
        assert_eq!(classify_number("x1"), None);
    }
}
