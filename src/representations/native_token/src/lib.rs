mod keyword;
mod kind;

pub use keyword::{pound_directive, reserved_word};
pub use kind::TokenKind;
use line_column::Location;
use std::fmt::Display;

/// A scanned token together with the exact text it was read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            value: value.into(),
            location,
        }
    }

    /// Token that was not read from any source, such as a rewritten macro argument.
    pub fn synthetic(kind: TokenKind, value: impl Into<String>) -> Self {
        Self::new(kind, value, Location::default())
    }

    pub fn end_of_stream(location: Location) -> Self {
        Self::new(TokenKind::EndOfStream, "", location)
    }

    pub fn is_kind(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_any_word(&self) -> bool {
        self.kind.is_any_word()
    }

    /// Whether the token carries no meaning for the parsers
    pub fn is_layout(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::WhiteSpace
                | TokenKind::NewLine
                | TokenKind::LineComment
                | TokenKind::BlockComment
                | TokenKind::EndOfStream
        )
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// Concatenates the text of each token, as it would appear in source.
pub fn tokens_to_string<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> String {
    tokens.into_iter().map(|token| token.value.as_str()).collect()
}
