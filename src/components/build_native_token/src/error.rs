use derive_more::IsVariant;
use line_column::Location;
use native_token::TokenKind;
use std::fmt::Display;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq, Eq, IsVariant)]
pub enum ScanErrorKind {
    EndOfStream,
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
    },
    UnexpectedKind {
        unwanted: TokenKind,
    },
}

impl ScanErrorKind {
    pub fn at(self, location: Location) -> ScanError {
        ScanError {
            kind: self,
            location,
        }
    }
}

impl Display for ScanErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanErrorKind::EndOfStream => write!(f, "Unexpectedly hit the end of the stream"),
            ScanErrorKind::UnexpectedToken { expected, found } => write!(
                f,
                "Expected token of type {} but found {} instead.",
                expected, found
            ),
            ScanErrorKind::UnexpectedKind { unwanted } => {
                write!(f, "Did not expect token of type {}", unwanted)
            }
        }
    }
}

impl Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for ScanError {}
