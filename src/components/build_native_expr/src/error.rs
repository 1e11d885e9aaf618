use derive_more::IsVariant;
use line_column::Location;
use std::fmt::Display;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpressionError {
    pub kind: ExpressionErrorKind,
    pub location: Option<Location>,
}

#[derive(Clone, Debug, PartialEq, Eq, IsVariant)]
pub enum ExpressionErrorKind {
    Empty,
    UnexpectedEnd,
    UnexpectedToken(String),
    UnmatchedParenthesis,
}

impl ExpressionErrorKind {
    pub fn at(self, location: Location) -> ExpressionError {
        ExpressionError {
            kind: self,
            location: Some(location),
        }
    }

    pub fn plain(self) -> ExpressionError {
        ExpressionError {
            kind: self,
            location: None,
        }
    }
}

impl Display for ExpressionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpressionErrorKind::Empty => write!(f, "Expected an expression"),
            ExpressionErrorKind::UnexpectedEnd => write!(f, "Unexpected end of expression"),
            ExpressionErrorKind::UnexpectedToken(token) => {
                write!(f, "Unexpected '{}' in expression", token)
            }
            ExpressionErrorKind::UnmatchedParenthesis => write!(f, "Unmatched parenthesis"),
        }
    }
}

impl Display for ExpressionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for ExpressionError {}
