use build_native_token::{ScanError, ScanErrorKind};
use derive_more::IsVariant;
use diagnostics::Diagnostics;
use line_column::Location;
use std::fmt::Display;

#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq, IsVariant)]
pub enum ParseErrorKind {
    Scan(ScanErrorKind),
    ExpectedTypeName(String),
    ExpectedMemberTerminator {
        member: String,
        parent: String,
        found: String,
    },
    ExpectedTypedefName(String),
    FunctionPointerParameters(String),
    BitVectorSize(String),
    ArrayLength(String),
    UnterminatedBlock,
    InlineProcedure(String),
    VariableArguments(String),
    CppAttribute(String),
}

impl ParseErrorKind {
    pub fn at(self, location: Location) -> ParseError {
        ParseError {
            kind: self,
            location,
        }
    }

    /// Constructs that are skipped on purpose. The parser is left right
    /// after them, so parsing resumes without losing the rest of the line.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::InlineProcedure(_) | Self::VariableArguments(_) | Self::CppAttribute(_)
        )
    }
}

impl ParseError {
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self.kind, ParseErrorKind::Scan(ScanErrorKind::EndOfStream))
    }

    pub fn report(self, diagnostics: &mut Diagnostics) {
        if self.kind.is_unsupported() {
            diagnostics.push_warning(self.kind, Some(self.location));
        } else {
            diagnostics.push_error(self.kind, Some(self.location));
        }
    }
}

impl From<ScanError> for ParseError {
    fn from(error: ScanError) -> Self {
        ParseErrorKind::Scan(error.kind).at(error.location)
    }
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scan(kind) => kind.fmt(f),
            Self::ExpectedTypeName(found) => {
                write!(f, "Expected a type name but found '{}'", found)
            }
            Self::ExpectedMemberTerminator {
                member,
                parent,
                found,
            } => write!(
                f,
                "Expected ; after member {} in {} but found {}",
                member, parent, found
            ),
            Self::ExpectedTypedefName(found) => write!(
                f,
                "Error processing typedef list.  Expected word or paren open but found '{}'.",
                found
            ),
            Self::FunctionPointerParameters(name) => {
                write!(f, "Error parsing parameters for function pointer {}", name)
            }
            Self::BitVectorSize(found) => {
                write!(f, "Expected number after bit vector specifier: {}", found)
            }
            Self::ArrayLength(found) => {
                write!(f, "Could not process array length as number: {}", found)
            }
            Self::UnterminatedBlock => write!(
                f,
                "Encountered end of stream while attempting to process a block"
            ),
            Self::InlineProcedure(name) => write!(
                f,
                "Ignoring Procedure {} because it is defined inline.",
                name
            ),
            Self::VariableArguments(name) => write!(
                f,
                "Procedure {} has a variable argument signature which is unsupported.",
                name
            ),
            Self::CppAttribute(text) => write!(f, "C++ attributes are not supported: {}", text),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.kind)
    }
}

impl std::error::Error for ParseError {}
