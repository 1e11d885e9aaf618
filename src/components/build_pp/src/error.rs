use derive_more::IsVariant;
use diagnostics::Diagnostics;
use line_column::Location;
use std::fmt::Display;

#[derive(Clone, Debug, PartialEq)]
pub struct PreprocessorError {
    pub kind: PreprocessorErrorKind,
    pub location: Location,
}

/// Problems found while running directives.
///
/// None of them stop preprocessing. The ones that only lose information are
/// reported as warnings.
#[derive(Clone, Debug, PartialEq, IsVariant)]
pub enum PreprocessorErrorKind {
    EmptyDefine,
    BadDefine(String),
    BadUndef,
    InvalidInclude,
    MissingInclude(String),
    UnbalancedConditional,
    UnbalancedEndIf,
    UnbalancedElse,
    CouldNotEvaluate(String),
    ErrorDirective(String),
}

impl PreprocessorErrorKind {
    pub fn at(self, location: Location) -> PreprocessorError {
        PreprocessorError {
            kind: self,
            location,
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::EmptyDefine
                | Self::BadDefine(_)
                | Self::BadUndef
                | Self::InvalidInclude
                | Self::MissingInclude(_)
                | Self::UnbalancedConditional
        )
    }
}

impl PreprocessorError {
    pub fn report(self, diagnostics: &mut Diagnostics) {
        if self.kind.is_warning() {
            diagnostics.push_warning(self.kind, Some(self.location));
        } else {
            diagnostics.push_error(self.kind, Some(self.location));
        }
    }
}

impl Display for PreprocessorErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDefine => write!(f, "Encountered an empty #define"),
            Self::BadDefine(line) => write!(f, "Error processing line: {}", line),
            Self::BadUndef => write!(f, "Error processing #undef"),
            Self::InvalidInclude => write!(f, "Invalid #include statement"),
            Self::MissingInclude(name) => write!(f, "Could not locate include file {}", name),
            Self::UnbalancedConditional => {
                write!(f, "Found unbalanced conditional preprocessor branch")
            }
            Self::UnbalancedEndIf => write!(f, "Found #endif without a matching conditional"),
            Self::UnbalancedElse => {
                write!(f, "Found conditional branch without a matching #if")
            }
            Self::CouldNotEvaluate(line) => write!(f, "Could not evaluate expression {}", line),
            Self::ErrorDirective(message) => write!(f, "#error {}", message),
        }
    }
}

impl Display for PreprocessorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.kind)
    }
}

impl std::error::Error for PreprocessorError {}
