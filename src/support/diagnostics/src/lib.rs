mod error;
mod show;
mod warning;

use core::fmt::Debug;
use derive_more::IsVariant;
pub use error::ErrorDiagnostic;
use line_column::Location;
pub use show::Show;
pub use warning::WarningDiagnostic;

#[derive(Copy, Clone, Debug, PartialEq, Eq, IsVariant)]
pub enum Severity {
    Error,
    Warning,
}

pub trait Diagnostic: Show + Debug {
    fn severity(&self) -> Severity;
    fn message(&self) -> &str;
    fn location(&self) -> Option<Location>;
}

#[derive(Clone, Debug, Default)]
pub struct DiagnosticFlags {
    /// Print each diagnostic as it is reported instead of keeping it
    pub print_without_collecting: bool,
}

/// Ordered collection of the errors and warnings reported by a pass.
#[derive(Debug, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Box<dyn Diagnostic>>,
    flags: DiagnosticFlags,
}

impl Diagnostics {
    pub fn new(flags: DiagnosticFlags) -> Self {
        Self {
            diagnostics: Vec::new(),
            flags,
        }
    }

    pub fn flags(&self) -> &DiagnosticFlags {
        &self.flags
    }

    pub fn push(&mut self, diagnostic: impl Diagnostic + 'static) {
        if self.flags.print_without_collecting {
            Self::print(&diagnostic);
        } else {
            self.diagnostics.push(Box::new(diagnostic));
        }
    }

    pub fn push_error(&mut self, message: impl ToString, location: Option<Location>) {
        self.push(match location {
            Some(location) => ErrorDiagnostic::new(message, location),
            None => ErrorDiagnostic::plain(message),
        });
    }

    pub fn push_warning(&mut self, message: impl ToString, location: Option<Location>) {
        self.push(match location {
            Some(location) => WarningDiagnostic::new(message, location),
            None => WarningDiagnostic::plain(message),
        });
    }

    /// Moves every diagnostic of `other` to the end of this collection.
    pub fn append(&mut self, other: Diagnostics) {
        for diagnostic in other.diagnostics {
            if self.flags.print_without_collecting {
                Self::print(&*diagnostic);
            } else {
                self.diagnostics.push(diagnostic);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Diagnostic> {
        self.diagnostics.iter().map(|diagnostic| &**diagnostic)
    }

    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.with_severity(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn print_all(&self) {
        for diagnostic in self.diagnostics.iter() {
            Self::print(&**diagnostic);
        }
    }

    pub fn print(diagnostic: &dyn Diagnostic) {
        diagnostic.eprintln();
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &str> {
        self.diagnostics
            .iter()
            .filter(move |diagnostic| diagnostic.severity() == severity)
            .map(|diagnostic| diagnostic.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_in_order() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.push_warning("first", None);
        diagnostics.push_error("second", Some(Location::new(3, 4)));

        let mut other = Diagnostics::default();
        other.push_warning("third", None);
        diagnostics.append(other);

        assert_eq!(diagnostics.len(), 3);
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.warnings().collect::<Vec<_>>(), ["first", "third"]);
        assert_eq!(diagnostics.errors().collect::<Vec<_>>(), ["second"]);
    }

    #[test]
    fn shows_location() {
        colored::control::set_override(false);

        let mut message = String::new();
        ErrorDiagnostic::new("bad", Location::new(2, 7))
            .show(&mut message)
            .unwrap();
        assert_eq!(message, "2:7: error: bad");

        let mut message = String::new();
        WarningDiagnostic::plain("odd").show(&mut message).unwrap();
        assert_eq!(message, "warning: odd");
    }

    #[test]
    fn printing_instead_of_collecting() {
        let mut diagnostics = Diagnostics::new(DiagnosticFlags {
            print_without_collecting: true,
        });

        diagnostics.push_error("printed", None);
        diagnostics.append(Diagnostics::default());

        assert!(diagnostics.flags().print_without_collecting);
        assert!(diagnostics.is_empty());
        assert!(!diagnostics.has_errors());
    }
}
