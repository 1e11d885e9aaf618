use crate::{Diagnostic, Severity, show::Show};
use colored::Colorize;
use line_column::Location;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WarningDiagnostic {
    message: String,
    location: Option<Location>,
}

impl WarningDiagnostic {
    pub fn new(message: impl ToString, location: Location) -> Self {
        Self {
            message: message.to_string(),
            location: Some(location),
        }
    }

    pub fn plain(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
            location: None,
        }
    }
}

impl Show for WarningDiagnostic {
    fn show(&self, w: &mut dyn std::fmt::Write) -> std::fmt::Result {
        if let Some(location) = self.location {
            write!(
                w,
                "{}:{}: {} {}",
                location.line,
                location.column,
                "warning:".yellow().bold(),
                self.message,
            )
        } else {
            write!(w, "{} {}", "warning:".yellow().bold(), self.message)
        }
    }
}

impl Diagnostic for WarningDiagnostic {
    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn location(&self) -> Option<Location> {
        self.location
    }
}
