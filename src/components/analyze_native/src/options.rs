use build_pp::Macro;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct AnalyzerOptions {
    pub follow_includes: bool,
    pub include_paths: Vec<PathBuf>,
    pub initial_macros: Vec<Macro>,

    /// Whether seeded macros are reported alongside the ones the text defines
    pub include_initial_macros_in_result: bool,

    pub trace: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            follow_includes: false,
            include_paths: Vec::new(),
            initial_macros: Vec::new(),
            include_initial_macros_in_result: true,
            trace: false,
        }
    }
}
