use analyze_native::{Macro, OsVersion};
use std::path::PathBuf;

#[derive(Clone, Debug, Default)]
pub struct AnalyzeOptions {
    pub follow_includes: bool,
    pub include_paths: Vec<PathBuf>,
    pub defines: Vec<Macro>,
    pub os: OsVersion,
    pub trace: bool,
    pub preprocess_only: bool,
}
