mod invoke;
mod options;
mod parse;

pub use options::AnalyzeOptions;

/// Reads a header and prints the symbols it declares.
#[derive(Clone, Debug)]
pub struct AnalyzeCommand {
    pub filename: String,
    pub options: AnalyzeOptions,
}
