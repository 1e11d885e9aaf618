/// Controls which layout tokens the scanner reports.
///
/// Hidden tokens are still consumed, they are just never returned.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScannerOptions {
    pub hide_whitespace: bool,
    pub hide_new_lines: bool,
    pub hide_comments: bool,
    pub throw_on_end_of_stream: bool,
}

impl ScannerOptions {
    /// Only meaningful tokens, for parsing a single expression.
    pub fn expression() -> Self {
        Self {
            hide_whitespace: true,
            hide_new_lines: true,
            hide_comments: true,
            throw_on_end_of_stream: false,
        }
    }

    /// Keeps whitespace and line structure, which are part of the emitted text.
    pub fn preprocessor() -> Self {
        Self {
            hide_whitespace: false,
            hide_new_lines: false,
            hide_comments: true,
            throw_on_end_of_stream: false,
        }
    }

    pub fn parser() -> Self {
        Self::expression()
    }
}
