use build_native_token::Scanner;
use itertools::Itertools;
use line_column::Location;
use native_token::{Token, TokenKind, pound_directive, tokens_to_string};
use std::fmt::Display;

/// One logical line of input, with continuations already joined.
///
/// Every line ends in a newline token, including the last line of the text.
#[derive(Clone, Debug)]
pub struct PreprocessorLine {
    pub tokens: Vec<Token>,

    /// Kind of the first token that is not whitespace
    pub first: TokenKind,
    pub location: Location,
}

impl PreprocessorLine {
    /// Reads the next line, joining lines that end in `\`.
    pub fn read(scanner: &mut Scanner) -> Self {
        let mut tokens: Vec<Token> = Vec::new();
        let mut first: Option<(TokenKind, Location)> = None;
        let mut last_valid: Option<usize> = None;

        loop {
            let token = scanner
                .next_token()
                .unwrap_or_else(|error| Token::end_of_stream(error.location));

            let kind = token.kind;
            let location = token.location;

            match kind {
                TokenKind::WhiteSpace => {
                    tokens.push(token);
                    continue;
                }
                TokenKind::NewLine => {
                    let continues = last_valid
                        .filter(|index| tokens[*index].kind.is_back_slash())
                        .map(|index| tokens.remove(index));

                    tokens.push(token);

                    if continues.is_some() {
                        last_valid = None;
                        continue;
                    }
                }
                TokenKind::EndOfStream => {
                    tokens.push(Token::new(TokenKind::NewLine, "\n", location));
                }
                _ => {
                    tokens.push(token);
                    last_valid = Some(tokens.len() - 1);
                    first.get_or_insert((kind, location));
                    continue;
                }
            }

            let (first, location) = first.unwrap_or((kind, location));
            return Self::collapse_spaced_directive(Self {
                tokens,
                first,
                location,
            });
        }
    }

    // Turns `#    define` into a single directive token
    fn collapse_spaced_directive(self) -> Self {
        if !self.first.is_pound() {
            return self;
        }

        let Some((pound, word)) = self.valid_indices().next_tuple() else {
            return self;
        };

        let directive = &self.tokens[word];

        let Some((kind, name)) = directive
            .kind
            .is_any_word()
            .then(|| pound_directive(&directive.value))
            .flatten()
        else {
            return self;
        };

        let location = self.tokens[pound].location;
        let mut tokens = Vec::with_capacity(self.tokens.len() - word);
        tokens.push(kind.at(name, location));
        tokens.extend(self.tokens.into_iter().skip(word + 1));

        Self {
            tokens,
            first: kind,
            location,
        }
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.first.is_end_of_stream()
    }

    pub fn is_directive(&self) -> bool {
        self.first.is_preprocessor_directive()
    }

    fn valid_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.tokens
            .iter()
            .positions(|token| !matches!(token.kind, TokenKind::WhiteSpace | TokenKind::NewLine))
    }

    /// Tokens other than whitespace and newlines.
    pub fn valid_tokens(&self) -> Vec<&Token> {
        self.valid_indices().map(|index| &self.tokens[index]).collect()
    }

    /// Each meaningful token in brackets, as shown by traces.
    pub fn display_line(&self) -> String {
        self.valid_tokens()
            .iter()
            .map(|token| format!("[{}] ", token.value))
            .collect()
    }
}

impl Display for PreprocessorLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&tokens_to_string(&self.tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use build_native_token::ScannerOptions;

    fn lines(text: &str) -> Vec<PreprocessorLine> {
        let mut scanner = Scanner::new(text, ScannerOptions::preprocessor());
        let mut lines = Vec::new();

        loop {
            let line = PreprocessorLine::read(&mut scanner);

            if line.is_end_of_stream() {
                return lines;
            }

            lines.push(line);
        }
    }

    #[test]
    fn last_line_gets_a_newline() {
        let lines = lines("a\nb");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].to_string(), "a\n");
        assert_eq!(lines[1].to_string(), "b\n");
    }

    #[test]
    fn joins_continued_lines() {
        let lines = lines("#define foo bar \\\nbaz\nhello");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].first, TokenKind::PoundDefine);
        assert_eq!(lines[0].display_line(), "[define] [foo] [bar] [baz] ");
    }

    #[test]
    fn collapses_spaced_directives() {
        let lines = lines("#     define foo bar\n#  endif");
        assert_eq!(lines[0].first, TokenKind::PoundDefine);
        assert!(lines[0].is_directive());
        assert_eq!(lines[1].first, TokenKind::PoundEndIf);

        let other = &self::lines("# x")[0];
        assert_eq!(other.first, TokenKind::Pound);
        assert!(!other.is_directive());
    }

    #[test]
    fn blank_lines_start_with_their_newline() {
        let lines = lines("\n  \nx");
        assert_eq!(lines[0].first, TokenKind::NewLine);
        assert_eq!(lines[1].first, TokenKind::NewLine);
        assert_eq!(lines[2].first, TokenKind::Word);
    }
}
