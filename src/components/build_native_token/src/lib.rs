mod cursor;
mod error;
mod number;
mod options;
mod read;

use cursor::Cursor;
pub use cursor::ScannerMark;
pub use error::{ScanError, ScanErrorKind};
pub use number::classify_number;
use native_token::{Token, TokenKind};
pub use options::ScannerOptions;

/// Tokenizer for native header text.
///
/// Malformed input never fails, it degrades into the longest token that can
/// still be formed. The only error besides kind mismatches is reading past the
/// end of the text when `throw_on_end_of_stream` is set.
pub struct Scanner {
    cursor: Cursor,
    options: ScannerOptions,
}

impl Scanner {
    pub fn new(text: &str, options: ScannerOptions) -> Self {
        Self {
            cursor: Cursor::new(text),
            options,
        }
    }

    pub fn options(&self) -> &ScannerOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ScannerOptions {
        &mut self.options
    }

    pub fn is_end_of_stream(&mut self) -> bool {
        let mark = self.mark();
        let token = self.read_visible();
        self.rollback(mark);
        token.kind.is_end_of_stream()
    }

    pub fn next_token(&mut self) -> Result<Token, ScanError> {
        let token = self.read_visible();

        if token.kind.is_end_of_stream() && self.options.throw_on_end_of_stream {
            return Err(ScanErrorKind::EndOfStream.at(token.location));
        }

        Ok(token)
    }

    pub fn peek_token(&mut self) -> Result<Token, ScanError> {
        let mark = self.mark();
        let token = self.next_token();
        self.rollback(mark);
        token
    }

    /// Peeks at the next `count` visible tokens, stopping early at the end of the text.
    pub fn peek_token_list(&mut self, count: usize) -> Vec<Token> {
        let mark = self.mark();
        let mut tokens = Vec::with_capacity(count);

        for _ in 0..count {
            let token = self.read_visible();
            let done = token.kind.is_end_of_stream();
            tokens.push(token);

            if done {
                break;
            }
        }

        self.rollback(mark);
        tokens
    }

    pub fn next_of_kind(&mut self, expected: TokenKind) -> Result<Token, ScanError> {
        let token = self.next_token()?;

        if token.kind != expected {
            return Err(ScanErrorKind::UnexpectedToken {
                expected,
                found: token.kind,
            }
            .at(token.location));
        }

        Ok(token)
    }

    pub fn next_not_of_kind(&mut self, unwanted: TokenKind) -> Result<Token, ScanError> {
        let token = self.next_token()?;

        if token.kind == unwanted {
            return Err(ScanErrorKind::UnexpectedKind { unwanted }.at(token.location));
        }

        Ok(token)
    }

    /// Reads every remaining visible token, excluding the end of stream marker.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.read_visible();

            if token.kind.is_end_of_stream() {
                return tokens;
            }

            tokens.push(token);
        }
    }

    pub fn mark(&self) -> ScannerMark {
        self.cursor.mark()
    }

    pub fn rollback(&mut self, mark: ScannerMark) {
        self.cursor.rollback(mark);
    }

    fn read_visible(&mut self) -> Token {
        loop {
            let token = self.read_token();

            let hidden = match token.kind {
                TokenKind::WhiteSpace => self.options.hide_whitespace,
                TokenKind::NewLine => self.options.hide_new_lines,
                TokenKind::LineComment | TokenKind::BlockComment => self.options.hide_comments,
                _ => false,
            };

            if !hidden {
                return token;
            }
        }
    }
}

pub fn tokenize_text(text: &str, options: ScannerOptions) -> Vec<Token> {
    Scanner::new(text, options).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn kinds(text: &str, options: ScannerOptions) -> Vec<(TokenKind, String)> {
        tokenize_text(text, options)
            .into_iter()
            .map(|token| (token.kind, token.value))
            .collect()
    }

    fn single(text: &str) -> (TokenKind, String) {
        let mut tokens = kinds(text, ScannerOptions::default());
        assert_eq!(tokens.len(), 1, "{:?}", tokens);
        tokens.remove(0)
    }

    #[test]
    fn punctuation_and_operators() {
        let tokens = kinds("a<=b&&c!=(d)", ScannerOptions::expression());
        let kinds = tokens.iter().map(|(kind, _)| *kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            [
                TokenKind::Word,
                TokenKind::OpLessThanOrEqual,
                TokenKind::Word,
                TokenKind::OpBoolAnd,
                TokenKind::Word,
                TokenKind::OpNotEquals,
                TokenKind::ParenOpen,
                TokenKind::Word,
                TokenKind::ParenClose,
            ]
        );
    }

    #[test]
    fn single_character_fallbacks() {
        assert_eq!(single("!"), (TokenKind::Bang, "!".into()));
        assert_eq!(single("="), (TokenKind::OpAssign, "=".into()));
        assert_eq!(single("<"), (TokenKind::OpLessThan, "<".into()));
        assert_eq!(single("~"), (TokenKind::Text, "~".into()));
        assert_eq!(single("$"), (TokenKind::Text, "$".into()));
    }

    #[test]
    fn words_and_keywords() {
        assert_eq!(single("_foo$1"), (TokenKind::Word, "_foo$1".into()));
        assert_eq!(single("$foo"), (TokenKind::Word, "$foo".into()));
        assert_eq!(single("__stdcall"), (TokenKind::StandardCallKeyword, "__stdcall".into()));
        assert_eq!(single("unsigned"), (TokenKind::UnsignedKeyword, "unsigned".into()));
        assert_eq!(single("__declspec"), (TokenKind::DeclSpec, "__declspec".into()));
        assert_eq!(single("LPWSTR"), (TokenKind::Word, "LPWSTR".into()));
    }

    #[test]
    fn numbers() {
        assert_eq!(single("1"), (TokenKind::Number, "1".into()));
        assert_eq!(single("1.0"), (TokenKind::Number, "1.0".into()));
        assert_eq!(single("1e2"), (TokenKind::Number, "1e2".into()));
        assert_eq!(single("1UL"), (TokenKind::Number, "1UL".into()));
        assert_eq!(single("5ui64"), (TokenKind::Number, "5ui64".into()));
        assert_eq!(single("0x5e5"), (TokenKind::HexNumber, "0x5e5".into()));
        assert_eq!(single("0xFFL"), (TokenKind::HexNumber, "0xFFL".into()));
        assert_eq!(single("6.5f"), (TokenKind::Number, "6.5f".into()));
    }

    #[test]
    fn number_followed_by_member() {
        assert_eq!(
            kinds("1.a", ScannerOptions::default()),
            [
                (TokenKind::Number, "1".into()),
                (TokenKind::Period, ".".into()),
                (TokenKind::Word, "a".into()),
            ]
        );
    }

    #[test]
    fn strings_and_characters() {
        assert_eq!(single("\"foo\""), (TokenKind::QuotedStringAnsi, "\"foo\"".into()));
        assert_eq!(single("\"a\\\"b\""), (TokenKind::QuotedStringAnsi, "\"a\\\"b\"".into()));
        assert_eq!(single("L\"foo\""), (TokenKind::QuotedStringUnicode, "L\"foo\"".into()));
        assert_eq!(single("'a'"), (TokenKind::CharacterAnsi, "'a'".into()));
        assert_eq!(single("'\\n'"), (TokenKind::CharacterAnsi, "'\\n'".into()));
        assert_eq!(single("L'a'"), (TokenKind::CharacterUnicode, "L'a'".into()));
    }

    #[test]
    fn unterminated_literals_degrade() {
        assert_eq!(
            kinds("\"foo", ScannerOptions::default()),
            [
                (TokenKind::DoubleQuote, "\"".into()),
                (TokenKind::Word, "foo".into()),
            ]
        );
        assert_eq!(
            kinds("'ab'", ScannerOptions::default()),
            [
                (TokenKind::SingleQuote, "'".into()),
                (TokenKind::Word, "ab".into()),
                (TokenKind::SingleQuote, "'".into()),
            ]
        );
        assert_eq!(
            kinds("L'", ScannerOptions::default()),
            [
                (TokenKind::Word, "L".into()),
                (TokenKind::SingleQuote, "'".into()),
            ]
        );
        assert_eq!(
            single("/* never closed"),
            (TokenKind::BlockComment, "/* never closed".into())
        );
    }

    #[test]
    fn comments_and_layout() {
        let text = indoc! {"
            a // trailing
            /* block */ b\r
            c
        "};

        let tokens = kinds(text, ScannerOptions::default());
        assert_eq!(
            tokens,
            [
                (TokenKind::Word, "a".into()),
                (TokenKind::WhiteSpace, " ".into()),
                (TokenKind::LineComment, "// trailing".into()),
                (TokenKind::NewLine, "\n".into()),
                (TokenKind::BlockComment, "/* block */".into()),
                (TokenKind::WhiteSpace, " ".into()),
                (TokenKind::Word, "b".into()),
                (TokenKind::NewLine, "\n".into()),
                (TokenKind::Word, "c".into()),
                (TokenKind::NewLine, "\n".into()),
            ]
        );

        let hidden = kinds(text, ScannerOptions::expression());
        assert_eq!(
            hidden.into_iter().map(|(_, value)| value).collect::<Vec<_>>(),
            ["a", "b", "c"]
        );
    }

    #[test]
    fn pound_tokens() {
        assert_eq!(single("#define"), (TokenKind::PoundDefine, "define".into()));
        assert_eq!(single("#elif"), (TokenKind::PoundElseIf, "elseif".into()));
        assert_eq!(single("#ifdef"), (TokenKind::PoundIfdef, "ifdef".into()));
        assert_eq!(
            kinds("#foo", ScannerOptions::default()),
            [
                (TokenKind::Pound, "#".into()),
                (TokenKind::Word, "foo".into()),
            ]
        );
        assert_eq!(
            kinds("##", ScannerOptions::default()),
            [
                (TokenKind::Pound, "#".into()),
                (TokenKind::Pound, "#".into()),
            ]
        );
    }

    #[test]
    fn peek_and_rollback() {
        let mut scanner = Scanner::new("a b c", ScannerOptions::expression());
        assert_eq!(scanner.peek_token().unwrap().value, "a");

        let mark = scanner.mark();
        assert_eq!(scanner.next_token().unwrap().value, "a");
        assert_eq!(scanner.next_token().unwrap().value, "b");
        scanner.rollback(mark);

        let peeked = scanner.peek_token_list(5);
        assert_eq!(peeked.len(), 4);
        assert!(peeked[3].kind.is_end_of_stream());
        assert_eq!(scanner.next_token().unwrap().value, "a");
    }

    #[test]
    fn end_of_stream_repeats_unless_asked_to_fail() {
        let mut scanner = Scanner::new("", ScannerOptions::default());
        assert!(scanner.next_token().unwrap().kind.is_end_of_stream());
        assert!(scanner.next_token().unwrap().kind.is_end_of_stream());
        assert!(scanner.is_end_of_stream());

        let mut scanner = Scanner::new(
            "",
            ScannerOptions {
                throw_on_end_of_stream: true,
                ..Default::default()
            },
        );
        assert!(scanner.next_token().unwrap_err().kind.is_end_of_stream());
    }

    #[test]
    fn next_of_kind_reports_mismatch() {
        let mut scanner = Scanner::new("foo", ScannerOptions::expression());
        let error = scanner.next_of_kind(TokenKind::Semicolon).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Expected token of type Semicolon but found Word instead."
        );

        let mut scanner = Scanner::new("; foo", ScannerOptions::expression());
        assert!(scanner.next_not_of_kind(TokenKind::Semicolon).is_err());
        assert_eq!(
            scanner.next_not_of_kind(TokenKind::Semicolon).unwrap().value,
            "foo"
        );
    }

    #[test]
    fn locations_are_tracked() {
        let tokens = tokenize_text("a\n  b", ScannerOptions::expression());
        assert_eq!(tokens[1].location, line_column::Location::new(2, 3));
    }
}
