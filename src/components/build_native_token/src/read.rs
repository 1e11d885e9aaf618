use crate::{Scanner, number::classify_number};
use line_column::Location;
use native_token::{Token, TokenKind, pound_directive, reserved_word};

const DOUBLE_CHARACTER_OPERATORS: [(&str, TokenKind); 8] = [
    ("&&", TokenKind::OpBoolAnd),
    ("||", TokenKind::OpBoolOr),
    ("<=", TokenKind::OpLessThanOrEqual),
    (">=", TokenKind::OpGreaterThanOrEqual),
    ("<<", TokenKind::OpShiftLeft),
    (">>", TokenKind::OpShiftRight),
    ("==", TokenKind::OpEquals),
    ("!=", TokenKind::OpNotEquals),
];

fn is_word_character(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn is_inline_whitespace(c: char) -> bool {
    c.is_whitespace() && c != '\r' && c != '\n'
}

impl Scanner {
    pub(crate) fn read_token(&mut self) -> Token {
        let start = self.cursor.location();

        let Some(c) = self.cursor.peek() else {
            return Token::end_of_stream(start);
        };

        if is_inline_whitespace(c) {
            let whitespace = self.cursor.take_while(is_inline_whitespace);
            return TokenKind::WhiteSpace.at(whitespace, start);
        }

        let simple = match c {
            '{' => Some(TokenKind::BraceOpen),
            '}' => Some(TokenKind::BraceClose),
            '(' => Some(TokenKind::ParenOpen),
            ')' => Some(TokenKind::ParenClose),
            '[' => Some(TokenKind::BracketOpen),
            ']' => Some(TokenKind::BracketClose),
            ',' => Some(TokenKind::Comma),
            '\\' => Some(TokenKind::BackSlash),
            '+' => Some(TokenKind::OpPlus),
            '-' => Some(TokenKind::OpMinus),
            ';' => Some(TokenKind::Semicolon),
            '*' => Some(TokenKind::Asterisk),
            '.' => Some(TokenKind::Period),
            ':' => Some(TokenKind::Colon),
            _ => None,
        };

        if let Some(kind) = simple {
            self.cursor.next();
            return kind.at(c, start);
        }

        match c {
            '#' => {
                self.cursor.next();
                return self.read_pound(start);
            }
            '"' => {
                self.cursor.next();
                return self.read_double_quote_or_string(start);
            }
            '\'' => {
                self.cursor.next();
                return self.read_single_quote_or_character(start);
            }
            '\r' | '\n' => {
                self.cursor.next();
                if c == '\r' {
                    self.cursor.eat("\n");
                }
                return TokenKind::NewLine.at("\n", start);
            }
            _ => (),
        }

        if self.cursor.eat("//") {
            let comment = self.cursor.take_while(|c| c != '\r' && c != '\n');
            return TokenKind::LineComment.at(format!("//{}", comment), start);
        }

        if self.cursor.eat("/*") {
            return self.read_block_comment(start);
        }

        for (text, kind) in DOUBLE_CHARACTER_OPERATORS {
            if self.cursor.eat(text) {
                return kind.at(text, start);
            }
        }

        if c == 'L' {
            match self.cursor.peek_nth(1) {
                Some('\'') => return self.read_wide_literal(start, TokenKind::CharacterUnicode),
                Some('"') => return self.read_wide_literal(start, TokenKind::QuotedStringUnicode),
                _ => (),
            }
        }

        let operator = match c {
            '/' => Some(TokenKind::OpDivide),
            '|' => Some(TokenKind::Pipe),
            '&' => Some(TokenKind::Ampersand),
            '<' => Some(TokenKind::OpLessThan),
            '>' => Some(TokenKind::OpGreaterThan),
            '%' => Some(TokenKind::OpModulus),
            '=' => Some(TokenKind::OpAssign),
            '!' => Some(TokenKind::Bang),
            _ => None,
        };

        if let Some(kind) = operator {
            self.cursor.next();
            return kind.at(c, start);
        }

        let starts_word = c.is_alphanumeric()
            || c == '_'
            || (c == '$' && self.cursor.peek_nth(1).is_some_and(is_word_character));

        if !starts_word {
            self.cursor.next();
            return TokenKind::Text.at(c, start);
        }

        self.read_word_or_number(start)
    }

    fn read_word_or_number(&mut self, start: Location) -> Token {
        let word = self.cursor.take_while(is_word_character);

        if let Some(kind) = reserved_word(&word) {
            return kind.at(word, start);
        }

        let Some(kind) = classify_number(&word) else {
            return TokenKind::Word.at(word, start);
        };

        // Fractional part, as in `1.0`
        if self.cursor.peek() == Some('.') {
            let mark = self.cursor.mark();
            self.cursor.next();

            let full = format!("{}.{}", word, self.cursor.take_while(is_word_character));

            if let Some(full_kind) = classify_number(&full) {
                return full_kind.at(full, start);
            }

            self.cursor.rollback(mark);
        }

        kind.at(word, start)
    }

    fn read_pound(&mut self, start: Location) -> Token {
        let mark = self.cursor.mark();
        let word = self.cursor.take_while(is_word_character);

        if let Some((kind, name)) = pound_directive(&word) {
            return kind.at(name, start);
        }

        self.cursor.rollback(mark);
        TokenKind::Pound.at("#", start)
    }

    fn read_block_comment(&mut self, start: Location) -> Token {
        let mut comment = String::from("/*");

        while !self.cursor.is_end() {
            if self.cursor.eat("*/") {
                comment.push_str("*/");
                break;
            }

            if let Some(c) = self.cursor.next() {
                comment.push(c);
            }
        }

        TokenKind::BlockComment.at(comment, start)
    }

    fn read_double_quote_or_string(&mut self, start: Location) -> Token {
        let mark = self.cursor.mark();
        let mut literal = String::from("\"");

        loop {
            match self.cursor.next() {
                Some('"') => {
                    literal.push('"');
                    return TokenKind::QuotedStringAnsi.at(literal, start);
                }
                Some('\\') => {
                    literal.push('\\');

                    match self.cursor.next() {
                        Some(escaped) => literal.push(escaped),
                        None => break,
                    }
                }
                Some(c) => literal.push(c),
                None => break,
            }
        }

        self.cursor.rollback(mark);
        TokenKind::DoubleQuote.at("\"", start)
    }

    fn read_single_quote_or_character(&mut self, start: Location) -> Token {
        let mark = self.cursor.mark();

        if let Some(literal) = self.read_character_body() {
            return TokenKind::CharacterAnsi.at(format!("'{}'", literal), start);
        }

        self.cursor.rollback(mark);
        TokenKind::SingleQuote.at("'", start)
    }

    // Reads what follows an opening single quote, including the closing one.
    fn read_character_body(&mut self) -> Option<String> {
        let first = self.cursor.next()?;

        if first != '\\' {
            return (self.cursor.next()? == '\'').then(|| first.to_string());
        }

        let mut escape = String::from(first);

        loop {
            let c = self.cursor.next()?;

            if c == '\'' {
                return Some(escape);
            }

            if self.cursor.is_end() || escape.len() > 5 {
                return None;
            }

            escape.push(c);
        }
    }

    fn read_wide_literal(&mut self, start: Location, kind: TokenKind) -> Token {
        let after_prefix = {
            self.cursor.next();
            self.cursor.mark()
        };

        let quote = self.cursor.location();
        self.cursor.next();

        let literal = match kind {
            TokenKind::CharacterUnicode => self.read_single_quote_or_character(quote),
            _ => self.read_double_quote_or_string(quote),
        };

        if literal.kind.is_single_quote() || literal.kind.is_double_quote() {
            self.cursor.rollback(after_prefix);
            return TokenKind::Word.at("L", start);
        }

        kind.at(format!("L{}", literal.value), start)
    }
}
