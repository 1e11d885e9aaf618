use crate::{ExpressionError, ExpressionErrorKind};
use build_native_token::{ScannerOptions, tokenize_text};
use look_ahead::LookAhead;
use native_expr::{ExpressionKind, ExpressionNode};
use native_token::{Token, TokenKind};

/// Parses C-like expressions as found in `#if` lines, enum values and array bounds.
///
/// Binary operators are left associative, from loosest to tightest:
/// `=`, `||`, `&&`, `|`, `&`, `== !=`, `< <= > >=`, `<< >>`, `+ -`, `* / %`.
/// A parenthesized identifier followed by an operand is a cast, whose operand
/// extends as far as the surrounding expression allows.
pub struct ExpressionParser {
    input: LookAhead<std::vec::IntoIter<Token>>,
}

impl ExpressionParser {
    pub fn parse(text: &str) -> Result<ExpressionNode, ExpressionError> {
        Self::parse_tokens(tokenize_text(text, ScannerOptions::expression()))
    }

    /// Parses tokens that have already been stripped of layout.
    pub fn parse_tokens(tokens: Vec<Token>) -> Result<ExpressionNode, ExpressionError> {
        if tokens.is_empty() {
            return Err(ExpressionErrorKind::Empty.plain());
        }

        let mut parser = Self {
            input: LookAhead::new(tokens.into_iter()),
        };

        let node = parser.parse_expression(1)?;

        if let Some(extra) = parser.input.next() {
            return Err(ExpressionErrorKind::UnexpectedToken(extra.value).at(extra.location));
        }

        Ok(node)
    }

    pub fn is_parsable(text: &str) -> bool {
        Self::parse(text).is_ok()
    }

    fn parse_expression(&mut self, min_precedence: usize) -> Result<ExpressionNode, ExpressionError> {
        let mut left = self.parse_unary()?;

        loop {
            let precedence = match self.input.peek() {
                Some(token) => token.kind.precedence(),
                None => break,
            };

            if precedence == 0 || precedence < min_precedence {
                break;
            }

            let Some(operator) = self.input.next() else {
                break;
            };

            let right = self.parse_expression(precedence + 1)?;
            left = ExpressionNode::binary(operator, left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<ExpressionNode, ExpressionError> {
        let kind = match self.input.peek().map(|token| token.kind) {
            Some(TokenKind::Bang) => ExpressionKind::NegationOperation,
            Some(TokenKind::OpMinus) => ExpressionKind::NegativeOperation,
            _ => return self.parse_primary(),
        };

        let operator = self.next()?;
        let operand = self.parse_unary()?;
        Ok(ExpressionNode::unary(kind, operator, operand))
    }

    fn parse_primary(&mut self) -> Result<ExpressionNode, ExpressionError> {
        let token = self.next()?;

        if token.kind == TokenKind::ParenOpen {
            return self.parse_parenthesized(token);
        }

        if token.is_any_word() && self.peek_is(TokenKind::ParenOpen) {
            return self.parse_call(token);
        }

        let is_leaf = token.is_any_word()
            || token.kind.is_number_literal()
            || token.kind.is_character_literal()
            || token.kind.is_quoted_string();

        if !is_leaf {
            return Err(ExpressionErrorKind::UnexpectedToken(token.value).at(token.location));
        }

        Ok(ExpressionNode::leaf(token))
    }

    fn parse_parenthesized(&mut self, open: Token) -> Result<ExpressionNode, ExpressionError> {
        let mut inner = self.parse_expression(1)?;

        match self.input.next() {
            Some(close) if close.kind == TokenKind::ParenClose => (),
            Some(other) => {
                return Err(ExpressionErrorKind::UnexpectedToken(other.value).at(other.location));
            }
            None => return Err(ExpressionErrorKind::UnmatchedParenthesis.at(open.location)),
        }

        inner.parenthesized = true;

        if inner.kind.is_leaf() && inner.token.is_any_word() && self.starts_cast_operand() {
            let operand = self.parse_expression(1)?;
            inner.kind = ExpressionKind::Cast;
            inner.left = Some(Box::new(operand));
        }

        Ok(inner)
    }

    fn starts_cast_operand(&mut self) -> bool {
        match self.input.peek() {
            Some(token) => {
                !token.kind.is_binary_operation()
                    && !matches!(token.kind, TokenKind::ParenClose | TokenKind::Comma)
            }
            None => false,
        }
    }

    fn parse_call(&mut self, name: Token) -> Result<ExpressionNode, ExpressionError> {
        let open = self.next()?;
        let mut arguments = Vec::new();

        if self.peek_is(TokenKind::ParenClose) {
            self.input.next();
        } else {
            loop {
                arguments.push(self.parse_expression(1)?);

                match self.input.next() {
                    Some(token) if token.kind == TokenKind::Comma => continue,
                    Some(token) if token.kind == TokenKind::ParenClose => break,
                    Some(token) => {
                        return Err(
                            ExpressionErrorKind::UnexpectedToken(token.value).at(token.location)
                        );
                    }
                    None => return Err(ExpressionErrorKind::UnmatchedParenthesis.at(open.location)),
                }
            }
        }

        // The first argument hangs off the call itself, the rest off a chain of list nodes
        let mut rest: Option<ExpressionNode> = None;

        while arguments.len() > 1 {
            let Some(argument) = arguments.pop() else {
                break;
            };

            let mut list = ExpressionNode::new(
                ExpressionKind::List,
                Token::synthetic(TokenKind::Comma, ","),
            );
            list.left = Some(Box::new(argument));
            list.right = rest.take().map(Box::new);
            rest = Some(list);
        }

        let mut call = ExpressionNode::new(ExpressionKind::FunctionCall, name);
        call.left = arguments.pop().map(Box::new);
        call.right = rest.map(Box::new);
        Ok(call)
    }

    fn next(&mut self) -> Result<Token, ExpressionError> {
        self.input
            .next()
            .ok_or_else(|| ExpressionErrorKind::UnexpectedEnd.plain())
    }

    fn peek_is(&mut self, kind: TokenKind) -> bool {
        self.input.peek().is_some_and(|token| token.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display(text: &str) -> String {
        ExpressionParser::parse(text).unwrap().to_string()
    }

    #[test]
    fn leaves() {
        assert_eq!(display("1"), "1");
        assert_eq!(display("'c'"), "'c'");
        assert_eq!(display("(1)"), "1");
        assert_eq!(display("(     1)"), "1");
    }

    #[test]
    fn binary_operations() {
        assert_eq!(display("1+1"), "+ (Left: 1)(Right: 1)");
        assert_eq!(display("'c'+2"), "+ (Left: 'c')(Right: 2)");
        assert_eq!(display("1-1"), "- (Left: 1)(Right: 1)");
        assert_eq!(display("1/1"), "/ (Left: 1)(Right: 1)");
        assert_eq!(display("1%1"), "% (Left: 1)(Right: 1)");
        assert_eq!(display("1&&1"), "&& (Left: 1)(Right: 1)");
        assert_eq!(display("1||1"), "|| (Left: 1)(Right: 1)");
        assert_eq!(display("1|1"), "| (Left: 1)(Right: 1)");
        assert_eq!(display("1&1"), "& (Left: 1)(Right: 1)");
        assert_eq!(display("1>>2"), ">> (Left: 1)(Right: 2)");
        assert_eq!(display("1<<2"), "<< (Left: 1)(Right: 2)");
    }

    #[test]
    fn grouping() {
        assert_eq!(display("1+(2+3)"), "+ (Left: 1)(Right: + (Left: 2)(Right: 3))");
        assert_eq!(display("(1+2)+3"), "+ (Left: + (Left: 1)(Right: 2))(Right: 3)");
        assert_eq!(display("1-2-3"), "- (Left: - (Left: 1)(Right: 2))(Right: 3)");
        assert_eq!(display("1+2*3"), "+ (Left: 1)(Right: * (Left: 2)(Right: 3))");
        assert_eq!(
            display("a || b && c"),
            "|| (Left: a)(Right: && (Left: b)(Right: c))"
        );
    }

    #[test]
    fn calls() {
        assert_eq!(display("defined(foo)"), "defined (Left: foo)");
        assert_eq!(display("defined(foo, bar)"), "defined (Left: foo)(Right: , (Left: bar))");
        assert_eq!(
            display("defined(foo, 1+1)"),
            "defined (Left: foo)(Right: , (Left: + (Left: 1)(Right: 1)))"
        );
        assert_eq!(
            display("f(a, b, c)"),
            "f (Left: a)(Right: , (Left: b)(Right: , (Left: c)))"
        );
        assert_eq!(display("f()"), "f");
    }

    #[test]
    fn casts() {
        assert_eq!(display("(FOO)1"), "FOO (Left: 1)");
        assert_eq!(display("(BAR)(42)"), "BAR (Left: 42)");
        assert_eq!(display("(FOO)(BAR)1"), "FOO (Left: BAR (Left: 1))");
        assert_eq!(
            display("((WORD)((DWORD_PTR)(l) >> 16))"),
            "WORD (Left: DWORD_PTR (Left: >> (Left: l)(Right: 16)))"
        );

        let node = ExpressionParser::parse("(FOO)1").unwrap();
        assert!(node.kind.is_cast());
    }

    #[test]
    fn unary() {
        assert_eq!(display("-1"), "- (Left: 1)");
        assert_eq!(display("-0.1F"), "- (Left: 0.1F)");
        assert_eq!(display("!defined(x)"), "! (Left: defined (Left: x))");
        assert_eq!(display("-1+2"), "+ (Left: - (Left: 1))(Right: 2)");
    }

    #[test]
    fn failures() {
        assert!(ExpressionParser::parse("").unwrap_err().kind.is_empty());
        assert!(!ExpressionParser::is_parsable("(1"));
        assert!(!ExpressionParser::is_parsable("1 +"));
        assert!(!ExpressionParser::is_parsable("1 2"));
        assert!(!ExpressionParser::is_parsable("f(1"));
        assert!(!ExpressionParser::is_parsable("{"));
    }
}
