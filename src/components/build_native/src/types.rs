use crate::{ParseError, ParseErrorKind, Parser};
use build_native_expr::{ExpressionEvaluator, ExpressionParser, LiteralsOnly};
use native_expr::Number;
use native_symbols::{Builtin, NamedType, SymbolRef};
use native_token::{Token, TokenKind};

impl Parser {
    /// Reads a type reference such as `struct foo*` or `unsigned int[4]`.
    pub(crate) fn process_type_name(&mut self) -> Result<SymbolRef, ParseError> {
        let token = self.peek()?;

        if is_type_qualifier(token.kind) {
            self.next()?;
        }

        let short = self.process_short_type_name()?;
        self.process_type_name_modifiers(short)
    }

    /// Reads either a type reference or a type defined in place, such as a
    /// struct body or a function pointer.
    pub(crate) fn process_type_name_or_type(&mut self, prefix: &str) -> Result<SymbolRef, ParseError> {
        if let Some(defined) = self.process_defined_type(prefix, true)? {
            return Ok(defined);
        }

        let short = self.process_short_type_name()?;
        self.process_type_name_modifiers(short)
    }

    /// Reads a type reference without any pointer or array modifiers.
    pub(crate) fn process_short_type_name(&mut self) -> Result<SymbolRef, ParseError> {
        let mut is_const = false;

        if self.peek_is(TokenKind::ConstKeyword) {
            self.next()?;
            is_const = true;
        }

        if self.peek_is(TokenKind::VolatileKeyword) {
            self.next()?;
        }

        let token = self.peek()?;

        if is_type_qualifier(token.kind) {
            self.next()?;

            if self.peek_is(TokenKind::DeclSpec) {
                self.process_sal()?;
            }

            let name = self.next_of_kind(TokenKind::Word)?;

            return Ok(self.result.graph.named_type(
                name.value,
                NamedType {
                    qualification: Some(token.value),
                    is_const,
                    real_type: None,
                },
            ));
        }

        if token.kind.is_type_keyword() {
            let builtin = self.process_builtin()?;
            let graph = &mut self.result.graph;
            let key = graph.builtin(builtin);

            if !is_const {
                return Ok(key);
            }

            // The qualifier lives on a named type standing in front of the builtin
            return Ok(graph.named_type(
                builtin.to_string(),
                NamedType {
                    qualification: None,
                    is_const,
                    real_type: Some(key),
                },
            ));
        }

        if !token.kind.is_word() {
            return Err(ParseErrorKind::ExpectedTypeName(token.value).at(token.location));
        }

        self.next()?;

        Ok(self.result.graph.named_type(
            token.value,
            NamedType {
                is_const,
                ..Default::default()
            },
        ))
    }

    /// Reads the longest run of type keywords that still spells a builtin,
    /// such as `unsigned long long`.
    fn process_builtin(&mut self) -> Result<Builtin, ParseError> {
        let first = self.next()?;
        let mut spelling = first.value.clone();

        while let Ok(next) = self.scanner.peek_token() {
            if !next.kind.is_type_keyword() {
                break;
            }

            let longer = format!("{} {}", spelling, next.value);

            if Builtin::from_name(&longer).is_none() {
                break;
            }

            self.next()?;
            spelling = longer;
        }

        Builtin::from_name(&spelling)
            .ok_or_else(|| ParseErrorKind::ExpectedTypeName(spelling).at(first.location))
    }

    /// Applies the pointer and array modifiers following a type.
    pub(crate) fn process_type_name_modifiers(
        &mut self,
        ty: SymbolRef,
    ) -> Result<SymbolRef, ParseError> {
        let mut ty = ty;

        loop {
            let Ok(token) = self.scanner.peek_token() else {
                return Ok(ty);
            };

            match token.kind {
                TokenKind::Asterisk => {
                    self.next()?;
                    ty = self.result.graph.pointer(ty);

                    // `int * const p`
                    if self.peek_is(TokenKind::ConstKeyword) {
                        self.next()?;
                    }
                }
                TokenKind::BracketOpen => ty = self.process_array_suffix(ty)?,
                TokenKind::ConstKeyword => {
                    self.next()?;

                    if !self.peek_is(TokenKind::Asterisk) {
                        return Ok(ty);
                    }
                }
                TokenKind::VolatileKeyword
                | TokenKind::Pointer32Keyword
                | TokenKind::Pointer64Keyword => {
                    self.next()?;
                }
                _ => return Ok(ty),
            }
        }
    }

    /// Reads one or more `[n]` suffixes into a single array.
    ///
    /// Dimensions multiply together. When any of them has no readable length,
    /// or the product does not fit in `usize`, the array is unbounded.
    pub(crate) fn process_array_suffix(&mut self, ty: SymbolRef) -> Result<SymbolRef, ParseError> {
        let location = self.location();
        let mut element_count = Some(1usize);
        let mut overflowed = false;

        loop {
            let mut token = self.next()?;

            if token.kind.is_bracket_open() {
                token = self.next()?;
            }

            let count = if token.kind.is_number_literal() && self.peek_is(TokenKind::BracketClose) {
                let count = Number::parse_literal(&token.value)
                    .and_then(|number| number.as_i64())
                    .and_then(|number| usize::try_from(number).ok())
                    .ok_or_else(|| {
                        ParseErrorKind::ArrayLength(token.value.clone()).at(token.location)
                    })?;

                self.next_of_kind(TokenKind::BracketClose)?;
                Some(count)
            } else if token.kind.is_bracket_close() {
                None
            } else {
                let mut tokens = vec![token];

                loop {
                    let next = self.next()?;

                    if next.kind.is_bracket_close() {
                        break;
                    }

                    tokens.push(next);
                }

                evaluate_length(tokens)
            };

            element_count = match (element_count, count) {
                (Some(total), Some(count)) => {
                    let product = total.checked_mul(count);
                    overflowed |= product.is_none();
                    product
                }
                _ => None,
            };

            if !self.peek_is(TokenKind::BracketOpen) {
                break;
            }
        }

        if overflowed {
            self.result.diagnostics.push_warning(
                "Array length is too large and is treated as unknown",
                Some(location),
            );
        }

        Ok(self.result.graph.array(ty, element_count))
    }
}

fn is_type_qualifier(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::StructKeyword
            | TokenKind::UnionKeyword
            | TokenKind::EnumKeyword
            | TokenKind::ClassKeyword
    )
}

/// Length of an array given as an expression, such as `[MAX_PATH + 1]`.
fn evaluate_length(tokens: Vec<Token>) -> Option<usize> {
    let node = ExpressionParser::parse_tokens(tokens).ok()?;
    let value = ExpressionEvaluator::new(LiteralsOnly).evaluate(&node)?;
    let number = value.as_number()?.as_i64()?;
    usize::try_from(number).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_name(text: &str) -> String {
        let mut parser = Parser::new(text);
        let key = parser.process_type_name().unwrap();
        parser.result.graph.display_name(key)
    }

    #[test]
    fn modifiers() {
        assert_eq!(type_name("int**"), "int**");
        assert_eq!(type_name("struct foo*"), "foo*");
        assert_eq!(type_name("char * const * p"), "char**");
        assert_eq!(type_name("int __ptr64 *"), "int*");
        assert_eq!(type_name("int[3][4]"), "int[12]");
        assert_eq!(type_name("int[3][]"), "int[]");
        assert_eq!(type_name("int[0x10]"), "int[16]");
        assert_eq!(type_name("int[FOO]"), "int[]");
        assert_eq!(type_name("int[0x7FFFFFFFFFFFFFFF][3]"), "int[]");
    }

    #[test]
    fn qualifiers() {
        let mut parser = Parser::new("const struct s1");
        let key = parser.process_short_type_name().unwrap();

        let native_symbols::SymbolData::Named(named) = &parser.result.graph[key].data else {
            unreachable!()
        };

        assert_eq!(named.qualification.as_deref(), Some("struct"));
        assert!(named.is_const);
        assert_eq!(parser.result.graph[key].name, "s1");
    }

    #[test]
    fn not_a_type() {
        let mut parser = Parser::new("5");
        let error = parser.process_short_type_name().unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::ExpectedTypeName("5".into()));
    }
}
