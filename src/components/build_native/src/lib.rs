mod defined;
mod error;
mod procedure;
mod sal;
mod types;

use build_native_token::{Scanner, ScannerMark, ScannerOptions};
use diagnostics::Diagnostics;
pub use error::{ParseError, ParseErrorKind};
use line_column::Location;
use native_symbols::{SymbolGraph, SymbolRef};
use native_token::{Token, TokenKind, tokens_to_string};
use std::collections::HashSet;

/// Symbols declared by a header, in declaration order.
///
/// Every list refers into `graph`. Named types are left unbound, binding them
/// is the job of symbol resolution.
#[derive(Debug, Default)]
pub struct ParseResult {
    pub graph: SymbolGraph,
    pub defined_types: Vec<SymbolRef>,
    pub procedures: Vec<SymbolRef>,
    pub typedefs: Vec<SymbolRef>,
    pub enum_values: Vec<SymbolRef>,

    /// Defined types and typedefs, interleaved as they were declared
    pub parsed_types: Vec<SymbolRef>,

    pub diagnostics: Diagnostics,
}

pub fn parse(text: &str) -> ParseResult {
    Parser::new(text).parse()
}

/// Recursive descent over the declarations of preprocessed header text.
///
/// A declaration that fails to parse is reported and the rest of its line is
/// skipped. Constructs that are recognized but unsupported are reported as
/// warnings without losing any of the text after them.
pub struct Parser {
    scanner: Scanner,
    result: ParseResult,
    reported: HashSet<(Location, String)>,
}

impl Parser {
    pub fn new(text: &str) -> Self {
        let options = ScannerOptions {
            throw_on_end_of_stream: true,
            ..ScannerOptions::parser()
        };

        Self {
            scanner: Scanner::new(text, options),
            result: ParseResult::default(),
            reported: HashSet::new(),
        }
    }

    pub fn parse(mut self) -> ParseResult {
        while !self.scanner.is_end_of_stream() {
            let mark = self.scanner.mark();

            if let Err(error) = self.parse_top_level() {
                self.recover(error, mark);
            }
        }

        self.result
    }

    fn parse_top_level(&mut self) -> Result<(), ParseError> {
        let sal = self.process_sal()?;
        let token = self.peek()?;

        if token.kind.is_typedef_keyword() {
            return self.process_typedef();
        }

        if token.kind.is_call_type_modifier() {
            return self.process_procedure().map(|_| ());
        }

        if !token.is_any_word() {
            self.process_unsupported_global()?;
            self.next()?;
            return Ok(());
        }

        let parsed = self.process_type_name_or_type("")?;

        if self.scanner.is_end_of_stream() {
            return Ok(());
        }

        let next = self.peek()?;

        if next.kind.is_semicolon() && self.result.graph[parsed].category().is_defined() {
            return Ok(());
        }

        if next.kind.is_word() || next.kind.is_call_type_modifier() {
            self.process_procedure_with(parsed, sal, None)?;
        } else if next.kind.is_paren_open() {
            self.process_function_pointer("", parsed, sal)?;
        }

        Ok(())
    }

    fn process_unsupported_global(&mut self) -> Result<(), ParseError> {
        if !self.peek_is(TokenKind::BracketOpen) {
            return Ok(());
        }

        let location = self.location();
        let tokens = self.process_block(TokenKind::BracketOpen, TokenKind::BracketClose)?;
        Err(ParseErrorKind::CppAttribute(tokens_to_string(&tokens)).at(location))
    }

    fn recover(&mut self, error: ParseError, mark: ScannerMark) {
        let is_unsupported = error.kind.is_unsupported();

        // Token level failures restart from the line the declaration began on
        if error.kind.is_scan() {
            self.scanner.rollback(mark);
        }

        // Retrying after a rollback runs into the same problem at the same place
        if self.reported.insert((error.location, error.kind.to_string())) {
            error.report(&mut self.result.diagnostics);
        }

        if !is_unsupported {
            self.chew_through_end_of_line();
        }
    }

    fn chew_through_end_of_line(&mut self) {
        let hide_new_lines = self.scanner.options().hide_new_lines;
        self.scanner.options_mut().hide_new_lines = false;

        while let Ok(token) = self.scanner.next_token() {
            if token.kind.is_new_line() {
                break;
            }
        }

        self.scanner.options_mut().hide_new_lines = hide_new_lines;
    }

    fn peek(&mut self) -> Result<Token, ParseError> {
        Ok(self.scanner.peek_token()?)
    }

    fn next(&mut self) -> Result<Token, ParseError> {
        Ok(self.scanner.next_token()?)
    }

    fn next_of_kind(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        Ok(self.scanner.next_of_kind(kind)?)
    }

    /// Whether the next token is of `kind`. False at the end of the stream.
    fn peek_is(&mut self, kind: TokenKind) -> bool {
        self.scanner
            .peek_token()
            .is_ok_and(|token| token.kind == kind)
    }

    fn location(&mut self) -> Location {
        self.scanner
            .peek_token_list(1)
            .first()
            .map(|token| token.location)
            .unwrap_or_default()
    }

    /// Skips a bracketed block, such as an inline body, returning its tokens.
    fn process_block(&mut self, open: TokenKind, close: TokenKind) -> Result<Vec<Token>, ParseError> {
        let mut tokens = vec![self.next_of_kind(open)?];
        self.process_block_remainder(open, close, &mut tokens)?;
        Ok(tokens)
    }

    /// Skips the rest of a block whose opening token was already read.
    fn process_block_remainder(
        &mut self,
        open: TokenKind,
        close: TokenKind,
        tokens: &mut Vec<Token>,
    ) -> Result<(), ParseError> {
        let mut depth = 1;

        while depth > 0 {
            if self.scanner.is_end_of_stream() {
                return Err(ParseErrorKind::UnterminatedBlock.at(self.location()));
            }

            let token = self.next()?;

            if token.kind == open {
                depth += 1;
            } else if token.kind == close {
                depth -= 1;
            }

            tokens.push(token);
        }

        Ok(())
    }
}
