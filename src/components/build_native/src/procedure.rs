use crate::{ParseError, ParseErrorKind, Parser, sal::SalEntries};
use native_symbols::{CallingConvention, SymbolRef, generate_anonymous_name};
use native_token::TokenKind;

impl Parser {
    /// Reads any calling convention keywords. The last one wins.
    pub(crate) fn process_calling_convention(
        &mut self,
    ) -> Result<Option<CallingConvention>, ParseError> {
        let mut calling_convention = None;

        while let Ok(token) = self.scanner.peek_token() {
            if !token.kind.is_call_type_modifier() {
                break;
            }

            self.next()?;

            calling_convention = Some(match token.kind {
                TokenKind::StandardCallKeyword => CallingConvention::StdCall,
                TokenKind::CDeclarationCallKeyword => CallingConvention::Cdecl,
                _ => CallingConvention::WinApi,
            });
        }

        Ok(calling_convention)
    }

    /// Reads a procedure declaration that starts with a calling convention or `inline`.
    pub(crate) fn process_procedure(&mut self) -> Result<Option<SymbolRef>, ParseError> {
        let mut calling_convention = self.process_calling_convention()?;
        let sal = self.process_sal()?;
        calling_convention = self.process_calling_convention()?.or(calling_convention);

        let return_type = self.process_type_name_or_type("")?;
        self.process_procedure_with(return_type, sal, calling_convention)
    }

    /// Reads the rest of a procedure declaration once its return type is known.
    ///
    /// Gives `None`, without consuming anything, when what follows is not a
    /// name and a parameter list.
    pub(crate) fn process_procedure_with(
        &mut self,
        return_type: SymbolRef,
        return_sal: SalEntries,
        calling_convention: Option<CallingConvention>,
    ) -> Result<Option<SymbolRef>, ParseError> {
        let mark = self.scanner.mark();

        let calling_convention = self
            .process_calling_convention()?
            .or(calling_convention)
            .unwrap_or_default();

        if !self.peek_is(TokenKind::Word) {
            self.scanner.rollback(mark);
            return Ok(None);
        }

        let name = self.next()?;

        let Some(parameters) = self.process_parameter_list(&name.value)? else {
            self.scanner.rollback(mark);
            return Ok(None);
        };

        if self.peek_is(TokenKind::BraceOpen) {
            self.process_block(TokenKind::BraceOpen, TokenKind::BraceClose)?;
            return Err(ParseErrorKind::InlineProcedure(name.value).at(name.location));
        }

        let graph = &mut self.result.graph;
        let return_sal = graph.sal_attribute(&return_sal);
        let signature = graph.signature(return_type, return_sal, parameters);
        let procedure = graph.procedure(name.value, signature, calling_convention);

        self.result.procedures.push(procedure);
        Ok(Some(procedure))
    }

    /// Reads `(cc *name)(parameters)` following the return type of a function pointer.
    pub(crate) fn process_function_pointer(
        &mut self,
        prefix: &str,
        return_type: SymbolRef,
        return_sal: SalEntries,
    ) -> Result<SymbolRef, ParseError> {
        if self.peek_is(TokenKind::ParenOpen) {
            self.next()?;
        }

        let calling_convention = self.process_calling_convention()?;

        if self.peek_is(TokenKind::Asterisk) {
            self.next()?;
        }

        let name = if self.peek_is(TokenKind::Word) {
            format!("{}{}", prefix, self.next()?.value)
        } else {
            String::new()
        };

        self.next_of_kind(TokenKind::ParenClose)?;
        self.process_function_pointer_parameters(&name, return_type, return_sal, calling_convention)
    }

    /// Reads the parameters of a function pointer and records it. An empty
    /// name makes the function pointer anonymous.
    pub(crate) fn process_function_pointer_parameters(
        &mut self,
        name: &str,
        return_type: SymbolRef,
        return_sal: SalEntries,
        calling_convention: Option<CallingConvention>,
    ) -> Result<SymbolRef, ParseError> {
        let location = self.location();

        let Some(parameters) = self.process_parameter_list(name)? else {
            return Err(ParseErrorKind::FunctionPointerParameters(name.into()).at(location));
        };

        let graph = &mut self.result.graph;
        let return_sal = graph.sal_attribute(&return_sal);
        let signature = graph.signature(return_type, return_sal, parameters);
        let function_pointer =
            graph.function_pointer(name, signature, calling_convention.unwrap_or_default());

        self.process_parsed_defined_type(function_pointer);
        Ok(function_pointer)
    }

    /// Reads `(type name, ...)`, giving `None` when there is no opening paren.
    fn process_parameter_list(
        &mut self,
        procedure_name: &str,
    ) -> Result<Option<Vec<SymbolRef>>, ParseError> {
        let mut parameters = Vec::new();

        if !self.next()?.kind.is_paren_open() {
            return Ok(None);
        }

        let peeked = self.scanner.peek_token_list(2);

        if let [void, close] = peeked.as_slice() {
            if void.kind.is_void_keyword() && close.kind.is_paren_close() {
                self.next()?;
                self.next()?;
                return Ok(Some(parameters));
            }
        }

        loop {
            let token = self.peek()?;

            if token.kind.is_paren_close() {
                self.next()?;
                return Ok(Some(parameters));
            }

            if token.kind.is_period() && self.is_variable_arguments() {
                self.process_block_remainder(
                    TokenKind::ParenOpen,
                    TokenKind::ParenClose,
                    &mut Vec::new(),
                )?;

                if self.peek_is(TokenKind::BraceOpen) {
                    self.process_block(TokenKind::BraceOpen, TokenKind::BraceClose)?;
                }

                return Err(
                    ParseErrorKind::VariableArguments(procedure_name.into()).at(token.location)
                );
            }

            parameters.push(self.process_parameter()?);

            if self.peek_is(TokenKind::Comma) {
                self.next()?;
            }
        }
    }

    fn is_variable_arguments(&mut self) -> bool {
        let peeked = self.scanner.peek_token_list(3);
        peeked.len() == 3 && peeked.iter().all(|token| token.kind.is_period())
    }

    fn process_parameter(&mut self) -> Result<SymbolRef, ParseError> {
        let sal = self.process_sal()?;
        let mut ty = self.process_type_name()?;
        let mut name = String::new();

        if self.peek_is(TokenKind::Word) {
            name = self.next()?.value;
        } else if self.peek_is(TokenKind::ParenOpen) {
            // An inline function pointer gives its name to the parameter
            ty = self.process_function_pointer("", ty, Vec::new())?;
            let function_pointer = &mut self.result.graph[ty];

            if !function_pointer.is_anonymous() {
                name = std::mem::replace(&mut function_pointer.name, generate_anonymous_name());
                function_pointer.set_anonymous(true);
            }
        }

        // `int a[]` and `char b[4]`
        if self.peek_is(TokenKind::BracketOpen) {
            ty = self.process_array_suffix(ty)?;
        }

        let graph = &mut self.result.graph;
        let sal = graph.sal_attribute(&sal);
        Ok(graph.parameter(name, ty, sal))
    }
}
