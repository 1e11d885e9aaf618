use crate::{ParseError, ParseErrorKind, Parser};
use native_symbols::{SymbolData, SymbolGraph, SymbolRef};
use native_token::TokenKind;

/// A member read from a struct or union body, not yet attached to it.
struct PendingMember {
    name: String,
    ty: SymbolRef,
}

impl Parser {
    /// Reads a type defined in place: a struct, union or enum with a body,
    /// or a function pointer. Leaves the scanner untouched when there is none.
    ///
    /// `prefix` is put in front of the names of the types read, so that a
    /// type nested in `s1` is named `s1_inner`.
    pub(crate) fn process_defined_type(
        &mut self,
        prefix: &str,
        include_function_pointers: bool,
    ) -> Result<Option<SymbolRef>, ParseError> {
        let mark = self.scanner.mark();

        if self.peek_is(TokenKind::DeclSpec) {
            self.process_sal()?;
        }

        let token = self.peek()?;

        match token.kind {
            TokenKind::StructKeyword
            | TokenKind::ClassKeyword
            | TokenKind::UnionKeyword
            | TokenKind::EnumKeyword => {
                self.next()?;
                self.process_sal()?;

                let peeked = self.scanner.peek_token_list(2);

                let has_body = match peeked.as_slice() {
                    [name, open, ..] if name.kind.is_word() => open.kind.is_brace_open(),
                    [open, ..] => open.kind.is_brace_open(),
                    [] => false,
                };

                if has_body {
                    let defined = match token.kind {
                        TokenKind::UnionKeyword => self.process_composite(prefix, true)?,
                        TokenKind::EnumKeyword => self.process_enum(prefix)?,
                        _ => self.process_composite(prefix, false)?,
                    };

                    return Ok(Some(defined));
                }
            }
            _ if include_function_pointers => {
                // Only a function pointer when a paren follows the return type
                let return_type = self
                    .process_sal()
                    .and_then(|_| self.process_type_name());

                if let Ok(return_type) = return_type {
                    if self.peek_is(TokenKind::ParenOpen) {
                        return self
                            .process_function_pointer(prefix, return_type, Vec::new())
                            .map(Some);
                    }
                }
            }
            _ => (),
        }

        self.scanner.rollback(mark);
        Ok(None)
    }

    /// Reads a struct or union after its keyword.
    fn process_composite(&mut self, prefix: &str, is_union: bool) -> Result<SymbolRef, ParseError> {
        let (name, is_inline) = self.process_defined_name(prefix)?;
        self.next_of_kind(TokenKind::BraceOpen)?;

        let composite = if is_union {
            self.result.graph.union(&name)
        } else {
            self.result.graph.structure(&name)
        };

        self.process_member_list(composite, &name)?;
        self.next_of_kind(TokenKind::BraceClose)?;
        self.process_parsed_defined_type(composite);

        // Names after a nested body belong to the member being declared
        if !is_inline && prefix.is_empty() {
            self.process_post_typedefs(composite)?;
        }

        Ok(composite)
    }

    fn process_enum(&mut self, prefix: &str) -> Result<SymbolRef, ParseError> {
        let (name, is_inline) = self.process_defined_name(prefix)?;
        self.next_of_kind(TokenKind::BraceOpen)?;

        let enumeration = self.result.graph.enumeration(&name);
        self.process_parsed_defined_type(enumeration);
        self.process_enum_values(enumeration)?;
        self.next_of_kind(TokenKind::BraceClose)?;

        if !is_inline && prefix.is_empty() {
            self.process_post_typedefs(enumeration)?;
        }

        Ok(enumeration)
    }

    /// Name of a type being defined, empty when it is declared inline.
    fn process_defined_name(&mut self, prefix: &str) -> Result<(String, bool), ParseError> {
        if !self.peek_is(TokenKind::Word) {
            return Ok((String::new(), true));
        }

        let token = self.next()?;
        Ok((format!("{}{}", prefix, token.value), false))
    }

    fn process_enum_values(&mut self, enumeration: SymbolRef) -> Result<(), ParseError> {
        if self.peek_is(TokenKind::BraceClose) {
            return Ok(());
        }

        loop {
            let name = self.next_of_kind(TokenKind::Word)?;
            let token = self.peek()?;

            let value = match token.kind {
                TokenKind::Comma => {
                    self.next()?;
                    String::new()
                }
                TokenKind::BraceClose => String::new(),
                TokenKind::OpAssign => {
                    self.next()?;
                    let value = self.process_constant_value()?;

                    if self.peek_is(TokenKind::Comma) {
                        self.next()?;
                    }

                    value
                }
                _ => {
                    self.result.diagnostics.push_warning(
                        format!(
                            "Unexpected token while processing enum values: {}",
                            token.kind
                        ),
                        Some(token.location),
                    );
                    return Ok(());
                }
            };

            let key = self
                .result
                .graph
                .add_enum_value(enumeration, name.value, &value);
            self.result.enum_values.push(key);

            if self.peek_is(TokenKind::BraceClose) {
                return Ok(());
            }
        }
    }

    /// Reads the text of an enum value up to the next `,` or `}` outside of parentheses.
    fn process_constant_value(&mut self) -> Result<String, ParseError> {
        let mut value = String::new();
        let mut depth = 0usize;
        let mut previous_is_word = false;

        loop {
            let token = self.peek()?;

            match token.kind {
                TokenKind::Comma | TokenKind::BraceClose if depth == 0 => return Ok(value),
                TokenKind::ParenOpen => depth += 1,
                TokenKind::ParenClose => depth = depth.saturating_sub(1),
                _ => (),
            }

            self.next()?;

            // Keep adjacent words apart, as in `sizeof x`
            let is_word = token.is_any_word() || token.kind.is_number_literal();

            if previous_is_word && is_word {
                value.push(' ');
            }

            value.push_str(&token.value);
            previous_is_word = is_word;
        }
    }

    /// Reads the members of a struct or union body up to its closing brace.
    fn process_member_list(&mut self, composite: SymbolRef, parent_name: &str) -> Result<(), ParseError> {
        if self.peek_is(TokenKind::BraceClose) {
            return Ok(());
        }

        loop {
            self.process_access_modifiers()?;

            let first = self.process_member(parent_name)?;
            let base = base_type(&self.result.graph, first.ty);
            let mut members = vec![first];
            let mut end = self.next()?;

            while end.kind.is_comma() {
                let ty = self.process_type_name_modifiers(base)?;
                members.push(self.process_member_with_type(ty)?);
                end = self.next()?;
            }

            if end.kind.is_paren_open() {
                let procedure = members.remove(0);
                self.process_member_procedure()?;

                self.result.diagnostics.push_warning(
                    format!(
                        "Type member procedures are not supported: {}.{}",
                        parent_name, procedure.name
                    ),
                    Some(end.location),
                );
            } else if !end.kind.is_semicolon() {
                return Err(ParseErrorKind::ExpectedMemberTerminator {
                    member: members[0].name.clone(),
                    parent: parent_name.into(),
                    found: end.value,
                }
                .at(end.location));
            }

            for member in members {
                self.result
                    .graph
                    .add_member(composite, member.name, member.ty);
            }

            if self.peek_is(TokenKind::BraceClose) {
                return Ok(());
            }
        }
    }

    /// Skips `public:` and friends.
    fn process_access_modifiers(&mut self) -> Result<(), ParseError> {
        while self.peek()?.kind.is_access_modifier() {
            self.next()?;

            if self.peek_is(TokenKind::Colon) {
                self.next()?;
            }
        }

        Ok(())
    }

    fn process_member(&mut self, parent_name: &str) -> Result<PendingMember, ParseError> {
        self.process_sal()?;
        let ty = self.process_type_name_or_type(&format!("{}_", parent_name))?;
        self.process_member_with_type(ty)
    }

    /// Reads the name of a member of type `ty` along with any array or bit field suffix.
    fn process_member_with_type(&mut self, ty: SymbolRef) -> Result<PendingMember, ParseError> {
        // Members may be unnamed, they are named once the whole type is read
        let name = if self.peek_is(TokenKind::Word) {
            self.next()?.value
        } else {
            String::new()
        };

        let ty = if self.peek_is(TokenKind::BracketOpen) {
            self.process_array_suffix(ty)?
        } else if self.peek_is(TokenKind::Colon) {
            self.next()?;
            let size = self.next_of_kind(TokenKind::Number)?;

            let bits = native_expr::Number::parse_literal(&size.value)
                .and_then(|number| number.as_i64())
                .and_then(|number| usize::try_from(number).ok())
                .ok_or_else(|| ParseErrorKind::BitVectorSize(size.value.clone()).at(size.location))?;

            self.result.graph.bit_vector(bits)
        } else {
            ty
        };

        Ok(PendingMember { name, ty })
    }

    /// Skips the rest of a member procedure after its opening paren.
    fn process_member_procedure(&mut self) -> Result<(), ParseError> {
        self.process_block_remainder(TokenKind::ParenOpen, TokenKind::ParenClose, &mut Vec::new())?;

        if self.peek_is(TokenKind::ConstKeyword) {
            self.next()?;
        }

        if self.peek_is(TokenKind::BraceOpen) {
            self.process_block(TokenKind::BraceOpen, TokenKind::BraceClose)?;
        }

        if self.peek_is(TokenKind::Semicolon) {
            self.next()?;
        }

        Ok(())
    }

    /// Records a finished defined type, first naming its unnamed members
    /// after their kind and position.
    pub(crate) fn process_parsed_defined_type(&mut self, key: SymbolRef) {
        let graph = &mut self.result.graph;
        let mut count = 1;

        for member in graph[key].members().to_vec() {
            let SymbolData::Member { ty } = graph[member].data else {
                continue;
            };

            if !graph[member].name.is_empty() {
                continue;
            }

            let prefix = match graph[graph.dig_through_named_types(ty)].data {
                SymbolData::Union(_) => "Union",
                SymbolData::Struct(_) => "Struct",
                _ => "AnonymousMember",
            };

            graph[member].name = format!("{}{}", prefix, count);
            count += 1;
        }

        self.result.defined_types.push(key);
        self.result.parsed_types.push(key);
    }

    pub(crate) fn process_typedef(&mut self) -> Result<(), ParseError> {
        self.next_of_kind(TokenKind::TypedefKeyword)?;
        self.process_sal()?;

        let source = match self.process_defined_type("", false)? {
            Some(defined) => defined,
            None => self.process_short_type_name()?,
        };

        self.process_post_typedefs(source)
    }

    /// Reads the names after a type that declare typedefs of it, as in
    /// `} s1, *ps1;`.
    fn process_post_typedefs(&mut self, ty: SymbolRef) -> Result<(), ParseError> {
        loop {
            if self.scanner.is_end_of_stream() {
                return Ok(());
            }

            let token = self.peek()?;

            match token.kind {
                TokenKind::Semicolon | TokenKind::NewLine => return Ok(()),
                TokenKind::Comma => {
                    self.next()?;
                }
                _ => self.process_post_typedef(ty)?,
            }
        }
    }

    fn process_post_typedef(&mut self, ty: SymbolRef) -> Result<(), ParseError> {
        let mut ty = self.process_type_name_modifiers(ty)?;
        let calling_convention = self.process_calling_convention()?;
        let token = self.peek()?;

        let name = if token.kind.is_paren_open() {
            ty = self.process_function_pointer("", ty, Vec::new())?;
            self.result.graph[ty].name.clone()
        } else if token.kind.is_word() {
            self.next()?;

            // `typedef void name(int)` declares a function pointer without the `(*name)`
            if self.peek_is(TokenKind::ParenOpen) {
                ty = self.process_function_pointer_parameters(
                    &token.value,
                    ty,
                    Vec::new(),
                    calling_convention,
                )?;
            }

            token.value
        } else if token.kind.is_type_keyword() {
            // Headers sometimes typedef words we treat as keywords
            self.next()?;
            return Ok(());
        } else {
            return Err(ParseErrorKind::ExpectedTypedefName(token.value).at(token.location));
        };

        let ty = self.process_type_name_modifiers(ty)?;
        let typedef = self.result.graph.typedef(name, Some(ty));
        self.result.typedefs.push(typedef);
        self.result.parsed_types.push(typedef);
        Ok(())
    }
}

/// The type under any pointers and arrays, which further declarators in a
/// comma separated list apply their own modifiers to.
fn base_type(graph: &SymbolGraph, ty: SymbolRef) -> SymbolRef {
    let mut current = ty;

    while let Some(symbol) = graph.get(current) {
        match symbol.data {
            SymbolData::Pointer {
                real_type: Some(inner),
            }
            | SymbolData::Array {
                real_type: Some(inner),
                ..
            } => current = inner,
            _ => break,
        }
    }

    current
}
