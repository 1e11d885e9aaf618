use crate::{
    Environment, Macro, MethodMacro, Preprocessor, PreprocessorErrorKind, PreprocessorLine,
    conditional::{BranchError, evaluate_condition},
    environment::Definition,
    expand::expand_line,
};
use itertools::Itertools;
use native_expr::string_literal_value;
use native_token::{Token, TokenKind};
use std::path::{Path, PathBuf};

impl Preprocessor {
    pub(crate) fn process_conditional(&mut self, line: PreprocessorLine) {
        let kind = line.first;
        let tokens: Vec<Token> = line.valid_tokens().into_iter().skip(1).cloned().collect();

        let environment = &self.environment;
        let mut evaluated = None;

        let condition = || {
            let value = test_condition(kind, &tokens, environment);
            evaluated = Some(value);
            value.unwrap_or(false)
        };

        let result = match kind {
            TokenKind::PoundIf | TokenKind::PoundIfdef | TokenKind::PoundIfndef => {
                self.conditionals.push_if(line.location, condition);
                Ok(())
            }
            TokenKind::PoundElseIf => self.conditionals.else_if(condition),
            TokenKind::PoundElse => self.conditionals.else_branch(),
            _ => self.conditionals.end_if(),
        };

        if let Err(BranchError::Unbalanced) = result {
            let error = if kind.is_pound_end_if() {
                PreprocessorErrorKind::UnbalancedEndIf
            } else {
                PreprocessorErrorKind::UnbalancedElse
            };

            self.report(error.at(line.location));
        }

        match evaluated {
            Some(Some(value)) => self.trace(format!("{}: {}", value, line.display_line())),
            Some(None) => self.report(
                PreprocessorErrorKind::CouldNotEvaluate(format!("#{}", line.to_string().trim()))
                    .at(line.location),
            ),
            None if !kind.is_pound_else() && !kind.is_pound_end_if() => {
                self.trace(format!("Skipped: {}", line.display_line()))
            }
            None => (),
        }
    }

    pub(crate) fn process_define(&mut self, line: &PreprocessorLine) {
        let Some(define) = self.read_define(line) else {
            return;
        };

        let message = match self.environment.add_define(define.clone().parsed()) {
            Definition::Kept(kept) => format!(
                "Kept: {} -> {} Attempted Value {}",
                kept.name, kept.value, define.value
            ),
            Definition::Added | Definition::Replaced => {
                format!("Defined: {} -> {}", define.name, define.display_value())
            }
        };

        self.trace(message);
    }

    fn read_define(&mut self, line: &PreprocessorLine) -> Option<Macro> {
        let tokens = &line.tokens;

        let Some(name_index) = tokens
            .iter()
            .skip(1)
            .position(|token| !token.is_layout())
            .map(|offset| offset + 1)
        else {
            self.report(PreprocessorErrorKind::EmptyDefine.at(line.location));
            return None;
        };

        let name = &tokens[name_index];

        if !name.is_any_word() {
            self.report(
                PreprocessorErrorKind::BadDefine(line.to_string().trim().into()).at(line.location),
            );
            return None;
        }

        // A parenthesis only starts a parameter list when it touches the name
        if tokens
            .get(name_index + 1)
            .is_some_and(|token| token.kind.is_paren_open())
        {
            if let Some(method) = read_method(&tokens[name_index + 2..]) {
                return Some(Macro::method(&name.value, method));
            }
        }

        Some(Macro::new(&name.value, body_text(&tokens[name_index + 1..])))
    }

    pub(crate) fn process_undef(&mut self, line: &PreprocessorLine) {
        match line.valid_tokens().as_slice() {
            [_, name] if name.is_any_word() => {
                if self.environment.remove_define(&name.value).is_some() {
                    self.trace(format!("Undefined: {}", name.value));
                }
            }
            _ => self.report(PreprocessorErrorKind::BadUndef.at(line.location)),
        }
    }

    pub(crate) fn process_include(&mut self, line: PreprocessorLine) {
        if !self.options.follow_includes {
            return;
        }

        let location = line.location;
        let expanded = expand_line(line.tokens.into_iter().skip(1).collect(), &self.environment);
        let mut tokens = expanded.iter().filter(|token| !token.is_layout());

        let name = match tokens.next() {
            Some(token) if token.kind.is_op_less_than() => {
                let inner = tokens
                    .take_while_inclusive(|token| !token.kind.is_op_greater_than())
                    .collect_vec();

                match inner.split_last() {
                    Some((close, inner)) if close.kind.is_op_greater_than() => {
                        Some(inner.iter().map(|token| token.value.as_str()).collect::<String>())
                    }
                    _ => None,
                }
            }
            Some(token) if token.kind.is_quoted_string() => {
                string_literal_value(&token.value).map(String::from)
            }
            _ => None,
        };

        let Some(name) = name else {
            self.report(PreprocessorErrorKind::InvalidInclude.at(location));
            return;
        };

        let content = self.find_include(&name).and_then(|path| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| (path, content))
        });

        let Some((path, content)) = content else {
            self.report(PreprocessorErrorKind::MissingInclude(name.clone()).at(location));
            self.trace(format!("include {} not followed", name));
            return;
        };

        self.trace(format!("include {} followed -> {}", name, path.display()));
        self.trace(format!("include {} start", name));
        self.process_text(&content);
        self.trace(format!("include {} end", name));
    }

    fn find_include(&self, name: &str) -> Option<PathBuf> {
        let direct = Path::new(name);

        if direct.is_file() {
            return Some(direct.to_path_buf());
        }

        self.options
            .include_paths
            .iter()
            .map(|prefix| prefix.join(name))
            .find(|path| path.is_file())
    }

    pub(crate) fn process_error(&mut self, line: &PreprocessorLine) {
        let message = body_text(&line.tokens[1..]);
        self.report(PreprocessorErrorKind::ErrorDirective(message).at(line.location));
    }
}

fn test_condition(kind: TokenKind, tokens: &[Token], environment: &Environment) -> Option<bool> {
    match kind {
        TokenKind::PoundIfdef | TokenKind::PoundIfndef => {
            let name = tokens.first().filter(|name| name.is_any_word())?;
            Some(environment.is_defined(&name.value) ^ kind.is_pound_ifndef())
        }
        _ => evaluate_condition(tokens.to_vec(), environment),
    }
}

/// Reads `a, b) body`, the part of a function-like definition after its `(`.
fn read_method(tokens: &[Token]) -> Option<MethodMacro> {
    let mut parameters = Vec::new();
    let close = tokens.iter().position(|token| token.kind.is_paren_close())?;

    for token in &tokens[..close] {
        if token.kind.is_paren_open() {
            return None;
        }

        if token.is_any_word() {
            parameters.push(token.value.clone());
        }
    }

    let body = tokens[close + 1..]
        .iter()
        .filter(|token| !token.kind.is_new_line())
        .skip_while(|token| token.kind.is_white_space())
        .cloned()
        .collect_vec();

    let trailing = body
        .iter()
        .rev()
        .take_while(|token| token.kind.is_white_space())
        .count();

    let mut body = body;
    body.truncate(body.len() - trailing);

    Some(MethodMacro::new(parameters, body))
}

/// Source text of a macro value, with line breaks removed and whitespace runs
/// reduced to single spaces.
fn body_text(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter(|token| !token.kind.is_new_line())
        .map(|token| {
            if token.kind.is_white_space() {
                " "
            } else {
                token.value.as_str()
            }
        })
        .coalesce(|a, b| {
            if a == " " && b == " " {
                Ok(" ")
            } else {
                Err((a, b))
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}
