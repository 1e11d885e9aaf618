use crate::{Environment, MacroArgument, MacroKind, depleted::Depleted};
use build_native_token::{ScannerOptions, tokenize_text};
use native_expr::string_literal_value;
use native_token::{Token, TokenKind};
use std::{collections::VecDeque, rc::Rc};

/// Tokens still to be expanded, each with the macros already used to produce it.
type Pending = VecDeque<(Token, Rc<Depleted>)>;

/// Replaces every macro invocation in a line.
///
/// Replacement text is rescanned in place, so it can use macros defined
/// after the macro that produced it and can supply the arguments of an
/// invocation that continues past it.
pub fn expand_line(tokens: Vec<Token>, environment: &Environment) -> Vec<Token> {
    let root = Depleted::new();

    let pending = tokens
        .into_iter()
        .map(|token| (token, Rc::clone(&root)))
        .collect();

    let mut expanded = expand_pending(pending, environment);
    collapse_adjacent_strings(&mut expanded);
    expanded
}

fn expand_pending(mut pending: Pending, environment: &Environment) -> Vec<Token> {
    let mut expanded = Vec::with_capacity(pending.len());

    while let Some((token, depleted)) = pending.pop_front() {
        if !token.is_any_word() {
            expanded.push(token);
            continue;
        }

        let Some(define) = environment.find_define(&token.value) else {
            expanded.push(token);
            continue;
        };

        let hash = Depleted::hash_name(&define.name);

        if depleted.contains(hash) {
            expanded.push(token);
            continue;
        }

        let mut replacement = match &define.kind {
            MacroKind::Object => tokenize_text(&define.value, ScannerOptions::preprocessor()),
            MacroKind::Method(method) => {
                let Some(arguments) = take_arguments(&mut pending) else {
                    // Not an invocation, just the name
                    expanded.push(token);
                    continue;
                };

                // Arguments are expanded on their own before substitution
                let mut arguments = arguments
                    .into_iter()
                    .map(|argument| MacroArgument {
                        written: argument.iter().map(|(token, _)| token.clone()).collect(),
                        expanded: expand_pending(argument, environment),
                    })
                    .collect::<Vec<_>>();

                if method.parameters.is_empty()
                    && arguments.len() == 1
                    && arguments[0].is_empty()
                {
                    arguments.clear();
                }

                method.replace(&arguments)
            }
        };

        collapse_double_pounds(&mut replacement);

        let depleted = depleted.with(hash);
        for token in replacement.into_iter().rev() {
            pending.push_front((token, Rc::clone(&depleted)));
        }
    }

    expanded
}

/// Removes `( a, b )` from the front of the pending tokens, giving the
/// tokens of each argument.
fn take_arguments(pending: &mut Pending) -> Option<Vec<Pending>> {
    let open = pending
        .iter()
        .position(|(token, _)| !token.kind.is_white_space())?;

    if !pending[open].0.kind.is_paren_open() {
        return None;
    }

    let mut arguments = Vec::new();
    let mut current = Pending::new();
    let mut depth = 0;
    let mut close = None;

    for (index, (token, depleted)) in pending.iter().enumerate().skip(open + 1) {
        match token.kind {
            TokenKind::Comma if depth == 0 => {
                arguments.push(std::mem::take(&mut current));
                continue;
            }
            TokenKind::ParenClose if depth == 0 => {
                arguments.push(std::mem::take(&mut current));
                close = Some(index);
                break;
            }
            TokenKind::ParenOpen => depth += 1,
            TokenKind::ParenClose => depth -= 1,
            _ => (),
        }

        current.push_back((token.clone(), Rc::clone(depleted)));
    }

    pending.drain(..=close?);
    Some(arguments)
}

/// Pastes the operands of every `a ## b` together.
fn collapse_double_pounds(tokens: &mut Vec<Token>) {
    let mut index = 0;

    while index + 3 < tokens.len() {
        if !(tokens[index + 1].kind.is_pound() && tokens[index + 2].kind.is_pound()) {
            index += 1;
            continue;
        }

        let pasted = format!("{}{}", tokens[index].value, tokens[index + 3].value);
        let location = tokens[index].location;

        let rescanned = tokenize_text(&pasted, ScannerOptions::preprocessor());
        let kind = match rescanned.as_slice() {
            [single] if single.is_any_word() || single.kind.is_number_literal() => single.kind,
            _ => TokenKind::Text,
        };

        tokens.splice(index..index + 4, [Token::new(kind, pasted, location)]);
    }
}

/// Joins string literals separated only by whitespace, so `"a" "b"` becomes `"ab"`.
fn collapse_adjacent_strings(tokens: &mut Vec<Token>) {
    let mut index = 0;

    while index < tokens.len() {
        if !tokens[index].kind.is_quoted_string() {
            index += 1;
            continue;
        }

        let partner = tokens[index + 1..]
            .iter()
            .position(|token| !matches!(token.kind, TokenKind::WhiteSpace | TokenKind::NewLine))
            .map(|offset| index + 1 + offset)
            .filter(|partner| tokens[*partner].kind.is_quoted_string());

        let Some(partner) = partner else {
            index += 1;
            continue;
        };

        let (first, second) = (&tokens[index], &tokens[partner]);
        let is_unicode =
            first.kind.is_quoted_string_unicode() || second.kind.is_quoted_string_unicode();

        let joined = format!(
            "{}\"{}{}\"",
            if is_unicode { "L" } else { "" },
            string_literal_value(&first.value).unwrap_or_default(),
            string_literal_value(&second.value).unwrap_or_default(),
        );

        let kind = if is_unicode {
            TokenKind::QuotedStringUnicode
        } else {
            TokenKind::QuotedStringAnsi
        };

        let location = first.location;
        tokens.splice(index..=partner, [Token::new(kind, joined, location)]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Macro, MethodMacro};
    use native_token::tokens_to_string;

    fn expand(environment: &Environment, text: &str) -> String {
        let tokens = tokenize_text(text, ScannerOptions::preprocessor());
        tokens_to_string(&expand_line(tokens, environment))
    }

    fn method(name: &str, parameters: &[&str], body: &str) -> Macro {
        Macro::method(
            name,
            MethodMacro::new(
                parameters.iter().map(|name| name.to_string()).collect(),
                tokenize_text(body, ScannerOptions::preprocessor()),
            ),
        )
    }

    #[test]
    fn recursion_stops() {
        let environment = Environment::new([
            Macro::new("a", "b"),
            Macro::new("b", "a"),
            Macro::new("self", "self + 1"),
        ]);

        assert_eq!(expand(&environment, "a"), "a");
        assert_eq!(expand(&environment, "b"), "b");
        assert_eq!(expand(&environment, "self"), "self + 1");
    }

    #[test]
    fn object_macro_can_name_a_method() {
        let environment = Environment::new([Macro::new("f", "g"), method("g", &["x"], "x x")]);
        assert_eq!(expand(&environment, "f(1)"), "1 1");
    }

    #[test]
    fn method_without_arguments_is_left_alone() {
        let environment = Environment::new([method("f", &["x"], "x")]);
        assert_eq!(expand(&environment, "f + 1"), "f + 1");
        assert_eq!(expand(&environment, "f(1"), "f(1");
    }

    #[test]
    fn empty_parameter_list() {
        let environment = Environment::new([method("f", &[], "42")]);
        assert_eq!(expand(&environment, "f()"), "42");
    }

    #[test]
    fn chained_paste() {
        let environment = Environment::new([method("cat", &["a", "b", "c"], "a##b##c")]);
        assert_eq!(expand(&environment, "cat(x,y,z)"), "xyz");
    }

    #[test]
    fn joins_wide_strings() {
        let environment = Environment::default();
        assert_eq!(expand(&environment, "L\"a\" \"b\""), "L\"ab\"");
    }
}
