use crate::{Environment, MacroKind};
use build_native_expr::{EvaluationContext, ExpressionEvaluator, ExpressionParser};
use line_column::Location;
use native_expr::{ExpressionNode, ExpressionValue, Number};
use native_token::{Token, TokenKind};

#[derive(Copy, Clone, Debug)]
struct Frame {
    parent_active: bool,
    active: bool,
    taken: bool,
    in_else: bool,
    location: Location,
}

/// Nesting of `#if` chains, innermost last.
#[derive(Clone, Debug, Default)]
pub struct ConditionalStack {
    frames: Vec<Frame>,
}

pub enum BranchError {
    Unbalanced,
}

impl ConditionalStack {
    /// Whether lines at this point are emitted.
    pub fn is_active(&self) -> bool {
        self.frames.last().is_none_or(|frame| frame.active)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Opens a chain. `condition` is only consulted when the enclosing lines are active.
    pub fn push_if(&mut self, location: Location, condition: impl FnOnce() -> bool) {
        let parent_active = self.is_active();
        let active = parent_active && condition();

        self.frames.push(Frame {
            parent_active,
            active,
            taken: active,
            in_else: false,
            location,
        });
    }

    /// Moves to an `#elseif` branch, evaluating it only when no earlier branch was taken.
    pub fn else_if(&mut self, condition: impl FnOnce() -> bool) -> Result<(), BranchError> {
        let frame = self.frames.last_mut().ok_or(BranchError::Unbalanced)?;

        if frame.in_else {
            return Err(BranchError::Unbalanced);
        }

        frame.active = frame.parent_active && !frame.taken && condition();
        frame.taken |= frame.active;
        Ok(())
    }

    pub fn else_branch(&mut self) -> Result<(), BranchError> {
        let frame = self.frames.last_mut().ok_or(BranchError::Unbalanced)?;

        if frame.in_else {
            return Err(BranchError::Unbalanced);
        }

        frame.active = frame.parent_active && !frame.taken;
        frame.taken = true;
        frame.in_else = true;
        Ok(())
    }

    pub fn end_if(&mut self) -> Result<(), BranchError> {
        self.frames.pop().map(|_| ()).ok_or(BranchError::Unbalanced)
    }

    /// Closes every chain opened after `depth`, returning where each one started.
    pub fn unwind_to(&mut self, depth: usize) -> Vec<Location> {
        self.frames
            .drain(depth.min(self.frames.len())..)
            .map(|frame| frame.location)
            .collect()
    }
}

/// Gives names in `#if` expressions their meaning.
///
/// An object macro stands for the numeric value of its body, evaluated through
/// the same rules. A body with no numeric value makes the macro true, which
/// includes a body naming an undefined word or the macro itself. An undefined
/// name is zero. `defined(name)` tests whether `name` is a macro.
pub struct MacroContext<'a> {
    environment: &'a Environment,
    visiting: Vec<String>,
}

impl<'a> MacroContext<'a> {
    pub fn new(environment: &'a Environment) -> Self {
        Self {
            environment,
            visiting: Vec::new(),
        }
    }

    fn body_value(&self, name: &str, body: &str) -> Option<Number> {
        let node = ExpressionParser::parse(body).ok()?;

        let mut visiting = self.visiting.clone();
        visiting.push(name.into());

        let inner = MacroContext {
            environment: self.environment,
            visiting,
        };

        match ExpressionEvaluator::new(inner).evaluate(&node)? {
            value @ (ExpressionValue::Number(_) | ExpressionValue::Character(_)) => {
                value.as_number()
            }
            ExpressionValue::Boolean(_) | ExpressionValue::String(_) => None,
        }
    }
}

impl EvaluationContext for MacroContext<'_> {
    fn identifier(&mut self, name: &str) -> Option<ExpressionValue> {
        if self.visiting.iter().any(|visiting| visiting == name) {
            return None;
        }

        let Some(define) = self.environment.find_define(name) else {
            return self.visiting.is_empty().then(|| Number::Int32(0).into());
        };

        let number = match define.kind {
            MacroKind::Object => self.body_value(name, &define.value),
            MacroKind::Method(_) => None,
        };

        Some(number.unwrap_or(Number::Int32(1)).into())
    }

    fn function_call(
        &mut self,
        name: &str,
        arguments: &[&ExpressionNode],
    ) -> Option<ExpressionValue> {
        match (name, arguments) {
            ("defined", [argument]) if argument.kind.is_leaf() => Some(
                self.environment
                    .is_defined(&argument.token.value)
                    .into(),
            ),
            _ => None,
        }
    }
}

/// Evaluates the condition of an `#if` or `#elseif`, given the tokens after the directive.
///
/// `defined name` is accepted as a spelling of `defined(name)`.
pub fn evaluate_condition(tokens: Vec<Token>, environment: &Environment) -> Option<bool> {
    let mut tokens = tokens;
    let mut index = 0;

    while index + 1 < tokens.len() {
        if tokens[index].value == "defined" && tokens[index + 1].is_any_word() {
            tokens.insert(index + 1, Token::synthetic(TokenKind::ParenOpen, "("));
            tokens.insert(index + 3, Token::synthetic(TokenKind::ParenClose, ")"));
            index += 3;
        }

        index += 1;
    }

    let node = ExpressionParser::parse_tokens(tokens).ok()?;
    let value = ExpressionEvaluator::new(MacroContext::new(environment)).evaluate(&node)?;
    Some(value.to_bool())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Macro;
    use build_native_token::{ScannerOptions, tokenize_text};

    fn condition(environment: &Environment, text: &str) -> Option<bool> {
        evaluate_condition(tokenize_text(text, ScannerOptions::expression()), environment)
    }

    #[test]
    fn names() {
        let environment = Environment::new([
            Macro::new("m1", "true"),
            Macro::new("m2", "false"),
            Macro::new("m3", "1"),
            Macro::new("m4", "0"),
            Macro::new("m5", "0x6"),
        ]);

        assert_eq!(condition(&environment, "m1 && m2"), Some(true));
        assert_eq!(condition(&environment, "m4"), Some(false));
        assert_eq!(condition(&environment, "m5 > m3"), Some(true));
        assert_eq!(condition(&environment, "foo || m4"), Some(false));
        assert_eq!(condition(&environment, "defined m4"), Some(true));
        assert_eq!(condition(&environment, "!defined(foo)"), Some(true));
        assert_eq!(condition(&environment, "1 +"), None);
    }

    #[test]
    fn macro_bodies_are_evaluated() {
        let environment = Environment::new([
            Macro::new("WINVER", "(0x0600)"),
            Macro::new("NTDDI_WINXP", "0x05010000"),
            Macro::new("NTDDI_VERSION", "NTDDI_WINXP"),
            Macro::new("TWICE", "NTDDI_WINXP * 2"),
            Macro::new("MISSING", "NOT_DEFINED"),
            Macro::new("EMPTY", ""),
        ]);

        assert_eq!(condition(&environment, "WINVER >= 0x0501"), Some(true));
        assert_eq!(condition(&environment, "WINVER >= 0x0601"), Some(false));
        assert_eq!(condition(&environment, "NTDDI_VERSION >= 0x05010000"), Some(true));
        assert_eq!(condition(&environment, "NTDDI_VERSION >= 0x06000000"), Some(false));
        assert_eq!(condition(&environment, "TWICE == 0x0A020000"), Some(true));
        assert_eq!(condition(&environment, "MISSING"), Some(true));
        assert_eq!(condition(&environment, "NOT_DEFINED"), Some(false));
        assert_eq!(condition(&environment, "EMPTY"), Some(true));
    }

    #[test]
    fn self_referential_bodies_terminate() {
        let environment = Environment::new([
            Macro::new("SELF", "SELF + 1"),
            Macro::new("PING", "PONG + 1"),
            Macro::new("PONG", "PING + 1"),
        ]);

        assert_eq!(condition(&environment, "SELF == 1"), Some(true));
        assert_eq!(condition(&environment, "PING == 2"), Some(true));
    }

    #[test]
    fn only_first_true_branch_is_taken() {
        let mut stack = ConditionalStack::default();
        let mut evaluated = 0;

        stack.push_if(Location::default(), || true);
        assert!(stack.is_active());

        assert!(
            stack
                .else_if(|| {
                    evaluated += 1;
                    true
                })
                .is_ok()
        );
        assert!(!stack.is_active());
        assert!(stack.else_branch().is_ok());
        assert!(!stack.is_active());
        assert!(stack.end_if().is_ok());
        assert!(stack.is_active());
        assert_eq!(evaluated, 0);
    }

    #[test]
    fn inactive_parents_keep_children_inactive() {
        let mut stack = ConditionalStack::default();
        stack.push_if(Location::default(), || false);
        stack.push_if(Location::default(), || true);
        assert!(!stack.is_active());
        assert!(stack.else_branch().is_ok());
        assert!(!stack.is_active());
        assert!(stack.end_if().is_ok());
        assert!(stack.else_branch().is_ok());
        assert!(stack.is_active());
        assert!(stack.else_branch().is_err());
        assert!(stack.end_if().is_ok());
        assert!(stack.end_if().is_err());
    }
}
