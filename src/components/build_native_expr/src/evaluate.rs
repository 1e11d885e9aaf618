use crate::ExpressionParser;
use native_expr::{ExpressionKind, ExpressionNode, ExpressionValue};
use native_token::TokenKind;

/// Supplies the meaning of names during evaluation.
///
/// Literals and operators are handled by the evaluator itself; anything that
/// depends on surrounding state, like macros or `defined(..)`, goes through here.
pub trait EvaluationContext {
    fn identifier(&mut self, _name: &str) -> Option<ExpressionValue> {
        None
    }

    fn function_call(
        &mut self,
        _name: &str,
        _arguments: &[&ExpressionNode],
    ) -> Option<ExpressionValue> {
        None
    }
}

/// Context in which no name has a value.
#[derive(Copy, Clone, Debug, Default)]
pub struct LiteralsOnly;

impl EvaluationContext for LiteralsOnly {}

pub struct ExpressionEvaluator<C: EvaluationContext> {
    context: C,
}

impl<C: EvaluationContext> ExpressionEvaluator<C> {
    pub fn new(context: C) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    pub fn evaluate_text(&mut self, text: &str) -> Option<ExpressionValue> {
        let node = ExpressionParser::parse(text).ok()?;
        self.evaluate(&node)
    }

    /// Evaluates a parsed expression, or `None` if some part of it has no value.
    ///
    /// Both sides of `&&` and `||` are always evaluated.
    pub fn evaluate(&mut self, node: &ExpressionNode) -> Option<ExpressionValue> {
        match node.kind {
            ExpressionKind::Leaf => self.evaluate_leaf(node),
            ExpressionKind::BinaryOperation => {
                let left = self.evaluate(node.left()?)?;
                let right = self.evaluate(node.right()?)?;
                Self::evaluate_binary(node.token.kind, left, right)
            }
            ExpressionKind::NegativeOperation => self.evaluate(node.left()?)?.negative(),
            ExpressionKind::NegationOperation => Some(self.evaluate(node.left()?)?.logical_not()),
            ExpressionKind::Cast => self.evaluate(node.left()?),
            ExpressionKind::FunctionCall => {
                let arguments = node.arguments();
                self.context.function_call(&node.token.value, &arguments)
            }
            ExpressionKind::List => None,
        }
    }

    fn evaluate_leaf(&mut self, node: &ExpressionNode) -> Option<ExpressionValue> {
        if let Some(value) = ExpressionValue::from_literal(&node.token) {
            return Some(value);
        }

        if node.token.is_any_word() {
            return self.context.identifier(&node.token.value);
        }

        None
    }

    fn evaluate_binary(
        operator: TokenKind,
        left: ExpressionValue,
        right: ExpressionValue,
    ) -> Option<ExpressionValue> {
        use std::cmp::Ordering::*;

        let compare = |accept: &[std::cmp::Ordering]| {
            left.compare(&right)
                .map(|ordering| ExpressionValue::Boolean(accept.contains(&ordering)))
        };

        match operator {
            TokenKind::OpPlus => left.add(&right),
            TokenKind::OpMinus => left.subtract(&right),
            TokenKind::Asterisk => left.multiply(&right),
            TokenKind::OpDivide => left.divide(&right),
            TokenKind::OpModulus => left.modulus(&right),
            TokenKind::OpShiftLeft => left.shift_left(&right),
            TokenKind::OpShiftRight => left.shift_right(&right),
            TokenKind::Ampersand => left.bit_and(&right),
            TokenKind::Pipe => left.bit_or(&right),
            TokenKind::OpGreaterThan => compare(&[Greater]),
            TokenKind::OpGreaterThanOrEqual => compare(&[Greater, Equal]),
            TokenKind::OpLessThan => compare(&[Less]),
            TokenKind::OpLessThanOrEqual => compare(&[Less, Equal]),
            TokenKind::OpEquals => Some(ExpressionValue::Boolean(left.equals(&right))),
            TokenKind::OpNotEquals => Some(ExpressionValue::Boolean(!left.equals(&right))),
            TokenKind::OpBoolAnd => Some(ExpressionValue::Boolean(left.to_bool() && right.to_bool())),
            TokenKind::OpBoolOr => Some(ExpressionValue::Boolean(left.to_bool() || right.to_bool())),
            TokenKind::OpAssign => Some(right.clone()),
            _ => None,
        }
    }
}

/// Evaluates an expression made only of literals.
pub fn evaluate(text: &str) -> Option<ExpressionValue> {
    ExpressionEvaluator::new(LiteralsOnly).evaluate_text(text)
}
