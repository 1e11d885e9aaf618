use crate::{Number, character_literal_value, string_literal_value};
use derive_more::{From, IsVariant, Unwrap};
use native_token::{Token, TokenKind};
use std::{cmp::Ordering, fmt::Display};

/// Result of evaluating an expression.
///
/// Characters and booleans take part in arithmetic as 32-bit integers.
#[derive(Clone, Debug, PartialEq, From, IsVariant, Unwrap)]
pub enum ExpressionValue {
    Number(Number),
    Character(char),
    Boolean(bool),
    String(String),
}

impl ExpressionValue {
    /// Value of a literal token, or `None` for anything that is not a literal.
    pub fn from_literal(token: &Token) -> Option<Self> {
        match token.kind {
            TokenKind::Number | TokenKind::HexNumber => {
                Number::parse_literal(&token.value).map(Self::Number)
            }
            TokenKind::TrueKeyword => Some(Self::Boolean(true)),
            TokenKind::FalseKeyword => Some(Self::Boolean(false)),
            TokenKind::CharacterAnsi | TokenKind::CharacterUnicode => {
                character_literal_value(&token.value).map(Self::Character)
            }
            TokenKind::QuotedStringAnsi | TokenKind::QuotedStringUnicode => {
                string_literal_value(&token.value).map(|value| Self::String(value.into()))
            }
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Character(c) => i32::try_from(u32::from(*c)).ok().map(Number::Int32),
            Self::Boolean(value) => Some(Number::Int32(i32::from(*value))),
            Self::String(_) => None,
        }
    }

    pub fn to_bool(&self) -> bool {
        match self {
            Self::Number(number) => !number.is_zero(),
            Self::Character(c) => *c != '\0',
            Self::Boolean(value) => *value,
            Self::String(value) => !value.is_empty(),
        }
    }

    fn arithmetic(
        &self,
        other: &Self,
        integer: impl Fn(i64, i64) -> Option<i64>,
        floating: impl Fn(f64, f64) -> Option<f64>,
    ) -> Option<Self> {
        self.as_number()?
            .combine(other.as_number()?, integer, floating)
            .map(Self::Number)
    }

    pub fn add(&self, other: &Self) -> Option<Self> {
        self.arithmetic(other, |a, b| Some(a.wrapping_add(b)), |a, b| Some(a + b))
    }

    pub fn subtract(&self, other: &Self) -> Option<Self> {
        self.arithmetic(other, |a, b| Some(a.wrapping_sub(b)), |a, b| Some(a - b))
    }

    pub fn multiply(&self, other: &Self) -> Option<Self> {
        self.arithmetic(other, |a, b| Some(a.wrapping_mul(b)), |a, b| Some(a * b))
    }

    /// Truncating division; fails on a zero divisor.
    pub fn divide(&self, other: &Self) -> Option<Self> {
        self.arithmetic(
            other,
            |a, b| a.checked_div(b),
            |a, b| (b != 0.0).then(|| a / b),
        )
    }

    pub fn modulus(&self, other: &Self) -> Option<Self> {
        self.arithmetic(
            other,
            |a, b| a.checked_rem(b),
            |a, b| (b != 0.0).then(|| a % b),
        )
    }

    pub fn bit_and(&self, other: &Self) -> Option<Self> {
        self.bitwise(other, |a, b| a & b)
    }

    pub fn bit_or(&self, other: &Self) -> Option<Self> {
        self.bitwise(other, |a, b| a | b)
    }

    fn bitwise(&self, other: &Self, operation: impl Fn(i64, i64) -> i64) -> Option<Self> {
        let (left, right) = (self.as_number()?, other.as_number()?);

        if left.is_floating_point() || right.is_floating_point() {
            return None;
        }

        self.arithmetic(other, |a, b| Some(operation(a, b)), |_, _| None)
    }

    pub fn shift_left(&self, other: &Self) -> Option<Self> {
        self.shift(other, true)
    }

    pub fn shift_right(&self, other: &Self) -> Option<Self> {
        self.shift(other, false)
    }

    fn shift(&self, other: &Self, left: bool) -> Option<Self> {
        let amount = other.as_number()?.as_i64()?;
        self.as_number()?.shift(amount, left).map(Self::Number)
    }

    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::String(left), Self::String(right)) => Some(left.cmp(right)),
            _ => self.as_number()?.compare(&other.as_number()?),
        }
    }

    /// Equality by value, so `1` equals `1L` and `'a'` equals `97`.
    pub fn equals(&self, other: &Self) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }

    pub fn negative(&self) -> Option<Self> {
        Some(Self::Number(self.as_number()?.negate()))
    }

    pub fn logical_not(&self) -> Self {
        Self::Boolean(!self.to_bool())
    }
}

impl Display for ExpressionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{}", number),
            Self::Character(c) => write!(f, "{}", c),
            Self::Boolean(value) => write!(f, "{}", value),
            Self::String(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: i32) -> ExpressionValue {
        ExpressionValue::Number(Number::Int32(value))
    }

    #[test]
    fn arithmetic_on_characters() {
        let c = ExpressionValue::Character('a');
        assert_eq!(c.add(&int(1)), Some(int(98)));
        assert!(c.equals(&int(97)));
    }

    #[test]
    fn division_by_zero_fails() {
        assert_eq!(int(1).divide(&int(0)), None);
        assert_eq!(int(1).modulus(&int(0)), None);
        assert_eq!(int(7).modulus(&int(3)), Some(int(1)));
    }

    #[test]
    fn bitwise_requires_integers() {
        assert_eq!(int(6).bit_and(&int(3)), Some(int(2)));
        assert_eq!(int(6).bit_or(&int(3)), Some(int(7)));
        assert_eq!(
            int(6).bit_or(&ExpressionValue::Number(Number::Double(1.0))),
            None
        );
    }

    #[test]
    fn mixed_equality() {
        assert!(int(1).equals(&ExpressionValue::Number(Number::Int64(1))));
        assert!(!int(1).equals(&ExpressionValue::String("1".into())));
        assert!(ExpressionValue::String("a".into()).equals(&ExpressionValue::String("a".into())));
        assert_eq!(ExpressionValue::Boolean(true).logical_not(), ExpressionValue::Boolean(false));
    }

    #[test]
    fn literals() {
        let token = Token::synthetic(TokenKind::QuotedStringUnicode, "L\"hi\"");
        assert_eq!(
            ExpressionValue::from_literal(&token),
            Some(ExpressionValue::String("hi".into()))
        );

        let token = Token::synthetic(TokenKind::Word, "foo");
        assert_eq!(ExpressionValue::from_literal(&token), None);
    }
}
