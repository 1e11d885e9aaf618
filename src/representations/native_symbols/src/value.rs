use crate::SymbolRef;
use build_native_expr::ExpressionParser;
use derive_more::{Display, IsVariant};
use native_expr::{ExpressionKind, ExpressionNode, ExpressionValue, Number};
use native_token::TokenKind;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, IsVariant)]
pub enum NativeValueKind {
    Number,
    String,
    Character,
    Boolean,
    SymbolValue,
    SymbolType,
}

/// Leaf of a value expression.
///
/// Literals are resolved as soon as they are read. Names start out unbound
/// and are bound by resolution.
#[derive(Clone, Debug, PartialEq, IsVariant)]
pub enum NativeValue {
    Number(Number),
    String(String),
    Character(char),
    Boolean(bool),
    SymbolValue(Option<SymbolRef>),
    SymbolType(Option<SymbolRef>),
}

impl NativeValue {
    pub fn kind(&self) -> NativeValueKind {
        match self {
            Self::Number(_) => NativeValueKind::Number,
            Self::String(_) => NativeValueKind::String,
            Self::Character(_) => NativeValueKind::Character,
            Self::Boolean(_) => NativeValueKind::Boolean,
            Self::SymbolValue(_) => NativeValueKind::SymbolValue,
            Self::SymbolType(_) => NativeValueKind::SymbolType,
        }
    }

    pub fn is_resolved(&self) -> bool {
        match self {
            Self::SymbolValue(symbol) | Self::SymbolType(symbol) => symbol.is_some(),
            _ => true,
        }
    }

    pub fn bound(&self) -> Option<SymbolRef> {
        match self {
            Self::SymbolValue(symbol) | Self::SymbolType(symbol) => *symbol,
            _ => None,
        }
    }

    pub(crate) fn bound_mut(&mut self) -> Option<&mut Option<SymbolRef>> {
        match self {
            Self::SymbolValue(symbol) | Self::SymbolType(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// Value written in the source, when it is a literal.
    pub fn literal_text(&self) -> Option<String> {
        match self {
            Self::Number(number) => Some(number.to_string()),
            Self::String(value) => Some(value.clone()),
            Self::Character(value) => Some(value.to_string()),
            Self::Boolean(value) => Some(value.to_string()),
            Self::SymbolValue(_) | Self::SymbolType(_) => None,
        }
    }
}

impl From<ExpressionValue> for NativeValue {
    fn from(value: ExpressionValue) -> Self {
        match value {
            ExpressionValue::Number(number) => Self::Number(number),
            ExpressionValue::Character(c) => Self::Character(c),
            ExpressionValue::Boolean(b) => Self::Boolean(b),
            ExpressionValue::String(s) => Self::String(s),
        }
    }
}

/// The text of an expression together with the leaves read out of it.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueExpression {
    pub expression: String,
    pub values: Vec<SymbolRef>,
    pub is_parsable: bool,
}

/// Reads the leaves of an expression, each with the name its symbol gets.
///
/// Returns `None` when the text is not an expression, or when one of its
/// leaves is neither a literal nor a name.
pub(crate) fn read_values(expression: &str) -> Option<Vec<(String, NativeValue)>> {
    if expression.trim().is_empty() {
        return Some(Vec::new());
    }

    let node = ExpressionParser::parse(expression).ok()?;
    let mut values = Vec::new();
    read_node(&node, &mut values)?;
    Some(values)
}

fn read_node(node: &ExpressionNode, values: &mut Vec<(String, NativeValue)>) -> Option<()> {
    match node.kind {
        ExpressionKind::Leaf => {
            let value = if let Some(literal) = ExpressionValue::from_literal(&node.token) {
                NativeValue::from(literal)
            } else if node.token.kind == TokenKind::Word {
                values.push((node.token.value.clone(), NativeValue::SymbolValue(None)));
                return Some(());
            } else {
                return None;
            };

            values.push((value.kind().to_string(), value));
        }
        ExpressionKind::Cast => {
            values.push((node.token.value.clone(), NativeValue::SymbolType(None)));
        }
        _ => (),
    }

    if let Some(left) = node.left() {
        read_node(left, values)?;
    }

    if let Some(right) = node.right() {
        read_node(right, values)?;
    }

    Some(())
}
