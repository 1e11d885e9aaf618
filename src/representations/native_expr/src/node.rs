use derive_more::IsVariant;
use native_token::{Token, TokenKind};
use std::fmt::Display;

#[derive(Copy, Clone, Debug, PartialEq, Eq, IsVariant)]
pub enum ExpressionKind {
    // Token is the operator
    BinaryOperation,
    // `-`, operand on the left
    NegativeOperation,
    // `!`, operand on the left
    NegationOperation,
    // Token is the function name, first argument on the left,
    // remaining arguments chained through `List` nodes on the right
    FunctionCall,
    List,
    // Token is the target type, operand on the left
    Cast,
    Leaf,
}

/// Parsed expression, rendered by `Display` as `token (Left: ..)(Right: ..)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpressionNode {
    pub kind: ExpressionKind,
    pub token: Token,
    pub left: Option<Box<ExpressionNode>>,
    pub right: Option<Box<ExpressionNode>>,
    pub parenthesized: bool,
}

impl ExpressionNode {
    pub fn new(kind: ExpressionKind, token: Token) -> Self {
        Self {
            kind,
            token,
            left: None,
            right: None,
            parenthesized: false,
        }
    }

    pub fn leaf(token: Token) -> Self {
        Self::new(ExpressionKind::Leaf, token)
    }

    pub fn boolean_leaf(value: bool) -> Self {
        if value {
            Self::leaf(Token::synthetic(TokenKind::TrueKeyword, "true"))
        } else {
            Self::leaf(Token::synthetic(TokenKind::FalseKeyword, "false"))
        }
    }

    pub fn number_leaf(value: i32) -> Self {
        Self::leaf(Token::synthetic(TokenKind::Number, value.to_string()))
    }

    pub fn unary(kind: ExpressionKind, operator: Token, operand: ExpressionNode) -> Self {
        Self {
            left: Some(Box::new(operand)),
            ..Self::new(kind, operator)
        }
    }

    pub fn binary(operator: Token, left: ExpressionNode, right: ExpressionNode) -> Self {
        Self {
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
            ..Self::new(ExpressionKind::BinaryOperation, operator)
        }
    }

    pub fn left(&self) -> Option<&ExpressionNode> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&ExpressionNode> {
        self.right.as_deref()
    }

    /// Arguments of a function call, in order.
    pub fn arguments(&self) -> Vec<&ExpressionNode> {
        let mut arguments = Vec::new();
        let mut current = Some(self);

        while let Some(node) = current {
            arguments.extend(node.left());
            current = node.right().filter(|right| right.kind.is_list());
        }

        arguments
    }

    /// Visits this node and every node below it, parents before children.
    pub fn walk(&self) -> Vec<&ExpressionNode> {
        let mut nodes = vec![self];
        let mut index = 0;

        while let Some(node) = nodes.get(index).copied() {
            nodes.extend(node.left());
            nodes.extend(node.right());
            index += 1;
        }

        nodes
    }
}

impl Display for ExpressionNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token.value)?;

        if self.left.is_none() && self.right.is_none() {
            return Ok(());
        }

        write!(f, " ")?;

        if let Some(left) = self.left() {
            write!(f, "(Left: {})", left)?;
        }

        if let Some(right) = self.right() {
            write!(f, "(Right: {})", right)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(name: &str) -> ExpressionNode {
        ExpressionNode::leaf(Token::synthetic(TokenKind::Word, name))
    }

    #[test]
    fn display_nests() {
        let sum = ExpressionNode::binary(
            Token::synthetic(TokenKind::OpPlus, "+"),
            ExpressionNode::number_leaf(1),
            ExpressionNode::number_leaf(2),
        );
        let negative = ExpressionNode::unary(
            ExpressionKind::NegativeOperation,
            Token::synthetic(TokenKind::OpMinus, "-"),
            sum,
        );
        assert_eq!(negative.to_string(), "- (Left: + (Left: 1)(Right: 2))");
        assert_eq!(ExpressionNode::boolean_leaf(false).to_string(), "false");
    }

    #[test]
    fn call_arguments_follow_list() {
        let mut list = ExpressionNode::new(
            ExpressionKind::List,
            Token::synthetic(TokenKind::Comma, ","),
        );
        list.left = Some(Box::new(word("b")));

        let mut call = ExpressionNode::new(ExpressionKind::FunctionCall, Token::synthetic(TokenKind::Word, "f"));
        call.left = Some(Box::new(word("a")));
        call.right = Some(Box::new(list));

        let names = call
            .arguments()
            .iter()
            .map(|argument| argument.token.value.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(call.walk().len(), 4);
        assert_eq!(call.to_string(), "f (Left: a)(Right: , (Left: b))");
    }
}
