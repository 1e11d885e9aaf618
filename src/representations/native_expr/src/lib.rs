mod literal;
mod node;
mod number;
mod value;

pub use literal::{character_literal_value, string_literal_value};
pub use node::{ExpressionKind, ExpressionNode};
pub use number::Number;
pub use value::ExpressionValue;
