mod error;
mod evaluate;
mod parse;

pub use error::{ExpressionError, ExpressionErrorKind};
pub use evaluate::{EvaluationContext, ExpressionEvaluator, LiteralsOnly, evaluate};
pub use parse::ExpressionParser;
