//! Expression tree model
//!
//! Immutable AND/OR/NOT trees of field/condition/value terms. Built in code
//! through the constructors on [`ExpressionOperator`] and [`ExpressionTerm`],
//! or decoded from JSON with [`parse_expression`].

mod condition;
mod doc_ref;
mod item;
mod parser;
mod util;

pub use condition::Condition;
pub use doc_ref::DocRef;
pub use item::{ExpressionItem, ExpressionOperator, ExpressionTerm, Op};
pub use parser::parse_expression;
