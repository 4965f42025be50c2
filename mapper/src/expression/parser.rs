//! Expression JSON decoding
//!
//! Decodes an already-structured expression tree from its JSON wire form
//! with size limits applied.

use crate::constants::{MAX_EXPRESSION_ITEMS, MAX_EXPRESSION_JSON_SIZE};
use crate::error::MapperError;

use super::ExpressionItem;

/// Parse an expression tree from JSON
///
/// Validates JSON size, decodes the tree, then checks the item count.
pub fn parse_expression(json_str: &str) -> Result<ExpressionItem, MapperError> {
    if json_str.len() > MAX_EXPRESSION_JSON_SIZE {
        return Err(MapperError::ExpressionTooLarge {
            limit: MAX_EXPRESSION_JSON_SIZE,
        });
    }

    let item: ExpressionItem = serde_json::from_str(json_str)?;

    let count = item.item_count();
    if count > MAX_EXPRESSION_ITEMS {
        return Err(MapperError::TooManyItems {
            count,
            limit: MAX_EXPRESSION_ITEMS,
        });
    }

    tracing::trace!(items = count, "Parsed expression");
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{Condition, Op};

    #[test]
    fn parse_expression_valid_json() {
        let json = r#"{"type": "operator", "op": "AND", "children": [
            {"type": "term", "field": "Feed", "condition": "EQUALS", "value": "abc"}
        ]}"#;
        let item = parse_expression(json).unwrap();
        let ExpressionItem::Operator(op) = item else {
            panic!("expected operator");
        };
        assert_eq!(op.op, Op::And);
        assert_eq!(op.children.len(), 1);
    }

    #[test]
    fn parse_expression_bare_term() {
        let json = r#"{"type": "term", "field": "Size", "condition": "BETWEEN", "value": "1,10"}"#;
        let item = parse_expression(json).unwrap();
        let ExpressionItem::Term(term) = item else {
            panic!("expected term");
        };
        assert_eq!(term.condition, Some(Condition::Between));
    }

    #[test]
    fn parse_expression_invalid_json() {
        let result = parse_expression("not valid json");
        assert!(matches!(result, Err(MapperError::InvalidJson(_))));
    }

    #[test]
    fn parse_expression_unknown_item_type() {
        let result = parse_expression(r#"{"type": "function", "name": "x"}"#);
        assert!(matches!(result, Err(MapperError::InvalidJson(_))));
    }

    #[test]
    fn parse_expression_too_large() {
        let value = "x".repeat(MAX_EXPRESSION_JSON_SIZE);
        let json = format!(
            r#"{{"type": "term", "field": "Feed", "condition": "EQUALS", "value": "{}"}}"#,
            value
        );
        let result = parse_expression(&json);
        assert!(matches!(result, Err(MapperError::ExpressionTooLarge { .. })));
    }

    #[test]
    fn parse_expression_too_many_items() {
        let term = r#"{"type": "term", "field": "F", "condition": "IS_NULL"}"#;
        let children = vec![term; MAX_EXPRESSION_ITEMS].join(",");
        let json = format!(r#"{{"type": "operator", "children": [{}]}}"#, children);
        let result = parse_expression(&json);
        assert!(matches!(
            result,
            Err(MapperError::TooManyItems { count, .. }) if count == MAX_EXPRESSION_ITEMS + 1
        ));
    }
}
