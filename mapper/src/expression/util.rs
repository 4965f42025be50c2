//! Structural helpers over expression trees

use crate::error::MapperError;
use crate::field::QueryField;

use super::{ExpressionItem, ExpressionTerm};

impl ExpressionItem {
    /// Enabled terms in depth-first order, skipping disabled subtrees
    pub fn terms(&self) -> Vec<&ExpressionTerm> {
        let mut terms = Vec::new();
        collect_terms(self, &mut terms);
        terms
    }

    /// Distinct field names of enabled terms, in first-seen order
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for term in self.terms() {
            if let Some(field) = term.field.as_deref()
                && !fields.contains(&field)
            {
                fields.push(field);
            }
        }
        fields
    }

    /// Total number of items, enabled or not
    pub fn item_count(&self) -> usize {
        match self {
            ExpressionItem::Term(_) => 1,
            ExpressionItem::Operator(op) => {
                1 + op.children.iter().map(|c| c.item_count()).sum::<usize>()
            }
        }
    }

    /// Nesting depth, a lone term has depth 0
    pub fn depth(&self) -> usize {
        match self {
            ExpressionItem::Term(_) => 0,
            ExpressionItem::Operator(op) => op
                .children
                .iter()
                .map(|c| c.depth() + 1)
                .max()
                .unwrap_or(0),
        }
    }

    /// Validate enabled terms against a whitelist of fields
    ///
    /// Rejects terms on unknown fields and conditions the field type does not
    /// support. Compilation does not require this; it is for callers that
    /// accept expressions from users and want to report mistakes early.
    pub fn validate(&self, allowed_fields: &[QueryField]) -> Result<(), MapperError> {
        for term in self.terms() {
            let Some(name) = term.field.as_deref().filter(|f| !f.is_empty()) else {
                return Err(MapperError::MissingField);
            };
            let Some(condition) = term.condition else {
                return Err(MapperError::MissingCondition {
                    field: name.to_string(),
                });
            };
            let Some(field) = allowed_fields.iter().find(|f| f.name == name) else {
                return Err(MapperError::invalid_term(name, "unknown field"));
            };
            if !field.field_type.supports(condition) {
                return Err(MapperError::invalid_term(
                    name,
                    format!(
                        "condition '{}' cannot be used with a {} field",
                        condition, field.field_type
                    ),
                ));
            }
            if condition.uses_doc_ref() && term.doc_ref.is_none() {
                return Err(MapperError::invalid_term(
                    name,
                    format!("condition '{}' needs a doc ref", condition),
                ));
            }
        }
        Ok(())
    }
}

fn collect_terms<'a>(item: &'a ExpressionItem, terms: &mut Vec<&'a ExpressionTerm>) {
    if !item.enabled() {
        return;
    }
    match item {
        ExpressionItem::Term(term) => terms.push(term),
        ExpressionItem::Operator(op) => {
            for child in &op.children {
                collect_terms(child, terms);
            }
        }
    }
}
