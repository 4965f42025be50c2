//! Expression tree types
//!
//! JSON form:
//!
//! ```json
//! {"type": "operator", "op": "AND", "children": [
//!     {"type": "term", "field": "Feed", "condition": "EQUALS", "value": "TEST_*"},
//!     {"type": "term", "field": "Status", "condition": "IS_NULL", "enabled": false}
//! ]}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Condition, DocRef};

fn default_enabled() -> bool {
    true
}

fn is_enabled(enabled: &bool) -> bool {
    *enabled
}

/// Boolean operator of an [`ExpressionOperator`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Op {
    #[default]
    And,
    Or,
    Not,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::And => write!(f, "AND"),
            Op::Or => write!(f, "OR"),
            Op::Not => write!(f, "NOT"),
        }
    }
}

/// Node of an expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExpressionItem {
    Operator(ExpressionOperator),
    Term(ExpressionTerm),
}

impl ExpressionItem {
    pub fn enabled(&self) -> bool {
        match self {
            Self::Operator(op) => op.enabled,
            Self::Term(term) => term.enabled,
        }
    }
}

impl From<ExpressionOperator> for ExpressionItem {
    fn from(op: ExpressionOperator) -> Self {
        Self::Operator(op)
    }
}

impl From<ExpressionTerm> for ExpressionItem {
    fn from(term: ExpressionTerm) -> Self {
        Self::Term(term)
    }
}

/// AND / OR / NOT over an ordered list of children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionOperator {
    #[serde(default)]
    pub op: Op,
    #[serde(default)]
    pub children: Vec<ExpressionItem>,
    #[serde(default = "default_enabled", skip_serializing_if = "is_enabled")]
    pub enabled: bool,
}

impl Default for ExpressionOperator {
    fn default() -> Self {
        Self::new(Op::And)
    }
}

impl ExpressionOperator {
    pub fn new(op: Op) -> Self {
        Self {
            op,
            children: Vec::new(),
            enabled: true,
        }
    }

    pub fn and<I: Into<ExpressionItem>>(children: impl IntoIterator<Item = I>) -> Self {
        Self::new(Op::And).with_children(children)
    }

    pub fn or<I: Into<ExpressionItem>>(children: impl IntoIterator<Item = I>) -> Self {
        Self::new(Op::Or).with_children(children)
    }

    pub fn not<I: Into<ExpressionItem>>(children: impl IntoIterator<Item = I>) -> Self {
        Self::new(Op::Not).with_children(children)
    }

    /// Append one child
    pub fn add(mut self, item: impl Into<ExpressionItem>) -> Self {
        self.children.push(item.into());
        self
    }

    fn with_children<I: Into<ExpressionItem>>(
        mut self,
        children: impl IntoIterator<Item = I>,
    ) -> Self {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn enabled_children(&self) -> impl Iterator<Item = &ExpressionItem> {
        self.children.iter().filter(|child| child.enabled())
    }
}

/// Single field / condition / value comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionTerm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_ref: Option<DocRef>,
    #[serde(default = "default_enabled", skip_serializing_if = "is_enabled")]
    pub enabled: bool,
}

impl ExpressionTerm {
    pub fn new(field: impl Into<String>, condition: Condition, value: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            condition: Some(condition),
            value: Some(value.into()),
            doc_ref: None,
            enabled: true,
        }
    }

    /// Term whose operand is a doc ref (IS_DOC_REF, IN_DICTIONARY, IN_FOLDER...)
    pub fn with_doc_ref(field: impl Into<String>, condition: Condition, doc_ref: DocRef) -> Self {
        Self {
            field: Some(field.into()),
            condition: Some(condition),
            value: None,
            doc_ref: Some(doc_ref),
            enabled: true,
        }
    }

    /// Term with no operand (IS_NULL, IS_NOT_NULL)
    pub fn unary(field: impl Into<String>, condition: Condition) -> Self {
        Self {
            field: Some(field.into()),
            condition: Some(condition),
            value: None,
            doc_ref: None,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Raw value, or the empty string when absent
    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

impl fmt::Display for ExpressionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operator(op) => write!(f, "{}", op),
            Self::Term(term) => write!(f, "{}", term),
        }
    }
}

impl fmt::Display for ExpressionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children: Vec<String> = self.enabled_children().map(|c| c.to_string()).collect();
        match (self.op, children.len()) {
            (_, 0) => write!(f, "()"),
            (Op::Not, 1) => write!(f, "NOT {}", children[0]),
            (Op::Not, _) => write!(f, "NOT ({})", children.join(" AND ")),
            (_, 1) => write!(f, "{}", children[0]),
            (op, _) => write!(f, "({})", children.join(&format!(" {} ", op))),
        }
    }
}

impl fmt::Display for ExpressionTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field.as_deref().unwrap_or("?");
        let condition = self.condition.map(|c| c.display_value()).unwrap_or("?");
        match self.condition {
            Some(c) if c.is_unary() => write!(f, "{} {}", field, condition),
            Some(c) if c.uses_doc_ref() => match &self.doc_ref {
                Some(doc_ref) => write!(f, "{} {} {}", field, condition, doc_ref),
                None => write!(f, "{} {} <none>", field, condition),
            },
            _ => write!(f, "{} {} {}", field, condition, self.value_str()),
        }
    }
}
