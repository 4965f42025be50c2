//! Query field descriptors

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expression::Condition;

/// Data type of a query field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    Text,
    Numeric,
    Date,
    Id,
    DocRef,
    Boolean,
}

impl FieldType {
    /// Conditions a user may apply to a field of this type
    pub fn conditions(&self) -> &'static [Condition] {
        use Condition::*;
        match self {
            FieldType::Text => &[
                Equals,
                NotEquals,
                EqualsCaseSensitive,
                NotEqualsCaseSensitive,
                Contains,
                ContainsCaseSensitive,
                StartsWith,
                StartsWithCaseSensitive,
                EndsWith,
                EndsWithCaseSensitive,
                In,
                InDictionary,
                MatchesRegex,
                IsNull,
                IsNotNull,
            ],
            FieldType::Numeric | FieldType::Date | FieldType::Id => &[
                Equals,
                NotEquals,
                Between,
                GreaterThan,
                GreaterThanOrEqualTo,
                LessThan,
                LessThanOrEqualTo,
                In,
                InDictionary,
                IsNull,
                IsNotNull,
            ],
            FieldType::DocRef => &[
                IsDocRef,
                IsUserRef,
                InFolder,
                Equals,
                NotEquals,
                In,
                IsNull,
                IsNotNull,
            ],
            FieldType::Boolean => &[Equals, NotEquals, IsNull, IsNotNull],
        }
    }

    pub fn supports(&self, condition: Condition) -> bool {
        self.conditions().contains(&condition)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => write!(f, "text"),
            FieldType::Numeric => write!(f, "numeric"),
            FieldType::Date => write!(f, "date"),
            FieldType::Id => write!(f, "id"),
            FieldType::DocRef => write!(f, "doc ref"),
            FieldType::Boolean => write!(f, "boolean"),
        }
    }
}

/// A field that expression terms may refer to by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Doc type of descendants collected by IN_FOLDER (DOC_REF fields only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_ref_type: Option<String>,
}

impl QueryField {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            doc_ref_type: None,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text)
    }

    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Numeric)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date)
    }

    pub fn id(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Id)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub fn doc_ref(name: impl Into<String>, doc_ref_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::DocRef,
            doc_ref_type: Some(doc_ref_type.into()),
        }
    }
}
