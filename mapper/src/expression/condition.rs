//! Term conditions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Comparison applied by a single expression term
///
/// Serialized in SCREAMING_SNAKE_CASE (`"EQUALS"`, `"IN_DICTIONARY"`).
/// Names this build does not know decode to [`Condition::Unknown`], which
/// fails at compile time rather than at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
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
    Between,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    In,
    InDictionary,
    InFolder,
    IsDocRef,
    IsUserRef,
    IsNull,
    IsNotNull,
    MatchesRegex,
    #[serde(other)]
    Unknown,
}

impl Condition {
    /// Short human-readable operator used when displaying expressions
    pub fn display_value(&self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::EqualsCaseSensitive => "==",
            Self::NotEqualsCaseSensitive => "!==",
            Self::Contains => "contains",
            Self::ContainsCaseSensitive => "contains (case sensitive)",
            Self::StartsWith => "starts with",
            Self::StartsWithCaseSensitive => "starts with (case sensitive)",
            Self::EndsWith => "ends with",
            Self::EndsWithCaseSensitive => "ends with (case sensitive)",
            Self::Between => "between",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqualTo => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqualTo => "<=",
            Self::In => "in",
            Self::InDictionary => "in dictionary",
            Self::InFolder => "in folder",
            Self::IsDocRef => "is",
            Self::IsUserRef => "is user",
            Self::IsNull => "is null",
            Self::IsNotNull => "is not null",
            Self::MatchesRegex => "matches regex",
            Self::Unknown => "unknown",
        }
    }

    /// Conditions that take their operand from the term's doc ref, not its value
    pub fn uses_doc_ref(&self) -> bool {
        matches!(
            self,
            Self::InDictionary | Self::InFolder | Self::IsDocRef | Self::IsUserRef
        )
    }

    /// Conditions that ignore the term value entirely
    pub fn is_unary(&self) -> bool {
        matches!(self, Self::IsNull | Self::IsNotNull)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Condition::GreaterThanOrEqualTo).unwrap();
        assert_eq!(json, "\"GREATER_THAN_OR_EQUAL_TO\"");

        let condition: Condition = serde_json::from_str("\"IN_DICTIONARY\"").unwrap();
        assert_eq!(condition, Condition::InDictionary);

        let condition: Condition = serde_json::from_str("\"EQUALS_CASE_SENSITIVE\"").unwrap();
        assert_eq!(condition, Condition::EqualsCaseSensitive);
    }

    #[test]
    fn test_unrecognised_name_decodes_to_unknown() {
        let condition: Condition = serde_json::from_str("\"OF_DOC_REF\"").unwrap();
        assert_eq!(condition, Condition::Unknown);
    }

    #[test]
    fn test_display() {
        assert_eq!(Condition::Equals.to_string(), "=");
        assert_eq!(Condition::InFolder.to_string(), "in folder");
    }

    #[test]
    fn test_uses_doc_ref() {
        assert!(Condition::IsDocRef.uses_doc_ref());
        assert!(Condition::InDictionary.uses_doc_ref());
        assert!(!Condition::In.uses_doc_ref());
    }
}
