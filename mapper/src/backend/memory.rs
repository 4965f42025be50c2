//! In-memory backend
//!
//! Compiles expressions into [`MemoryPredicate`] trees evaluated directly
//! against an [`AttributeMap`]. Attribute values are text; each comparison
//! parses the attribute as the type of its operand, and an attribute that
//! does not parse never matches.
//!
//! Text comparisons and regex searches ignore case unless the predicate
//! asks for exact matching.
//!
//! A comparison against a missing attribute is unknown, as it is against a
//! NULL column in SQL. Unknown propagates through `AND`, `OR` and `NOT` with
//! SQL's three-valued rules, and a map only matches when the predicate is
//! true, so `NOT (x = 1)` does not match a map without `x`.

use std::cmp::Ordering;
use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use super::{CaseSensitivity, LikePattern, PredicateBackend};
use crate::convert::{BooleanConverter, Converter, parse_timestamp};
use crate::value::{CompareOp, Value};

/// Attribute values keyed by case-insensitive name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: HashMap<String, (String, String)>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, replacing any existing value under the same name
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        self.entries
            .insert(key.to_lowercase(), (key, value.into()))
            .map(|(_, old)| old)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_lowercase())
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries with their original key spelling, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Compiled in-memory predicate
#[derive(Debug, Clone)]
pub enum MemoryPredicate {
    True,
    False,
    And(Vec<MemoryPredicate>),
    Or(Vec<MemoryPredicate>),
    Not(Box<MemoryPredicate>),
    IsNull(String),
    IsNotNull(String),
    Compare {
        attribute: String,
        op: CompareOp,
        value: Value,
        case: CaseSensitivity,
    },
    In {
        attribute: String,
        values: Vec<Value>,
        case: CaseSensitivity,
    },
    /// Wildcard match; `matcher` is `None` when the pattern failed to compile
    Pattern {
        attribute: String,
        pattern: LikePattern,
        matcher: Option<Regex>,
    },
    /// Case-insensitive regex search; `matcher` is `None` when the pattern
    /// failed to compile
    Regex {
        attribute: String,
        pattern: String,
        matcher: Option<Regex>,
    },
}

impl MemoryPredicate {
    pub fn matches(&self, attributes: &AttributeMap) -> bool {
        self.evaluate(attributes) == Some(true)
    }

    /// Three-valued evaluation, `None` when the result is unknown
    pub fn evaluate(&self, attributes: &AttributeMap) -> Option<bool> {
        match self {
            MemoryPredicate::True => Some(true),
            MemoryPredicate::False => Some(false),
            MemoryPredicate::And(children) => {
                let mut result = Some(true);
                for child in children {
                    match child.evaluate(attributes) {
                        Some(false) => return Some(false),
                        None => result = None,
                        Some(true) => {}
                    }
                }
                result
            }
            MemoryPredicate::Or(children) => {
                let mut result = Some(false);
                for child in children {
                    match child.evaluate(attributes) {
                        Some(true) => return Some(true),
                        None => result = None,
                        Some(false) => {}
                    }
                }
                result
            }
            MemoryPredicate::Not(inner) => inner.evaluate(attributes).map(|matched| !matched),
            MemoryPredicate::IsNull(attribute) => Some(attributes.get(attribute).is_none()),
            MemoryPredicate::IsNotNull(attribute) => Some(attributes.get(attribute).is_some()),
            MemoryPredicate::Compare {
                attribute,
                op,
                value,
                case,
            } => {
                let raw = attributes.get(attribute)?;
                let ordering = compare_attribute(raw, value, *case);
                Some(ordering.is_some_and(|ordering| op.matches(ordering)))
            }
            MemoryPredicate::In {
                attribute,
                values,
                case,
            } => {
                let raw = attributes.get(attribute)?;
                Some(
                    values
                        .iter()
                        .any(|value| compare_attribute(raw, value, *case) == Some(Ordering::Equal)),
                )
            }
            MemoryPredicate::Pattern {
                attribute, matcher, ..
            }
            | MemoryPredicate::Regex {
                attribute, matcher, ..
            } => {
                let raw = attributes.get(attribute)?;
                Some(matcher.as_ref().is_some_and(|matcher| matcher.is_match(raw)))
            }
        }
    }
}

/// Order an attribute against an operand, parsing the attribute as the
/// operand's type
fn compare_attribute(raw: &str, value: &Value, case: CaseSensitivity) -> Option<Ordering> {
    let parsed = match value {
        Value::Text(expected) => {
            return Some(if case == CaseSensitivity::Insensitive {
                raw.to_lowercase().cmp(&expected.to_lowercase())
            } else {
                raw.cmp(expected.as_str())
            });
        }
        Value::Integer(_) => match raw.trim().parse::<i64>() {
            Ok(n) => Value::Integer(n),
            Err(_) => Value::Float(raw.trim().parse::<f64>().ok()?),
        },
        Value::Float(_) => Value::Float(raw.trim().parse::<f64>().ok()?),
        Value::Boolean(_) => Value::Boolean(BooleanConverter.convert(raw)?),
        Value::Timestamp(_) => Value::Timestamp(parse_timestamp(raw)?),
    };
    parsed.compare(value)
}

fn build_regex(pattern: &str, case_insensitive: bool) -> Option<Regex> {
    match RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
    {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!(pattern, error = %e, "Invalid regex, predicate matches nothing");
            None
        }
    }
}

/// Backend producing [`MemoryPredicate`] over attribute names
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryBackend;

impl PredicateBackend for MemoryBackend {
    type Field = String;
    type Predicate = MemoryPredicate;

    fn name(&self) -> &'static str {
        "memory"
    }

    fn always_true(&self) -> MemoryPredicate {
        MemoryPredicate::True
    }

    fn always_false(&self) -> MemoryPredicate {
        MemoryPredicate::False
    }

    fn and(&self, mut predicates: Vec<MemoryPredicate>) -> MemoryPredicate {
        if predicates.len() == 1 {
            return predicates.remove(0);
        }
        MemoryPredicate::And(predicates)
    }

    fn or(&self, mut predicates: Vec<MemoryPredicate>) -> MemoryPredicate {
        if predicates.len() == 1 {
            return predicates.remove(0);
        }
        MemoryPredicate::Or(predicates)
    }

    fn not(&self, predicate: MemoryPredicate) -> MemoryPredicate {
        MemoryPredicate::Not(Box::new(predicate))
    }

    fn is_null(&self, attribute: &String) -> MemoryPredicate {
        MemoryPredicate::IsNull(attribute.clone())
    }

    fn is_not_null(&self, attribute: &String) -> MemoryPredicate {
        MemoryPredicate::IsNotNull(attribute.clone())
    }

    fn compare(
        &self,
        attribute: &String,
        op: CompareOp,
        value: Value,
        case: CaseSensitivity,
    ) -> MemoryPredicate {
        MemoryPredicate::Compare {
            attribute: attribute.clone(),
            op,
            value,
            case,
        }
    }

    fn in_list(
        &self,
        attribute: &String,
        values: Vec<Value>,
        case: CaseSensitivity,
    ) -> MemoryPredicate {
        MemoryPredicate::In {
            attribute: attribute.clone(),
            values,
            case,
        }
    }

    fn like(
        &self,
        attribute: &String,
        pattern: LikePattern,
        case: CaseSensitivity,
    ) -> MemoryPredicate {
        let matcher = build_regex(&pattern.to_regex(), case == CaseSensitivity::Insensitive);
        MemoryPredicate::Pattern {
            attribute: attribute.clone(),
            pattern,
            matcher,
        }
    }

    fn regex(&self, attribute: &String, pattern: &str) -> MemoryPredicate {
        MemoryPredicate::Regex {
            attribute: attribute.clone(),
            pattern: pattern.to_string(),
            matcher: build_regex(pattern, true),
        }
    }
}
