//! Predicate backends
//!
//! The compiler is generic over a [`PredicateBackend`]: it decides what a
//! column reference is and what a compiled predicate looks like. Two
//! backends ship with the crate:
//!
//! - [`sql::SqlBackend`] builds a [`sql::SqlExpr`] that renders to a SQL
//!   `WHERE` fragment with bound parameters
//! - [`memory::MemoryBackend`] builds a [`memory::MemoryPredicate`] that is
//!   evaluated directly against attribute maps

pub mod like;
pub mod memory;
pub mod sql;

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

pub use like::{LikePattern, LikeToken};

use crate::value::{CompareOp, Value};

/// Case handling of a text comparison
///
/// Text compares ignoring case unless a handler or condition asks for exact
/// matching. Both backends fold case the same way, so one expression selects
/// the same rows whichever backend compiles it. Non-text values ignore the
/// policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseSensitivity {
    Sensitive,
    #[default]
    Insensitive,
}

/// Builds predicates of one target representation
pub trait PredicateBackend: Send + Sync {
    /// Backing column or attribute reference
    type Field: Clone + Debug + Send + Sync;
    /// Compiled predicate
    type Predicate;

    fn name(&self) -> &'static str;

    /// Predicate matching everything ("no constraint")
    fn always_true(&self) -> Self::Predicate;

    /// Predicate matching nothing
    fn always_false(&self) -> Self::Predicate;

    fn and(&self, predicates: Vec<Self::Predicate>) -> Self::Predicate;

    fn or(&self, predicates: Vec<Self::Predicate>) -> Self::Predicate;

    fn not(&self, predicate: Self::Predicate) -> Self::Predicate;

    fn is_null(&self, field: &Self::Field) -> Self::Predicate;

    fn is_not_null(&self, field: &Self::Field) -> Self::Predicate;

    fn compare(
        &self,
        field: &Self::Field,
        op: CompareOp,
        value: Value,
        case: CaseSensitivity,
    ) -> Self::Predicate;

    /// Membership of the field value in `values`
    fn in_list(&self, field: &Self::Field, values: Vec<Value>, case: CaseSensitivity)
    -> Self::Predicate;

    fn like(&self, field: &Self::Field, pattern: LikePattern, case: CaseSensitivity)
    -> Self::Predicate;

    /// Regular expression search over the field value
    fn regex(&self, field: &Self::Field, pattern: &str) -> Self::Predicate;

    /// Half-open range `low <= field < high`
    fn range(
        &self,
        field: &Self::Field,
        low: Value,
        high: Value,
        case: CaseSensitivity,
    ) -> Self::Predicate {
        self.and(vec![
            self.compare(field, CompareOp::Gte, low, case),
            self.compare(field, CompareOp::Lt, high, case),
        ])
    }
}
