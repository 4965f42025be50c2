//! SQL dialect trait for multi-database support
//!
//! This trait defines the interface for generating database-specific
//! predicate syntax.

use crate::backend::{CaseSensitivity, LikePattern};

/// SQL dialect trait for generating database-specific SQL
///
/// Different databases have different syntax for:
/// - Parameter placeholders (? vs $1)
/// - Timestamp parameters
/// - Case-sensitive and case-insensitive pattern matching
/// - Regular expression matching
pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Generate a parameter placeholder for the given index (1-based)
    ///
    /// - SQLite/DuckDB/ClickHouse: Always returns "?"
    /// - PostgreSQL: Returns "$1", "$2", etc.
    fn placeholder(&self, index: usize) -> String;

    /// Wrap a placeholder bound to microseconds since epoch so it compares
    /// against a timestamp column
    ///
    /// - SQLite: `?` (timestamps stored as integer microseconds)
    /// - PostgreSQL: `to_timestamp($1::double precision / 1000000)`
    /// - DuckDB: `make_timestamp(?)`
    /// - ClickHouse: `fromUnixTimestamp64Micro(?)`
    fn timestamp_param(&self, placeholder: &str) -> String;

    /// Column expression compared byte-for-byte
    fn case_sensitive_column(&self, col: &str) -> String {
        col.to_string()
    }

    /// Column expression compared ignoring case (against a lowercased value)
    fn case_insensitive_column(&self, col: &str) -> String {
        format!("LOWER({})", col)
    }

    /// Lowercase a bound value the way [`SqlDialect::case_insensitive_column`]
    /// lowercases the column
    fn fold_case(&self, value: &str) -> String {
        value.to_lowercase()
    }

    /// Pattern match of a column against a bound pattern
    fn like(&self, col: &str, placeholder: &str, case: CaseSensitivity) -> String;

    /// Render the bound pattern value for [`SqlDialect::like`]
    fn like_pattern(&self, pattern: &LikePattern, _case: CaseSensitivity) -> String {
        pattern.to_like()
    }

    /// Case-insensitive regular expression search of a column against a
    /// bound pattern
    ///
    /// - SQLite: `col REGEXP ?` (needs a user-defined `regexp` function)
    /// - PostgreSQL: `col ~* $1`
    /// - DuckDB: `regexp_matches(col, ?)`
    /// - ClickHouse: `match(col, ?)`
    fn regex_match(&self, col: &str, placeholder: &str) -> String;

    /// Render the bound pattern value for [`SqlDialect::regex_match`]
    fn regex_pattern(&self, pattern: &str) -> String {
        format!("(?i){}", pattern)
    }
}
