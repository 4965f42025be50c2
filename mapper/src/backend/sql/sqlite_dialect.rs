//! SQLite SQL dialect implementation

use super::SqlDialect;
use crate::backend::{CaseSensitivity, LikePattern};

/// SQLite SQL dialect
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn timestamp_param(&self, placeholder: &str) -> String {
        // SQLite stores timestamps as integers (microseconds)
        placeholder.to_string()
    }

    fn case_sensitive_column(&self, col: &str) -> String {
        format!("{} COLLATE BINARY", col)
    }

    fn fold_case(&self, value: &str) -> String {
        // Built-in LOWER() only folds ASCII
        value.to_ascii_lowercase()
    }

    fn like(&self, col: &str, placeholder: &str, case: CaseSensitivity) -> String {
        // LIKE ignores ASCII case in SQLite, GLOB never does
        match case {
            CaseSensitivity::Sensitive => format!("{} GLOB {}", col, placeholder),
            CaseSensitivity::Insensitive => format!(
                "{} LIKE {} ESCAPE '\\'",
                self.case_insensitive_column(col),
                placeholder
            ),
        }
    }

    fn like_pattern(&self, pattern: &LikePattern, case: CaseSensitivity) -> String {
        match case {
            CaseSensitivity::Sensitive => pattern.to_glob(),
            CaseSensitivity::Insensitive => pattern.to_like(),
        }
    }

    fn regex_match(&self, col: &str, placeholder: &str) -> String {
        format!("{} REGEXP {}", col, placeholder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder() {
        let dialect = SqliteDialect;
        assert_eq!(dialect.placeholder(1), "?");
        assert_eq!(dialect.placeholder(5), "?");
    }

    #[test]
    fn test_like_by_case() {
        let dialect = SqliteDialect;
        assert_eq!(
            dialect.like("name", "?", CaseSensitivity::Insensitive),
            "LOWER(name) LIKE ? ESCAPE '\\'"
        );
        assert_eq!(
            dialect.like("name", "?", CaseSensitivity::Sensitive),
            "name GLOB ?"
        );
    }

    #[test]
    fn test_sensitive_pattern_uses_glob() {
        let dialect = SqliteDialect;
        let pattern = LikePattern::starts_with("a_b");
        assert_eq!(
            dialect.like_pattern(&pattern, CaseSensitivity::Sensitive),
            "a_b*"
        );
        assert_eq!(
            dialect.like_pattern(&pattern, CaseSensitivity::Insensitive),
            "a\\_b%"
        );
    }

    #[test]
    fn test_fold_case_matches_builtin_lower() {
        assert_eq!(SqliteDialect.fold_case("ÉtÉ ABC"), "ÉtÉ abc");
        assert_eq!(SqliteDialect.regex_pattern("_ev"), "(?i)_ev");
    }

    #[test]
    fn test_case_sensitive_column() {
        assert_eq!(SqliteDialect.case_sensitive_column("name"), "name COLLATE BINARY");
    }
}
