//! PostgreSQL SQL dialect implementation

use super::SqlDialect;
use crate::backend::CaseSensitivity;

/// PostgreSQL SQL dialect
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn timestamp_param(&self, placeholder: &str) -> String {
        format!("to_timestamp({}::double precision / 1000000)", placeholder)
    }

    fn like(&self, col: &str, placeholder: &str, case: CaseSensitivity) -> String {
        match case {
            CaseSensitivity::Insensitive => format!("{} ILIKE {} ESCAPE '\\'", col, placeholder),
            _ => format!("{} LIKE {} ESCAPE '\\'", col, placeholder),
        }
    }

    fn regex_match(&self, col: &str, placeholder: &str) -> String {
        format!("{} ~* {}", col, placeholder)
    }

    fn regex_pattern(&self, pattern: &str) -> String {
        pattern.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder() {
        let dialect = PostgresDialect;
        assert_eq!(dialect.placeholder(1), "$1");
        assert_eq!(dialect.placeholder(5), "$5");
    }

    #[test]
    fn test_timestamp_param() {
        assert_eq!(
            PostgresDialect.timestamp_param("$2"),
            "to_timestamp($2::double precision / 1000000)"
        );
    }

    #[test]
    fn test_like() {
        let dialect = PostgresDialect;
        assert_eq!(
            dialect.like("name", "$1", CaseSensitivity::Insensitive),
            "name ILIKE $1 ESCAPE '\\'"
        );
        assert_eq!(
            dialect.like("name", "$1", CaseSensitivity::Sensitive),
            "name LIKE $1 ESCAPE '\\'"
        );
    }

    #[test]
    fn test_regex_match() {
        assert_eq!(PostgresDialect.regex_match("name", "$3"), "name ~* $3");
        assert_eq!(PostgresDialect.regex_pattern("^a"), "^a");
    }
}
