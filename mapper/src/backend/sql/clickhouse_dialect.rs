//! ClickHouse SQL dialect implementation

use super::SqlDialect;
use crate::backend::CaseSensitivity;

/// ClickHouse SQL dialect
pub struct ClickhouseDialect;

impl SqlDialect for ClickhouseDialect {
    fn name(&self) -> &'static str {
        "clickhouse"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn timestamp_param(&self, placeholder: &str) -> String {
        format!("fromUnixTimestamp64Micro({})", placeholder)
    }

    fn case_insensitive_column(&self, col: &str) -> String {
        format!("lowerUTF8({})", col)
    }

    fn like(&self, col: &str, placeholder: &str, case: CaseSensitivity) -> String {
        match case {
            CaseSensitivity::Insensitive => format!("ilike({}, {})", col, placeholder),
            _ => format!("like({}, {})", col, placeholder),
        }
    }

    fn regex_match(&self, col: &str, placeholder: &str) -> String {
        format!("match({}, {})", col, placeholder)
    }
}
