//! DuckDB SQL dialect implementation

use super::SqlDialect;
use crate::backend::CaseSensitivity;

/// DuckDB SQL dialect
pub struct DuckdbDialect;

impl SqlDialect for DuckdbDialect {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn timestamp_param(&self, placeholder: &str) -> String {
        format!("make_timestamp({})", placeholder)
    }

    fn like(&self, col: &str, placeholder: &str, case: CaseSensitivity) -> String {
        match case {
            CaseSensitivity::Insensitive => format!("{} ILIKE {} ESCAPE '\\'", col, placeholder),
            _ => format!("{} LIKE {} ESCAPE '\\'", col, placeholder),
        }
    }

    fn regex_match(&self, col: &str, placeholder: &str) -> String {
        format!("regexp_matches({}, {})", col, placeholder)
    }
}
