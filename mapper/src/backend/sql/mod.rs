//! Relational backend
//!
//! Compiles expressions into [`SqlExpr`] trees that render to SQL `WHERE`
//! fragments for different database backends (SQLite, PostgreSQL, DuckDB,
//! ClickHouse). Values never appear in the SQL text; they are collected into
//! [`SqlParams`] in placeholder order.

mod clickhouse_dialect;
mod dialect;
mod duckdb_dialect;
mod expr;
mod postgres_dialect;
mod sqlite_dialect;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use clickhouse_dialect::ClickhouseDialect;
pub use dialect::SqlDialect;
pub use duckdb_dialect::DuckdbDialect;
pub use expr::{SqlExpr, SqlParam, SqlParams};
pub use postgres_dialect::PostgresDialect;
pub use sqlite_dialect::SqliteDialect;

use super::{CaseSensitivity, LikePattern, PredicateBackend};
use crate::value::{CompareOp, Value};

/// SQL dialect identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    Sqlite,
    Postgres,
    Duckdb,
    Clickhouse,
}

impl DialectKind {
    /// Get the SQL dialect for this backend
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            DialectKind::Sqlite => &SqliteDialect,
            DialectKind::Postgres => &PostgresDialect,
            DialectKind::Duckdb => &DuckdbDialect,
            DialectKind::Clickhouse => &ClickhouseDialect,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DialectKind::Sqlite => "sqlite",
            DialectKind::Postgres => "postgres",
            DialectKind::Duckdb => "duckdb",
            DialectKind::Clickhouse => "clickhouse",
        }
    }
}

impl std::fmt::Display for DialectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DialectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "duckdb" => Ok(Self::Duckdb),
            "clickhouse" => Ok(Self::Clickhouse),
            other => Err(format!("unknown SQL dialect: {}", other)),
        }
    }
}

/// Backend producing [`SqlExpr`] over column names
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlBackend;

impl PredicateBackend for SqlBackend {
    type Field = String;
    type Predicate = SqlExpr;

    fn name(&self) -> &'static str {
        "sql"
    }

    fn always_true(&self) -> SqlExpr {
        SqlExpr::True
    }

    fn always_false(&self) -> SqlExpr {
        SqlExpr::False
    }

    fn and(&self, mut predicates: Vec<SqlExpr>) -> SqlExpr {
        if predicates.len() == 1 {
            return predicates.remove(0);
        }
        SqlExpr::And(predicates)
    }

    fn or(&self, mut predicates: Vec<SqlExpr>) -> SqlExpr {
        if predicates.len() == 1 {
            return predicates.remove(0);
        }
        SqlExpr::Or(predicates)
    }

    fn not(&self, predicate: SqlExpr) -> SqlExpr {
        SqlExpr::Not(Box::new(predicate))
    }

    fn is_null(&self, column: &String) -> SqlExpr {
        SqlExpr::IsNull(column.clone())
    }

    fn is_not_null(&self, column: &String) -> SqlExpr {
        SqlExpr::IsNotNull(column.clone())
    }

    fn compare(
        &self,
        column: &String,
        op: CompareOp,
        value: Value,
        case: CaseSensitivity,
    ) -> SqlExpr {
        SqlExpr::Compare {
            column: column.clone(),
            op,
            value,
            case,
        }
    }

    fn in_list(&self, column: &String, values: Vec<Value>, case: CaseSensitivity) -> SqlExpr {
        SqlExpr::In {
            column: column.clone(),
            values,
            case,
        }
    }

    fn like(&self, column: &String, pattern: LikePattern, case: CaseSensitivity) -> SqlExpr {
        SqlExpr::Like {
            column: column.clone(),
            pattern,
            case,
        }
    }

    fn regex(&self, column: &String, pattern: &str) -> SqlExpr {
        SqlExpr::Regex {
            column: column.clone(),
            pattern: pattern.to_string(),
        }
    }
}
