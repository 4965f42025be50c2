//! SQL predicate tree and rendering

use crate::backend::{CaseSensitivity, LikePattern};
use crate::value::{CompareOp, Value};

use super::SqlDialect;

/// Bound parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl From<Value> for SqlParam {
    fn from(value: Value) -> Self {
        match value {
            Value::Text(s) => SqlParam::Text(s),
            Value::Integer(n) => SqlParam::Integer(n),
            Value::Float(n) => SqlParam::Float(n),
            Value::Boolean(b) => SqlParam::Boolean(b),
            Value::Timestamp(ts) => SqlParam::Integer(ts.timestamp_micros()),
        }
    }
}

/// Collects SQL parameters during rendering (maintains insertion order)
#[derive(Debug, Default)]
pub struct SqlParams {
    pub values: Vec<SqlParam>,
}

impl SqlParams {
    /// Append a parameter and return its placeholder
    pub fn push(&mut self, dialect: &dyn SqlDialect, param: SqlParam) -> String {
        self.values.push(param);
        dialect.placeholder(self.values.len())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Backend-neutral SQL predicate
#[derive(Debug, Clone, PartialEq)]
pub enum SqlExpr {
    True,
    False,
    And(Vec<SqlExpr>),
    Or(Vec<SqlExpr>),
    Not(Box<SqlExpr>),
    IsNull(String),
    IsNotNull(String),
    Compare {
        column: String,
        op: CompareOp,
        value: Value,
        case: CaseSensitivity,
    },
    In {
        column: String,
        values: Vec<Value>,
        case: CaseSensitivity,
    },
    Like {
        column: String,
        pattern: LikePattern,
        case: CaseSensitivity,
    },
    Regex {
        column: String,
        pattern: String,
    },
}

impl SqlExpr {
    /// Render as a `WHERE` fragment, appending bound values to `params`
    pub fn to_sql(&self, dialect: &dyn SqlDialect, params: &mut SqlParams) -> String {
        self.to_sql_aliased(dialect, params, "")
    }

    /// Render with every column prefixed by `alias` (e.g. "t" → "t.name")
    pub fn to_sql_aliased(
        &self,
        dialect: &dyn SqlDialect,
        params: &mut SqlParams,
        alias: &str,
    ) -> String {
        let col = |column: &str| {
            if alias.is_empty() {
                column.to_string()
            } else {
                format!("{}.{}", alias, column)
            }
        };

        match self {
            SqlExpr::True => "1=1".to_string(),
            SqlExpr::False => "1=0".to_string(),
            SqlExpr::And(children) => join(children, " AND ", "1=1", dialect, params, alias),
            SqlExpr::Or(children) => join(children, " OR ", "1=0", dialect, params, alias),
            SqlExpr::Not(inner) => format!(
                "NOT ({})",
                inner.to_sql_aliased(dialect, params, alias)
            ),
            SqlExpr::IsNull(column) => format!("{} IS NULL", col(column)),
            SqlExpr::IsNotNull(column) => format!("{} IS NOT NULL", col(column)),
            SqlExpr::Compare {
                column,
                op,
                value,
                case,
            } => {
                let lhs = operand_column(dialect, &col(column), value, *case);
                let rhs = bind(dialect, params, value, *case);
                format!("{} {} {}", lhs, op.as_sql(), rhs)
            }
            SqlExpr::In {
                column,
                values,
                case,
            } => {
                let Some(first) = values.first() else {
                    return "1=0".to_string();
                };
                let lhs = operand_column(dialect, &col(column), first, *case);
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|value| bind(dialect, params, value, *case))
                    .collect();
                format!("{} IN ({})", lhs, placeholders.join(", "))
            }
            SqlExpr::Like {
                column,
                pattern,
                case,
            } => {
                let pattern = match case {
                    CaseSensitivity::Insensitive => pattern.fold_case(|s| dialect.fold_case(s)),
                    CaseSensitivity::Sensitive => pattern.clone(),
                };
                let rendered = dialect.like_pattern(&pattern, *case);
                let placeholder = params.push(dialect, SqlParam::Text(rendered));
                dialect.like(&col(column), &placeholder, *case)
            }
            SqlExpr::Regex { column, pattern } => {
                let placeholder =
                    params.push(dialect, SqlParam::Text(dialect.regex_pattern(pattern)));
                dialect.regex_match(&col(column), &placeholder)
            }
        }
    }
}

fn join(
    children: &[SqlExpr],
    separator: &str,
    empty: &str,
    dialect: &dyn SqlDialect,
    params: &mut SqlParams,
    alias: &str,
) -> String {
    match children {
        [] => empty.to_string(),
        [only] => only.to_sql_aliased(dialect, params, alias),
        _ => {
            let parts: Vec<String> = children
                .iter()
                .map(|child| child.to_sql_aliased(dialect, params, alias))
                .collect();
            format!("({})", parts.join(separator))
        }
    }
}

/// Column expression for a comparison against `value`
fn operand_column(
    dialect: &dyn SqlDialect,
    column: &str,
    value: &Value,
    case: CaseSensitivity,
) -> String {
    if !value.is_text() {
        return column.to_string();
    }
    match case {
        CaseSensitivity::Sensitive => dialect.case_sensitive_column(column),
        CaseSensitivity::Insensitive => dialect.case_insensitive_column(column),
    }
}

/// Bind a value and return the SQL that refers to it
fn bind(
    dialect: &dyn SqlDialect,
    params: &mut SqlParams,
    value: &Value,
    case: CaseSensitivity,
) -> String {
    match value {
        Value::Timestamp(_) => {
            let placeholder = params.push(dialect, value.clone().into());
            dialect.timestamp_param(&placeholder)
        }
        Value::Text(s) if case == CaseSensitivity::Insensitive => {
            params.push(dialect, SqlParam::Text(dialect.fold_case(s)))
        }
        _ => params.push(dialect, value.clone().into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::sql::{ClickhouseDialect, DuckdbDialect, PostgresDialect, SqliteDialect};
    use chrono::{TimeZone, Utc};

    fn compare(column: &str, op: CompareOp, value: impl Into<Value>) -> SqlExpr {
        SqlExpr::Compare {
            column: column.to_string(),
            op,
            value: value.into(),
            case: CaseSensitivity::Insensitive,
        }
    }

    #[test]
    fn test_empty_and_or() {
        let mut params = SqlParams::default();
        assert_eq!(SqlExpr::And(vec![]).to_sql(&SqliteDialect, &mut params), "1=1");
        assert_eq!(SqlExpr::Or(vec![]).to_sql(&SqliteDialect, &mut params), "1=0");
        assert!(params.is_empty());
    }

    #[test]
    fn test_nested_postgres_placeholders() {
        let expr = SqlExpr::Or(vec![
            compare("a", CompareOp::Eq, "x"),
            SqlExpr::Not(Box::new(SqlExpr::And(vec![
                compare("b", CompareOp::Gt, 1),
                SqlExpr::IsNull("c".to_string()),
            ]))),
        ]);
        let mut params = SqlParams::default();
        let sql = expr.to_sql(&PostgresDialect, &mut params);
        assert_eq!(sql, "(LOWER(a) = $1 OR NOT ((b > $2 AND c IS NULL)))");
        assert_eq!(
            params.values,
            vec![SqlParam::Text("x".into()), SqlParam::Integer(1)]
        );
    }

    #[test]
    fn test_alias_prefixes_columns() {
        let expr = SqlExpr::And(vec![
            compare("name", CompareOp::Eq, "x"),
            SqlExpr::IsNotNull("size".to_string()),
        ]);
        let mut params = SqlParams::default();
        assert_eq!(
            expr.to_sql_aliased(&SqliteDialect, &mut params, "t"),
            "(LOWER(t.name) = ? AND t.size IS NOT NULL)"
        );
    }

    #[test]
    fn test_in_list_case_insensitive_lowercases_values() {
        let expr = SqlExpr::In {
            column: "feed".to_string(),
            values: vec!["A".into(), "b".into()],
            case: CaseSensitivity::Insensitive,
        };
        let mut params = SqlParams::default();
        assert_eq!(
            expr.to_sql(&SqliteDialect, &mut params),
            "LOWER(feed) IN (?, ?)"
        );
        assert_eq!(
            params.values,
            vec![SqlParam::Text("a".into()), SqlParam::Text("b".into())]
        );
    }

    #[test]
    fn test_empty_in_matches_nothing() {
        let expr = SqlExpr::In {
            column: "feed".to_string(),
            values: vec![],
            case: CaseSensitivity::Insensitive,
        };
        let mut params = SqlParams::default();
        assert_eq!(expr.to_sql(&SqliteDialect, &mut params), "1=0");
    }

    #[test]
    fn test_insensitive_folding_follows_dialect() {
        let expr = compare("name", CompareOp::Eq, "ÉTÉ");

        let mut params = SqlParams::default();
        assert_eq!(expr.to_sql(&SqliteDialect, &mut params), "LOWER(name) = ?");
        assert_eq!(params.values, vec![SqlParam::Text("ÉtÉ".into())]);

        let mut params = SqlParams::default();
        assert_eq!(expr.to_sql(&PostgresDialect, &mut params), "LOWER(name) = $1");
        assert_eq!(params.values, vec![SqlParam::Text("été".into())]);

        let like = SqlExpr::Like {
            column: "name".to_string(),
            pattern: LikePattern::starts_with("ÉA"),
            case: CaseSensitivity::Insensitive,
        };
        let mut params = SqlParams::default();
        like.to_sql(&SqliteDialect, &mut params);
        assert_eq!(params.values, vec![SqlParam::Text("Éa%".into())]);
    }

    #[test]
    fn test_case_sensitive_compare_sqlite() {
        let expr = SqlExpr::Compare {
            column: "name".to_string(),
            op: CompareOp::Ne,
            value: "Abc".into(),
            case: CaseSensitivity::Sensitive,
        };
        let mut params = SqlParams::default();
        assert_eq!(
            expr.to_sql(&SqliteDialect, &mut params),
            "name COLLATE BINARY <> ?"
        );
    }

    #[test]
    fn test_numeric_compare_ignores_case_policy() {
        let expr = SqlExpr::Compare {
            column: "size".to_string(),
            op: CompareOp::Eq,
            value: Value::Integer(3),
            case: CaseSensitivity::Insensitive,
        };
        let mut params = SqlParams::default();
        assert_eq!(expr.to_sql(&SqliteDialect, &mut params), "size = ?");
    }

    #[test]
    fn test_timestamp_binding() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let expr = compare("created", CompareOp::Gte, ts);

        let mut params = SqlParams::default();
        assert_eq!(
            expr.to_sql(&ClickhouseDialect, &mut params),
            "created >= fromUnixTimestamp64Micro(?)"
        );
        assert_eq!(params.values, vec![SqlParam::Integer(1_704_067_200_000_000)]);

        let mut params = SqlParams::default();
        assert_eq!(
            expr.to_sql(&DuckdbDialect, &mut params),
            "created >= make_timestamp(?)"
        );
    }

    #[test]
    fn test_like_insensitive_lowercases_pattern() {
        let expr = SqlExpr::Like {
            column: "name".to_string(),
            pattern: LikePattern::contains("Foo_1"),
            case: CaseSensitivity::Insensitive,
        };

        let mut params = SqlParams::default();
        assert_eq!(
            expr.to_sql(&PostgresDialect, &mut params),
            "name ILIKE $1 ESCAPE '\\'"
        );
        assert_eq!(params.values, vec![SqlParam::Text("%foo\\_1%".into())]);
    }

    #[test]
    fn test_like_sensitive_sqlite_glob() {
        let expr = SqlExpr::Like {
            column: "name".to_string(),
            pattern: LikePattern::from_wildcard("Te?t*"),
            case: CaseSensitivity::Sensitive,
        };
        let mut params = SqlParams::default();
        assert_eq!(expr.to_sql(&SqliteDialect, &mut params), "name GLOB ?");
        assert_eq!(params.values, vec![SqlParam::Text("Te[?]t*".into())]);
    }

    #[test]
    fn test_regex() {
        let expr = SqlExpr::Regex {
            column: "name".to_string(),
            pattern: "^a.*z$".to_string(),
        };
        let mut params = SqlParams::default();
        assert_eq!(
            expr.to_sql(&DuckdbDialect, &mut params),
            "regexp_matches(name, ?)"
        );
        assert_eq!(params.values, vec![SqlParam::Text("(?i)^a.*z$".into())]);

        let mut params = SqlParams::default();
        assert_eq!(expr.to_sql(&PostgresDialect, &mut params), "name ~* $1");
        assert_eq!(params.values, vec![SqlParam::Text("^a.*z$".into())]);
    }
}
