//! Executes compiled SQL against SQLite and checks it selects the same rows
//! the in-memory evaluator matches.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use exprmap::backend::memory::{AttributeMap, MemoryBackend};
use exprmap::backend::sql::{SqlBackend, SqlParam, SqlParams, SqliteDialect};
use exprmap::convert::{DateConverter, IntegerConverter, TextConverter, parse_timestamp};
use exprmap::expression::{Condition, ExpressionItem, ExpressionOperator, ExpressionTerm};
use exprmap::resolve::{Collaborators, Dictionary, DictionaryStore};
use exprmap::{
    CaseSensitivity, ExpressionMapper, MapperConfig, PredicateBackend, QueryField, TermHandler,
};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

struct Row {
    id: i64,
    feed: &'static str,
    size: i64,
    created: &'static str,
    status: Option<&'static str>,
}

const ROWS: &[Row] = &[
    Row { id: 1, feed: "TEST_EVENTS", size: 10, created: "2024-01-01T00:00:00Z", status: Some("active") },
    Row { id: 2, feed: "test_raw", size: 25, created: "2024-01-05T00:00:00Z", status: None },
    Row { id: 3, feed: "PROD_EVENTS", size: 5, created: "2024-02-01T00:00:00Z", status: Some("archived") },
    Row { id: 4, feed: "Dev_Logs", size: 100, created: "2023-12-31T23:00:00Z", status: Some("active") },
    Row { id: 5, feed: "TEST_METRICS", size: 42, created: "2024-01-15T12:00:00Z", status: None },
];

async fn setup_pool() -> SqlitePool {
    // Single connection for :memory: to ensure shared state
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::query(
        "CREATE TABLE events (
            id INTEGER PRIMARY KEY,
            feed TEXT NOT NULL,
            size INTEGER NOT NULL,
            created INTEGER NOT NULL,
            status TEXT
        )",
    )
    .execute(&pool)
    .await
    .unwrap();

    for row in ROWS {
        let created = parse_timestamp(row.created).unwrap().timestamp_micros();
        sqlx::query("INSERT INTO events (id, feed, size, created, status) VALUES (?, ?, ?, ?, ?)")
            .bind(row.id)
            .bind(row.feed)
            .bind(row.size)
            .bind(created)
            .bind(row.status)
            .execute(&pool)
            .await
            .unwrap();
    }
    pool
}

fn attribute_maps() -> Vec<(i64, AttributeMap)> {
    ROWS.iter()
        .map(|row| {
            let mut map = AttributeMap::new()
                .with("feed", row.feed)
                .with("size", row.size.to_string())
                .with("created", row.created);
            if let Some(status) = row.status {
                map.insert("status", status);
            }
            (row.id, map)
        })
        .collect()
}

fn mapper<B>(backend: B) -> ExpressionMapper<B>
where
    B: PredicateBackend<Field = String>,
{
    let mut store = DictionaryStore::new();
    let dictionary = Dictionary::new("Feeds", "TEST_EVENTS\nprod_events\n");
    let mut dictionary_ref = dictionary.doc_ref.clone();
    dictionary_ref.uuid = Some("feeds".to_string());
    store.add(Dictionary {
        doc_ref: dictionary_ref,
        ..dictionary
    });

    let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let mut mapper = ExpressionMapper::new(backend)
        .with_collaborators(Collaborators::new().with_word_lists(Arc::new(store)));
    mapper
        .register_handler(QueryField::text("Feed"), "feed".to_string(), TextConverter, false)
        .register(
            TermHandler::new(QueryField::text("ExactFeed"), "feed".to_string(), TextConverter)
                .case_sensitivity(CaseSensitivity::Sensitive),
        )
        .register_handler(QueryField::text("Status"), "status".to_string(), TextConverter, false)
        .register_handler(QueryField::numeric("Size"), "size".to_string(), IntegerConverter, false)
        .register_handler(
            QueryField::date("Created"),
            "created".to_string(),
            DateConverter::at(now),
            false,
        );
    mapper
}

async fn sql_ids(pool: &SqlitePool, item: &ExpressionItem) -> Vec<i64> {
    let expr = mapper(SqlBackend).compile(item).unwrap();
    let mut params = SqlParams::default();
    let where_clause = expr.to_sql(MapperConfig::default().sql_dialect(), &mut params);
    let select = format!("SELECT id FROM events WHERE {} ORDER BY id", where_clause);

    let mut query = sqlx::query_scalar::<_, i64>(&select);
    for param in params.values {
        query = match param {
            SqlParam::Text(s) => query.bind(s),
            SqlParam::Integer(n) => query.bind(n),
            SqlParam::Float(f) => query.bind(f),
            SqlParam::Boolean(b) => query.bind(b),
        };
    }
    query.fetch_all(pool).await.unwrap()
}

fn memory_ids(item: &ExpressionItem) -> Vec<i64> {
    let predicate = mapper(MemoryBackend).compile(item).unwrap();
    attribute_maps()
        .into_iter()
        .filter(|(_, map)| predicate.matches(map))
        .map(|(id, _)| id)
        .collect()
}

fn term(field: &str, condition: Condition, value: &str) -> ExpressionItem {
    ExpressionTerm::new(field, condition, value).into()
}

#[tokio::test]
async fn test_sql_and_memory_select_same_rows() {
    let pool = setup_pool().await;

    let cases: Vec<(ExpressionItem, Vec<i64>)> = vec![
        (ExpressionOperator::default().into(), vec![1, 2, 3, 4, 5]),
        (term("Feed", Condition::Equals, "test_*"), vec![1, 2, 5]),
        (term("Feed", Condition::NotEquals, "*_events"), vec![2, 4, 5]),
        (term("Feed", Condition::EqualsCaseSensitive, "test_raw"), vec![2]),
        (term("Feed", Condition::EqualsCaseSensitive, "TEST_RAW"), vec![]),
        (term("Feed", Condition::Contains, "events"), vec![1, 3]),
        (term("Feed", Condition::StartsWithCaseSensitive, "TEST"), vec![1, 5]),
        (term("Feed", Condition::EndsWith, "logs"), vec![4]),
        (term("Feed", Condition::In, "prod_events, DEV_LOGS ,"), vec![3, 4]),
        (term("Feed", Condition::In, " , "), vec![]),
        (term("Size", Condition::Between, "10,42"), vec![1, 2]),
        (term("Size", Condition::Between, "10,42,50"), vec![]),
        (term("Created", Condition::GreaterThanOrEqualTo, "2024-01-05"), vec![2, 3, 5]),
        (term("Created", Condition::LessThan, "2024-01-01"), vec![4]),
        (term("Created", Condition::GreaterThan, "day() - 30d"), vec![3]),
        (term("Status", Condition::IsNull, ""), vec![2, 5]),
        (term("Status", Condition::Equals, "active"), vec![1, 4]),
        (term("Status", Condition::NotEquals, "active"), vec![3]),
        (term("Status", Condition::Equals, "ACTIVE"), vec![1, 4]),
        (term("Status", Condition::Equals, "ACT*"), vec![1, 4]),
        (term("Status", Condition::NotEquals, "ACT*"), vec![3]),
        (term("Status", Condition::In, "ARCHIVED, other"), vec![3]),
        (term("Status", Condition::EqualsCaseSensitive, "ACTIVE"), vec![]),
        (
            ExpressionOperator::not([term("Status", Condition::Equals, "Active")]).into(),
            vec![3],
        ),
        (term("ExactFeed", Condition::Equals, "test_*"), vec![2]),
        (term("ExactFeed", Condition::Equals, "TEST_EVENTS"), vec![1]),
        (term("ExactFeed", Condition::In, "test_raw, test_metrics"), vec![2]),
        (
            ExpressionTerm::with_doc_ref(
                "Feed",
                Condition::InDictionary,
                exprmap::expression::DocRef::new("Dictionary", "feeds"),
            )
            .into(),
            vec![1, 3],
        ),
        (
            ExpressionOperator::and([
                term("Size", Condition::GreaterThan, "20"),
                ExpressionOperator::not([term("Feed", Condition::Equals, "test_*")]).into(),
            ])
            .into(),
            vec![4],
        ),
        (
            ExpressionOperator::or([
                term("Status", Condition::IsNotNull, ""),
                term("Size", Condition::LessThan, "10"),
            ])
            .into(),
            vec![1, 3, 4],
        ),
        (
            ExpressionOperator::and([
                term("Feed", Condition::Contains, "test"),
                ExpressionTerm::new("Size", Condition::GreaterThan, "1000")
                    .disabled()
                    .into(),
            ])
            .into(),
            vec![1, 2, 5],
        ),
    ];

    for (item, expected) in cases {
        let from_sql = sql_ids(&pool, &item).await;
        let from_memory = memory_ids(&item);
        assert_eq!(from_sql, expected, "sql rows for {}", item);
        assert_eq!(from_memory, expected, "memory rows for {}", item);
    }
}

// Stock SQLite has no regexp() function, so regex terms are checked against
// the memory evaluator and the rendered SQL only.
#[test]
fn test_regex_ignores_case() {
    let cases: Vec<(ExpressionItem, Vec<i64>)> = vec![
        (term("Feed", Condition::MatchesRegex, "_ev"), vec![1, 3]),
        (term("Status", Condition::MatchesRegex, "^ACT"), vec![1, 4]),
        (
            ExpressionOperator::not([term("Status", Condition::MatchesRegex, "^act")]).into(),
            vec![3],
        ),
    ];
    for (item, expected) in cases {
        assert_eq!(memory_ids(&item), expected, "memory rows for {}", item);
    }

    let expr = mapper(SqlBackend)
        .compile(&term("Status", Condition::MatchesRegex, "^ACT"))
        .unwrap();
    let mut params = SqlParams::default();
    assert_eq!(expr.to_sql(&SqliteDialect, &mut params), "status REGEXP ?");
    assert_eq!(params.values, vec![SqlParam::Text("(?i)^ACT".to_string())]);
}
