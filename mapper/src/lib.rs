//! Expression-to-predicate compiler
//!
//! Turns AND/OR/NOT filter expressions over field/condition/value terms into
//! executable predicates: SQL `WHERE` fragments with bound parameters, or
//! predicates evaluated directly against in-memory attribute maps.
//!
//! ```
//! use exprmap::backend::sql::{SqlBackend, SqlParams, SqliteDialect};
//! use exprmap::convert::TextConverter;
//! use exprmap::expression::{Condition, ExpressionOperator, ExpressionTerm};
//! use exprmap::{ExpressionMapper, QueryField};
//!
//! let mut mapper = ExpressionMapper::new(SqlBackend);
//! mapper.register_handler(QueryField::text("Feed"), "feed".to_string(), TextConverter, false);
//!
//! let expr = ExpressionOperator::or([
//!     ExpressionTerm::new("Feed", Condition::Equals, "TEST_*"),
//!     ExpressionTerm::new("Feed", Condition::In, "A, B"),
//! ]);
//!
//! let mut params = SqlParams::default();
//! let sql = mapper.compile(&expr.into()).unwrap().to_sql(&SqliteDialect, &mut params);
//! assert_eq!(sql, "(LOWER(feed) LIKE ? ESCAPE '\\' OR LOWER(feed) IN (?, ?))");
//! assert_eq!(params.len(), 3);
//! ```

pub mod backend;
pub mod config;
pub mod constants;
pub mod convert;
pub mod error;
pub mod expression;
pub mod field;
pub mod handler;
pub mod logging;
pub mod mapper;
pub mod resolve;
pub mod value;

pub use backend::{CaseSensitivity, PredicateBackend};
pub use config::MapperConfig;
pub use error::MapperError;
pub use field::{FieldType, QueryField};
pub use handler::TermHandler;
pub use mapper::ExpressionMapper;
pub use value::{CompareOp, Value};
