// =============================================================================
// Library Identity
// =============================================================================

/// Library name in lowercase (for log filters and identifiers)
pub const APP_NAME_LOWER: &str = "exprmap";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "EXPRMAP_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "EXPRMAP_LOG";

/// Environment variable overriding the maximum expression depth
pub const ENV_MAX_DEPTH: &str = "EXPRMAP_MAX_DEPTH";

/// Environment variable overriding the SQL dialect
pub const ENV_DIALECT: &str = "EXPRMAP_DIALECT";

// =============================================================================
// Compiler Defaults
// =============================================================================

/// Default maximum nesting depth of an expression tree
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Separator for multi-value term values (IN, BETWEEN)
pub const LIST_SEPARATOR: char = ',';

/// Wildcard character accepted in EQUALS / NOT_EQUALS values
pub const WILDCARD: char = '*';

// =============================================================================
// Expression JSON Limits
// =============================================================================

/// Maximum size of expression JSON in bytes (64KB)
pub const MAX_EXPRESSION_JSON_SIZE: usize = 64 * 1024;

/// Maximum number of items (operators + terms) in a decoded expression
pub const MAX_EXPRESSION_ITEMS: usize = 1000;

// =============================================================================
// Word List Cache Defaults
// =============================================================================

/// Default maximum number of cached word lists
pub const DEFAULT_WORD_LIST_CACHE_MAX_ENTRIES: u64 = 100;

/// Default time-to-live for cached word lists (10 minutes)
pub const DEFAULT_WORD_LIST_CACHE_TTL_SECS: u64 = 600;

// =============================================================================
// Document Types
// =============================================================================

/// Document type of dictionaries created by the in-memory dictionary store
pub const DICTIONARY_DOC_TYPE: &str = "Dictionary";
