//! SQL DDL for initializing the account storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT, so ids are never reused after
///   a row is deleted
/// - `user_name` UNIQUE — the authoritative uniqueness backstop behind the
///   workflow's check-then-insert (default BINARY collation: exact,
///   case-sensitive matching)
/// - `is_active` BOOLEAN flag (stored as INTEGER 0/1)
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_name TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    email TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1
);
"#;
