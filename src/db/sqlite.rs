use crate::db::models::UserRow;
use crate::db::schema::SQLITE_INIT;
use crate::error::DoormanError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

/// Connect to the given SQLite URL (creating the file if needed) and
/// return a schema-initialized store.
pub async fn spawn(database_url: &str) -> Result<UserStore, DoormanError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    let store = UserStore::new(pool);
    store.init_schema().await?;
    Ok(store)
}

#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), DoormanError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Number of rows whose `user_name` matches exactly; 0 means the name
    /// is free.
    pub async fn count_by_user_name(&self, user_name: &str) -> Result<i64, DoormanError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE user_name = ?")
            .bind(user_name)
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    /// Insert a new account and return the assigned row id. A duplicate
    /// `user_name` surfaces as `Conflict` (UNIQUE constraint).
    pub async fn insert(
        &self,
        user_name: &str,
        password_hash: &str,
        email: &str,
        is_active: i64,
    ) -> Result<i64, DoormanError> {
        let result = sqlx::query(
            "INSERT INTO users (user_name, password_hash, email, is_active) VALUES (?, ?, ?, ?)",
        )
        .bind(user_name)
        .bind(password_hash)
        .bind(email)
        .bind(is_active)
        .execute(&self.pool)
        .await
        .map_err(Self::map_unique_violation)?;

        if result.rows_affected() == 0 {
            return Ok(0);
        }
        Ok(result.last_insert_rowid())
    }

    pub async fn fetch_by_id(&self, id: i64) -> Result<Option<UserRow>, DoormanError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, user_name, password_hash, email, is_active FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Exact-match lookup by `user_name`. Credential verification happens
    /// in the workflow against the returned hash, never in SQL.
    pub async fn fetch_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<UserRow>, DoormanError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, user_name, password_hash, email, is_active FROM users WHERE user_name = ?",
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list_all(&self) -> Result<Vec<UserRow>, DoormanError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, user_name, password_hash, email, is_active FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Update all account fields by id (except id itself). Returns the
    /// number of rows affected; renaming onto a taken `user_name` surfaces
    /// as `Conflict`.
    pub async fn update_by_id(
        &self,
        id: i64,
        user_name: &str,
        password_hash: &str,
        email: &str,
        is_active: i64,
    ) -> Result<u64, DoormanError> {
        let result = sqlx::query(
            "UPDATE users SET user_name = ?, password_hash = ?, email = ?, is_active = ? WHERE id = ?",
        )
        .bind(user_name)
        .bind(password_hash)
        .bind(email)
        .bind(is_active)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Self::map_unique_violation)?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<u64, DoormanError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    fn map_unique_violation(e: sqlx::Error) -> DoormanError {
        if e.as_database_error()
            .is_some_and(|db| db.is_unique_violation())
        {
            DoormanError::Conflict
        } else {
            DoormanError::Database(e)
        }
    }
}
