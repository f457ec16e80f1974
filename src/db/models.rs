use crate::types::accounts::{AccountProfile, AccountRecord};
use sqlx::FromRow;

/// One row of the `users` table. Deliberately not `Serialize`: the stored
/// credential hash must never reach a response body, so every outbound
/// shape goes through one of the explicit view types.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub user_name: String,
    pub password_hash: String,
    pub email: String,
    pub is_active: i64,
}

impl From<UserRow> for AccountProfile {
    fn from(row: UserRow) -> Self {
        AccountProfile {
            user_name: row.user_name,
            email: row.email,
        }
    }
}

impl From<UserRow> for AccountRecord {
    fn from(row: UserRow) -> Self {
        AccountRecord {
            id: row.id,
            user_name: row.user_name,
            email: row.email,
            is_active: row.is_active,
        }
    }
}
