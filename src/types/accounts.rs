//! Request and response shapes for the account endpoints.
//!
//! All wire names are camelCase. Request fields are `Option` so missing
//! and empty values can be collected into a single validation report
//! instead of failing deserialization on the first absent field.

use serde::{Deserialize, Serialize};

/// Body for `POST /registration` and `PUT /edit/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<i64>,
}

/// Body for `POST /login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: Option<String>,
    pub password: Option<String>,
}

/// Query parameters for `POST /addUserByParamsData`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserParams {
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<i64>,
}

/// Public view of one account; echoed back on registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub user_name: String,
    pub email: String,
}

/// Login result: the public profile plus a fresh bearer token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_name: String,
    pub email: String,
    pub token: String,
}

/// Listing view of one account row. The credential hash has no field
/// here, so it cannot be serialized by accident.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub id: i64,
    pub user_name: String,
    pub email: String,
    pub is_active: i64,
}

/// Plain confirmation message for delete/edit/param-insert.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
