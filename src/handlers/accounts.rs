use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::DoormanError;
use crate::middleware::auth::AuthenticatedUser;
use crate::router::DoormanState;
use crate::types::accounts::{
    AccountProfile, AccountRecord, AddUserParams, LoginRequest, LoginResponse, MessageResponse,
    RegisterRequest,
};

pub async fn registration(
    State(state): State<DoormanState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AccountProfile>, DoormanError> {
    Ok(Json(state.accounts.register(req).await?))
}

pub async fn login(
    State(state): State<DoormanState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, DoormanError> {
    Ok(Json(state.accounts.login(req).await?))
}

/// List every account's public record. Requires a valid bearer token;
/// the caller's identity is not otherwise used.
pub async fn list_users(
    _caller: AuthenticatedUser,
    State(state): State<DoormanState>,
) -> Result<Json<Vec<AccountRecord>>, DoormanError> {
    Ok(Json(state.accounts.list().await?))
}

pub async fn delete_user(
    State(state): State<DoormanState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, DoormanError> {
    Ok(Json(state.accounts.delete(id).await?))
}

pub async fn edit_user(
    State(state): State<DoormanState>,
    Path(id): Path<i64>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, DoormanError> {
    Ok(Json(state.accounts.edit(id, req).await?))
}

pub async fn add_user_by_params(
    State(state): State<DoormanState>,
    Query(params): Query<AddUserParams>,
) -> Result<Json<MessageResponse>, DoormanError> {
    Ok(Json(state.accounts.add_by_params(params).await?))
}
