//! The account workflow: validation, uniqueness, password hashing and
//! token minting layered over the raw [`UserStore`] operations.
//!
//! Handlers stay thin; every behavioral rule lives here so it can be
//! exercised without the HTTP surface.

use std::collections::HashMap;

use serde_json::Value;
use tracing::info;

use crate::auth::password::{dummy_verify, hash_password, verify_password};
use crate::auth::tokens::TokenIssuer;
use crate::db::UserStore;
use crate::error::{DoormanError, FieldViolation};
use crate::types::accounts::{
    AccountProfile, AccountRecord, AddUserParams, LoginRequest, LoginResponse, MessageResponse,
    RegisterRequest,
};

#[derive(Clone)]
pub struct AccountService {
    store: UserStore,
    issuer: TokenIssuer,
}

impl AccountService {
    pub fn new(store: UserStore, issuer: TokenIssuer) -> Self {
        Self { store, issuer }
    }

    /// Register a new account and echo back its public view.
    ///
    /// The uniqueness pre-check gives the common case a clean `Conflict`;
    /// a racing duplicate that slips past it is caught again by the store's
    /// UNIQUE constraint on insert.
    pub async fn register(&self, req: RegisterRequest) -> Result<AccountProfile, DoormanError> {
        let valid = validate_registration(req)?;

        if self.store.count_by_user_name(&valid.user_name).await? > 0 {
            return Err(DoormanError::Conflict);
        }

        let hash = hash_password(&valid.password)?;
        let id = self
            .store
            .insert(&valid.user_name, &hash, &valid.email, valid.is_active)
            .await?;
        if id <= 0 {
            return Err(DoormanError::Storage("Error registering user".to_string()));
        }

        let row = self.store.fetch_by_id(id).await?.ok_or_else(|| {
            DoormanError::Storage("Error retrieving registered user data".to_string())
        })?;

        info!(user_name = %row.user_name, id = row.id, "registered new account");
        Ok(row.into())
    }

    /// Authenticate a credential pair and mint a bearer token.
    ///
    /// An unknown name and a wrong password both answer with the same
    /// `InvalidCredentials`; nothing in the response or its timing says
    /// which one it was.
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, DoormanError> {
        let valid = validate_login(req)?;

        let Some(row) = self.store.fetch_by_user_name(&valid.user_name).await? else {
            // Burn a verification so a miss costs as much as a mismatch.
            dummy_verify(&valid.password);
            return Err(DoormanError::InvalidCredentials);
        };

        if !verify_password(&valid.password, &row.password_hash)? {
            return Err(DoormanError::InvalidCredentials);
        }

        let mut extra = HashMap::new();
        extra.insert("email".to_string(), Value::String(row.email.clone()));
        let token = self.issuer.mint(&row.user_name, extra)?;

        info!(user_name = %row.user_name, "login succeeded");
        Ok(LoginResponse {
            user_name: row.user_name,
            email: row.email,
            token,
        })
    }

    /// Every account as its listing view, ordered by id.
    pub async fn list(&self) -> Result<Vec<AccountRecord>, DoormanError> {
        let rows = self.store.list_all().await?;
        Ok(rows.into_iter().map(AccountRecord::from).collect())
    }

    /// Replace every editable field of an existing account. The password
    /// is re-hashed with a fresh salt on each edit.
    pub async fn edit(
        &self,
        id: i64,
        req: RegisterRequest,
    ) -> Result<MessageResponse, DoormanError> {
        let valid = validate_registration(req)?;

        if self.store.fetch_by_id(id).await?.is_none() {
            return Err(DoormanError::NotFound(id));
        }

        let hash = hash_password(&valid.password)?;
        let rows = self
            .store
            .update_by_id(id, &valid.user_name, &hash, &valid.email, valid.is_active)
            .await?;
        if rows == 0 {
            return Err(DoormanError::Storage(format!(
                "Error updating user with ID {id}"
            )));
        }

        info!(id, "account updated");
        Ok(MessageResponse::new(format!(
            "User with ID {id} updated successfully"
        )))
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse, DoormanError> {
        let rows = self.store.delete_by_id(id).await?;
        if rows == 0 {
            return Err(DoormanError::NotFound(id));
        }

        info!(id, "account deleted");
        Ok(MessageResponse::new(format!(
            "User with ID {id} deleted successfully"
        )))
    }

    /// Query-parameter variant of registration kept for compatibility:
    /// required-field checks only, no email shape check, no echo-back.
    pub async fn add_by_params(
        &self,
        params: AddUserParams,
    ) -> Result<MessageResponse, DoormanError> {
        let valid = validate_params(params)?;

        if self.store.count_by_user_name(&valid.user_name).await? > 0 {
            return Err(DoormanError::Conflict);
        }

        let hash = hash_password(&valid.password)?;
        let id = self
            .store
            .insert(&valid.user_name, &hash, &valid.email, valid.is_active)
            .await?;
        if id <= 0 {
            return Err(DoormanError::Storage("Error adding user".to_string()));
        }

        info!(user_name = %valid.user_name, "account added via params");
        Ok(MessageResponse::new(format!(
            "User {} added successfully",
            valid.user_name
        )))
    }
}

/// A registration request with every rule already enforced.
struct ValidRegistration {
    user_name: String,
    password: String,
    email: String,
    is_active: i64,
}

struct ValidLogin {
    user_name: String,
    password: String,
}

fn validate_registration(req: RegisterRequest) -> Result<ValidRegistration, DoormanError> {
    let mut violations = Vec::new();

    let user_name = req.user_name.unwrap_or_default();
    if user_name.trim().is_empty() {
        violations.push(FieldViolation::new("userName", "Username is required"));
    }

    let password = req.password.unwrap_or_default();
    if password.trim().is_empty() {
        violations.push(FieldViolation::new("password", "Password is required"));
    }

    let email = req.email.unwrap_or_default();
    if email.trim().is_empty() {
        violations.push(FieldViolation::new("email", "Email is required"));
    } else if !is_valid_email(&email) {
        violations.push(FieldViolation::new("email", "Invalid email format"));
    }

    let is_active = match req.is_active {
        Some(v) => v,
        None => {
            violations.push(FieldViolation::new("isActive", "IsActive is required"));
            0
        }
    };

    if !violations.is_empty() {
        return Err(DoormanError::Validation(violations));
    }

    Ok(ValidRegistration {
        user_name,
        password,
        email,
        is_active,
    })
}

fn validate_login(req: LoginRequest) -> Result<ValidLogin, DoormanError> {
    let mut violations = Vec::new();

    let user_name = req.user_name.unwrap_or_default();
    if user_name.trim().is_empty() {
        violations.push(FieldViolation::new("userName", "Username is required"));
    }

    let password = req.password.unwrap_or_default();
    if password.trim().is_empty() {
        violations.push(FieldViolation::new("password", "Password is required"));
    }

    if !violations.is_empty() {
        return Err(DoormanError::Validation(violations));
    }

    Ok(ValidLogin {
        user_name,
        password,
    })
}

/// The params route checks presence only, with empty-string (not trimmed)
/// semantics, and never applies the email shape rule.
fn validate_params(params: AddUserParams) -> Result<ValidRegistration, DoormanError> {
    let mut violations = Vec::new();

    let user_name = params.user_name.unwrap_or_default();
    if user_name.is_empty() {
        violations.push(FieldViolation::new("userName", "Username is required"));
    }

    let password = params.password.unwrap_or_default();
    if password.is_empty() {
        violations.push(FieldViolation::new("password", "Password is required"));
    }

    let email = params.email.unwrap_or_default();
    if email.is_empty() {
        violations.push(FieldViolation::new("email", "Email is required"));
    }

    let is_active = match params.is_active {
        Some(v) => v,
        None => {
            violations.push(FieldViolation::new("isActive", "IsActive is required"));
            0
        }
    };

    if !violations.is_empty() {
        return Err(DoormanError::Validation(violations));
    }

    Ok(ValidRegistration {
        user_name,
        password,
        email,
        is_active,
    })
}

/// The lenient classic rule: exactly one `@`, neither first nor last
/// character. Deliberately not a full RFC 5322 parse.
fn is_valid_email(s: &str) -> bool {
    match (s.find('@'), s.rfind('@')) {
        (Some(first), Some(last)) if first == last => first > 0 && last < s.len() - 1,
        _ => false,
    }
}
