//! Route table and shared state for the HTTP surface.

use axum::Router;
use axum::extract::FromRef;
use axum::routing::{delete, get, post, put};

use crate::auth::tokens::TokenIssuer;
use crate::db::UserStore;
use crate::handlers::accounts;
use crate::service::AccountService;

/// Shared state cloned into every handler.
#[derive(Clone)]
pub struct DoormanState {
    pub accounts: AccountService,
    pub issuer: TokenIssuer,
}

impl DoormanState {
    pub fn new(store: UserStore, issuer: TokenIssuer) -> Self {
        Self {
            accounts: AccountService::new(store, issuer.clone()),
            issuer,
        }
    }
}

// Lets the bearer extractor pull the issuer straight out of router state.
impl FromRef<DoormanState> for TokenIssuer {
    fn from_ref(state: &DoormanState) -> Self {
        state.issuer.clone()
    }
}

pub fn doorman_router(state: DoormanState) -> Router {
    Router::new()
        .route("/registration", post(accounts::registration))
        .route("/login", post(accounts::login))
        .route("/users", get(accounts::list_users))
        .route("/delete/{id}", delete(accounts::delete_user))
        .route("/edit/{id}", put(accounts::edit_user))
        .route("/addUserByParamsData", post(accounts::add_user_by_params))
        .with_state(state)
}
