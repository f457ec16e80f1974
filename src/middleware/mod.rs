//! Request-level guards applied by the router.

pub mod auth;

pub use auth::AuthenticatedUser;
