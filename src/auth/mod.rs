//! Authentication primitives: password hashing and bearer tokens.
//!
//! Layout:
//! - `password.rs`: salted Argon2id hashing and verification
//! - `tokens.rs`: HS256 bearer token minting and verification

pub mod password;
pub mod tokens;

pub use password::{dummy_verify, hash_password, verify_password};
pub use tokens::{Claims, TOKEN_SECRET_MIN_BYTES, TokenIssuer};
