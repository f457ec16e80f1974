//! Password hashing and verification (Argon2id, salted PHC strings).
//!
//! Passwords are never stored or compared in plaintext. `hash_password`
//! produces a salted PHC-format string; `verify_password` re-derives the
//! hash from the stored parameters and compares.

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::DoormanError;

/// A valid hash of a throwaway password, used to equalize the work done
/// for unknown user names so login timing does not reveal which names exist.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hash_password("doorman-dummy-password").expect("FATAL: failed to hash the built-in dummy password")
});

/// Hash a plaintext password with a freshly generated random salt.
///
/// Returns the PHC string (`$argon2id$...`) to store in place of the password.
pub fn hash_password(password: &str) -> Result<String, DoormanError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string();
    Ok(hash)
}

/// Check a plaintext password against a stored PHC hash string.
///
/// `Ok(false)` means the password does not match; `Err` means the stored
/// hash itself is malformed or hashing failed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, DoormanError> {
    let parsed = PasswordHash::new(stored_hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Burn the same amount of hashing work a real verification would, then
/// discard the result. Called on login when the user name does not exist.
pub fn dummy_verify(password: &str) {
    let _ = verify_password(password, &DUMMY_HASH);
}
