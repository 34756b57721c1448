//! # Authentication Module
//!
//! This module provides authentication-related utilities for the Praxis API:
//! password hashing and verification for user credentials, and generation of
//! the opaque values backing activation, password-reset and magic-link
//! tokens.
//!
//! Password hashing uses Argon2, protecting stored credentials from rainbow
//! tables and brute force attempts.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use eyre::Result;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of generated token values. Long enough that the unique index on
/// the token column is the only collision handling needed.
const TOKEN_LENGTH: usize = 48;

/// Hashes a password using the Argon2 algorithm
///
/// Generates a random salt per password and returns the hash in PHC string
/// format (algorithm, version, parameters, salt, and hash).
pub fn hash_password(password: &str) -> Result<String> {
    // Generate a fresh, random salt
    let salt = SaltString::generate(&mut OsRng);

    // Create default Argon2 instance
    let argon2 = Argon2::default();

    // Hash the password with salt
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Verifies a password against a stored PHC-format hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| eyre::eyre!("Invalid password hash: {}", e))?;
    let is_valid = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();
    Ok(is_valid)
}

/// Generates an opaque alphanumeric token value
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
