//! Password storage.
//!
//! Hashes are Argon2id PHC strings; salt and cost parameters travel inside
//! the stored value.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

pub fn hash_password(plain: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(hasher().hash_password(plain.as_bytes(), &salt)?.to_string())
}

/// `Ok(false)` for a wrong password. Only an unparseable stored hash is an
/// error.
pub fn verify_password(plain: &str, stored: &str) -> Result<bool, password_hash::Error> {
    let parsed = PasswordHash::new(stored)?;
    Ok(hasher()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
