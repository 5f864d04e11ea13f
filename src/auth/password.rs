use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::warn;

use crate::error::AppError;

pub const MIN_LEN: usize = 8;

/// Counted in characters, not bytes.
pub fn check_strength(plain: &str) -> Result<(), AppError> {
    if plain.chars().count() < MIN_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_LEN} characters"
        )));
    }
    Ok(())
}

/// Argon2id PHC string with a fresh salt.
pub fn hash(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))
}

/// A stored hash that can't be parsed never matches.
pub fn matches(plain: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "stored password hash is malformed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_only_the_same_password() {
        let stored = hash("Secur3P@ssw0rd!").unwrap();
        assert!(stored.starts_with("$argon2"));
        assert!(matches("Secur3P@ssw0rd!", &stored));
        assert!(!matches("wrong-password", &stored));
    }

    #[test]
    fn malformed_hash_never_matches() {
        assert!(!matches("anything", "not-a-valid-hash"));
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(check_strength("1234567").is_err());
        assert!(check_strength("12345678").is_ok());
        // eight characters, more than eight bytes
        assert!(check_strength("pässwörd").is_ok());
    }
}
