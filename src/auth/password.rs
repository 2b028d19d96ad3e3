use anyhow::{Result, anyhow};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;
use tracing::warn;

use crate::config::config_model::PasswordHashing;

/// Argon2id hashing with a fresh random salt per call. Hashes are PHC strings, so the
/// salt and cost parameters travel with the hash and verification reads them back.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new(config: &PasswordHashing) -> Result<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|err| anyhow!("invalid password hashing parameters: {}", err))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| anyhow!("failed to hash password: {}", err))?;

        Ok(hash.to_string())
    }

    /// Constant-time comparison happens inside argon2's verifier.
    pub fn verify(&self, plain: &str, hash: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "password: stored hash is not a valid PHC string");
                return false;
            }
        };

        self.argon2
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }
}
