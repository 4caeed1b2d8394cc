//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Hashing is CPU-bound and deliberately slow, so both operations run on the
//! blocking thread pool. Digests are stored as PHC strings, which carry their
//! own salt and parameters.

use argon2::password_hash::{self, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHash as PhcHash, PasswordHasher as _};
use argon2::{PasswordVerifier as _, Version};
use async_trait::async_trait;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// Argon2id hasher with configurable cost.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon: Argon2<'static>,
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self {
            argon: Argon2::default(),
        }
    }
}

impl Argon2PasswordHasher {
    /// Hasher using explicit memory (KiB), iteration and parallelism costs.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHasherError::Hashing`] when argon2 rejects the
    /// parameters.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordHasherError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))?;
        Ok(Self {
            argon: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Minimum-cost hasher for tests; never use in production.
    #[cfg(any(test, feature = "test-support"))]
    pub fn fast_for_tests() -> Self {
        let argon = Params::new(Params::MIN_M_COST, Params::MIN_T_COST, 1, None)
            .map(|params| Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
            .unwrap_or_default();
        Self { argon }
    }
}

fn hash_blocking(argon: &Argon2<'_>, password: &str) -> Result<PasswordHash, PasswordHasherError> {
    let salt = SaltString::generate(&mut OsRng);
    argon
        .hash_password(password.as_bytes(), &salt)
        .map(|digest| PasswordHash::new(digest.to_string()))
        .map_err(|err| PasswordHasherError::hashing(err.to_string()))
}

fn verify_blocking(
    argon: &Argon2<'_>,
    password: &str,
    encoded: &str,
) -> Result<bool, PasswordHasherError> {
    let parsed =
        PhcHash::new(encoded).map_err(|err| PasswordHasherError::malformed_hash(err.to_string()))?;
    match argon.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(PasswordHasherError::malformed_hash(err.to_string())),
    }
}

fn join_error(error: &tokio::task::JoinError) -> PasswordHasherError {
    PasswordHasherError::hashing(format!("hashing task failed: {error}"))
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        let argon = self.argon.clone();
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hash_blocking(&argon, &password))
            .await
            .map_err(|err| join_error(&err))?
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let argon = self.argon.clone();
        let password = Zeroizing::new(password.to_owned());
        let encoded = hash.as_str().to_owned();
        tokio::task::spawn_blocking(move || verify_blocking(&argon, &password, &encoded))
            .await
            .map_err(|err| join_error(&err))?
    }
}
