//! Driven port for bearer token issuance and verification.
use crate::domain::{Account, SessionClaim};

use super::define_port_error;

define_port_error! {
    /// Failures raised by token adapters.
    pub enum TokenError {
        /// The token could not be produced.
        Signing { message: String } => "token signing failed: {message}",
        /// The token is malformed, tampered with or carries bad claims.
        Invalid { message: String } => "token rejected: {message}",
        /// The token was valid but has expired.
        Expired => "token expired",
    }
}

/// Signs and verifies session claims.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Issue a signed token for `account` with the configured lifetime.
    fn issue(&self, account: &Account) -> Result<String, TokenError>;

    /// Verify a presented token and recover its claim.
    fn verify(&self, token: &str) -> Result<SessionClaim, TokenError>;
}
