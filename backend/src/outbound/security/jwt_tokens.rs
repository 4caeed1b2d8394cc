//! HS256 JSON Web Token implementation of the `TokenIssuer` port.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenError, TokenIssuer};
use crate::domain::{Account, AccountId, Role, SessionClaim, Username};

/// Wire claims carried in the token payload.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    username: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies tokens with a shared secret.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    fn issue_at(&self, account: &Account, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: account.id.to_string(),
            username: account.username.to_string(),
            role: account.role.as_str().to_owned(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))
    }
}

fn into_session(claims: Claims) -> Result<SessionClaim, TokenError> {
    let account_id = claims
        .sub
        .parse::<AccountId>()
        .map_err(|err| TokenError::invalid(format!("subject: {err}")))?;
    let username =
        Username::new(&claims.username).map_err(|err| TokenError::invalid(err.to_string()))?;
    let role = claims
        .role
        .parse::<Role>()
        .map_err(|err| TokenError::invalid(err.to_string()))?;
    let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
        .ok_or_else(|| TokenError::invalid("expiry out of range"))?;
    Ok(SessionClaim {
        account_id,
        username,
        role,
        expires_at,
    })
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, account: &Account) -> Result<String, TokenError> {
        self.issue_at(account, Utc::now())
    }

    fn verify(&self, token: &str) -> Result<SessionClaim, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::expired(),
                _ => TokenError::invalid(err.to_string()),
            }
        })?;
        into_session(data.claims)
    }
}
