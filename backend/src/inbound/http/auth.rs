//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers that need an authenticated caller take a [`Caller`] argument; the
//! extractor verifies the `Authorization: Bearer <token>` header against the
//! configured [`TokenIssuer`](crate::domain::ports::TokenIssuer) and rejects
//! the request with `401` before the handler runs.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{AccountId, Error, SessionClaim};

use super::state::HttpState;

pub const HEADER_REQUIRED_MESSAGE: &str = "authorization header required";
pub const INVALID_FORMAT_MESSAGE: &str = "invalid token format";
pub const INVALID_TOKEN_MESSAGE: &str = "invalid or expired token";

/// Verified identity of the account making the request.
#[derive(Debug, Clone)]
pub struct Caller(SessionClaim);

impl Caller {
    pub fn account_id(&self) -> AccountId {
        self.0.account_id
    }
}

/// Pull the token out of an `Authorization` header value.
fn bearer_token(header: Option<&str>) -> Result<&str, Error> {
    let raw = header
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::unauthorized(HEADER_REQUIRED_MESSAGE))?;
    let (scheme, token) = raw
        .split_once(' ')
        .ok_or_else(|| Error::unauthorized(INVALID_FORMAT_MESSAGE))?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() || token.contains(' ') {
        return Err(Error::unauthorized(INVALID_FORMAT_MESSAGE));
    }
    Ok(token)
}

fn authenticate(req: &HttpRequest) -> Result<Caller, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| Error::unauthorized(INVALID_FORMAT_MESSAGE)))
        .transpose()?;
    let token = bearer_token(header)?;
    state.tokens.verify(token).map(Caller).map_err(|err| {
        debug!(error = %err, "bearer token rejected");
        Error::unauthorized(INVALID_TOKEN_MESSAGE)
    })
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
