//! Registration and login handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"username":"alice","password":"pw123456"}
//! POST /api/v1/auth/login {"username":"alice","password":"pw123456"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

pub const REGISTERED_MESSAGE: &str = "User registered successfully";

/// Credentials body shared by register and login.
///
/// Missing fields deserialise as empty strings so the service reports them
/// with its usual validation message.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(default)]
pub struct CredentialsRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "pw123456")]
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "User registered successfully")]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Register a new account with the `user` role.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    state
        .accounts
        .register(&payload.username, &payload.password)
        .await?;
    Ok(HttpResponse::Created().json(MessageResponse {
        message: REGISTERED_MESSAGE.to_owned(),
    }))
}

/// Exchange credentials for a bearer token.
///
/// Wrong passwords are answered only after a fixed delay.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let account = state
        .accounts
        .login(&payload.username, &payload.password)
        .await?;
    let token = state
        .tokens
        .issue(&account)
        .map_err(|err| crate::domain::Error::internal(format!("token issuance failed: {err}")))?;
    Ok(HttpResponse::Created().json(TokenResponse { token }))
}
