//! Account API handlers.
//!
//! ```text
//! GET    /api/v1/users/me
//! GET    /api/v1/users/{id}
//! GET    /api/v1/users
//! PATCH  /api/v1/users/{id}/role {"new_role":"admin"}
//! DELETE /api/v1/users/{id}
//! ```
//!
//! Every authorization decision is made by the account service against the
//! stored role; the role inside the bearer token is never consulted here.

use actix_web::{HttpResponse, delete, get, patch, web};
use serde::{Deserialize, Serialize};

use crate::domain::Account;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Caller;
use crate::inbound::http::schemas::{AccountSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_account_id};

const ID_FIELD: FieldName = FieldName::new("id");
const NEW_ROLE_FIELD: FieldName = FieldName::new("new_role");

/// Body for `PATCH /api/v1/users/{id}/role`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RoleChangeRequest {
    #[schema(example = "admin")]
    pub new_role: Option<String>,
}

/// The caller's own account.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Own account", body = AccountSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("BearerToken" = []))
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: Caller,
) -> ApiResult<web::Json<Account>> {
    let account = state.accounts.profile(caller.account_id()).await?;
    Ok(web::Json(account))
}

/// Fetch an account; callers may view themselves, admins may view anyone.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account", body = AccountSchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security(("BearerToken" = []))
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<web::Json<Account>> {
    let target = parse_account_id(&path, ID_FIELD)?;
    let account = state.accounts.account(caller.account_id(), target).await?;
    Ok(web::Json(account))
}

/// List every account. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Accounts", body = [AccountSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security(("BearerToken" = []))
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    caller: Caller,
) -> ApiResult<web::Json<Vec<Account>>> {
    let accounts = state.accounts.list_accounts(caller.account_id()).await?;
    Ok(web::Json(accounts))
}

/// Change another account's role. Admin only; never the caller's own.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}/role",
    params(("id" = i64, Path, description = "Account identifier")),
    request_body = RoleChangeRequest,
    responses(
        (status = 200, description = "Updated account", body = AccountSchema),
        (status = 400, description = "Invalid role or own account", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUserRole",
    security(("BearerToken" = []))
)]
#[patch("/users/{id}/role")]
pub async fn update_role(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
    payload: web::Json<RoleChangeRequest>,
) -> ApiResult<web::Json<Account>> {
    let target = parse_account_id(&path, ID_FIELD)?;
    let new_role = payload
        .new_role
        .as_deref()
        .ok_or_else(|| missing_field_error(NEW_ROLE_FIELD))?;
    let account = state
        .accounts
        .set_role(caller.account_id(), target, new_role)
        .await?;
    Ok(web::Json(account))
}

/// Delete an account. Admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "Account identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser",
    security(("BearerToken" = []))
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let target = parse_account_id(&path, ID_FIELD)?;
    state
        .accounts
        .delete_account(caller.account_id(), target)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
