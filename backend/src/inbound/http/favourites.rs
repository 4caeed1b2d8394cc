//! Favourites API handlers.
//!
//! The account is always the bearer token's subject; no route accepts an
//! account id.

use actix_web::{HttpResponse, delete, get, post, web};
use pagination::Paginated;

use crate::domain::BookBrief;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Caller;
use crate::inbound::http::schemas::{BookListSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, PageParams, parse_book_id};

const BOOK_ID_FIELD: FieldName = FieldName::new("book_id");

/// The caller's favourite books, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/favourites/me",
    params(
        ("page" = Option<u32>, Query, description = "One-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size between 1 and 100")
    ),
    responses(
        (status = 200, description = "Page of favourites", body = BookListSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["favourites"],
    operation_id = "listFavourites",
    security(("BearerToken" = []))
)]
#[get("/favourites/me")]
pub async fn list_favourites(
    state: web::Data<HttpState>,
    caller: Caller,
    params: web::Query<PageParams>,
) -> ApiResult<web::Json<Paginated<BookBrief>>> {
    let page = params.to_request();
    let listing = state.favourites.list(caller.account_id(), page).await?;
    Ok(web::Json(listing))
}

/// Mark a book as a favourite. Repeating the call is harmless.
#[utoipa::path(
    post,
    path = "/api/v1/favourites/{book_id}",
    params(("book_id" = i64, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "Added"),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Book not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["favourites"],
    operation_id = "addFavourite",
    security(("BearerToken" = []))
)]
#[post("/favourites/{book_id}")]
pub async fn add_favourite(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let book = parse_book_id(&path, BOOK_ID_FIELD)?;
    state.favourites.add(caller.account_id(), book).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Remove a book from favourites. Removing an absent pair succeeds.
#[utoipa::path(
    delete,
    path = "/api/v1/favourites/{book_id}",
    params(("book_id" = i64, Path, description = "Book identifier")),
    responses(
        (status = 204, description = "Removed"),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["favourites"],
    operation_id = "removeFavourite",
    security(("BearerToken" = []))
)]
#[delete("/favourites/{book_id}")]
pub async fn remove_favourite(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let book = parse_book_id(&path, BOOK_ID_FIELD)?;
    state.favourites.remove(caller.account_id(), book).await?;
    Ok(HttpResponse::NoContent().finish())
}
