//! Catalogue API handlers.
//!
//! ```text
//! GET    /api/v1/books?genre=Fantasy&page=1&limit=10
//! GET    /api/v1/books/genres
//! GET    /api/v1/books/{id}
//! POST   /api/v1/books        (admin)
//! PATCH  /api/v1/books/{id}   (admin)
//! DELETE /api/v1/books/{id}   (admin)
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use pagination::Paginated;
use serde::{Deserialize, Serialize};

use crate::domain::{Book, BookBrief, BookFields, BookQuery};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Caller;
use crate::inbound::http::schemas::{BookListSchema, BookSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, PageParams, parse_book_id};

const ID_FIELD: FieldName = FieldName::new("id");

/// Query string for `GET /api/v1/books`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookListParams {
    /// Exact genre to filter by.
    pub genre: Option<String>,
    /// One-based page number; invalid values fall back to 1.
    #[param(value_type = Option<u32>)]
    pub page: Option<String>,
    /// Page size between 1 and 100; invalid values fall back to 10.
    #[param(value_type = Option<u32>)]
    pub limit: Option<String>,
}

/// Book body for create and update.
///
/// Missing fields are treated as empty and fail validation.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(default)]
pub struct BookRequest {
    #[schema(example = "The Rust Programming Language")]
    pub title: String,
    #[schema(example = "Steve Klabnik")]
    pub author: String,
    #[schema(example = "Programming")]
    pub genre: String,
    #[schema(example = "The official book on Rust")]
    pub description: String,
    #[schema(example = 39.95)]
    pub price: f64,
}

impl From<BookRequest> for BookFields {
    fn from(value: BookRequest) -> Self {
        Self {
            title: value.title,
            author: value.author,
            genre: value.genre,
            description: value.description,
            price: value.price,
        }
    }
}

/// List books as brief projections with pagination metadata.
#[utoipa::path(
    get,
    path = "/api/v1/books",
    params(BookListParams),
    responses(
        (status = 200, description = "Page of books", body = BookListSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "listBooks",
    security([])
)]
#[get("/books")]
pub async fn list_books(
    state: web::Data<HttpState>,
    params: web::Query<BookListParams>,
) -> ApiResult<web::Json<Paginated<BookBrief>>> {
    let params = params.into_inner();
    let page = PageParams {
        page: params.page,
        limit: params.limit,
    }
    .to_request();
    let query = BookQuery::new(params.genre.as_deref(), page);
    let listing = state.catalogue.list_books(&query).await?;
    Ok(web::Json(listing))
}

/// Distinct genres across the catalogue.
#[utoipa::path(
    get,
    path = "/api/v1/books/genres",
    responses(
        (status = 200, description = "Genres", body = [String]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "listGenres",
    security([])
)]
#[get("/books/genres")]
pub async fn list_genres(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<String>>> {
    Ok(web::Json(state.catalogue.genres().await?))
}

/// Fetch a single book.
#[utoipa::path(
    get,
    path = "/api/v1/books/{id}",
    params(("id" = i64, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "Book", body = BookSchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "getBook",
    security([])
)]
#[get("/books/{id}")]
pub async fn get_book(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Book>> {
    let id = parse_book_id(&path, ID_FIELD)?;
    Ok(web::Json(state.catalogue.book(id).await?))
}

/// Add a book. Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Created", body = BookSchema),
        (status = 400, description = "Invalid book data", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "createBook",
    security(("BearerToken" = []))
)]
#[post("/books")]
pub async fn create_book(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: web::Json<BookRequest>,
) -> ApiResult<HttpResponse> {
    state.accounts.require_admin(caller.account_id()).await?;
    let fields = BookFields::from(payload.into_inner());
    let book = state.catalogue.create_book(&fields).await?;
    Ok(HttpResponse::Created().json(book))
}

/// Replace a book's fields. Admin only.
#[utoipa::path(
    patch,
    path = "/api/v1/books/{id}",
    params(("id" = i64, Path, description = "Book identifier")),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Updated", body = BookSchema),
        (status = 400, description = "Invalid book data", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "updateBook",
    security(("BearerToken" = []))
)]
#[patch("/books/{id}")]
pub async fn update_book(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
    payload: web::Json<BookRequest>,
) -> ApiResult<web::Json<Book>> {
    let id = parse_book_id(&path, ID_FIELD)?;
    state.accounts.require_admin(caller.account_id()).await?;
    let fields = BookFields::from(payload.into_inner());
    Ok(web::Json(state.catalogue.update_book(id, &fields).await?))
}

/// Remove a book. Admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/books/{id}",
    params(("id" = i64, Path, description = "Book identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "deleteBook",
    security(("BearerToken" = []))
)]
#[delete("/books/{id}")]
pub async fn delete_book(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_book_id(&path, ID_FIELD)?;
    state.accounts.require_admin(caller.account_id()).await?;
    state.catalogue.delete_book(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "books_tests.rs"]
mod tests;
