//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers below mirror their wire shape and live in the inbound adapter,
//! where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = Error)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    /// Human-readable message; part of the public contract.
    #[schema(example = "access denied")]
    error: String,
    /// Stable machine-readable error code.
    code: ErrorCodeSchema,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Role`].
#[derive(ToSchema)]
#[schema(as = Role)]
pub enum RoleSchema {
    #[schema(rename = "user")]
    User,
    #[schema(rename = "admin")]
    Admin,
}

/// OpenAPI schema for [`crate::domain::Account`].
#[derive(ToSchema)]
#[schema(as = Account)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct AccountSchema {
    #[schema(example = 1)]
    id: i64,
    #[schema(example = "alice")]
    username: String,
    role: RoleSchema,
}

/// OpenAPI schema for [`crate::domain::Book`].
#[derive(ToSchema)]
#[schema(as = Book)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct BookSchema {
    #[schema(example = 1)]
    id: i64,
    #[schema(example = "The Rust Programming Language")]
    title: String,
    #[schema(example = "Steve Klabnik")]
    author: String,
    #[schema(example = "Programming")]
    genre: String,
    #[schema(example = "The official book on Rust")]
    description: String,
    #[schema(example = 39.95)]
    price: f64,
}

/// OpenAPI schema for [`crate::domain::BookBrief`].
#[derive(ToSchema)]
#[schema(as = BookBrief)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct BookBriefSchema {
    id: i64,
    title: String,
    author: String,
    genre: String,
    price: f64,
}

/// OpenAPI schema for [`pagination::PageMeta`].
#[derive(ToSchema)]
#[schema(as = PageMeta)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct PageMetaSchema {
    #[schema(example = 42)]
    total: u64,
    #[schema(example = 1)]
    page: u32,
    #[schema(example = 10)]
    limit: u32,
    #[schema(rename = "totalPages", example = 5)]
    total_pages: u64,
}

/// Paginated brief book listing.
#[derive(ToSchema)]
#[schema(as = BookList)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct BookListSchema {
    data: Vec<BookBriefSchema>,
    meta: PageMetaSchema,
}
