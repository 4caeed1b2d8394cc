//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler, the schema wrappers from
//! [`crate::inbound::http::schemas`] and the bearer token security scheme.
//! The document backs Swagger UI in debug builds and is printed by the
//! `openapi-dump` binary.

use crate::inbound::http::accounts::{CredentialsRequest, MessageResponse, TokenResponse};
use crate::inbound::http::books::BookRequest;
use crate::inbound::http::schemas::{
    AccountSchema, BookBriefSchema, BookListSchema, BookSchema, ErrorCodeSchema, ErrorSchema,
    PageMetaSchema, RoleSchema,
};
use crate::inbound::http::users::RoleChangeRequest;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/v1/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bookshelf API",
        description = "Book catalogue with accounts, roles and per-user favourites."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::books::list_books,
        crate::inbound::http::books::list_genres,
        crate::inbound::http::books::get_book,
        crate::inbound::http::books::create_book,
        crate::inbound::http::books::update_book,
        crate::inbound::http::books::delete_book,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::update_role,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::favourites::list_favourites,
        crate::inbound::http::favourites::add_favourite,
        crate::inbound::http::favourites::remove_favourite,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        AccountSchema,
        BookSchema,
        BookBriefSchema,
        BookListSchema,
        PageMetaSchema,
        RoleSchema,
        ErrorSchema,
        ErrorCodeSchema,
        CredentialsRequest,
        MessageResponse,
        TokenResponse,
        BookRequest,
        RoleChangeRequest,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "books", description = "Catalogue browsing and administration"),
        (name = "users", description = "Account administration"),
        (name = "favourites", description = "Per-account favourite books"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document's paths, schemas and security.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "error")]
    #[case("Error", "traceId")]
    #[case("Account", "role")]
    #[case("Book", "description")]
    #[case("BookList", "meta")]
    #[case("PageMeta", "totalPages")]
    fn schemas_expose_wire_field_names(#[case] schema_name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas
            .get(schema_name)
            .unwrap_or_else(|| panic!("{schema_name} schema registered"));
        assert_object_schema_has_field(schema, field);
    }

    #[rstest]
    #[case("/api/v1/auth/register")]
    #[case("/api/v1/auth/login")]
    #[case("/api/v1/books")]
    #[case("/api/v1/books/genres")]
    #[case("/api/v1/books/{id}")]
    #[case("/api/v1/users")]
    #[case("/api/v1/users/me")]
    #[case("/api/v1/users/{id}/role")]
    #[case("/api/v1/favourites/me")]
    #[case("/api/v1/favourites/{book_id}")]
    #[case("/api/v1/health/ready")]
    fn every_endpoint_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerToken"));
    }
}
