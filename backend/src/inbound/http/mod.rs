//! HTTP inbound adapter exposing REST endpoints.
//!
//! [`configure`] registers every `/api/v1` handler together with the
//! extractor configuration that turns malformed input into the shared error
//! envelope.

use actix_web::web;

pub mod accounts;
pub mod auth;
pub mod books;
pub mod error;
pub mod favourites;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register the API handlers on a scope or app.
///
/// Literal segments (`/users/me`, `/books/genres`) are registered ahead of
/// their `{id}` siblings so they are never parsed as identifiers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::query_config())
        .app_data(error::path_config())
        .service(accounts::register)
        .service(accounts::login)
        .service(books::list_books)
        .service(books::list_genres)
        .service(books::get_book)
        .service(books::create_book)
        .service(books::update_book)
        .service(books::delete_book)
        .service(users::current_user)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::update_role)
        .service(users::delete_user)
        .service(favourites::list_favourites)
        .service(favourites::add_favourite)
        .service(favourites::remove_favourite)
        .service(health::ready)
        .service(health::live);
}
