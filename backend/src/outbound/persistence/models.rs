//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer; repositories convert them
//! into domain entities before returning.

use diesel::prelude::*;

use super::schema::{accounts, books, favourite_books};

/// Row struct for reading from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

/// Insertable struct for new accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

/// Row struct for reading from the books table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookRow {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub price: f64,
}

/// Brief projection of the books table used by listings.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookBriefRow {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub price: f64,
}

/// Insertable and changeset struct for book fields.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = books)]
pub(crate) struct BookValues<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub genre: &'a str,
    pub description: &'a str,
    pub price: f64,
}

/// Insertable struct for favourite pairs.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = favourite_books)]
pub(crate) struct NewFavouriteRow {
    pub account_id: i64,
    pub book_id: i64,
}
