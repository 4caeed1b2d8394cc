//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    ///
    /// `username` carries a unique index; `role` is constrained to
    /// `'user'` or `'admin'`.
    accounts (id) {
        /// Primary key: identity column.
        id -> Int8,
        /// Unique login name.
        username -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// `user` or `admin`.
        role -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalogue books.
    books (id) {
        id -> Int8,
        title -> Varchar,
        author -> Varchar,
        genre -> Varchar,
        description -> Text,
        /// Strictly positive, enforced by a check constraint.
        price -> Float8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Account/book favourite pairs; both foreign keys cascade on delete.
    favourite_books (account_id, book_id) {
        account_id -> Int8,
        book_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(favourite_books -> accounts (account_id));
diesel::joinable!(favourite_books -> books (book_id));

diesel::allow_tables_to_appear_in_same_query!(accounts, books, favourite_books);
