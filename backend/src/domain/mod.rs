//! Domain entities, services and ports.
//!
//! Nothing in here depends on HTTP, SQL or cache specifics; adapters live in
//! `inbound` and `outbound` and meet the domain at [`ports`].

pub mod account;
pub mod account_service;
pub mod auth;
pub mod book;
pub mod catalogue_service;
pub mod error;
pub mod favourites_service;
pub mod ids;
pub mod ports;
pub mod trace_id;

pub use self::account::{
    Account, INVALID_ROLE_MESSAGE, NewAccount, PasswordHash, Role, RoleParseError, StoredAccount,
    USERNAME_MAX_LEN, Username, UsernameValidationError,
};
pub use self::account_service::{AccountServiceImpl, FAILED_LOGIN_DELAY};
pub use self::auth::{
    CREDENTIALS_REQUIRED_MESSAGE, Credentials, CredentialsValidationError, SessionClaim,
};
pub use self::book::{
    Book, BookBrief, BookDraft, BookFields, BookPage, BookQuery, BookValidationError,
    INVALID_BOOK_MESSAGE,
};
pub use self::catalogue_service::{BOOK_TTL, CatalogueServiceImpl, LISTING_TTL};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::favourites_service::FavouritesServiceImpl;
pub use self::ids::{AccountId, BookId, IdValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
