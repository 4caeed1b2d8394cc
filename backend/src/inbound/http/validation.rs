//! Shared request parsing helpers for inbound HTTP adapters.
//!
//! Path identifiers are strict: anything but a positive integer is a `400`.
//! Pagination query parameters are lenient: values that do not parse fall
//! back to the defaults.

use pagination::PageRequest;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{AccountId, BookId, Error, IdValidationError};

/// Validation error codes reported in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
    MissingField,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::MissingField => "missing_field",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn invalid_id(message: &str, field: FieldName, value: &str, err: IdValidationError) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": ErrorCode::InvalidId.as_str(),
        "reason": err.to_string(),
    }))
}

pub(crate) fn parse_account_id(value: &str, field: FieldName) -> Result<AccountId, Error> {
    value
        .trim()
        .parse::<AccountId>()
        .map_err(|err| invalid_id("invalid account id", field, value, err))
}

pub(crate) fn parse_book_id(value: &str, field: FieldName) -> Result<BookId, Error> {
    value
        .trim()
        .parse::<BookId>()
        .map_err(|err| invalid_id("invalid book id", field, value, err))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("missing required field: {name}")).with_details(json!({
        "field": name,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

/// Raw `page`/`limit` query parameters.
///
/// Kept as strings so a malformed value degrades to the default instead of
/// rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

fn lenient(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}

impl PageParams {
    pub fn to_request(&self) -> PageRequest {
        PageRequest::normalized(lenient(self.page.as_deref()), lenient(self.limit.as_deref()))
    }
}
