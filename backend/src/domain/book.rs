//! Catalogue book entities.

use pagination::PageRequest;
use serde::{Deserialize, Serialize};

use super::BookId;

/// Message returned for any rejected book payload.
pub const INVALID_BOOK_MESSAGE: &str = "invalid book data";

/// Field-level reasons a book payload is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BookValidationError {
    /// A required text field was blank.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Offending field name.
        field: &'static str,
    },
    /// Price was zero, negative or not a finite number.
    #[error("price must be a positive amount")]
    NonPositivePrice,
}

impl BookValidationError {
    /// Name of the field that failed validation.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::EmptyField { field } => field,
            Self::NonPositivePrice => "price",
        }
    }
}

/// Validated book fields used for both creation and replacement.
///
/// ## Invariants
/// - text fields are kept verbatim and are not blank.
/// - `price` is finite and strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDraft {
    title: String,
    author: String,
    genre: String,
    description: String,
    price: f64,
}

impl BookDraft {
    /// Validate raw book fields.
    ///
    /// # Examples
    /// ```
    /// use bookshelf::domain::BookDraft;
    ///
    /// let draft = BookDraft::try_new("T", "A", "G", "D", 9.99).expect("valid book");
    /// assert_eq!(draft.price(), 9.99);
    /// assert!(BookDraft::try_new("T", "A", "G", "D", 0.0).is_err());
    /// ```
    pub fn try_new(
        title: &str,
        author: &str,
        genre: &str,
        description: &str,
        price: f64,
    ) -> Result<Self, BookValidationError> {
        let title = required("title", title)?;
        let author = required("author", author)?;
        let genre = required("genre", genre)?;
        let description = required("description", description)?;
        if !price.is_finite() || price <= 0.0 {
            return Err(BookValidationError::NonPositivePrice);
        }
        Ok(Self {
            title,
            author,
            genre,
            description,
            price,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

/// Unvalidated book fields as received from a caller.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub price: f64,
}

impl TryFrom<&BookFields> for BookDraft {
    type Error = BookValidationError;

    fn try_from(value: &BookFields) -> Result<Self, Self::Error> {
        Self::try_new(
            &value.title,
            &value.author,
            &value.genre,
            &value.description,
            value.price,
        )
    }
}

// Blank text is rejected but accepted text is stored exactly as sent.
fn required(field: &'static str, value: &str) -> Result<String, BookValidationError> {
    if value.trim().is_empty() {
        return Err(BookValidationError::EmptyField { field });
    }
    Ok(value.to_owned())
}

/// A persisted book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub price: f64,
}

impl Book {
    /// Combine a store-assigned id with validated fields.
    pub fn from_draft(id: BookId, draft: BookDraft) -> Self {
        let BookDraft {
            title,
            author,
            genre,
            description,
            price,
        } = draft;
        Self {
            id,
            title,
            author,
            genre,
            description,
            price,
        }
    }

    /// Listing projection of this book.
    pub fn brief(&self) -> BookBrief {
        BookBrief {
            id: self.id,
            title: self.title.clone(),
            author: self.author.clone(),
            genre: self.genre.clone(),
            price: self.price,
        }
    }
}

/// Listing projection that omits the long-form description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookBrief {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub price: f64,
}

impl From<Book> for BookBrief {
    fn from(value: Book) -> Self {
        Self {
            id: value.id,
            title: value.title,
            author: value.author,
            genre: value.genre,
            price: value.price,
        }
    }
}

/// Filter and page selection for catalogue listings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookQuery {
    /// Exact genre to match; `None` lists every book.
    pub genre: Option<String>,
    /// Normalized page selection.
    pub page: PageRequest,
}

impl BookQuery {
    /// Build a query, treating a blank genre as no filter.
    pub fn new(genre: Option<&str>, page: PageRequest) -> Self {
        Self {
            genre: genre
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned),
            page,
        }
    }
}

/// A page of brief projections with the unpaged total.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookPage {
    pub items: Vec<BookBrief>,
    pub total: u64,
}
