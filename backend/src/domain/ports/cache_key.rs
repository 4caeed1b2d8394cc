//! Keys and eviction patterns for the look-aside cache.
use std::hash::{Hash, Hasher};

use globset::{Glob, GlobMatcher};
use thiserror::Error;

/// Validation errors returned when constructing cache keys or patterns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheKeyValidationError {
    /// Key is empty after trimming whitespace.
    #[error("cache key must not be empty")]
    Empty,
    /// Key contains whitespace, which some backends treat as a separator.
    #[error("cache key must not contain whitespace")]
    ContainsWhitespace,
    /// Exact keys may not contain glob metacharacters.
    #[error("cache key must not contain glob characters")]
    ContainsGlob,
    /// Pattern is not valid glob syntax.
    #[error("invalid cache pattern: {0}")]
    InvalidPattern(String),
}

fn validate(raw: &str) -> Result<(), CacheKeyValidationError> {
    if raw.trim().is_empty() {
        return Err(CacheKeyValidationError::Empty);
    }
    if raw.chars().any(char::is_whitespace) {
        return Err(CacheKeyValidationError::ContainsWhitespace);
    }
    Ok(())
}

/// Exact cache key such as `book:42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Construct a key, rejecting blanks, whitespace and glob syntax.
    pub fn new(value: impl Into<String>) -> Result<Self, CacheKeyValidationError> {
        let raw = value.into();
        validate(&raw)?;
        if raw.contains(['*', '?', '[', ']']) {
            return Err(CacheKeyValidationError::ContainsGlob);
        }
        Ok(Self(raw))
    }

    /// Borrow the underlying key.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Glob pattern selecting keys for bulk eviction, such as `books:*`.
///
/// `*` matches any run of characters and `?` matches exactly one.
#[derive(Debug, Clone)]
pub struct CachePattern {
    raw: String,
    matcher: GlobMatcher,
}

impl CachePattern {
    /// Construct a pattern, rejecting blanks, whitespace and malformed globs.
    pub fn new(value: impl Into<String>) -> Result<Self, CacheKeyValidationError> {
        let raw = value.into();
        validate(&raw)?;
        let matcher = Glob::new(&raw)
            .map_err(|e| CacheKeyValidationError::InvalidPattern(e.kind().to_string()))?
            .compile_matcher();
        Ok(Self { raw, matcher })
    }

    /// Borrow the underlying pattern.
    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    /// Whether `key` is selected by this pattern.
    ///
    /// # Examples
    /// ```
    /// use bookshelf::domain::ports::{CacheKey, CachePattern};
    ///
    /// let pattern = CachePattern::new("books:*").expect("valid pattern");
    /// assert!(pattern.matches(&CacheKey::new("books:all:1:10").expect("key")));
    /// assert!(!pattern.matches(&CacheKey::new("book:1").expect("key")));
    /// ```
    pub fn matches(&self, key: &CacheKey) -> bool {
        self.matcher.is_match(key.as_str())
    }
}

impl PartialEq for CachePattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for CachePattern {}

impl Hash for CachePattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl std::fmt::Display for CachePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
