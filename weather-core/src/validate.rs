//! Query-parameter validation. Pure functions, no side effects.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::model::PageRequest;

/// Letters, whitespace, hyphens, apostrophes and dots; 2 to 60 characters.
static CITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s\-'.]{2,60}$").expect("city pattern is valid"));

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("City is required")]
    MissingCity,
    #[error("City contains invalid characters")]
    InvalidCity,
    #[error("Page must be a positive integer")]
    InvalidPage,
    #[error("Limit must be an integer between 1 and 50")]
    InvalidLimit,
}

/// Trim the raw `city` query value and check it against the allowed pattern.
/// Returns the trimmed string with its original case preserved; the caller
/// derives the lower-cased form.
pub fn city(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingCity);
    }
    if !CITY_PATTERN.is_match(trimmed) {
        return Err(ValidationError::InvalidCity);
    }
    Ok(trimmed.to_owned())
}

/// Parse optional `page`/`limit` query values. Absent values fall back to
/// page 1 and limit 10; anything non-integer or out of range is rejected.
pub fn pagination(
    raw_page: Option<&str>,
    raw_limit: Option<&str>,
) -> Result<PageRequest, ValidationError> {
    let page = match raw_page {
        None => DEFAULT_PAGE,
        Some(s) => match s.trim().parse::<u32>() {
            Ok(n) if n >= 1 => n,
            _ => return Err(ValidationError::InvalidPage),
        },
    };

    let limit = match raw_limit {
        None => DEFAULT_LIMIT,
        Some(s) => match s.trim().parse::<u32>() {
            Ok(n) if (1..=MAX_LIMIT).contains(&n) => n,
            _ => return Err(ValidationError::InvalidLimit),
        },
    };

    Ok(PageRequest { page, limit })
}
