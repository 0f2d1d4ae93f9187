//! Offset pagination shared by the feed, author feeds and the user directory.

use crate::error::{DomainError, FieldError};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// SQL drivers bind OFFSET and LIMIT as signed 64-bit integers.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Bounds applied when turning raw query parameters into a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}

impl PaginationPolicy {
    /// Parse `page` and `limit` as they arrive from the query string.
    ///
    /// Missing or blank values take the defaults. Anything that is not a
    /// positive integer is rejected. `limit` is clamped to `max_limit`.
    pub fn parse(&self, page: Option<&str>, limit: Option<&str>) -> Result<PageRequest, DomainError> {
        let mut errors = Vec::new();

        let page = match parse_positive("page", page) {
            Ok(value) => value.unwrap_or(DEFAULT_PAGE),
            Err(e) => {
                errors.push(e);
                DEFAULT_PAGE
            }
        };
        let limit = match parse_positive("limit", limit) {
            Ok(value) => value.unwrap_or(self.default_limit),
            Err(e) => {
                errors.push(e);
                self.default_limit
            }
        };

        let limit = limit.min(self.max_limit.max(1));
        if errors.is_empty() && !offset_in_range(page, limit) {
            errors.push(FieldError::new("page", "page is out of range"));
        }

        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        Ok(PageRequest::new(page, limit))
    }
}

fn offset_in_range(page: u64, limit: u64) -> bool {
    (page - 1)
        .checked_mul(limit)
        .is_some_and(|skip| skip <= MAX_OFFSET)
}

fn parse_positive(field: &'static str, raw: Option<&str>) -> Result<Option<u64>, FieldError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<u64>() {
        Ok(0) | Err(_) => Err(FieldError::new(
            field,
            format!("{field} must be a positive integer"),
        )),
        Ok(value) => Ok(Some(value)),
    }
}

/// A 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Build a request; zero values are raised to 1 and `limit` is kept bindable.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_OFFSET),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Rows to skip before this page starts, never above [`MAX_OFFSET`].
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit).min(MAX_OFFSET)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

/// One page of results plus the counters clients need to navigate.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        let returned = items.len() as u64;
        Self {
            current_page: request.page(),
            total_pages: total.div_ceil(request.limit()),
            total,
            has_next_page: request.skip().saturating_add(returned) < total,
            has_prev_page: request.page() > 1,
            items,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            total: self.total,
            has_next_page: self.has_next_page,
            has_prev_page: self.has_prev_page,
        }
    }
}
