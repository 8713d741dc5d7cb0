// ABOUTME: Page-number pagination module for list endpoints
// ABOUTME: Resolves page/limit query parameters and assembles count/next/previous envelopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

use serde::{Deserialize, Serialize};

use crate::constants::MAX_PAGE_SIZE;

/// Raw pagination query parameters as they arrive on the request
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    /// 1-based page number
    pub page: Option<u32>,

    /// Requested page size
    pub limit: Option<u32>,
}

/// Resolved pagination parameters for a storage query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number, at least 1
    pub page: u32,

    /// Page size, clamped to `1..=MAX_PAGE_SIZE`
    pub limit: u32,
}

impl Pagination {
    /// Resolve raw query parameters against the configured default page size
    ///
    /// Out-of-range values are clamped rather than rejected: page 0 becomes
    /// page 1, a zero or oversized limit is pulled into `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn resolve(query: PageQuery, default_limit: u32) -> Self {
        Self {
            page: query.page.unwrap_or(1).max(1),
            limit: query.limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Number of rows to skip for this page
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    /// Number of rows to fetch for this page
    #[must_use]
    pub const fn fetch(&self) -> i64 {
        self.limit as i64
    }
}

/// Paginated response envelope: total count, page links, and the page itself
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Total number of items across all pages
    pub count: i64,

    /// Path link to the next page, when one exists
    pub next: Option<String>,

    /// Path link to the previous page, when one exists
    pub previous: Option<String>,

    /// The items on this page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Assemble a page envelope around fetched results
    ///
    /// `path` is the request path the links should point back at; it may
    /// already carry a query string (filters), in which case the page
    /// parameters are appended to it.
    #[must_use]
    pub fn assemble(results: Vec<T>, count: i64, params: Pagination, path: &str) -> Self {
        let has_next = i64::from(params.page) * i64::from(params.limit) < count;
        let next = has_next.then(|| page_link(path, params.page + 1, params.limit));
        let previous = (params.page > 1).then(|| page_link(path, params.page - 1, params.limit));
        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

fn page_link(path: &str, page: u32, limit: u32) -> String {
    let joiner = if path.contains('?') { '&' } else { '?' };
    format!("{path}{joiner}page={page}&limit={limit}")
}
