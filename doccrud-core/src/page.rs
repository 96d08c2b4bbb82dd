//! Paginated result lists.

use serde::{Deserialize, Serialize};

use crate::error::DocumentStoreResult;

/// A single page of results from `find`.
///
/// # Example
///
/// ```ignore
/// use doccrud::page::Page;
///
/// let page: Page<String> = Page::builder(vec!["item1".to_string()])
///     .with_total(100)
///     .with_skipped(40)
///     .with_limited(20)
///     .build();
///
/// assert_eq!(page.list.len(), 1);
/// assert_eq!(page.total, 100);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Number of records matching the filter, ignoring the page window.
    pub total: u64,
    /// Number of records skipped before this page.
    pub skipped: usize,
    /// Maximum number of records the page could hold.
    pub limited: usize,
    /// The records of this page.
    pub list: Vec<T>,
}

impl<T> Page<T> {
    pub fn builder(list: Vec<T>) -> PageBuilder<T> {
        PageBuilder::new(list)
    }

    /// Converts every record of the page, keeping the metadata.
    pub fn try_map<U, F>(self, f: F) -> DocumentStoreResult<Page<U>>
    where
        F: FnMut(T) -> DocumentStoreResult<U>,
    {
        Ok(Page {
            total: self.total,
            skipped: self.skipped,
            limited: self.limited,
            list: self
                .list
                .into_iter()
                .map(f)
                .collect::<DocumentStoreResult<Vec<U>>>()?,
        })
    }

    /// Whether records exist past this page.
    pub fn has_next(&self) -> bool {
        ((self.skipped + self.list.len()) as u64) < self.total
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            total: 0,
            skipped: 0,
            limited: 0,
            list: Vec::new(),
        }
    }
}

/// Builder for constructing [`Page`] instances.
pub struct PageBuilder<T> {
    list: Vec<T>,
    total: u64,
    skipped: usize,
    limited: usize,
}

impl<T> PageBuilder<T> {
    pub fn new(list: Vec<T>) -> Self {
        Self {
            list,
            total: 0,
            skipped: 0,
            limited: 0,
        }
    }

    pub fn with_total(mut self, total: u64) -> Self {
        self.total = total;
        self
    }

    pub fn with_skipped(mut self, skipped: usize) -> Self {
        self.skipped = skipped;
        self
    }

    pub fn with_limited(mut self, limited: usize) -> Self {
        self.limited = limited;
        self
    }

    pub fn build(self) -> Page<T> {
        Page {
            total: self.total,
            skipped: self.skipped,
            limited: self.limited,
            list: self.list,
        }
    }
}
