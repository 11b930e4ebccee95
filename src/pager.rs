//! Pager logic for grids bound to a paged data source.
//!
//! The pager renders nothing; it reads the committed paging window and item
//! count from a [`GridDataSource`] and asks the source to move. Navigation
//! is clamped to the existing pages, and a move that would land on the page
//! already shown issues no request.

use thiserror::Error;

use crate::settings::{ViewSettings, DEFAULT_PAGE_SIZE};

/// Page sizes offered when none are configured.
pub const DEFAULT_PAGE_SIZE_OPTIONS: [u64; 4] = [10, 25, 50, 100];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PagerError {
    #[error("Invalid page size '{0}'")]
    InvalidPageSize(String),

    #[error("At least one page size option is required")]
    NoPageSizeOptions,
}

/// What a pager (or grid) needs from a data provider.
pub trait GridDataSource {
    /// Total matching records across all pages.
    fn model_item_count(&self) -> u64;

    fn current_view_settings(&self) -> ViewSettings;

    /// Settings the next request will carry. Sources that apply changes
    /// immediately can rely on the default.
    fn effective_view_settings(&self) -> ViewSettings {
        self.current_view_settings()
    }

    /// Requests the zero-based page `index`.
    fn page(&self, index: u64);

    fn set_page_size(&self, size: u64);
}

/// Parses a comma-separated list such as `"2,5,8"`.
pub fn parse_page_size_options(input: &str) -> Result<Vec<u64>, PagerError> {
    let options = input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.parse::<u64>() {
            Ok(size) if size > 0 => Ok(size),
            _ => Err(PagerError::InvalidPageSize(part.to_string())),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if options.is_empty() {
        return Err(PagerError::NoPageSizeOptions);
    }
    Ok(options)
}

pub struct Pager<S> {
    source: S,
    page_size_options: Vec<u64>,
}

impl<S: GridDataSource> Pager<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
        }
    }

    pub fn with_page_size_options(source: S, options: Vec<u64>) -> Result<Self, PagerError> {
        if options.is_empty() {
            return Err(PagerError::NoPageSizeOptions);
        }
        if options.contains(&0) {
            return Err(PagerError::InvalidPageSize("0".to_string()));
        }
        Ok(Self {
            source,
            page_size_options: options,
        })
    }

    /// Binds the pager to its source by applying the first page size option.
    pub fn attach(&self) {
        self.source.set_page_size(self.page_size_options[0]);
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn page_size_options(&self) -> &[u64] {
        &self.page_size_options
    }

    /// Page size of the committed window.
    pub fn page_size(&self) -> u64 {
        page_size(&self.source.current_view_settings())
    }

    /// Zero-based index of the committed page.
    pub fn current_page(&self) -> u64 {
        page_index(&self.source.current_view_settings())
    }

    /// Page the source is moving to, which runs ahead of
    /// [`current_page`](Self::current_page) until the request commits.
    pub fn requested_page(&self) -> u64 {
        page_index(&self.source.effective_view_settings())
    }

    /// Number of pages; an empty collection still has one (empty) page.
    pub fn page_count(&self) -> u64 {
        self.source
            .model_item_count()
            .div_ceil(self.page_size())
            .max(1)
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page() == 0
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page() + 1 >= self.page_count()
    }

    pub fn first(&self) {
        self.go_to(0);
    }

    /// Steps back from the requested page, so repeated calls inside one
    /// debounce window keep moving.
    pub fn previous(&self) {
        self.go_to(self.requested_page().saturating_sub(1));
    }

    pub fn next(&self) {
        self.go_to(self.requested_page().saturating_add(1));
    }

    pub fn last(&self) {
        self.go_to(self.page_count() - 1);
    }

    /// Moves to `index`, clamped to the last page. Nothing is requested if
    /// that page is already requested.
    pub fn go_to(&self, index: u64) {
        let target = index.min(self.page_count() - 1);
        if target == self.requested_page() {
            return;
        }
        self.source.page(target);
    }

    pub fn set_page_size(&self, size: u64) {
        self.source.set_page_size(size);
    }
}

fn page_size(settings: &ViewSettings) -> u64 {
    settings
        .limit_to
        .map(|limit_to| limit_to.limit)
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

fn page_index(settings: &ViewSettings) -> u64 {
    let begin = settings.limit_to.map(|limit_to| limit_to.begin).unwrap_or(0);
    begin / page_size(settings)
}
