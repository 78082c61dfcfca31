//! Paging for the budget and transaction lists.
//!
//! Pages are numbered from 1 in the UI and in query strings. The API numbers them from 0.

use maud::{Markup, html};

/// The page sizes a user can pick for the transaction list.
pub const PAGE_SIZE_OPTIONS: [u64; 3] = [10, 20, 50];

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of transactions to display per page when not specified in a request.
    pub default_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 20,
            max_pages: 5,
        }
    }
}

impl PaginationConfig {
    /// Use `requested` if it is one of [PAGE_SIZE_OPTIONS], otherwise the default page size.
    pub fn page_size_or_default(&self, requested: Option<u64>) -> u64 {
        requested
            .filter(|size| PAGE_SIZE_OPTIONS.contains(size))
            .unwrap_or(self.default_page_size)
    }

    /// Use `requested` if it is a valid 1-based page number, otherwise the default page.
    pub fn page_or_default(&self, requested: Option<u64>) -> u64 {
        requested
            .filter(|page| *page >= 1)
            .unwrap_or(self.default_page)
    }
}

/// Convert a 1-based UI page number into the API's 0-based page index.
pub fn to_api_page(page: u64) -> u64 {
    page.saturating_sub(1)
}

#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    let mut indicators: Vec<PaginationIndicator> = if page_count <= max_pages {
        (1..=page_count).map(map_page).collect()
    } else if curr_page <= (max_pages / 2) {
        (1..=max_pages).map(map_page).collect()
    } else if curr_page > (page_count - max_pages / 2) {
        ((page_count - max_pages + 1)..=page_count)
            .map(map_page)
            .collect()
    } else {
        ((curr_page - max_pages / 2)..=(curr_page + max_pages / 2))
            .map(map_page)
            .collect()
    };

    if page_count > max_pages {
        if curr_page > (max_pages / 2) + 1 {
            indicators.insert(0, PaginationIndicator::Page(1));
            indicators.insert(1, PaginationIndicator::Ellipsis);
        }

        if curr_page < (page_count - max_pages / 2) {
            indicators.push(PaginationIndicator::Ellipsis);
            indicators.push(PaginationIndicator::Page(page_count));
        }
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}

const PAGE_LINK_STYLE: &str = "block px-3 py-2 leading-tight text-gray-500 bg-white \
    border border-gray-300 rounded hover:bg-gray-100 hover:text-gray-700 \
    dark:bg-gray-800 dark:border-gray-700 dark:text-gray-400 \
    dark:hover:bg-gray-700 dark:hover:text-white";
const CURRENT_PAGE_STYLE: &str = "block px-3 py-2 leading-tight text-blue-600 \
    border border-blue-300 bg-blue-50 rounded dark:border-gray-700 \
    dark:bg-gray-700 dark:text-white";

/// Render `indicators` as a list of links, where `page_url` gives the URL for a page number.
pub fn pagination_nav(
    indicators: &[PaginationIndicator],
    page_url: impl Fn(u64) -> String,
) -> Markup {
    html! {
        nav class="flex justify-center pt-4" aria-label="Pagination"
        {
            ul class="inline-flex gap-1 text-sm"
            {
                @for indicator in indicators {
                    li {
                        @match indicator {
                            PaginationIndicator::Page(page) => {
                                a href=(page_url(*page)) class=(PAGE_LINK_STYLE) { (page) }
                            }
                            PaginationIndicator::CurrPage(page) => {
                                span aria-current="page" class=(CURRENT_PAGE_STYLE) { (page) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class="block px-3 py-2" { "..." }
                            }
                            PaginationIndicator::BackButton(page) => {
                                a href=(page_url(*page)) class=(PAGE_LINK_STYLE) { "Back" }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a href=(page_url(*page)) class=(PAGE_LINK_STYLE) { "Next" }
                            }
                        }
                    }
                }
            }
        }
    }
}
