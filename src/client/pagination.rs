//! Offset pagination over the releases collection
//!
//! FoD returns releases in pages of [`PAGE_SIZE`] items together with the
//! `totalCount` of the whole collection. The first page tells us how many
//! further pages to request.

use log::debug;

use super::ReleaseApi;
use super::models::ReleaseSummary;
use crate::error::Result;

/// Number of releases FoD returns per page
pub const PAGE_SIZE: usize = 50;

/// Number of pages needed to cover `total_count` items
pub fn page_count(total_count: usize) -> usize {
    total_count.div_ceil(PAGE_SIZE)
}

/// Offset of the given 0-indexed page
pub fn page_offset(page: usize) -> usize {
    page * PAGE_SIZE
}

/// Fetch every release, in page order then within-page order.
///
/// Any page that fails to load or decode aborts the enumeration.
pub async fn fetch_all_releases<C>(client: &C) -> Result<Vec<ReleaseSummary>>
where
    C: ReleaseApi + ?Sized,
{
    let first_page = client.list_releases(0).await?;
    let total_pages = page_count(first_page.total_count);

    debug!(
        "Release collection reports {} releases across {} pages",
        first_page.total_count, total_pages
    );

    if total_pages == 0 {
        return Ok(Vec::new());
    }

    // `totalCount` only drives the page count
    let mut releases = first_page.items;

    for page in 1..total_pages {
        let offset = page_offset(page);
        let next = client.list_releases(offset).await?;
        debug!("Page {} (offset {}) returned {} releases", page, offset, next.items.len());
        releases.extend(next.items);
    }

    Ok(releases)
}
