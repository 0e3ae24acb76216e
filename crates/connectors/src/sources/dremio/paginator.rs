//! Page arithmetic and ordered page fetching for job results.

use super::models::{JobResultsPage, Row, SchemaField};
use super::JobApi;
use futures::stream::{self, StreamExt, TryStreamExt};
use quarry_common::config::{PaginationSettings, PAGE_SIZE_CEILING};
use quarry_error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

/// Rows to fetch for a job holding `available` rows when at most `max_records` are wanted.
pub fn effective_count(available: u64, max_records: usize) -> usize {
    usize::try_from(available).map_or(max_records, |available| available.min(max_records))
}

/// Split `effective` rows into result calls of at most `page_size` rows.
///
/// At or below the page size this is a single call, even for zero rows. Above it,
/// full pages are followed by one partial page for the remainder. Offsets are
/// contiguous and ascending.
pub fn plan_pages(effective: usize, page_size: usize) -> Vec<PageRequest> {
    let page_size = page_size.max(1);
    if effective <= page_size {
        return vec![PageRequest {
            limit: effective,
            offset: 0,
        }];
    }

    let full_pages = effective / page_size;
    let remainder = effective % page_size;

    let mut pages: Vec<PageRequest> = (0..full_pages)
        .map(|i| PageRequest {
            limit: page_size,
            offset: i * page_size,
        })
        .collect();
    if remainder > 0 {
        pages.push(PageRequest {
            limit: remainder,
            offset: full_pages * page_size,
        });
    }
    pages
}

/// Schema of the first page plus every fetched row in offset order.
#[derive(Debug, Clone, Default)]
pub struct FetchedRows {
    pub schema: Vec<SchemaField>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    page_size: usize,
    concurrency: usize,
}

impl Paginator {
    pub fn new(page_size: usize, concurrency: usize) -> Self {
        Self {
            page_size: page_size.clamp(1, PAGE_SIZE_CEILING),
            concurrency: concurrency.max(1),
        }
    }

    pub fn from_settings(settings: &PaginationSettings) -> Self {
        Self::new(settings.effective_page_size(), settings.concurrency)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Fetch `min(available, max_records)` rows of a completed job.
    ///
    /// Up to `concurrency` pages are in flight at once; results are still assembled
    /// in ascending offset order. The first failing page fails the whole fetch.
    pub async fn fetch(
        &self,
        api: &dyn JobApi,
        token: &str,
        job_id: &str,
        available: u64,
        max_records: usize,
    ) -> Result<FetchedRows> {
        let effective = effective_count(available, max_records);
        let pages = plan_pages(effective, self.page_size);
        tracing::debug!(
            job_id,
            available,
            max_records,
            effective,
            pages = pages.len(),
            "Fetching job results"
        );

        let fetched: Vec<(PageRequest, JobResultsPage)> = stream::iter(pages)
            .map(|page| async move {
                tracing::debug!(job_id, limit = page.limit, offset = page.offset, "Results page");
                api.results_page(token, job_id, page.limit, page.offset)
                    .await
                    .map(|result| (page, result))
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let mut out = FetchedRows {
            schema: Vec::new(),
            rows: Vec::with_capacity(effective),
        };
        for (i, (page, mut result)) in fetched.into_iter().enumerate() {
            if i == 0 {
                out.schema = result.schema;
            }
            // a server that ignores `limit` must not push rows past the effective count
            result.rows.truncate(page.limit);
            out.rows.append(&mut result.rows);
        }

        if out.rows.len() < effective {
            tracing::warn!(
                job_id,
                expected = effective,
                received = out.rows.len(),
                "Service returned fewer rows than requested"
            );
        }
        Ok(out)
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::from_settings(&PaginationSettings::default())
    }
}
