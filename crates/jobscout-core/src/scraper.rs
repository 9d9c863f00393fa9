//! Multi-page search orchestration
//!
//! Combines the page fetcher, the parser and the pacing policy into the
//! high-level search API.

use std::sync::Arc;

use crate::client::{JobsClient, PacingPolicy, PageFetcher, PageRequest};
use crate::error::Result;
use crate::parser::parse_jobs;
use crate::types::{JobPosting, SearchParams, dedup_by_id};
use crate::url::{PAGE_SIZE, build_page_query, build_referer_query, build_search_url};

/// Main scraper API for LinkedIn job search
///
/// Pages are fetched strictly one after another with the pacing interval
/// between them.
pub struct JobScraper {
    fetcher: Arc<dyn PageFetcher>,
    pacing: PacingPolicy,
}

impl JobScraper {
    /// Create a scraper with the default HTTP client and pacing
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn new() -> Result<Self> {
        let client = JobsClient::new()?;
        Ok(Self::with_fetcher(Arc::new(client), PacingPolicy::default()))
    }

    /// Create a scraper over any page fetcher
    pub fn with_fetcher(fetcher: Arc<dyn PageFetcher>, pacing: PacingPolicy) -> Self {
        Self { fetcher, pacing }
    }

    pub fn pacing(&self) -> PacingPolicy {
        self.pacing
    }

    /// Search across `params.pages` result pages
    ///
    /// Stops at the first page whose body comes back empty and returns what
    /// was collected so far. Duplicate ids across pages keep the values
    /// seen last.
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> jobscout_core::Result<()> {
    /// use jobscout_core::{JobScraper, SearchParams};
    /// let scraper = JobScraper::new()?;
    /// let mut params = SearchParams::new("rust developer");
    /// params.pages = 2;
    /// for job in scraper.search(&params).await {
    ///     println!("{} @ {}: {}", job.title, job.company, job.url);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(&self, params: &SearchParams) -> Vec<JobPosting> {
        let pages = params.page_count();
        let referer_query = build_referer_query(params);
        let mut all = Vec::new();

        for page in 0..pages {
            if page > 0 {
                self.pacing.pause().await;
            }

            let start = params.start.saturating_add(page * PAGE_SIZE);
            let request = PageRequest {
                url: build_search_url(self.fetcher.endpoint(), &build_page_query(params, start)),
                language_tag: params.language_tag.clone(),
                referer_query: referer_query.clone(),
            };

            let html = self.fetcher.fetch_page(&request).await;
            if html.is_empty() {
                tracing::info!(page, start, "empty upstream body, stopping");
                break;
            }

            let jobs = parse_jobs(&html);
            tracing::debug!(page, start, count = jobs.len(), "parsed result page");
            all.extend(jobs);
        }

        dedup_by_id(all)
    }
}
