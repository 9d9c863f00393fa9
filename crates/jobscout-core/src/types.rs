//! Core data types for the job search scraper
//!
//! Contains the records produced by the parser and the parameters
//! accepted by the page orchestrator.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Default upstream language tag
pub const DEFAULT_LANGUAGE_TAG: &str = "en_US";

/// Maximum number of pages a single search may request
pub const MAX_PAGES: u32 = 10;

/// Represents one job listing from the public search results
///
/// Constructed per parse call and returned to the caller as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    /// Numeric job identifier (e.g., "3912345678")
    pub id: String,

    /// Job title, empty if it could not be extracted
    pub title: String,

    /// Hiring company name
    pub company: String,

    /// Human readable location (e.g., "Milan, Lombardy, Italy")
    pub location: String,

    /// ISO-8601 posting date from the card's `<time datetime>`, or empty
    pub date: String,

    /// Absolute job view URL without query string
    pub url: String,

    /// Company logo URL from the lazy-load attribute, or empty
    pub logo: String,
}

/// Parameters of one search across one or more result pages
///
/// Filter values are passed to the upstream query verbatim; multi-value
/// filters are comma-separated strings such as `"1,2"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub keywords: String,
    pub location: String,
    /// Upstream locale such as `en_US`
    pub language_tag: String,
    /// Offset of the first result
    pub start: u32,
    /// Number of pages to fetch, clamped to `1..=MAX_PAGES` by the orchestrator
    pub pages: u32,
    pub geo_id: Option<String>,
    /// `f_WT` (on-site, remote, hybrid)
    pub work_type: Option<String>,
    /// `f_TPR` (e.g., `r86400` for the last 24 hours)
    pub time_posted_range: Option<String>,
    /// `f_E`
    pub experience_level: Option<String>,
    /// `f_JT`
    pub job_type: Option<String>,
    pub sort_by: Option<String>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            keywords: String::new(),
            location: String::new(),
            language_tag: DEFAULT_LANGUAGE_TAG.to_string(),
            start: 0,
            pages: 1,
            geo_id: None,
            work_type: None,
            time_posted_range: None,
            experience_level: None,
            job_type: None,
            sort_by: None,
        }
    }
}

impl SearchParams {
    /// Create parameters for a keyword search with all other fields defaulted
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            ..Self::default()
        }
    }

    /// Page count clamped to `1..=MAX_PAGES`
    pub fn page_count(&self) -> u32 {
        self.pages.clamp(1, MAX_PAGES)
    }
}

/// Removes duplicate ids, keeping the values of the last occurrence
///
/// Each id keeps the position where it first appeared.
pub fn dedup_by_id(jobs: Vec<JobPosting>) -> Vec<JobPosting> {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(jobs.len());
    let mut out: Vec<JobPosting> = Vec::with_capacity(jobs.len());

    for job in jobs {
        match index.get(&job.id) {
            Some(&pos) => out[pos] = job,
            None => {
                index.insert(job.id.clone(), out.len());
                out.push(job);
            }
        }
    }

    out
}
