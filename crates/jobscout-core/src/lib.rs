//! jobscout Core Library
//!
//! Retrieves job postings from LinkedIn's public guest search results and
//! returns them as normalized records.
//!
//! # Overview
//!
//! This crate provides the extraction pipeline behind the jobscout API:
//! - HTML parsers with a structured tier and a regex fallback tier
//! - A paced multi-page search orchestrator
//! - A per-client request governor protecting the upstream service
//! - An HTTP client sending a browser-like header set
//!
//! # Example
//!
//! ```no_run
//! use jobscout_core::{JobScraper, Result, SearchParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scraper = JobScraper::new()?;
//!
//!     let mut params = SearchParams::new("rust developer");
//!     params.location = "Italy".to_string();
//!     params.work_type = Some("2,3".to_string());
//!     params.pages = 3;
//!
//!     for job in scraper.search(&params).await {
//!         println!("{} - {} ({})", job.title, job.company, job.url);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Failure model
//!
//! Searching never fails. Upstream errors end the page loop early and the
//! postings collected so far are returned; unreadable markup falls back to
//! regex extraction.

mod client;
mod error;
pub mod governor;
pub mod parser;
mod scraper;
mod types;
pub mod url;

// Re-export client types
pub use client::{ClientConfig, JobsClient, PacingPolicy, PageFetcher, PageRequest};

// Re-export error types
pub use error::{JobsError, Result};

// Re-export governor types
pub use governor::{Clock, Decision, GovernorConfig, RateGovernor, RateStore, SystemClock};

// Re-export parser functions
pub use parser::parse_jobs;

// Re-export main scraper API
pub use scraper::JobScraper;

// Re-export data types
pub use types::{DEFAULT_LANGUAGE_TAG, JobPosting, MAX_PAGES, SearchParams, dedup_by_id};
