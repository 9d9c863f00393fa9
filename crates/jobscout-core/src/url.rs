//! URL helper functions for LinkedIn job search
//!
//! Builds upstream search queries, referer queries and canonical job links.

use crate::types::SearchParams;

/// Site origin used for relative links
pub const SITE_ORIGIN: &str = "https://www.linkedin.com";

/// Guest endpoint returning one page of search result cards
pub const SEARCH_ENDPOINT: &str =
    "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search";

/// Public search page the upstream request claims to come from
pub const REFERER_BASE: &str = "https://www.linkedin.com/jobs/search/";

/// Number of cards the upstream returns per page
pub const PAGE_SIZE: u32 = 25;

/// Ordered list of query pairs, serialized with percent-encoding
#[derive(Debug, Default)]
struct QueryString {
    pairs: Vec<(&'static str, String)>,
}

impl QueryString {
    fn set(&mut self, key: &'static str, value: &str) {
        self.pairs.push((key, value.to_string()));
    }

    /// Adds the pair only when the value is present and non-empty
    fn set_opt(&mut self, key: &'static str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.set(key, value);
        }
    }

    fn finish(self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn non_empty(value: &str) -> Option<&str> {
    Some(value).filter(|v| !v.is_empty())
}

/// Builds the upstream query for one page starting at `start`
///
/// # Example
/// ```
/// use jobscout_core::SearchParams;
/// use jobscout_core::url::build_page_query;
/// let mut params = SearchParams::new("rust developer");
/// params.work_type = Some("1,2".to_string());
/// let query = build_page_query(&params, 25);
/// assert_eq!(query, "keywords=rust%20developer&start=25&_l=en_US&f_WT=1%2C2");
/// ```
pub fn build_page_query(params: &SearchParams, start: u32) -> String {
    let mut qs = QueryString::default();
    qs.set_opt("keywords", non_empty(&params.keywords));
    qs.set_opt("location", non_empty(&params.location));
    qs.set_opt("geoId", params.geo_id.as_deref());
    qs.set("start", &start.to_string());
    qs.set("_l", &params.language_tag);
    push_filters(&mut qs, params);
    qs.set_opt("sortBy", params.sort_by.as_deref());
    qs.finish()
}

/// Builds the referer query reflecting the active filters, without pagination
pub fn build_referer_query(params: &SearchParams) -> String {
    let mut qs = QueryString::default();
    qs.set_opt("keywords", non_empty(&params.keywords));
    qs.set_opt("location", non_empty(&params.location));
    qs.set_opt("sortBy", params.sort_by.as_deref());
    qs.set_opt("geoId", params.geo_id.as_deref());
    push_filters(&mut qs, params);
    qs.finish()
}

fn push_filters(qs: &mut QueryString, params: &SearchParams) {
    qs.set_opt("f_WT", params.work_type.as_deref());
    qs.set_opt("f_TPR", params.time_posted_range.as_deref());
    qs.set_opt("f_E", params.experience_level.as_deref());
    qs.set_opt("f_JT", params.job_type.as_deref());
}

/// Full upstream URL for a page query
pub fn build_search_url(endpoint: &str, query: &str) -> String {
    format!("{}?{}", endpoint, query)
}

/// Referer header value for a referer query
///
/// # Example
/// ```
/// use jobscout_core::url::build_referer_url;
/// assert_eq!(build_referer_url(""), "https://www.linkedin.com/jobs/search/");
/// assert_eq!(
///     build_referer_url("keywords=rust"),
///     "https://www.linkedin.com/jobs/search/?keywords=rust"
/// );
/// ```
pub fn build_referer_url(referer_query: &str) -> String {
    if referer_query.is_empty() {
        REFERER_BASE.to_string()
    } else {
        format!("{}?{}", REFERER_BASE, referer_query)
    }
}

/// `Accept-Language` value for an upstream locale (`en_US` -> `en-US,en;q=0.8`)
pub fn accept_language(language_tag: &str) -> String {
    format!("{},en;q=0.8", language_tag.replacen('_', "-", 1))
}

/// Makes a job link absolute and drops its query string
///
/// # Example
/// ```
/// use jobscout_core::url::normalize_job_link;
/// assert_eq!(
///     normalize_job_link("/jobs/view/123456?refId=abc"),
///     "https://www.linkedin.com/jobs/view/123456"
/// );
/// ```
pub fn normalize_job_link(href: &str) -> String {
    let absolute = if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", SITE_ORIGIN, href)
    };

    match absolute.split_once('?') {
        Some((base, _)) => base.to_string(),
        None => absolute,
    }
}

/// Extracts the numeric job id from a `/jobs/view/<id>` link
///
/// Also accepts slugged paths like `/jobs/view/rust-engineer-at-acme-123456`.
pub fn job_id_from_link(link: &str) -> Option<String> {
    let (_, rest) = link.split_once("/jobs/view/")?;
    let segment = rest.split(['/', '?', '#']).next().unwrap_or(rest);

    let digits: String = segment
        .rsplit('-')
        .next()
        .unwrap_or(segment)
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() { None } else { Some(digits) }
}
