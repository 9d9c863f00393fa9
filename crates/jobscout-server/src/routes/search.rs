use axum::{
    Json,
    extract::{Query, State},
};
use jobscout_core::{DEFAULT_LANGUAGE_TAG, JobPosting, MAX_PAGES, SearchParams};

use crate::app::AppState;

/// Raw search query as sent by the client
///
/// Upstream parameter names (`_l`, `f_WT`, ...) and their descriptive
/// aliases are both accepted. A repeated key is joined with commas.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keywords: Option<String>,
    pub location: Option<String>,
    pub language_tag: Option<String>,
    pub start: Option<String>,
    pub pages: Option<String>,
    pub geo_id: Option<String>,
    pub work_type: Option<String>,
    pub time_posted_range: Option<String>,
    pub experience_level: Option<String>,
    pub job_type: Option<String>,
    pub sort_by: Option<String>,
}

impl SearchQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "keywords" => &mut query.keywords,
                "location" => &mut query.location,
                "_l" | "languageTag" => &mut query.language_tag,
                "start" => &mut query.start,
                "pages" => &mut query.pages,
                "geoId" => &mut query.geo_id,
                "f_WT" | "workType" => &mut query.work_type,
                "f_TPR" | "timePostedRange" => &mut query.time_posted_range,
                "f_E" | "experienceLevel" => &mut query.experience_level,
                "f_JT" | "jobType" => &mut query.job_type,
                "sortBy" => &mut query.sort_by,
                _ => continue,
            };

            match slot {
                Some(existing) => {
                    existing.push(',');
                    existing.push_str(&value);
                }
                None => *slot = Some(value),
            }
        }

        query
    }

    /// Converts to orchestrator parameters, defaulting and clamping bad input
    pub fn into_params(self) -> SearchParams {
        let start = self
            .start
            .as_deref()
            .and_then(parse_int_prefix)
            .unwrap_or(0)
            .clamp(0, i64::from(u32::MAX));
        let pages = self
            .pages
            .as_deref()
            .and_then(parse_int_prefix)
            .unwrap_or(1)
            .clamp(1, i64::from(MAX_PAGES));

        SearchParams {
            keywords: self.keywords.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            language_tag: non_empty(self.language_tag)
                .unwrap_or_else(|| DEFAULT_LANGUAGE_TAG.to_string()),
            start: start as u32,
            pages: pages as u32,
            geo_id: non_empty(self.geo_id),
            work_type: non_empty(self.work_type),
            time_posted_range: non_empty(self.time_posted_range),
            experience_level: non_empty(self.experience_level),
            job_type: non_empty(self.job_type),
            sort_by: non_empty(self.sort_by),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Leading integer of a string, ignoring trailing garbage ("3abc" -> 3)
fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Saturate overlong numbers instead of rejecting them
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// Handler for GET /api/search
pub async fn search_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Vec<JobPosting>> {
    let params = SearchQuery::from_pairs(pairs).into_params();
    tracing::info!(
        keywords = %params.keywords,
        location = %params.location,
        start = params.start,
        pages = params.pages,
        "search request"
    );

    let jobs = state.scraper.search(&params).await;
    tracing::info!(count = jobs.len(), "search complete");
    Json(jobs)
}
