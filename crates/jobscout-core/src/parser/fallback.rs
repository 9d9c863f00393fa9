//! Regex fallback parser for job search result cards
//!
//! Used when the structured tier finds nothing. Splits the raw markup at
//! every card opening tag and pattern-matches each chunk.

use regex::Regex;

use super::{clean_text, decode_html_entities};
use crate::types::{JobPosting, dedup_by_id};
use crate::url::normalize_job_link;

/// Patterns for one fallback pass, in priority order per field
struct FallbackPatterns {
    card_open: Regex,
    id: Regex,
    links: [Regex; 2],
    titles: [Regex; 2],
    companies: [Regex; 2],
    locations: [Regex; 2],
    date: Regex,
    logo: Regex,
}

impl FallbackPatterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            card_open: Regex::new(
                r#"(?i)<div[^>]+class=["'][^"']*base-card[^"']*job-search-card[^"']*["'][^>]*data-entity-urn="#,
            )?,
            id: Regex::new(r"jobPosting:(\d+)")?,
            links: [
                Regex::new(
                    r#"(?i)<a[^>]*class=["'][^"']*base-card__full-link[^"']*["'][^>]*href=["']([^"']*/jobs/view/[^"']*)["']"#,
                )?,
                Regex::new(r#"(?i)<a[^>]*href=["']([^"']*/jobs/view/[^"']*)["']"#)?,
            ],
            titles: [
                Regex::new(
                    r#"(?is)<h3[^>]*class=["'][^"']*base-search-card__title[^"']*["'][^>]*>(.*?)</h3>"#,
                )?,
                Regex::new(
                    r#"(?is)<span[^>]*class=["'][^"']*(?:sr-only|visually-hidden)[^"']*["'][^>]*>(.*?)</span>"#,
                )?,
            ],
            companies: [
                Regex::new(
                    r#"(?is)<h4[^>]*class=["'][^"']*base-search-card__subtitle[^"']*["'][^>]*>.*?<a[^>]*>(.*?)</a>.*?</h4>"#,
                )?,
                Regex::new(r"(?is)<h4[^>]*>(.*?)</h4>")?,
            ],
            locations: [
                Regex::new(
                    r#"(?is)<span[^>]*class=["'][^"']*job-search-card__location[^"']*["'][^>]*>(.*?)</span>"#,
                )?,
                Regex::new(
                    r#"(?is)<div[^>]*class=["'][^"']*job-search-card__location[^"']*["'][^>]*>(.*?)</div>"#,
                )?,
            ],
            date: Regex::new(r#"(?i)<time[^>]*datetime=["']([^"']+)["'][^>]*>"#)?,
            logo: Regex::new(r#"(?i)<img[^>]+data-delayed-url=["']([^"']+)["'][^>]*>"#)?,
        })
    }
}

/// Scans raw markup for result cards with regular expressions
///
/// Chunks without an id or a job link are skipped. The output is
/// deduplicated by id like the structured tier.
pub fn parse_fallback(html: &str) -> Vec<JobPosting> {
    let patterns = match FallbackPatterns::compile() {
        Ok(patterns) => patterns,
        Err(e) => {
            tracing::warn!(error = %e, "fallback patterns failed to compile");
            return Vec::new();
        }
    };

    let jobs: Vec<JobPosting> = patterns
        .card_open
        .split(html)
        .skip(1)
        .filter_map(|chunk| parse_chunk(chunk, &patterns))
        .collect();

    dedup_by_id(jobs)
}

/// Parses the markup following one card's `data-entity-urn=`
fn parse_chunk(chunk: &str, patterns: &FallbackPatterns) -> Option<JobPosting> {
    let id = capture(&patterns.id, chunk, 1)?;

    let href = patterns
        .links
        .iter()
        .find_map(|re| capture(re, chunk, 1))?;
    let url = normalize_job_link(&decode_html_entities(href));

    let title = first_capture(&patterns.titles, chunk);
    let company = first_capture(&patterns.companies, chunk);
    let location = first_capture(&patterns.locations, chunk);
    let date = capture(&patterns.date, chunk, 1).unwrap_or_default().to_string();
    let logo = capture(&patterns.logo, chunk, 1)
        .map(decode_html_entities)
        .unwrap_or_default();

    Some(JobPosting {
        id: id.to_string(),
        title,
        company,
        location,
        date,
        url,
        logo,
    })
}

fn capture<'a>(re: &Regex, text: &'a str, group: usize) -> Option<&'a str> {
    re.captures(text)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
}

/// Cleaned text of the first pattern that matches
///
/// A match with empty text still wins over the looser patterns after it.
fn first_capture(patterns: &[Regex], chunk: &str) -> String {
    patterns
        .iter()
        .find_map(|re| re.captures(chunk).and_then(|caps| caps.get(1)))
        .map(|m| clean_text(&decode_html_entities(m.as_str())))
        .unwrap_or_default()
}
