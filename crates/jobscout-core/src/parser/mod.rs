//! HTML parsers for LinkedIn search result pages
//!
//! Parsing runs as a two-stage pipeline. The structured tier walks the DOM
//! with CSS selectors; when it yields nothing the fallback tier scans the
//! raw markup with regular expressions.

pub mod fallback;
pub mod structured;

use crate::types::JobPosting;

pub use fallback::parse_fallback;
pub use structured::{StructuredOutcome, parse_structured};

/// Parses one page of search result markup into deduplicated job postings
///
/// Never fails: empty input gives an empty list, and markup the structured
/// tier cannot read degrades to the regex tier.
pub fn parse_jobs(html: &str) -> Vec<JobPosting> {
    if html.trim().is_empty() {
        return Vec::new();
    }

    match parse_structured(html) {
        StructuredOutcome::Structured(jobs) => jobs,
        StructuredOutcome::NeedsFallback => {
            let jobs = parse_fallback(html);
            tracing::debug!(count = jobs.len(), "structured parse empty, used regex fallback");
            jobs
        }
    }
}

/// Strips tags and collapses runs of whitespace into single spaces
///
/// A `<` without a closing `>` is kept as literal text.
pub(crate) fn clean_text(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                rest = &rest[open..];
                break;
            }
        }
    }
    text.push_str(rest);

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decodes the handful of entities that show up in result cards
pub(crate) fn decode_html_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn card(id: &str, title: &str) -> String {
        format!(
            r#"<li>
              <div class="base-card relative base-search-card job-search-card"
                   data-entity-urn="urn:li:jobPosting:{id}">
                <a class="base-card__full-link" href="https://www.linkedin.com/jobs/view/{id}?refId=x">
                  <span class="sr-only">{title}</span>
                </a>
                <div class="base-search-card__info">
                  <h3 class="base-search-card__title">{title}</h3>
                </div>
              </div>
            </li>"#
        )
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_jobs("").is_empty());
        assert!(parse_jobs("   \n\t").is_empty());
    }

    #[test]
    fn test_parse_markup_without_cards() {
        assert!(parse_jobs("<html><body><p>No jobs</p></body></html>").is_empty());
    }

    #[test]
    fn test_duplicate_ids_keep_later_block() {
        let html = format!("<ul>{}{}</ul>", card("777", "Old Title"), card("777", "New Title"));
        let jobs = parse_jobs(&html);

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, "777");
        assert_eq!(jobs[0].title, "New Title");
    }

    #[test]
    fn test_clean_text_strips_and_collapses() {
        assert_eq!(clean_text("  <b>Rust</b>\n\n   Engineer  "), "Rust Engineer");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_html_entities("R&amp;D &lt;team&gt;"), "R&D <team>");
        assert_eq!(decode_html_entities("&amp;lt;"), "&lt;");
    }

    proptest! {
        #[test]
        fn prop_clean_text_has_no_tags_or_runs(s in "[a-z <>/\t\n]{0,64}") {
            let cleaned = clean_text(&s);
            prop_assert!(!cleaned.contains("  "));
            prop_assert!(!cleaned.contains('\n'));
            prop_assert_eq!(cleaned.trim(), cleaned.as_str());
        }

        #[test]
        fn prop_parse_never_panics(s in ".{0,256}") {
            let _ = parse_jobs(&s);
        }
    }
}
