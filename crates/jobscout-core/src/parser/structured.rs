//! Structured (DOM) parser for job search result cards
//!
//! Walks the document with CSS selectors and reads each card's fields.

use scraper::{CaseSensitivity, ElementRef, Html, Selector};

use super::clean_text;
use crate::error::{JobsError, Result};
use crate::types::{JobPosting, dedup_by_id};
use crate::url::{job_id_from_link, normalize_job_link};

/// Result of the structured tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredOutcome {
    /// At least one card was read; already deduplicated
    Structured(Vec<JobPosting>),
    /// Nothing usable was found, or the selectors could not be built
    NeedsFallback,
}

/// Selectors used by the structured tier, compiled once per parse
struct CardSelectors {
    candidate: Selector,
    card: Selector,
    urn: Selector,
    full_link: Selector,
    any_link: Selector,
    title: Selector,
    hidden_title: Selector,
    company: Vec<Selector>,
    location: Vec<Selector>,
    time: Selector,
    logo: Selector,
}

impl CardSelectors {
    fn compile() -> Result<Self> {
        Ok(Self {
            candidate: selector("li, .base-card.job-search-card")?,
            card: selector(".base-card.job-search-card")?,
            urn: selector("[data-entity-urn]")?,
            full_link: selector("a.base-card__full-link[href*='/jobs/view/']")?,
            any_link: selector("a[href*='/jobs/view/']")?,
            title: selector("h3.base-search-card__title")?,
            hidden_title: selector(".sr-only, .visually-hidden")?,
            company: vec![
                selector(".base-search-card__subtitle .hidden-nested-link")?,
                selector(".base-search-card__subtitle")?,
                selector(".job-search-card__subtitle")?,
            ],
            location: vec![
                selector(".job-search-card__location")?,
                selector(".job-card-container__metadata-item")?,
            ],
            time: selector("time")?,
            logo: selector(".search-entity-media img")?,
        })
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| JobsError::ParseError(format!("Invalid selector {}: {:?}", css, e)))
}

/// Runs the structured tier over a page of markup
///
/// # Arguments
/// * `html` - Raw HTML of one result page
///
/// # Returns
/// `Structured` with deduplicated postings, or `NeedsFallback` when no
/// card could be read
pub fn parse_structured(html: &str) -> StructuredOutcome {
    let selectors = match CardSelectors::compile() {
        Ok(selectors) => selectors,
        Err(e) => {
            tracing::warn!(error = %e, "structured parser unavailable");
            return StructuredOutcome::NeedsFallback;
        }
    };

    let document = Html::parse_document(html);
    let mut jobs = Vec::new();

    for candidate in document.select(&selectors.candidate) {
        let Some(card) = resolve_card(candidate, &selectors) else {
            continue;
        };
        if let Some(job) = parse_card(card, &selectors) {
            jobs.push(job);
        }
    }

    if jobs.is_empty() {
        StructuredOutcome::NeedsFallback
    } else {
        StructuredOutcome::Structured(dedup_by_id(jobs))
    }
}

/// Returns the card itself, or the first card nested inside a list item
fn resolve_card<'a>(element: ElementRef<'a>, selectors: &CardSelectors) -> Option<ElementRef<'a>> {
    if is_card(&element) {
        Some(element)
    } else {
        element.select(&selectors.card).next()
    }
}

fn is_card(element: &ElementRef) -> bool {
    let value = element.value();
    value.has_class("base-card", CaseSensitivity::CaseSensitive)
        && value.has_class("job-search-card", CaseSensitivity::CaseSensitive)
}

/// Parses a single result card
///
/// Cards without a job link, or without any source for the id, are skipped.
fn parse_card(card: ElementRef, selectors: &CardSelectors) -> Option<JobPosting> {
    let urn = card
        .value()
        .attr("data-entity-urn")
        .or_else(|| {
            card.select(&selectors.urn)
                .next()
                .and_then(|el| el.value().attr("data-entity-urn"))
        })
        .unwrap_or_default();
    let urn_id = job_id_from_urn(urn);

    let anchor = card
        .select(&selectors.full_link)
        .next()
        .or_else(|| card.select(&selectors.any_link).next())?;
    let href = anchor.value().attr("href").unwrap_or_default();
    if href.is_empty() {
        return None;
    }
    let url = normalize_job_link(href);

    let id = match urn_id {
        Some(id) => id,
        None => job_id_from_link(&url)?,
    };

    let title = first_text(card, std::slice::from_ref(&selectors.title))
        .or_else(|| first_text(anchor, std::slice::from_ref(&selectors.hidden_title)))
        .unwrap_or_default();
    let company = first_text(card, &selectors.company).unwrap_or_default();
    let location = first_text(card, &selectors.location).unwrap_or_default();

    let date = card
        .select(&selectors.time)
        .next()
        .and_then(|el| el.value().attr("datetime"))
        .unwrap_or_default()
        .to_string();

    // `src` carries a placeholder; the real logo only lives in the lazy-load attribute
    let logo = card
        .select(&selectors.logo)
        .next()
        .and_then(|img| img.value().attr("data-delayed-url"))
        .unwrap_or_default()
        .to_string();

    Some(JobPosting {
        id,
        title,
        company,
        location,
        date,
        url,
        logo,
    })
}

/// Extracts the numeric id from an entity urn like `urn:li:jobPosting:123`
pub(crate) fn job_id_from_urn(urn: &str) -> Option<String> {
    let (_, rest) = urn.split_once("jobPosting:")?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() { None } else { Some(digits) }
}

/// Text of the first element matching any selector, tried in priority order
fn first_text(scope: ElementRef, selectors: &[Selector]) -> Option<String> {
    selectors.iter().find_map(|sel| {
        scope
            .select(sel)
            .next()
            .map(|el| clean_text(&el.text().collect::<String>()))
            .filter(|text| !text.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CARD: &str = r#"
    <html><body><ul class="jobs-search__results-list">
      <li>
        <div class="base-card relative w-full base-search-card base-search-card--link job-search-card"
             data-entity-urn="urn:li:jobPosting:3901234567" data-tracking-id="x">
          <a class="base-card__full-link absolute top-0 right-0"
             href="https://it.linkedin.com/jobs/view/rust-engineer-at-acme-3901234567?refId=abc&amp;trackingId=def">
            <span class="sr-only">Rust Engineer (hidden)</span>
          </a>
          <div class="search-entity-media">
            <img class="artdeco-entity-image" src="data:image/gif;base64,placeholder"
                 data-delayed-url="https://media.licdn.com/dms/image/acme-logo.png" alt="Acme">
          </div>
          <div class="base-search-card__info">
            <h3 class="base-search-card__title">
              Rust    Engineer
            </h3>
            <h4 class="base-search-card__subtitle">
              <a class="hidden-nested-link" href="https://www.linkedin.com/company/acme">Acme &amp; Co</a>
            </h4>
            <div class="base-search-card__metadata">
              <span class="job-search-card__location">
                Milan, Lombardy, Italy
              </span>
              <time class="job-search-card__listdate" datetime="2024-05-01">1 week ago</time>
            </div>
          </div>
        </div>
      </li>
    </ul></body></html>
    "#;

    fn structured(html: &str) -> Vec<JobPosting> {
        match parse_structured(html) {
            StructuredOutcome::Structured(jobs) => jobs,
            StructuredOutcome::NeedsFallback => panic!("expected structured outcome"),
        }
    }

    #[test]
    fn test_parse_full_card() {
        let jobs = structured(FULL_CARD);
        assert_eq!(jobs.len(), 1);

        let job = &jobs[0];
        assert_eq!(job.id, "3901234567");
        assert_eq!(job.title, "Rust Engineer");
        assert_eq!(job.company, "Acme & Co");
        assert_eq!(job.location, "Milan, Lombardy, Italy");
        assert_eq!(job.date, "2024-05-01");
        assert_eq!(
            job.url,
            "https://it.linkedin.com/jobs/view/rust-engineer-at-acme-3901234567"
        );
        assert_eq!(job.logo, "https://media.licdn.com/dms/image/acme-logo.png");
    }

    #[test]
    fn test_relative_link_made_absolute_without_query() {
        let html = r#"
        <div class="base-card job-search-card" data-entity-urn="urn:li:jobPosting:123456">
          <a class="base-card__full-link" href="/jobs/view/123456?position=1&pageNum=0">x</a>
          <h3 class="base-search-card__title">Backend Dev</h3>
        </div>"#;

        let jobs = structured(html);
        assert_eq!(jobs[0].url, "https://www.linkedin.com/jobs/view/123456");
    }

    #[test]
    fn test_placeholder_src_gives_empty_logo() {
        let html = r#"
        <div class="base-card job-search-card" data-entity-urn="urn:li:jobPosting:1">
          <a href="/jobs/view/1">x</a>
          <div class="search-entity-media">
            <img src="https://static.licdn.com/placeholder.gif">
          </div>
        </div>"#;

        let jobs = structured(html);
        assert_eq!(jobs[0].logo, "");
    }

    #[test]
    fn test_id_from_link_when_urn_missing() {
        let html = r#"
        <div class="base-card job-search-card">
          <a class="base-card__full-link" href="https://www.linkedin.com/jobs/view/555?trk=x">
            <span class="visually-hidden">Data Engineer</span>
          </a>
        </div>"#;

        let jobs = structured(html);
        assert_eq!(jobs[0].id, "555");
        assert_eq!(jobs[0].title, "Data Engineer");
    }

    #[test]
    fn test_urn_on_nested_element() {
        let html = r#"
        <div class="base-card job-search-card">
          <div data-entity-urn="urn:li:jobPosting:808"></div>
          <a href="https://www.linkedin.com/jobs/view/other-999">x</a>
        </div>"#;

        let jobs = structured(html);
        assert_eq!(jobs[0].id, "808");
    }

    #[test]
    fn test_prefers_full_link_anchor() {
        let html = r#"
        <div class="base-card job-search-card" data-entity-urn="urn:li:jobPosting:42">
          <a href="/jobs/view/42?src=secondary">secondary</a>
          <a class="base-card__full-link" href="/jobs/view/primary-42">primary</a>
        </div>"#;

        let jobs = structured(html);
        assert_eq!(jobs[0].url, "https://www.linkedin.com/jobs/view/primary-42");
    }

    #[test]
    fn test_card_without_link_skipped() {
        let html = r#"
        <div class="base-card job-search-card" data-entity-urn="urn:li:jobPosting:1">
          <h3 class="base-search-card__title">No link</h3>
        </div>"#;

        assert_eq!(parse_structured(html), StructuredOutcome::NeedsFallback);
    }

    #[test]
    fn test_card_without_any_id_skipped() {
        let html = r#"
        <div class="base-card job-search-card">
          <a href="/jobs/view/not-a-number">x</a>
        </div>"#;

        assert_eq!(parse_structured(html), StructuredOutcome::NeedsFallback);
    }

    #[test]
    fn test_company_and_location_fallback_classes() {
        let html = r#"
        <div class="base-card job-search-card" data-entity-urn="urn:li:jobPosting:9">
          <a href="/jobs/view/9">x</a>
          <h4 class="job-search-card__subtitle"> Initech </h4>
          <span class="job-card-container__metadata-item">Remote</span>
        </div>"#;

        let jobs = structured(html);
        assert_eq!(jobs[0].company, "Initech");
        assert_eq!(jobs[0].location, "Remote");
        assert_eq!(jobs[0].date, "");
    }

    #[test]
    fn test_cards_outside_list_items_and_duplicates() {
        let html = r#"
        <div class="base-card job-search-card" data-entity-urn="urn:li:jobPosting:1">
          <a href="/jobs/view/1">a</a><h3 class="base-search-card__title">One</h3>
        </div>
        <div class="base-card job-search-card" data-entity-urn="urn:li:jobPosting:2">
          <a href="/jobs/view/2">b</a><h3 class="base-search-card__title">Two</h3>
        </div>
        <div class="base-card job-search-card" data-entity-urn="urn:li:jobPosting:1">
          <a href="/jobs/view/1">c</a><h3 class="base-search-card__title">One again</h3>
        </div>"#;

        let jobs = structured(html);
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].title, "One again");
        assert_eq!(jobs[1].title, "Two");
    }

    #[test]
    fn test_job_id_from_urn() {
        assert_eq!(job_id_from_urn("urn:li:jobPosting:123"), Some("123".to_string()));
        assert_eq!(job_id_from_urn("urn:li:company:123"), None);
        assert_eq!(job_id_from_urn(""), None);
    }
}
