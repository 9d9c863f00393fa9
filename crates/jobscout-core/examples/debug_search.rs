//! Debug script to inspect a live search page and both parser tiers

use jobscout_core::parser::{StructuredOutcome, parse_fallback, parse_structured};
use jobscout_core::url::{SEARCH_ENDPOINT, build_page_query, build_referer_query, build_search_url};
use jobscout_core::{JobsClient, PageFetcher, PageRequest, SearchParams};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let keywords = std::env::args().nth(1).unwrap_or_else(|| "rust developer".to_string());
    let params = SearchParams::new(keywords);

    let request = PageRequest {
        url: build_search_url(SEARCH_ENDPOINT, &build_page_query(&params, 0)),
        language_tag: params.language_tag.clone(),
        referer_query: build_referer_query(&params),
    };
    println!("Fetching {}\n", request.url);

    let client = JobsClient::new()?;
    let html = client.fetch_page(&request).await;
    if html.is_empty() {
        println!("Upstream returned no body");
        return Ok(());
    }

    // Save HTML to file for inspection
    std::fs::write("debug_search.html", &html)?;
    println!("HTML saved to debug_search.html ({} bytes)", html.len());

    let structured = match parse_structured(&html) {
        StructuredOutcome::Structured(jobs) => jobs.len(),
        StructuredOutcome::NeedsFallback => 0,
    };
    let fallback = parse_fallback(&html).len();
    println!("structured tier: {} postings, regex tier: {} postings\n", structured, fallback);

    for job in jobscout_core::parse_jobs(&html) {
        println!("{:>12}  {} | {} | {} | {}", job.id, job.title, job.company, job.location, job.date);
    }

    Ok(())
}
