//! Listing page link discovery
//!
//! Every anchor with an `href` inside the content container becomes a
//! [`LinkEntry`], numbered from 1 in document order. Navigation anchors are
//! not filtered out; downstream extraction simply finds no questions on them.

use scraper::Html;
use url::Url;

use super::PageFetcher;
use crate::models::LinkEntry;
use crate::parser::markup::find_all;
use crate::parser::selectors::{CONTENT_CONTAINER, LINK_ANCHOR};

/// Enumerate quiz links on a listing page
///
/// Relative hrefs are resolved against `base` when given; absolute hrefs
/// are kept verbatim so they stay stable as dedup keys. A page without the
/// container yields an empty list.
///
/// ```
/// use quizharvest::crawler::list::discover_links;
///
/// let html = r#"<div class="inside_post column content_width">
///     <a href="https://example.com/quiz-1/">Quiz 1</a>
///     <a href="https://example.com/quiz-2/">Quiz 2</a>
/// </div>"#;
/// let links = discover_links(html, None);
/// assert_eq!(links.len(), 2);
/// assert_eq!(links[1].position, 2);
/// ```
pub fn discover_links(html: &str, base: Option<&Url>) -> Vec<LinkEntry> {
    let document = Html::parse_document(html);

    let Some(container) = document.select(&CONTENT_CONTAINER).next() else {
        tracing::warn!("Listing container not found");
        return Vec::new();
    };

    let links: Vec<LinkEntry> = find_all(container, &LINK_ANCHOR)
        .into_iter()
        .filter_map(|anchor| anchor.value().attr("href"))
        .enumerate()
        .map(|(i, href)| LinkEntry::new(i + 1, resolve_href(href.trim(), base)))
        .collect();

    if links.is_empty() {
        tracing::warn!("Listing container has no links");
    }

    links
}

fn resolve_href(href: &str, base: Option<&Url>) -> String {
    match Url::parse(href) {
        Ok(_) => href.to_string(),
        Err(_) => base
            .and_then(|b| b.join(href).ok())
            .map(String::from)
            .unwrap_or_else(|| href.to_string()),
    }
}

/// Fetch the listing page and discover its links
///
/// A failed fetch is logged and treated as a page with no links.
pub async fn fetch_links(fetcher: &dyn PageFetcher, listing_url: &str) -> Vec<LinkEntry> {
    match fetcher.fetch(listing_url).await {
        Ok(html) => {
            let base = Url::parse(listing_url).ok();
            let links = discover_links(&html, base.as_ref());
            tracing::info!(count = links.len(), url = listing_url, "Discovered links");
            links
        }
        Err(e) => {
            tracing::error!(error = %e, url = listing_url, "Failed to fetch listing page");
            Vec::new()
        }
    }
}
