use crate::parsers::ParsedPage;
use crate::sites::Dialect;

/// Extracts the detail-page links of a listing page
///
/// Links are returned as written in the markup (usually site-relative) and
/// in document order. Anchors without an `href` are skipped.
pub fn listing_links(page: &ParsedPage, dialect: &Dialect) -> Vec<String> {
    let links = page.all_attr(dialect.listing_links, "href");

    ::log::debug!("Listing {} has {} detail links", page.url(), links.len());
    if !links.is_empty() {
        ::log::debug!(
            "First few links: {:?}",
            links.iter().take(5).collect::<Vec<_>>()
        );
    }

    links
}

/// Finds the tab link to the page that holds the detail fields
pub fn outline_link(page: &ParsedPage, dialect: &Dialect) -> Option<String> {
    dialect
        .outline_links
        .iter()
        .find_map(|selector| page.first_attr(selector, "href"))
}
