use url::Url;

use crate::crawlers::http::Fetch;
use crate::error::FetchError;
use crate::parsers::{ParsedPage, html};
use crate::sites::Site;
use crate::utils::Pacer;

/// Resolves a listing link against the site's URL rule and fetches it
pub async fn fetch_detail<F: Fetch>(
    fetcher: &F,
    link: &str,
    site: Site,
) -> Result<ParsedPage, FetchError> {
    let url = site.detail_url(link);
    Url::parse(&url).map_err(|_| FetchError::InvalidUrl(url.clone()))?;

    ::log::info!("Detail page URL: {}", url);
    let bytes = fetcher.get(&url).await?;
    Ok(ParsedPage::parse(&url, &bytes))
}

/// Fetches the tab that holds the detail fields, when the site splits them out
///
/// Returns `None` when the site has no such tab, the page lacks the link, or
/// the fetch fails; the record then falls back to the detail page itself.
/// A fetch attempt is always followed by the pacer's item pause.
pub async fn fetch_outline<F: Fetch>(
    fetcher: &F,
    page: &ParsedPage,
    site: Site,
    pacer: &Pacer,
) -> Option<ParsedPage> {
    let dialect = site.dialect();
    if dialect.outline_links.is_empty() {
        return None;
    }

    let Some(href) = html::outline_link(page, dialect) else {
        ::log::warn!("No outline tab on {}", page.url());
        return None;
    };

    let url = match Url::parse(page.url()).and_then(|base| base.join(&href)) {
        Ok(url) => url.to_string(),
        Err(e) => {
            ::log::warn!("Invalid outline link {:?} on {}: {}", href, page.url(), e);
            return None;
        }
    };

    let fetched = fetcher.get(&url).await;
    pacer.after_item().await;

    match fetched {
        Ok(bytes) => Some(ParsedPage::parse(&url, &bytes)),
        Err(e) => {
            ::log::warn!("Failed to fetch outline tab {}: {}", url, e);
            None
        }
    }
}
