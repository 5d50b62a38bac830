use regex::Regex;
use url::Url;

use crate::sites::{Dialect, absolutize_scheme};

/// Configuration for deciding which image URLs get archived
#[derive(Debug, Clone, Default)]
pub struct ImageFilterConfig {
    /// Regex patterns for URLs to skip, such as resized variants
    pub exclude_patterns: Vec<String>,
}

impl ImageFilterConfig {
    /// Filter configuration for a site's image dialect
    pub fn for_dialect(dialect: &Dialect) -> Self {
        Self {
            exclude_patterns: dialect
                .resized_pattern
                .map(|p| vec![regex::escape(p)])
                .unwrap_or_default(),
        }
    }
}

/// Why an image candidate was not archived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The URL matched an exclude pattern
    Excluded,
    /// The URL is not an absolute http(s) URL
    Unusable,
}

/// Filter that classifies image URLs found on a detail page
#[derive(Debug)]
pub struct ImageFilter {
    exclude_regexes: Vec<Regex>,
}

impl ImageFilter {
    /// Create a new image filter from configuration
    pub fn new(config: &ImageFilterConfig) -> Result<Self, regex::Error> {
        let mut exclude_regexes = Vec::with_capacity(config.exclude_patterns.len());
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }
        Ok(Self { exclude_regexes })
    }

    /// Filter for a site's image dialect
    pub fn for_dialect(dialect: &Dialect) -> Self {
        Self::new(&ImageFilterConfig::for_dialect(dialect))
            .expect("Escaped literal patterns should be valid")
    }

    /// Returns the normalised URL to fetch, or why the image is skipped
    pub fn check(&self, raw: &str) -> Result<Url, Rejection> {
        let normalized = normalize_image_url(raw);

        if self.exclude_regexes.iter().any(|r| r.is_match(&normalized)) {
            return Err(Rejection::Excluded);
        }

        match Url::parse(&normalized) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
            _ => Err(Rejection::Unusable),
        }
    }
}

/// Undoes HTML-escaped ampersands and adds a scheme to protocol-relative URLs
///
/// `srcset` values may list several candidates; only the first is kept.
pub fn normalize_image_url(raw: &str) -> String {
    let first = raw
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_end_matches(',');
    absolutize_scheme(&first.replace("&amp;", "&"))
}
