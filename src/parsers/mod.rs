pub mod html;
pub mod record;
pub mod text;

#[cfg(test)]
mod tests;

use scraper::{ElementRef, Html, Selector};

/// A parsed HTML document that can be queried with CSS selectors
///
/// Lookups never fail for "not found": they return an empty result and
/// leave the fallback policy to the caller.
pub struct ParsedPage {
    url: String,
    doc: Html,
}

impl ParsedPage {
    /// Parses raw bytes, replacing invalid UTF-8 sequences
    pub fn parse(url: &str, bytes: &[u8]) -> Self {
        Self::parse_str(url, &String::from_utf8_lossy(bytes))
    }

    pub fn parse_str(url: &str, html: &str) -> Self {
        Self {
            url: url.to_string(),
            doc: Html::parse_document(html),
        }
    }

    /// URL the page was fetched from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// All elements matching `selector`, in document order
    pub fn select(&self, selector: &str) -> Vec<ElementRef<'_>> {
        match compile(selector) {
            Some(sel) => self.doc.select(&sel).collect(),
            None => Vec::new(),
        }
    }

    /// First element matching any of `selectors`, trying them in order
    pub fn select_first_of(&self, selectors: &[&str]) -> Option<ElementRef<'_>> {
        selectors
            .iter()
            .find_map(|s| self.select(s).into_iter().next())
    }

    /// Text of the first element matching `selector`
    pub fn first_text(&self, selector: &str) -> Option<String> {
        self.select(selector).into_iter().next().map(element_text)
    }

    /// Attribute of the first element matching `selector` that has it
    pub fn first_attr(&self, selector: &str, attr: &str) -> Option<String> {
        self.select(selector)
            .into_iter()
            .find_map(|e| e.value().attr(attr).map(str::to_string))
    }

    /// Attribute values of every matching element that has it
    pub fn all_attr(&self, selector: &str, attr: &str) -> Vec<String> {
        self.select(selector)
            .into_iter()
            .filter_map(|e| e.value().attr(attr).map(str::to_string))
            .collect()
    }
}

/// Elements under `parent` matching `selector`
pub fn select_within<'a>(parent: ElementRef<'a>, selector: &str) -> Vec<ElementRef<'a>> {
    match compile(selector) {
        Some(sel) => parent.select(&sel).collect(),
        None => Vec::new(),
    }
}

/// Concatenated text nodes of an element
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

fn compile(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(sel) => Some(sel),
        Err(e) => {
            ::log::warn!("Invalid selector {:?}: {}", selector, e);
            None
        }
    }
}
