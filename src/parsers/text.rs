/// Options controlling how text pulled out of a cell is cleaned
#[derive(Debug, Clone, Copy)]
pub struct CleanOptions {
    /// Remove `\n`, `\r` and `\t` entirely
    pub drop_line_breaks: bool,
    /// Remove ideographic (U+3000) and no-break (U+00A0) spaces
    pub drop_wide_spaces: bool,
    /// Literal fragments the site injects into cells (hint badges, link captions)
    pub strip_tokens: &'static [&'static str],
    /// Trim the result
    pub trim: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            drop_line_breaks: true,
            drop_wide_spaces: false,
            strip_tokens: &[],
            trim: true,
        }
    }
}

/// Cleaning applied to field labels (`th` cells, list item prefixes)
pub const LABEL_OPTIONS: CleanOptions = CleanOptions {
    drop_line_breaks: true,
    drop_wide_spaces: false,
    strip_tokens: &["ヒント"],
    trim: true,
};

/// Cleaning applied to field values (`td` cells, list item suffixes)
pub const VALUE_OPTIONS: CleanOptions = CleanOptions {
    drop_line_breaks: true,
    drop_wide_spaces: true,
    strip_tokens: &["[乗り換え案内]"],
    trim: true,
};

/// Cleans text with the given options
pub fn clean(text: &str, options: &CleanOptions) -> String {
    let mut result: String = text
        .chars()
        .filter(|c| !(options.drop_line_breaks && matches!(c, '\n' | '\r' | '\t')))
        .filter(|c| !(options.drop_wide_spaces && matches!(c, '\u{3000}' | '\u{a0}')))
        .collect();

    for token in options.strip_tokens {
        result = result.replace(token, "");
    }

    if options.trim {
        result.trim().to_string()
    } else {
        result
    }
}

pub fn clean_label(text: &str) -> String {
    clean(text, &LABEL_OPTIONS)
}

pub fn clean_value(text: &str) -> String {
    clean(text, &VALUE_OPTIONS)
}

/// Collapses every whitespace run (including line breaks) into one space
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits a `label：value` item on the first full-width colon
///
/// Falls back to an ASCII colon. Returns `None` when neither is present.
pub fn split_labelled(item: &str) -> Option<(String, String)> {
    let (label, value) = item.split_once('：').or_else(|| item.split_once(':'))?;
    Some((clean_label(label), clean_value(value)))
}
