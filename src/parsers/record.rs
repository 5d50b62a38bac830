use scraper::ElementRef;

use crate::parsers::text::{clean_label, clean_value, collapse_whitespace, split_labelled};
use crate::parsers::{ParsedPage, element_text, select_within};
use crate::results::Record;
use crate::sites::{FieldLayout, Site};

/// Assembles records from parsed detail pages of one site
#[derive(Debug, Clone, Copy)]
pub struct RecordBuilder {
    site: Site,
}

impl RecordBuilder {
    pub fn new(site: Site) -> Self {
        Self { site }
    }

    /// Builds a record from a detail page that carries its own fields
    pub fn build(&self, page: &ParsedPage, id: u64) -> Record {
        self.build_with_details(page, None, id)
    }

    /// Builds a record whose fields may live on a separate page
    ///
    /// Title and comment always come from `page`. Fields are read from
    /// `details` when given, otherwise from `page`. A page without a
    /// recognisable field container yields a record with every schema key
    /// present and empty.
    pub fn build_with_details(
        &self,
        page: &ParsedPage,
        details: Option<&ParsedPage>,
        id: u64,
    ) -> Record {
        let dialect = self.site.dialect();
        let schema = self.site.schema();
        let source = details.unwrap_or(page);

        let fields = match source.select_first_of(dialect.detail_containers) {
            Some(container) => {
                let pairs = match dialect.field_layout {
                    FieldLayout::Table => table_pairs(container),
                    FieldLayout::LabelledList => list_pairs(container),
                };
                schema.fill(pairs)
            }
            None => {
                ::log::warn!(
                    "No detail fields found on {}, recording empty attributes for #{}",
                    source.url(),
                    id
                );
                schema.empty_fields()
            }
        };

        let title = page
            .first_text(dialect.title)
            .map(|t| collapse_whitespace(&t))
            .unwrap_or_default();
        let comment = page
            .first_text(dialect.comment)
            .map(|t| collapse_whitespace(&clean_value(&t)))
            .unwrap_or_default();

        Record {
            id,
            url: page.url().to_string(),
            title,
            comment,
            fields,
        }
    }
}

/// Reads `th`/`td` pairs from every row of a table
///
/// A row holds one or two label/value pairs. When a row has fewer labels or
/// values than two full pairs only the first pair is taken; rows missing a
/// label or a value altogether are skipped.
pub fn table_pairs(table: ElementRef<'_>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for row in select_within(table, "tr") {
        let heads = select_within(row, "th");
        let values = select_within(row, "td");

        let (Some(head), Some(value)) = (heads.first(), values.first()) else {
            ::log::debug!("Skipping table row without a label/value pair");
            continue;
        };
        pairs.push((
            clean_label(&element_text(*head)),
            clean_value(&element_text(*value)),
        ));

        if let (Some(head), Some(value)) = (heads.get(1), values.get(1)) {
            pairs.push((
                clean_label(&element_text(*head)),
                clean_value(&element_text(*value)),
            ));
        }
    }

    pairs
}

/// Reads `label：value` list items
pub fn list_pairs(list: ElementRef<'_>) -> Vec<(String, String)> {
    select_within(list, "li")
        .into_iter()
        .filter_map(|item| split_labelled(element_text(item).trim()))
        .collect()
}
