use serde::{Deserialize, Serialize};

/// Structured result extracted from one detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Run-scoped id, strictly increasing
    pub id: u64,

    /// Absolute URL of the detail page
    pub url: String,

    /// Title of the entry (empty when the page has none)
    pub title: String,

    /// Free-text comment (empty when the page has none)
    pub comment: String,

    /// Attribute values in schema order, one entry per schema key
    pub fields: Vec<(String, String)>,
}

impl Record {
    /// Value of a named attribute, if the key belongs to the schema
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Metadata for one persisted image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub record_id: u64,

    /// Position among the record's accepted images, starting at 0
    pub seq: u32,

    /// Caption taken from the element's alt text
    pub tag: String,

    /// File stem the image was written under
    pub file_name: String,
}

/// Everything collected from a single listing page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageBatch {
    pub records: Vec<Record>,
    pub images: Vec<ImageDescriptor>,
}

impl PageBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record, images: Vec<ImageDescriptor>) {
        self.records.push(record);
        self.images.extend(images);
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
