//! Writes page batches to CSV files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::results::PageBatch;
use crate::sites::Site;
use crate::utils::sanitize_filename;

/// Leading columns of the records file, before the schema keys
pub const RECORD_COLUMNS: [&str; 4] = ["id", "url", "title", "comment"];

/// Columns of the images file
pub const IMAGE_COLUMNS: [&str; 4] = ["record_id", "seq", "tag", "file_name"];

/// Paths of the two files written for a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub records: PathBuf,
    pub images: PathBuf,
}

/// Writes one records file and one images file per listing page
#[derive(Debug, Clone)]
pub struct BatchExporter {
    root: PathBuf,
}

impl BatchExporter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Deterministic output paths for a site, region and page
    pub fn paths(&self, site: Site, region: &str, page: u64) -> ExportPaths {
        let dir = self.root.join(site.name());
        let region = sanitize_filename(region);
        ExportPaths {
            records: dir.join(format!("attribute_{}_{}.csv", region, page)),
            images: dir.join(format!("imgs_{}_{}.csv", region, page)),
        }
    }

    /// Writes `batch`, replacing files left by an earlier run
    pub fn export(
        &self,
        batch: &PageBatch,
        site: Site,
        region: &str,
        page: u64,
    ) -> Result<ExportPaths, ExportError> {
        let paths = self.paths(site, region, page);
        if let Some(dir) = paths.records.parent() {
            fs::create_dir_all(dir)?;
        }

        write_records(&paths.records, batch, site)?;
        write_images(&paths.images, batch)?;

        ::log::info!(
            "Exported {} records and {} images to {}",
            batch.records.len(),
            batch.images.len(),
            paths.records.display()
        );
        Ok(paths)
    }
}

fn write_records(path: &Path, batch: &PageBatch, site: Site) -> Result<(), ExportError> {
    let schema = site.schema();
    let mut writer = csv::Writer::from_path(path)?;

    let header = RECORD_COLUMNS.iter().chain(schema.keys().iter());
    writer.write_record(header)?;

    for record in &batch.records {
        let mut row = vec![
            record.id.to_string(),
            record.url.clone(),
            record.title.clone(),
            record.comment.clone(),
        ];
        // Columns follow the schema, whatever order the record holds them in
        row.extend(
            schema
                .keys()
                .iter()
                .map(|key| record.field(key).unwrap_or_default().to_string()),
        );
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

fn write_images(path: &Path, batch: &PageBatch) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(IMAGE_COLUMNS)?;

    for image in &batch.images {
        writer.write_record([
            image.record_id.to_string(),
            image.seq.to_string(),
            image.tag.clone(),
            image.file_name.clone(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
