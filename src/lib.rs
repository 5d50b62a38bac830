#![allow(clippy::too_many_arguments)]

// Re-export modules
pub mod config;
pub mod crawlers;
pub mod error;
pub mod export;
pub mod filter;
pub mod parsers;
pub mod results;
pub mod sites;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::HarvestConfig;
pub use crawlers::RunSummary;
pub use error::HarvestError;
pub use results::{ImageDescriptor, PageBatch, Record};
pub use sites::{Region, Site};

use crawlers::images::{ImageCollector, ImageStore};
use crawlers::{Harvester, HttpFetcher, WebDriverBrowser};
use export::BatchExporter;

/// Main builder for a harvest run
pub struct Harvest {
    config: HarvestConfig,
}

impl Harvest {
    /// Create a new Harvest builder for a site and region
    pub fn new(site: Site, region: &str) -> Self {
        let mut config = HarvestConfig::new(site, region);

        // Override the WebDriver URL with an environment variable if provided
        config.apply_env();

        Self { config }
    }

    /// Create a Harvest builder from a complete configuration
    pub fn from_config(config: HarvestConfig) -> Self {
        Self { config }
    }

    /// Replace the configuration with one loaded from a file
    pub fn with_config_file(
        mut self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, HarvestError> {
        self.config = HarvestConfig::from_file(path)?;
        Ok(self)
    }

    /// Start from this listing URL instead of the region's first page
    pub fn with_start_url(mut self, url: &str) -> Self {
        self.config.start_url = Some(url.to_string());
        self
    }

    /// Set the pause after each listing page, in seconds
    pub fn with_page_delay(mut self, seconds: u64) -> Self {
        self.config.page_delay_secs = seconds;
        self
    }

    /// Set the pause after each detail page and image, in seconds
    pub fn with_item_delay(mut self, seconds: u64) -> Self {
        self.config.item_delay_secs = seconds;
        self
    }

    /// Set where CSV files are written
    pub fn with_export_root(mut self, root: impl Into<std::path::PathBuf>) -> Self {
        self.config.export_root = root.into();
        self
    }

    /// Set where image files are written
    pub fn with_image_root(mut self, root: impl Into<std::path::PathBuf>) -> Self {
        self.config.image_root = root.into();
        self
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Connect to WebDriver and run the harvest to completion
    pub async fn run(self) -> Result<RunSummary, HarvestError> {
        let config = self.config;
        let start_url = config.resolve_start_url()?;
        let fetcher = HttpFetcher::new(config.request_timeout(), &config.user_agent)?;
        let pacer = config.pacer();
        let collector = ImageCollector::new(config.site, ImageStore::new(config.image_root.clone()), pacer);
        let exporter = BatchExporter::new(config.export_root.clone());

        let browser = WebDriverBrowser::connect(&config.webdriver_url, config.headless).await?;

        Harvester::new(
            browser,
            fetcher,
            config.site,
            &config.region,
            collector,
            exporter,
            pacer,
        )
        .run(&start_url)
        .await
    }
}
