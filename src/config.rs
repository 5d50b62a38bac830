use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::sites::{Region, Site};
use crate::utils::Pacer;

/// Configuration for a harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Site to harvest
    #[serde(default = "default_site")]
    pub site: Site,

    /// Prefecture name, e.g. "Yamagata"
    #[serde(default = "default_region")]
    pub region: String,

    /// First listing page; derived from site and region when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_url: Option<String>,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Whether to ask the browser to run headless
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Directory receiving the CSV files
    #[serde(default = "default_export_root")]
    pub export_root: PathBuf,

    /// Directory receiving the image files
    #[serde(default = "default_image_root")]
    pub image_root: PathBuf,

    /// Seconds to wait after advancing a listing page
    #[serde(default = "default_page_delay_secs")]
    pub page_delay_secs: u64,

    /// Seconds to wait after each detail page and each image
    #[serde(default = "default_item_delay_secs")]
    pub item_delay_secs: u64,

    /// Extra seconds to wait after the first and every tenth image fetch of a record
    #[serde(default = "default_long_pause_secs")]
    pub long_pause_secs: u64,

    /// Seconds before an HTTP request is abandoned
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// User agent sent with HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HarvestConfig {
    /// Create a new configuration with default values
    pub fn new(site: Site, region: &str) -> Self {
        Self {
            site,
            region: region.to_string(),
            start_url: None,
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            export_root: default_export_root(),
            image_root: default_image_root(),
            page_delay_secs: default_page_delay_secs(),
            item_delay_secs: default_item_delay_secs(),
            long_pause_secs: default_long_pause_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Override the WebDriver URL with the `WEBDRIVER_URL` environment variable
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
    }

    /// First listing page to open
    pub fn resolve_start_url(&self) -> Result<String, ConfigError> {
        match &self.start_url {
            Some(url) => Ok(url.clone()),
            None => Ok(self.site.start_url(Region::lookup(&self.region)?)),
        }
    }

    pub fn pacer(&self) -> Pacer {
        Pacer::new(
            Duration::from_secs(self.page_delay_secs),
            Duration::from_secs(self.item_delay_secs),
        )
        .with_long_pause(Duration::from_secs(self.long_pause_secs))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self::new(default_site(), &default_region())
    }
}

fn default_site() -> Site {
    Site::Suumo
}

fn default_region() -> String {
    "Yamagata".to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_export_root() -> PathBuf {
    PathBuf::from("csv")
}

fn default_image_root() -> PathBuf {
    PathBuf::from("imgs")
}

fn default_page_delay_secs() -> u64 {
    60
}

fn default_item_delay_secs() -> u64 {
    10
}

fn default_long_pause_secs() -> u64 {
    50
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_user_agent() -> String {
    crate::crawlers::http::DEFAULT_USER_AGENT.to_string()
}
