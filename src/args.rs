use clap::{Parser, ValueEnum};
use listing_harvest::{HarvestConfig, Site};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "listing-harvest")]
#[command(about = "Harvests listing records and images from SUUMO and Jalan")]
#[command(version)]
pub struct Args {
    /// Prefecture to harvest [default: Yamagata]
    #[arg(short, long)]
    pub region: Option<String>,

    /// Site to harvest [default: suumo]
    #[arg(short, long, value_enum)]
    pub target: Option<SiteArg>,

    /// JSON configuration file; flags given on the command line override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listing URL to start from instead of the region's first page
    #[arg(long)]
    pub start_url: Option<String>,

    /// Seconds to wait after each listing page
    #[arg(long)]
    pub page_delay: Option<u64>,

    /// Seconds to wait after each detail page and image
    #[arg(long)]
    pub item_delay: Option<u64>,

    /// Directory for CSV output
    #[arg(long)]
    pub export_root: Option<PathBuf>,

    /// Directory for image output
    #[arg(long)]
    pub image_root: Option<PathBuf>,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver_url: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SiteArg {
    Suumo,
    Jalan,
}

/// Convert from CLI argument site to internal site
pub fn convert_site(arg: SiteArg) -> Site {
    match arg {
        SiteArg::Suumo => Site::Suumo,
        SiteArg::Jalan => Site::Jalan,
    }
}

impl Args {
    /// Layers command-line flags over a base configuration
    pub fn apply(&self, mut config: HarvestConfig) -> HarvestConfig {
        if let Some(target) = self.target {
            config.site = convert_site(target);
        }
        if let Some(region) = &self.region {
            config.region = region.clone();
        }
        if let Some(url) = &self.start_url {
            config.start_url = Some(url.clone());
        }
        if let Some(secs) = self.page_delay {
            config.page_delay_secs = secs;
        }
        if let Some(secs) = self.item_delay {
            config.item_delay_secs = secs;
        }
        if let Some(root) = &self.export_root {
            config.export_root = root.clone();
        }
        if let Some(root) = &self.image_root {
            config.image_root = root.clone();
        }
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url = url.clone();
        }
        config
    }
}
