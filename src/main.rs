use clap::Parser;
use listing_harvest::{Harvest, HarvestConfig};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match HarvestConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => HarvestConfig::default(),
    };
    config.apply_env();
    let config = args.apply(config);

    ::log::info!("Starting {} harvest for region {}", config.site, config.region);
    println!("Note: harvesting requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using {}",
        config.webdriver_url
    );

    let start_time = std::time::Instant::now();
    let harvest = Harvest::from_config(config);

    match harvest.run().await {
        Ok(summary) => {
            ::log::info!(
                "Harvest complete - {} pages, {} records, {} images in {:.2} seconds",
                summary.pages,
                summary.records,
                summary.images,
                start_time.elapsed().as_secs_f64()
            );
        }
        Err(e) => {
            ::log::error!("Harvest failed: {}", e);
            std::process::exit(1);
        }
    }
}
