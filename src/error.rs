use thiserror::Error;

/// Failure to retrieve a page or image over HTTP
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("{url} returned an empty body")]
    EmptyBody { url: String },

    #[error("invalid URL {0}")]
    InvalidUrl(String),

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Failure to download, decode or persist an image
#[derive(Debug, Error)]
pub enum ImageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("could not encode or write image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("could not write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to write a batch to disk
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a browser automation command
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("could not reach any WebDriver server (tried {0})")]
    Connect(String),

    #[error("WebDriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),
}

/// Failure to load configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown region {0}")]
    UnknownRegion(String),
}

/// Top-level error of a harvest run
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
