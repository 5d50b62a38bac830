pub mod browser;
pub mod detail;
pub mod http;
pub mod images;
pub mod pipeline;

pub use browser::{Browser, NextPage, WebDriverBrowser};
pub use http::{Fetch, HttpFetcher};
pub use pipeline::{Harvester, RunSummary};
