use std::time::Duration;

use crate::error::FetchError;

/// HTTP GET used for listing pages, detail pages and images
#[allow(async_fn_in_trait)]
pub trait Fetch {
    /// Body of a successful response to `url`
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("listing-harvest/", env!("CARGO_PKG_VERSION"));

/// `Fetch` implementation over a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds a client whose requests give up after `timeout`
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        ::log::debug!("GET {}", url);
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(request_error)?;
        if body.is_empty() {
            return Err(FetchError::EmptyBody {
                url: url.to_string(),
            });
        }
        Ok(body.to_vec())
    }
}
