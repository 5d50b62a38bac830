use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;

use crate::error::BrowserError;

/// Outcome of asking the browser for the next listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// The "next" control was clicked and the browser moved on
    Advanced,
    /// The current page has no "next" control
    NoNextControl,
}

/// Browser automation session used to walk listing pages
#[allow(async_fn_in_trait)]
pub trait Browser {
    /// Load `url` in the session
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// URL currently shown, after any redirects
    async fn current_url(&mut self) -> Result<String, BrowserError>;

    /// Click the link labelled `link_text`
    async fn click_next(&mut self, link_text: &str) -> Result<NextPage, BrowserError>;

    /// End the session
    async fn close(self) -> Result<(), BrowserError>;
}

/// Browser session backed by a WebDriver server
pub struct WebDriverBrowser {
    client: Client,
}

impl WebDriverBrowser {
    /// Connects to the WebDriver at `webdriver_url`, then to common fallbacks
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, BrowserError> {
        match connect_to(webdriver_url, headless).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", webdriver_url);
                return Ok(Self { client });
            }
            Err(e) => {
                ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            }
        }

        // If we couldn't connect, try with common alternative URLs
        let fallback_urls = [
            "http://localhost:9515", // ChromeDriver default
            "http://localhost:4444", // Selenium / geckodriver default
            "http://127.0.0.1:4444", // Try with IP instead of localhost
        ];

        let mut tried = vec![webdriver_url.to_string()];
        for url in fallback_urls.iter() {
            if tried.iter().any(|t| t == url) {
                continue;
            }
            tried.push(url.to_string());

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = connect_to(url, headless).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(Self { client });
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(BrowserError::Connect(tried.join(", ")))
    }
}

async fn connect_to(url: &str, headless: bool) -> Result<Client, fantoccini::error::NewSessionError> {
    let mut builder = ClientBuilder::native();
    if headless {
        let mut caps = serde_json::Map::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": ["--headless", "--disable-gpu"] }),
        );
        caps.insert(
            "moz:firefoxOptions".to_string(),
            json!({ "args": ["-headless"] }),
        );
        builder.capabilities(caps);
    }
    builder.connect(url).await
}

impl Browser for WebDriverBrowser {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        ::log::debug!("NAVIGATE: {}", url);
        self.client.goto(url).await?;
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String, BrowserError> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn click_next(&mut self, link_text: &str) -> Result<NextPage, BrowserError> {
        match self.client.find(Locator::LinkText(link_text)).await {
            Ok(element) => {
                element.click().await?;
                Ok(NextPage::Advanced)
            }
            Err(e) if e.is_no_such_element() => Ok(NextPage::NoNextControl),
            Err(e) => {
                if e.to_string().contains("Unable to find session") {
                    ::log::warn!("Lost WebDriver session while looking for {:?}", link_text);
                }
                Err(e.into())
            }
        }
    }

    async fn close(self) -> Result<(), BrowserError> {
        self.client.close().await?;
        Ok(())
    }
}
