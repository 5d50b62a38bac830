use crate::crawlers::browser::{Browser, NextPage};
use crate::crawlers::detail::{fetch_detail, fetch_outline};
use crate::crawlers::http::Fetch;
use crate::crawlers::images::ImageCollector;
use crate::error::HarvestError;
use crate::export::BatchExporter;
use crate::parsers::record::RecordBuilder;
use crate::parsers::{ParsedPage, html};
use crate::results::{ImageDescriptor, PageBatch, Record};
use crate::sites::Site;
use crate::utils::Pacer;

/// Where the pagination driver stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriverState {
    /// Extracting the listing page with this zero-based index
    OnPage(u64),
    /// No further "next" control was found
    Done,
}

/// Totals of a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: u64,
    pub records: u64,
    pub images: u64,
    /// Detail links that could not be fetched
    pub skipped: u64,
}

/// Walks a paginated listing site and exports one batch per listing page
///
/// Owns the browser session and the record id counter for the whole run.
pub struct Harvester<B, F> {
    browser: B,
    fetcher: F,
    site: Site,
    region: String,
    builder: RecordBuilder,
    collector: ImageCollector,
    exporter: BatchExporter,
    pacer: Pacer,
    next_id: u64,
    summary: RunSummary,
}

impl<B: Browser, F: Fetch> Harvester<B, F> {
    pub fn new(
        browser: B,
        fetcher: F,
        site: Site,
        region: &str,
        collector: ImageCollector,
        exporter: BatchExporter,
        pacer: Pacer,
    ) -> Self {
        Self {
            browser,
            fetcher,
            site,
            region: region.to_string(),
            builder: RecordBuilder::new(site),
            collector,
            exporter,
            pacer,
            next_id: 0,
            summary: RunSummary::default(),
        }
    }

    /// Runs from `start_url` until the listing has no "next" control
    ///
    /// The browser session is closed whether the run succeeds or fails.
    pub async fn run(mut self, start_url: &str) -> Result<RunSummary, HarvestError> {
        let outcome = self.drive(start_url).await;

        if let Err(e) = self.browser.close().await {
            ::log::warn!("Failed to close browser session: {}", e);
        }
        ::log::info!("Browser session closed");

        match outcome {
            Ok(()) => Ok(self.summary),
            Err(e) => {
                ::log::error!(
                    "Run stopped after {} pages and {} records: {}",
                    self.summary.pages,
                    self.summary.records,
                    e
                );
                Err(e)
            }
        }
    }

    async fn drive(&mut self, start_url: &str) -> Result<(), HarvestError> {
        ::log::info!("Starting {} harvest for {} at {}", self.site, self.region, start_url);
        self.browser.navigate(start_url).await?;

        let mut state = DriverState::OnPage(0);
        while let DriverState::OnPage(index) = state {
            let batch = self.process_listing_page(index).await?;
            if batch.is_empty() {
                ::log::warn!("Listing page {} produced no records", index);
            }
            self.exporter
                .export(&batch, self.site, &self.region, index)?;
            self.summary.pages += 1;

            self.pacer.before_advance().await;
            state = match self
                .browser
                .click_next(self.site.dialect().next_link_text)
                .await?
            {
                NextPage::Advanced => {
                    ::log::info!("Advanced past listing page {}", index);
                    self.pacer.after_page(index).await;
                    DriverState::OnPage(index + 1)
                }
                NextPage::NoNextControl => {
                    ::log::info!("No next page after listing page {}", index);
                    DriverState::Done
                }
            };
        }

        ::log::info!(
            "Harvest complete: {} pages, {} records, {} images, {} skipped links",
            self.summary.pages,
            self.summary.records,
            self.summary.images,
            self.summary.skipped
        );
        Ok(())
    }

    /// Extracts every detail link of the listing page the browser shows
    async fn process_listing_page(&mut self, index: u64) -> Result<PageBatch, HarvestError> {
        let url = self.browser.current_url().await?;
        ::log::info!("Listing page {}: {}", index, url);

        let bytes = self.fetcher.get(&url).await?;
        self.pacer.after_item().await;
        let links = html::listing_links(&ParsedPage::parse(&url, &bytes), self.site.dialect());
        ::log::info!("Found {} detail links in {}", links.len(), url);

        let mut batch = PageBatch::new();
        for link in links {
            if let Some((record, images)) = self.process_link(&link).await {
                self.summary.records += 1;
                self.summary.images += images.len() as u64;
                batch.push(record, images);
            }
        }
        Ok(batch)
    }

    /// Builds the record and images for one detail link
    ///
    /// A detail page that cannot be fetched is skipped without consuming an id.
    /// The item pause follows the detail fetch either way.
    async fn process_link(&mut self, link: &str) -> Option<(Record, Vec<ImageDescriptor>)> {
        let fetched = fetch_detail(&self.fetcher, link, self.site).await;
        self.pacer.after_item().await;

        let page = match fetched {
            Ok(page) => page,
            Err(e) => {
                ::log::warn!("Skipping listing link {}: {}", link, e);
                self.summary.skipped += 1;
                return None;
            }
        };

        let outline = fetch_outline(&self.fetcher, &page, self.site, &self.pacer).await;

        let id = self.next_id;
        self.next_id += 1;

        let record = self.builder.build_with_details(&page, outline.as_ref(), id);
        let images = self.collector.collect(&self.fetcher, &page, id).await;
        ::log::debug!("Record #{} has {} images", id, images.len());

        Some((record, images))
    }
}

