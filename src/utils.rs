use std::time::Duration;

/// Pause longer after every this many listing pages or image fetches
const LONG_PAUSE_EVERY: u64 = 10;

/// Fixed, non-adaptive pauses between network-heavy steps
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    page: Duration,
    item: Duration,
    long: Duration,
}

impl Pacer {
    pub fn new(page: Duration, item: Duration) -> Self {
        Self {
            page,
            item,
            long: Duration::ZERO,
        }
    }

    /// Extra pause taken after every tenth image fetch of a record, starting with the first
    pub fn with_long_pause(mut self, long: Duration) -> Self {
        self.long = long;
        self
    }

    /// A pacer that never sleeps
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Delay after advancing past the listing page at `page_index`
    ///
    /// Every tenth page the delay is doubled.
    pub fn page_delay(&self, page_index: u64) -> Duration {
        if page_index % LONG_PAUSE_EVERY == 0 {
            self.page * 2
        } else {
            self.page
        }
    }

    /// Delay after a detail, outline or listing fetch, and before clicking
    /// through to the next listing page
    pub fn item_delay(&self) -> Duration {
        self.item
    }

    /// Delay after the image fetch with index `image_index` within its record
    ///
    /// The first and every tenth fetch after it add the long pause.
    pub fn image_delay(&self, image_index: u64) -> Duration {
        if image_index % LONG_PAUSE_EVERY == 0 {
            self.item + self.long
        } else {
            self.item
        }
    }

    pub async fn after_page(&self, page_index: u64) {
        sleep(self.page_delay(page_index)).await;
    }

    pub async fn after_item(&self) {
        sleep(self.item_delay()).await;
    }

    pub async fn before_advance(&self) {
        sleep(self.item_delay()).await;
    }

    pub async fn after_image(&self, image_index: u64) {
        sleep(self.image_delay(image_index)).await;
    }
}

async fn sleep(duration: Duration) {
    if !duration.is_zero() {
        ::log::trace!("Sleeping for {:?}", duration);
        tokio::time::sleep(duration).await;
    }
}

/// Convert a string to a sanitized filename component
pub fn sanitize_filename(name: &str) -> String {
    let mut name = name.replace("http://", "").replace("https://", "");
    name = name.replace(['/', '\\', ':', '?', '&', '=', '#', '%', ' '], "_");

    // Limit filename length
    if name.chars().count() > 100 {
        name.chars().take(100).collect()
    } else {
        name
    }
}
