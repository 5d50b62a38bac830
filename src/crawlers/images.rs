use std::fs;
use std::path::PathBuf;

use image::ImageFormat;
use url::Url;

use crate::crawlers::http::Fetch;
use crate::error::ImageError;
use crate::filter::{ImageFilter, Rejection};
use crate::parsers::{ParsedPage, select_within};
use crate::results::ImageDescriptor;
use crate::sites::{Dialect, Site};
use crate::utils::Pacer;

/// Decodes downloaded images and writes them as JPEG files
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Where the image named `file_name` of `site` is written
    pub fn path(&self, site: Site, file_name: &str) -> PathBuf {
        self.root.join(site.name()).join(format!("{}.jpg", file_name))
    }

    /// Decodes `bytes` and saves them as `{root}/{site}/{file_name}.jpg`
    pub fn save(&self, site: Site, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ImageError> {
        let decoded = image::load_from_memory(bytes)?;
        let path = self.path(site, file_name);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        // JPEG has no alpha channel
        decoded
            .to_rgb8()
            .save_with_format(&path, ImageFormat::Jpeg)
            .map_err(ImageError::Encode)?;
        Ok(path)
    }
}

/// An image element that passed filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub url: Url,
    pub tag: String,
}

/// Lists the archivable images of a page, in document order
///
/// Each matched image element yields at most one candidate. Elements without
/// the URL attribute are unusable and skipped, as are URLs the filter rejects.
pub fn image_candidates(
    page: &ParsedPage,
    dialect: &Dialect,
    filter: &ImageFilter,
) -> Vec<ImageCandidate> {
    let mut candidates = Vec::new();

    for item in page.select(dialect.images) {
        let element = match dialect.image_source {
            Some(selector) => match select_within(item, selector).into_iter().next() {
                Some(source) => source,
                None => continue,
            },
            None => item,
        };
        let Some(raw) = element.value().attr(dialect.image_url_attr) else {
            continue;
        };
        let tag = element
            .value()
            .attr(dialect.image_tag_attr)
            .unwrap_or_default()
            .trim()
            .to_string();

        match filter.check(raw) {
            Ok(url) => candidates.push(ImageCandidate { url, tag }),
            Err(Rejection::Excluded) => ::log::debug!("Skipping resized image {}", raw),
            Err(Rejection::Unusable) => ::log::debug!("Skipping unusable image URL {:?}", raw),
        }
    }

    candidates
}

/// Fetches, decodes and stores the images of detail pages
pub struct ImageCollector {
    site: Site,
    filter: ImageFilter,
    store: ImageStore,
    pacer: Pacer,
    saved: u64,
}

impl ImageCollector {
    pub fn new(site: Site, store: ImageStore, pacer: Pacer) -> Self {
        Self {
            site,
            filter: ImageFilter::for_dialect(site.dialect()),
            store,
            pacer,
            saved: 0,
        }
    }

    /// Images saved so far in this run
    pub fn saved(&self) -> u64 {
        self.saved
    }

    /// Archives every accepted image on `page` for record `record_id`
    ///
    /// Sequence numbers start at 0 and count saved images only, so filtered
    /// or failed images leave no gaps. A failure on one image is logged and
    /// the rest are still collected. Every fetch attempt is followed by the
    /// pacer's image pause, whether it succeeded or not.
    pub async fn collect<F: Fetch>(
        &mut self,
        fetcher: &F,
        page: &ParsedPage,
        record_id: u64,
    ) -> Vec<ImageDescriptor> {
        let candidates = image_candidates(page, self.site.dialect(), &self.filter);
        let mut descriptors = Vec::with_capacity(candidates.len());

        for (attempt, candidate) in candidates.into_iter().enumerate() {
            let seq = descriptors.len() as u32;
            let file_name = format!("{}_{}", record_id, seq);

            let outcome = self.fetch_and_save(fetcher, &candidate.url, &file_name).await;
            self.pacer.after_image(attempt as u64).await;

            match outcome {
                Ok(path) => {
                    ::log::info!("Saved image {} from {}", path.display(), candidate.url);
                    descriptors.push(ImageDescriptor {
                        record_id,
                        seq,
                        tag: candidate.tag,
                        file_name,
                    });
                    self.saved += 1;
                }
                Err(e) => {
                    ::log::warn!(
                        "Skipping image {} of record #{}: {}",
                        candidate.url,
                        record_id,
                        e
                    );
                }
            }
        }

        descriptors
    }

    async fn fetch_and_save<F: Fetch>(
        &self,
        fetcher: &F,
        url: &Url,
        file_name: &str,
    ) -> Result<PathBuf, ImageError> {
        let bytes = fetcher.get(url.as_str()).await?;
        self.store.save(self.site, file_name, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use std::collections::HashMap;
    use std::io::Cursor;

    struct MapFetcher(HashMap<String, Vec<u8>>);

    impl Fetch for MapFetcher {
        async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.0.get(url).cloned().ok_or(FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 10, 10, 128]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    const PAGE: &str = r#"<html><body>
        <img src="/logo.png" alt="logo">
        <img rel="https://img.example/full/1.jpg" alt="外観">
        <img rel="https://img.example/jj/resizeImage?src=1.jpg&amp;w=100" alt="thumb">
        <img rel="https://img.example/full/missing.jpg" alt="欠損">
        <img rel="https://img.example/full/broken.jpg" alt="壊れ">
        <img rel="https://img.example/full/2.jpg" alt=" 間取り図 ">
        </body></html>"#;

    #[test]
    fn test_candidates_skip_unusable_and_resized() {
        let page = ParsedPage::parse_str("https://suumo.jp/a/", PAGE);
        let filter = ImageFilter::for_dialect(Site::Suumo.dialect());
        let candidates = image_candidates(&page, Site::Suumo.dialect(), &filter);

        let urls: Vec<&str> = candidates.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://img.example/full/1.jpg",
                "https://img.example/full/missing.jpg",
                "https://img.example/full/broken.jpg",
                "https://img.example/full/2.jpg",
            ]
        );
        assert_eq!(candidates[3].tag, "間取り図");
    }

    #[tokio::test]
    async fn test_collect_numbers_saved_images_without_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MapFetcher(HashMap::from([
            ("https://img.example/full/1.jpg".to_string(), png_bytes()),
            ("https://img.example/full/broken.jpg".to_string(), b"not an image".to_vec()),
            ("https://img.example/full/2.jpg".to_string(), png_bytes()),
        ]));
        let page = ParsedPage::parse_str("https://suumo.jp/a/", PAGE);
        let mut collector = ImageCollector::new(Site::Suumo, ImageStore::new(dir.path()), Pacer::none());

        let images = collector.collect(&fetcher, &page, 42).await;

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].seq, 0);
        assert_eq!(images[0].file_name, "42_0");
        assert_eq!(images[0].tag, "外観");
        assert_eq!(images[1].seq, 1);
        assert_eq!(images[1].file_name, "42_1");
        assert!(images.iter().all(|i| i.record_id == 42));
        assert_eq!(collector.saved(), 2);

        let store = ImageStore::new(dir.path());
        assert!(store.path(Site::Suumo, "42_0").is_file());
        assert!(store.path(Site::Suumo, "42_1").is_file());
        assert!(!store.path(Site::Suumo, "42_2").exists());
        let saved = image::open(dir.path().join("suumo/42_0.jpg")).unwrap();
        assert_eq!((saved.width(), saved.height()), (2, 2));
    }

    #[tokio::test]
    async fn test_jalan_sources() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MapFetcher(HashMap::from([(
            "https://cdn.jalan.jp/kuchikomi/a.jpg".to_string(),
            png_bytes(),
        )]));
        let page = ParsedPage::parse_str(
            "https://www.jalan.net/kankou/spt_1/kuchikomi/",
            r#"<ul class="cassetteList-photo">
                 <li class="lightbox"><picture><source srcset="//cdn.jalan.jp/kuchikomi/a.jpg"><img src="x"></picture></li>
                 <li class="lightbox"><picture><source></picture></li>
               </ul>
               <img rel="https://img.example/full/1.jpg">"#,
        );
        let mut collector = ImageCollector::new(Site::Jalan, ImageStore::new(dir.path()), Pacer::none());

        let images = collector.collect(&fetcher, &page, 0).await;
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].file_name, "0_0");
        assert!(dir.path().join("jalan/0_0.jpg").is_file());
    }

    #[tokio::test]
    async fn test_picture_with_several_sources_is_one_image() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MapFetcher(HashMap::from([
            ("https://cdn.jalan.jp/kuchikomi/a.webp".to_string(), png_bytes()),
            ("https://cdn.jalan.jp/kuchikomi/a.jpg".to_string(), png_bytes()),
            ("https://cdn.jalan.jp/kuchikomi/b.webp".to_string(), png_bytes()),
        ]));
        let page = ParsedPage::parse_str(
            "https://www.jalan.net/kankou/spt_1/kuchikomi/",
            r#"<ul class="cassetteList-photo">
                 <li class="lightbox"><picture>
                   <source type="image/webp" srcset="//cdn.jalan.jp/kuchikomi/a.webp">
                   <source type="image/jpeg" srcset="//cdn.jalan.jp/kuchikomi/a.jpg">
                   <img src="//cdn.jalan.jp/kuchikomi/a.jpg">
                 </picture></li>
                 <li class="lightbox"><picture>
                   <source srcset="//cdn.jalan.jp/kuchikomi/b.webp">
                 </picture></li>
               </ul>"#,
        );

        let filter = ImageFilter::for_dialect(Site::Jalan.dialect());
        let urls: Vec<String> = image_candidates(&page, Site::Jalan.dialect(), &filter)
            .into_iter()
            .map(|c| c.url.to_string())
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://cdn.jalan.jp/kuchikomi/a.webp",
                "https://cdn.jalan.jp/kuchikomi/b.webp",
            ]
        );

        let mut collector = ImageCollector::new(Site::Jalan, ImageStore::new(dir.path()), Pacer::none());
        let images = collector.collect(&fetcher, &page, 3).await;
        assert_eq!(images.len(), 2);
        assert_eq!(images[1].file_name, "3_1");
        assert!(!dir.path().join("jalan/3_2.jpg").exists());
    }

    #[tokio::test]
    async fn test_fetch_and_decode_errors_keep_their_kind() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MapFetcher(HashMap::from([(
            "https://img.example/full/broken.jpg".to_string(),
            b"not an image".to_vec(),
        )]));
        let collector = ImageCollector::new(Site::Suumo, ImageStore::new(dir.path()), Pacer::none());

        let missing = Url::parse("https://img.example/full/missing.jpg").unwrap();
        let err = collector.fetch_and_save(&fetcher, &missing, "0_0").await.unwrap_err();
        assert!(matches!(err, ImageError::Fetch(FetchError::Status { status: 404, .. })));

        let broken = Url::parse("https://img.example/full/broken.jpg").unwrap();
        let err = collector.fetch_and_save(&fetcher, &broken, "0_0").await.unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));
    }

    #[test]
    fn test_unwritable_target_is_an_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        // a directory where the JPEG should go
        fs::create_dir_all(store.path(Site::Suumo, "0_0")).unwrap();

        let err = store.save(Site::Suumo, "0_0", &png_bytes()).unwrap_err();
        assert!(matches!(err, ImageError::Encode(_)));
        assert!(err.to_string().starts_with("could not encode or write image"));
    }

    /// Fetcher that fails every request and records when it was asked
    struct FailingFetcher(std::cell::RefCell<Vec<std::time::Instant>>);

    impl Fetch for FailingFetcher {
        async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.0.borrow_mut().push(std::time::Instant::now());
            Err(FetchError::Status {
                url: url.to_string(),
                status: 503,
            })
        }
    }

    #[tokio::test]
    async fn test_failed_fetches_are_paced() {
        let dir = tempfile::tempdir().unwrap();
        let page = ParsedPage::parse_str(
            "https://suumo.jp/a/",
            r#"<img rel="https://img.example/1.jpg"><img rel="https://img.example/2.jpg">
               <img rel="https://img.example/3.jpg"><img rel="https://img.example/4.jpg">"#,
        );
        let gap = std::time::Duration::from_millis(40);
        let pacer = Pacer::new(std::time::Duration::ZERO, gap);
        let mut collector = ImageCollector::new(Site::Suumo, ImageStore::new(dir.path()), pacer);
        let fetcher = FailingFetcher(Default::default());

        let images = collector.collect(&fetcher, &page, 0).await;

        assert!(images.is_empty());
        assert_eq!(collector.saved(), 0);
        let times = fetcher.0.borrow();
        assert_eq!(times.len(), 4);
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= gap);
        }
    }
}
