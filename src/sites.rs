//! Catalogue of the supported source sites.
//!
//! Everything that is specific to one site's page layout lives here: how
//! internal links become absolute URLs, which selectors find each field,
//! which attribute keys a record carries and which images are archived.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;

/// Target sites that can be harvested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    /// SUUMO used detached-house listings
    Suumo,
    /// Jalan tourist landmark reviews
    Jalan,
}

impl Site {
    /// Directory and file-name component for this site
    pub fn name(&self) -> &'static str {
        match self {
            Site::Suumo => "suumo",
            Site::Jalan => "jalan",
        }
    }

    /// Selector dialect used on this site's pages
    pub fn dialect(&self) -> &'static Dialect {
        match self {
            Site::Suumo => &SUUMO_DIALECT,
            Site::Jalan => &JALAN_DIALECT,
        }
    }

    /// The fixed attribute keys every record from this site carries
    pub fn schema(&self) -> &'static FieldSchema {
        match self {
            Site::Suumo => &SUUMO_SCHEMA,
            Site::Jalan => &JALAN_SCHEMA,
        }
    }

    /// Turns a link found on a listing page into the detail page URL
    ///
    /// SUUMO links are site-relative paths and get the host prepended.
    /// Jalan links are protocol-relative and point at the landmark page; the
    /// reviews live on its `kuchikomi/` tab.
    pub fn detail_url(&self, link: &str) -> String {
        match self {
            Site::Suumo => {
                if link.starts_with("http://") || link.starts_with("https://") {
                    link.to_string()
                } else {
                    format!("{}{}", SUUMO_BASE, link)
                }
            }
            Site::Jalan => {
                let absolute = absolutize_scheme(link);
                if absolute.ends_with('/') {
                    format!("{}kuchikomi/", absolute)
                } else {
                    format!("{}/kuchikomi/", absolute)
                }
            }
        }
    }

    /// First listing page for a region
    pub fn start_url(&self, region: &Region) -> String {
        match self {
            Site::Suumo => format!("{}/chukoikkodate/{}/", SUUMO_BASE, region.suumo_slug),
            Site::Jalan => format!("{}/kankou/{}/", JALAN_BASE, region.jalan_code),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const SUUMO_BASE: &str = "https://suumo.jp";
const JALAN_BASE: &str = "https://www.jalan.net";

/// Adds `https:` to protocol-relative URLs
pub fn absolutize_scheme(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{}", url)
    } else {
        url.to_string()
    }
}

/// How detail fields are laid out on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLayout {
    /// `tr` rows holding alternating `th` label and `td` value cells
    Table,
    /// `li` items of the form `label：value`
    LabelledList,
}

/// Selectors for one site's page layout
#[derive(Debug)]
pub struct Dialect {
    /// Anchors on a listing page that lead to detail pages
    pub listing_links: &'static str,
    pub title: &'static str,
    pub comment: &'static str,
    /// Containers for detail fields, tried in order
    pub detail_containers: &'static [&'static str],
    pub field_layout: FieldLayout,
    /// Tab links to a separate page holding the detail fields, tried in order
    pub outline_links: &'static [&'static str],
    /// One element per archivable image
    pub images: &'static str,
    /// Child carrying the URL, when it is not the image element itself;
    /// only the first match is used
    pub image_source: Option<&'static str>,
    /// Attribute holding the image URL
    pub image_url_attr: &'static str,
    /// Attribute holding the caption
    pub image_tag_attr: &'static str,
    /// Pattern identifying resized variants that are not archived
    pub resized_pattern: Option<&'static str>,
    /// Link text of the pagination control
    pub next_link_text: &'static str,
}

static SUUMO_DIALECT: Dialect = Dialect {
    listing_links: "h2.property_unit-title a",
    title: "h2.fs16",
    comment: "p.fs14",
    detail_containers: &["table.pCell10", "table.bdGrayT"],
    field_layout: FieldLayout::Table,
    outline_links: &["a.tabOutline2", "a.tabOutline"],
    images: "img",
    image_source: None,
    image_url_attr: "rel",
    image_tag_attr: "alt",
    resized_pattern: Some("resizeImage"),
    next_link_text: "次へ",
};

static JALAN_DIALECT: Dialect = Dialect {
    listing_links: "p.item-name a",
    title: "h1.basicTitle",
    comment: "p.reviewText",
    detail_containers: &["ul.reviewDetail", "div.reviewDetail ul"],
    field_layout: FieldLayout::LabelledList,
    outline_links: &[],
    images: "ul.cassetteList-photo li.lightbox",
    image_source: Some("source[srcset]"),
    image_url_attr: "srcset",
    image_tag_attr: "alt",
    resized_pattern: None,
    next_link_text: "次へ",
};

/// Ordered set of attribute keys shared by record building and export
#[derive(Debug)]
pub struct FieldSchema {
    keys: &'static [&'static str],
}

impl FieldSchema {
    pub fn keys(&self) -> &'static [&'static str] {
        self.keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(&key)
    }

    /// Every key mapped to an empty value
    pub fn empty_fields(&self) -> Vec<(String, String)> {
        self.keys
            .iter()
            .map(|k| (k.to_string(), String::new()))
            .collect()
    }

    /// Lays extracted pairs out in schema order
    ///
    /// Unknown labels are dropped and missing keys stay empty. When a label
    /// repeats, the later value wins.
    pub fn fill<I>(&self, pairs: I) -> Vec<(String, String)>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut fields = self.empty_fields();
        for (label, value) in pairs {
            match fields.iter_mut().find(|(k, _)| *k == label) {
                Some(slot) => slot.1 = value,
                None => ::log::debug!("Ignoring field outside schema: {}", label),
            }
        }
        fields
    }
}

static SUUMO_SCHEMA: FieldSchema = FieldSchema {
    keys: &[
        "販売スケジュール",
        "イベント情報",
        "所在地",
        "交通",
        "販売戸数",
        "総戸数",
        "価格",
        "最多価格帯",
        "私道負担・道路",
        "諸費用",
        "間取り",
        "建物面積",
        "土地面積",
        "建ぺい率・容積率",
        "完成時期(築年月)",
        "入居時期",
        "土地の権利形態",
        "構造・工法",
        "施工",
        "リフォーム",
        "用途地域",
        "地目",
        "その他制限事項",
        "その他概要・特記事項",
    ],
};

static JALAN_SCHEMA: FieldSchema = FieldSchema {
    keys: &["行った時期", "同行者", "混雑具合", "滞在時間"],
};

/// A prefecture, with the identifiers each site uses for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub suumo_slug: &'static str,
    pub jalan_code: &'static str,
}

impl Region {
    /// Looks a region up by name, ignoring case
    pub fn lookup(name: &str) -> Result<&'static Region, ConfigError> {
        REGIONS
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::UnknownRegion(name.to_string()))
    }
}

macro_rules! region {
    ($name:literal, $slug:literal, $code:literal) => {
        Region {
            name: $name,
            suumo_slug: $slug,
            jalan_code: $code,
        }
    };
}

static REGIONS: &[Region] = &[
    region!("Hokkaido", "hokkaido_", "010000"),
    region!("Aomori", "aomori", "020000"),
    region!("Iwate", "iwate", "030000"),
    region!("Miyagi", "miyagi", "040000"),
    region!("Akita", "akita", "050000"),
    region!("Yamagata", "yamagata", "060000"),
    region!("Fukushima", "fukushima", "070000"),
    region!("Ibaraki", "ibaraki", "080000"),
    region!("Tochigi", "tochigi", "090000"),
    region!("Gunma", "gumma", "100000"),
    region!("Saitama", "saitama", "110000"),
    region!("Chiba", "chiba", "120000"),
    region!("Tokyo", "tokyo", "130000"),
    region!("Kanagawa", "kanagawa", "140000"),
    region!("Niigata", "niigata", "150000"),
    region!("Toyama", "toyama", "160000"),
    region!("Ishikawa", "ishikawa", "170000"),
    region!("Fukui", "fukui", "180000"),
    region!("Yamanashi", "yamanashi", "190000"),
    region!("Nagano", "nagano", "200000"),
    region!("Gifu", "gifu", "210000"),
    region!("Shizuoka", "shizuoka", "220000"),
    region!("Aichi", "aichi", "230000"),
    region!("Mie", "mie", "240000"),
    region!("Shiga", "shiga", "250000"),
    region!("Kyoto", "kyoto", "260000"),
    region!("Osaka", "osaka", "270000"),
    region!("Hyogo", "hyogo", "280000"),
    region!("Nara", "nara", "290000"),
    region!("Wakayama", "wakayama", "300000"),
    region!("Tottori", "tottori", "310000"),
    region!("Shimane", "shimane", "320000"),
    region!("Okayama", "okayama", "330000"),
    region!("Hiroshima", "hiroshima", "340000"),
    region!("Yamaguchi", "yamaguchi", "350000"),
    region!("Tokushima", "tokushima", "360000"),
    region!("Kagawa", "kagawa", "370000"),
    region!("Ehime", "ehime", "380000"),
    region!("Kochi", "kochi", "390000"),
    region!("Fukuoka", "fukuoka", "400000"),
    region!("Saga", "saga", "410000"),
    region!("Nagasaki", "nagasaki", "420000"),
    region!("Kumamoto", "kumamoto", "430000"),
    region!("Oita", "oita", "440000"),
    region!("Miyazaki", "miyazaki", "450000"),
    region!("Kagoshima", "kagoshima", "460000"),
    region!("Okinawa", "okinawa", "470000"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suumo_detail_url_prefixes_host() {
        assert_eq!(
            Site::Suumo.detail_url("/chukoikkodate/yamagata/sc_tendo/nc_97027597/"),
            "https://suumo.jp/chukoikkodate/yamagata/sc_tendo/nc_97027597/"
        );
        assert_eq!(
            Site::Suumo.detail_url("https://suumo.jp/x/"),
            "https://suumo.jp/x/"
        );
    }

    #[test]
    fn test_jalan_detail_url_inserts_scheme_and_review_tab() {
        assert_eq!(
            Site::Jalan.detail_url("//www.jalan.net/kankou/spt_06201cc3290012345/"),
            "https://www.jalan.net/kankou/spt_06201cc3290012345/kuchikomi/"
        );
    }

    #[test]
    fn test_schema_fill_keeps_key_set() {
        let schema = Site::Suumo.schema();
        let fields = schema.fill(vec![
            ("価格".to_string(), "1980万円".to_string()),
            ("未知の項目".to_string(), "x".to_string()),
        ]);
        let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, schema.keys());
        assert_eq!(
            fields.iter().find(|(k, _)| k == "価格").map(|(_, v)| v.as_str()),
            Some("1980万円")
        );
        assert!(fields.iter().filter(|(k, _)| k != "価格").all(|(_, v)| v.is_empty()));
    }

    #[test]
    fn test_region_lookup_is_case_insensitive() {
        let region = Region::lookup("yamagata").unwrap();
        assert_eq!(region.name, "Yamagata");
        assert_eq!(
            Site::Suumo.start_url(region),
            "https://suumo.jp/chukoikkodate/yamagata/"
        );
        assert_eq!(
            Site::Jalan.start_url(region),
            "https://www.jalan.net/kankou/060000/"
        );
        assert!(Region::lookup("Atlantis").is_err());
        assert_eq!(REGIONS.len(), 47);
    }
}
