use crate::parsers::ParsedPage;
use crate::parsers::record::RecordBuilder;
use crate::results::Record;
use crate::sites::Site;

#[cfg(test)]
fn field_keys(record: &Record) -> Vec<&str> {
    record.fields.iter().map(|(k, _)| k.as_str()).collect()
}

#[cfg(test)]
mod suumo_tests {
    use super::*;

    const DETAIL: &str = r#"<html><body>
        <h2 class="fs16">
          天童市 中古一戸建て
        </h2>
        <p class="fs14">南向きの明るいお住まいです。</p>
        <table class="pCell10">
          <tr>
            <th>価格<span>ヒント</span></th><td>1980万円</td>
            <th>間取り</th><td>4LDK</td>
          </tr>
          <tr>
            <th>交通</th><td>JR奥羽本線「天童」徒歩15分[乗り換え案内]</td>
          </tr>
          <tr>
            <th>建物面積</th><td>105.3m²</td>
            <th>土地面積</th>
          </tr>
          <tr><td>orphan value</td></tr>
          <tr><th>謎の項目</th><td>x</td></tr>
        </table>
        </body></html>"#;

    #[test]
    fn test_build_reads_pairs_into_schema() {
        let page = ParsedPage::parse_str("https://suumo.jp/a/", DETAIL);
        let record = RecordBuilder::new(Site::Suumo).build(&page, 7);

        assert_eq!(record.id, 7);
        assert_eq!(record.url, "https://suumo.jp/a/");
        assert_eq!(record.title, "天童市 中古一戸建て");
        assert_eq!(record.comment, "南向きの明るいお住まいです。");
        assert_eq!(record.field("価格"), Some("1980万円"));
        assert_eq!(record.field("間取り"), Some("4LDK"));
        assert_eq!(record.field("交通"), Some("JR奥羽本線「天童」徒歩15分"));
        assert_eq!(record.field("建物面積"), Some("105.3m²"));
        // second label had no value
        assert_eq!(record.field("土地面積"), Some(""));
        assert_eq!(record.field("謎の項目"), None);
        assert_eq!(field_keys(&record), Site::Suumo.schema().keys());
    }

    #[test]
    fn test_secondary_table_selector() {
        let page = ParsedPage::parse_str(
            "https://suumo.jp/b/",
            r#"<table class="bdGrayT"><tr><th>所在地</th><td>山形県天童市</td></tr></table>"#,
        );
        let record = RecordBuilder::new(Site::Suumo).build(&page, 0);
        assert_eq!(record.field("所在地"), Some("山形県天童市"));
    }

    #[test]
    fn test_missing_table_degrades_to_empty_fields() {
        let page = ParsedPage::parse_str("https://suumo.jp/c/", "<html><body><p>gone</p></body></html>");
        let record = RecordBuilder::new(Site::Suumo).build(&page, 3);

        assert_eq!(record.title, "");
        assert_eq!(record.comment, "");
        assert_eq!(record.fields.len(), Site::Suumo.schema().keys().len());
        assert!(record.fields.iter().all(|(_, v)| v.is_empty()));
        assert_eq!(field_keys(&record), Site::Suumo.schema().keys());
    }

    #[test]
    fn test_fields_read_from_separate_details_page() {
        let page = ParsedPage::parse_str(
            "https://suumo.jp/d/",
            r#"<h2 class="fs16">タイトル</h2><table class="pCell10"><tr><th>価格</th><td>wrong</td></tr></table>"#,
        );
        let details = ParsedPage::parse_str(
            "https://suumo.jp/d/bukkengaiyo/",
            r#"<table class="pCell10"><tr><th>価格</th><td>2500万円</td></tr></table>"#,
        );
        let record = RecordBuilder::new(Site::Suumo).build_with_details(&page, Some(&details), 1);
        assert_eq!(record.title, "タイトル");
        assert_eq!(record.field("価格"), Some("2500万円"));
        assert_eq!(record.url, "https://suumo.jp/d/");
    }
}

#[cfg(test)]
mod jalan_tests {
    use super::*;

    #[test]
    fn test_review_list_fields() {
        let page = ParsedPage::parse_str(
            "https://www.jalan.net/kankou/spt_1/kuchikomi/",
            r#"<h1 class="basicTitle">山寺（宝珠山立石寺）</h1>
               <p class="reviewText">階段はきついけれど
               景色は最高でした。</p>
               <ul class="reviewDetail">
                 <li> 行った時期：2019年8月 </li>
                 <li>同行者：家族</li>
                 <li>評価なし</li>
               </ul>"#,
        );
        let record = RecordBuilder::new(Site::Jalan).build(&page, 0);
        assert_eq!(record.title, "山寺（宝珠山立石寺）");
        assert!(record.comment.starts_with("階段はきついけれど"));
        assert!(!record.comment.contains('\n'));
        assert_eq!(record.field("行った時期"), Some("2019年8月"));
        assert_eq!(record.field("同行者"), Some("家族"));
        assert_eq!(record.field("混雑具合"), Some(""));
        assert_eq!(field_keys(&record), Site::Jalan.schema().keys());
    }
}
