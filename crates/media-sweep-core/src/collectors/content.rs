use super::{attribute_ids, stream_or_skip, AttributeCodes, Collector};
use crate::extract::value::json_leaves;
use crate::reference::ReferenceSetBuilder;
use crate::storage::{RawTextValue, SourceQuery, TextSource};
use lazy_static::lazy_static;
use regex::Regex;

const CMS_TABLES: &[&str] = &["cms_page", "cms_block"];

lazy_static! {
    static ref BACKGROUND_IMAGES_ATTR: Regex = Regex::new(
        r#"(?is)data-background-images\s*=\s*(?:"([^"]*)"|'([^']*)')"#
    )
    .expect("BACKGROUND_IMAGES_ATTR regex");
}

/// Page and block bodies.
pub struct CmsContent;

impl Collector for CmsContent {
    fn name(&self) -> &str {
        "cms content"
    }

    fn collect(&self, source: &dyn TextSource, refs: &mut ReferenceSetBuilder) -> usize {
        CMS_TABLES
            .iter()
            .map(|table| {
                let query = SourceQuery::new(*table, "content").not_empty();
                stream_or_skip(source, &query, &mut |raw: RawTextValue| feed_markup(refs, &raw))
            })
            .sum()
    }
}

/// Rich-text descriptions of products and categories.
pub struct RichDescriptions;

const DESCRIPTION_SOURCES: &[(&str, &[&str])] = &[
    ("catalog_product", &["description", "short_description"]),
    ("catalog_category", &["description"]),
];

impl Collector for RichDescriptions {
    fn name(&self) -> &str {
        "rich descriptions"
    }

    fn collect(&self, source: &dyn TextSource, refs: &mut ReferenceSetBuilder) -> usize {
        let mut values = 0;
        for &(entity, codes) in DESCRIPTION_SOURCES {
            let ids = attribute_ids(source, Some(entity), AttributeCodes::Exact(codes));
            if ids.is_empty() {
                continue;
            }
            for backend in ["text", "varchar"] {
                let query = SourceQuery::new(format!("{entity}_entity_{backend}"), "value")
                    .not_empty()
                    .in_values("attribute_id", &ids);
                values += stream_or_skip(source, &query, &mut |raw: RawTextValue| feed_markup(refs, &raw));
            }
        }
        values
    }
}

fn feed_markup(refs: &mut ReferenceSetBuilder, raw: &RawTextValue) {
    for leaf in background_image_leaves(&raw.value) {
        refs.feed_reference(&leaf);
    }
    refs.feed_text(raw);
}

/// String leaves of every page-builder `data-background-images` attribute.
/// The attribute holds entity-escaped JSON, e.g.
/// `{&quot;desktop_image&quot;:&quot;{{media url=wysiwyg/a.jpg}}&quot;}`.
pub fn background_image_leaves(html: &str) -> Vec<String> {
    let mut out = Vec::new();
    for caps in BACKGROUND_IMAGES_ATTR.captures_iter(html) {
        let Some(attr) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        let decoded = html_escape::decode_html_entities(attr.as_str());
        out.extend(
            json_leaves(&decoded)
                .into_iter()
                .map(|leaf| leaf.trim().to_string())
                .filter(|leaf| !leaf.is_empty()),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_image_leaves() {
        let html = r#"<div data-content-type="row" data-background-images="{&quot;desktop_image&quot;:&quot; wysiwyg/hero.jpg &quot;,&quot;mobile_image&quot;:&quot;&quot;}"></div>"#;
        assert_eq!(background_image_leaves(html), vec!["wysiwyg/hero.jpg"]);
    }

    #[test]
    fn test_single_quoted_attribute() {
        let html = r#"<div data-background-images='{"desktop_image":"wysiwyg/a.jpg"}'></div>"#;
        assert_eq!(background_image_leaves(html), vec!["wysiwyg/a.jpg"]);
    }

    #[test]
    fn test_non_json_attribute_yields_nothing() {
        assert!(background_image_leaves(r#"<div data-background-images="{}"></div>"#).is_empty());
        assert!(background_image_leaves(r#"<div data-background-images="none"></div>"#).is_empty());
    }
}
