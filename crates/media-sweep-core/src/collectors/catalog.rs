use super::{attribute_ids, feed_structured, stream_or_skip, AttributeCodes, Collector};
use crate::reference::ReferenceSetBuilder;
use crate::storage::{RawTextValue, SourceQuery, TextSource};

const PRODUCT_IMAGE_CODES: &[&str] = &[
    "image",
    "small_image",
    "thumbnail",
    "swatch_image",
    "base_image",
];
const CATEGORY_IMAGE_CODES: &[&str] = &["image", "thumbnail"];

/// Image-valued attributes of one entity kind, plus its gallery table if any.
/// Values are stored relative to `base_dir`.
pub struct CatalogImages {
    name: &'static str,
    value_table: &'static str,
    codes: &'static [&'static str],
    gallery_table: Option<&'static str>,
    base_dir: &'static str,
}

impl CatalogImages {
    pub fn products() -> Self {
        Self {
            name: "product images",
            value_table: "catalog_product_entity_varchar",
            codes: PRODUCT_IMAGE_CODES,
            gallery_table: Some("catalog_product_entity_media_gallery"),
            base_dir: "catalog/product",
        }
    }

    pub fn categories() -> Self {
        Self {
            name: "category images",
            value_table: "catalog_category_entity_varchar",
            codes: CATEGORY_IMAGE_CODES,
            gallery_table: None,
            base_dir: "catalog/category",
        }
    }
}

impl Collector for CatalogImages {
    fn name(&self) -> &str {
        self.name
    }

    fn collect(&self, source: &dyn TextSource, refs: &mut ReferenceSetBuilder) -> usize {
        let base_dir = self.base_dir;
        let mut visit = |raw: RawTextValue| feed_structured(refs, &raw, base_dir);

        let ids = attribute_ids(source, None, AttributeCodes::Exact(self.codes));
        let mut values = 0;
        if !ids.is_empty() {
            let query = SourceQuery::new(self.value_table, "value")
                .not_empty()
                .in_values("attribute_id", &ids);
            values += stream_or_skip(source, &query, &mut visit);
        }
        if let Some(gallery) = self.gallery_table {
            let query = SourceQuery::new(gallery, "value").not_empty();
            values += stream_or_skip(source, &query, &mut visit);
        }
        values
    }
}
