//! Producers of raw text values, one per semantic slice of the data store.
//!
//! Every collector is best-effort: a query that fails is logged and skipped,
//! and the run continues with whatever the other sources yield.

mod catalog;
mod content;
mod mega_menu;
mod store_config;
mod whole_store;

pub use catalog::CatalogImages;
pub use content::{background_image_leaves, CmsContent, RichDescriptions};
pub use mega_menu::{is_mega_menu_table, MegaMenu};
pub use store_config::{StoreConfig, CONFIG_UPLOAD_DIRS};
pub use whole_store::{WholeStoreScan, MEDIA_MARKERS};

use crate::progress::ProgressReporter;
use crate::reference::ReferenceSetBuilder;
use crate::storage::{RawTextValue, SourceQuery, TextSource};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Integration name of the mega menu plugin.
pub const MEGA_MENU: &str = "mega_menu";

pub trait Collector {
    fn name(&self) -> &str;

    /// Feeds everything this source yields into `refs`. Returns the number of
    /// values read.
    fn collect(&self, source: &dyn TextSource, refs: &mut ReferenceSetBuilder) -> usize;
}

/// Answers whether a plugin integration is active in the store.
pub trait FeatureFlags {
    fn is_enabled(&self, integration: &str) -> bool;
}

/// Feature flags from a fixed list of integration names (case-insensitive).
#[derive(Debug, Default, Clone)]
pub struct StaticFeatures {
    enabled: HashSet<String>,
}

impl StaticFeatures {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            enabled: names
                .into_iter()
                .map(|n| n.as_ref().trim().to_lowercase())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }
}

impl FeatureFlags for StaticFeatures {
    fn is_enabled(&self, integration: &str) -> bool {
        self.enabled.contains(&integration.to_lowercase())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CollectOptions {
    pub scan_whole_store: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            scan_whole_store: true,
        }
    }
}

/// The ordered set of collectors for one run. Integrations whose feature flag
/// is off are never constructed.
pub struct ReferenceCollector {
    collectors: Vec<Box<dyn Collector>>,
}

impl ReferenceCollector {
    pub fn new(options: CollectOptions, features: &dyn FeatureFlags) -> Self {
        let mut collectors: Vec<Box<dyn Collector>> = vec![
            Box::new(CatalogImages::products()),
            Box::new(CatalogImages::categories()),
            Box::new(CmsContent),
            Box::new(RichDescriptions),
        ];
        if options.scan_whole_store {
            collectors.push(Box::new(WholeStoreScan));
        }
        if features.is_enabled(MEGA_MENU) {
            collectors.push(Box::new(MegaMenu));
        }
        collectors.push(Box::new(StoreConfig));
        Self { collectors }
    }

    pub fn collector_names(&self) -> Vec<&str> {
        self.collectors.iter().map(|c| c.name()).collect()
    }

    pub fn collect_all(
        &self,
        source: &dyn TextSource,
        refs: &mut ReferenceSetBuilder,
        reporter: &dyn ProgressReporter,
    ) {
        for collector in &self.collectors {
            let start = Instant::now();
            let before = refs.len();
            let values = collector.collect(source, refs);
            let added = refs.len() - before;
            info!(
                "{}: {} values, {} new references ({:.2}s)",
                collector.name(),
                values,
                added,
                start.elapsed().as_secs_f64()
            );
            reporter.on_source_complete(collector.name(), values, added);
        }
    }
}

/// Streams `query`, logging and swallowing a failure. Missing tables are
/// skipped quietly.
pub(crate) fn stream_or_skip(
    source: &dyn TextSource,
    query: &SourceQuery,
    visit: &mut dyn FnMut(RawTextValue),
) -> usize {
    match source.has_table(&query.table) {
        Ok(true) => {}
        Ok(false) => {
            debug!("Table {} not present, skipping", query.table);
            return 0;
        }
        Err(err) => {
            warn!("Could not list tables: {}", err);
            return 0;
        }
    }
    match source.stream(query, visit) {
        Ok(count) => count,
        Err(err) => {
            warn!("Skipping {}.{}: {}", query.table, query.column, err);
            0
        }
    }
}

/// Streams `query` through the extraction pipeline.
pub(crate) fn feed_query(
    source: &dyn TextSource,
    query: &SourceQuery,
    refs: &mut ReferenceSetBuilder,
) -> usize {
    stream_or_skip(source, query, &mut |raw: RawTextValue| {
        refs.feed_text(&raw);
    })
}

/// Feeds a value stored relative to `base_dir`: verbatim, qualified under
/// `base_dir`, and as free text.
pub(crate) fn feed_structured(refs: &mut ReferenceSetBuilder, raw: &RawTextValue, base_dir: &str) {
    let value = raw.value.trim();
    refs.feed_reference(value);
    if let Some(qualified) = qualify(base_dir, value) {
        refs.feed_reference(&qualified);
    }
    refs.feed_text(raw);
}

/// `value` joined under `base_dir`, unless it already names a media path.
pub(crate) fn qualify(base_dir: &str, value: &str) -> Option<String> {
    let lowered = value.to_lowercase();
    let trimmed = lowered.trim_start_matches('/');
    let base = base_dir.trim_matches('/').to_lowercase();
    let already_rooted = lowered.contains("://")
        || lowered.starts_with("//")
        || trimmed.starts_with("media/")
        || trimmed.starts_with("pub/media/")
        || trimmed.starts_with(&format!("{base}/"));
    if already_rooted || trimmed.is_empty() {
        None
    } else {
        Some(format!(
            "{}/{}",
            base_dir.trim_matches('/'),
            value.trim_start_matches('/')
        ))
    }
}

/// Attribute codes to match in `eav_attribute`.
pub(crate) enum AttributeCodes<'a> {
    Exact(&'a [&'a str]),
    Like(&'a [&'a str]),
}

/// `entity_type_id` of an entity type code such as `catalog_category`.
pub(crate) fn entity_type_id(source: &dyn TextSource, code: &str) -> Option<String> {
    let query = SourceQuery::new("eav_entity_type", "entity_type_id")
        .in_values("entity_type_code", &[code]);
    let mut found = None;
    stream_or_skip(source, &query, &mut |raw: RawTextValue| {
        found.get_or_insert(raw.value);
    });
    found
}

/// Attribute ids matching `codes`, optionally limited to one entity type.
pub(crate) fn attribute_ids(
    source: &dyn TextSource,
    entity_type: Option<&str>,
    codes: AttributeCodes<'_>,
) -> Vec<String> {
    let mut query = SourceQuery::new("eav_attribute", "attribute_id");
    if let Some(type_code) = entity_type {
        match entity_type_id(source, type_code) {
            Some(id) => query = query.in_values("entity_type_id", &[id]),
            None => {
                debug!("Entity type {} not found", type_code);
                return Vec::new();
            }
        }
    }
    query = match codes {
        AttributeCodes::Exact(list) => query.in_values("attribute_code", list),
        AttributeCodes::Like(patterns) => query.like_any("attribute_code", patterns),
    };
    let mut ids = Vec::new();
    stream_or_skip(source, &query, &mut |raw: RawTextValue| ids.push(raw.value));
    ids
}
