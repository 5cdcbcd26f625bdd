use super::{feed_query, Collector};
use crate::reference::ReferenceSetBuilder;
use crate::storage::{SourceQuery, TextSource};
use tracing::{debug, warn};

/// Substrings that make a row worth extracting from. Rows matching none of
/// them are never read.
pub const MEDIA_MARKERS: &[&str] = &[
    "/media/",
    "{{media ",
    "wysiwyg/",
    "amasty/",
    ".png",
    ".jpg",
    ".jpeg",
    ".gif",
    ".webp",
    ".svg",
    "logo/",
    "logo/stores/",
    "favicon/",
    "catalog/product/",
    "attribute/swatch/",
    "category/",
    "background-image:",
    "\"src\":\"",
    "\"image\":\"",
    "url(",
];

/// Every text-capable column of every table.
pub struct WholeStoreScan;

impl Collector for WholeStoreScan {
    fn name(&self) -> &str {
        "whole store"
    }

    fn collect(&self, source: &dyn TextSource, refs: &mut ReferenceSetBuilder) -> usize {
        let tables = match source.tables() {
            Ok(tables) => tables,
            Err(err) => {
                warn!("Could not list tables, skipping whole-store scan: {}", err);
                return 0;
            }
        };
        tables
            .iter()
            .map(|table| scan_table(source, table, refs))
            .sum()
    }
}

/// Marker-filtered read of each text column of `table`.
pub(crate) fn scan_table(
    source: &dyn TextSource,
    table: &str,
    refs: &mut ReferenceSetBuilder,
) -> usize {
    let columns = match source.text_columns(table) {
        Ok(columns) => columns,
        Err(err) => {
            warn!("Skipping table {}: {}", table, err);
            return 0;
        }
    };
    let mut values = 0;
    for column in &columns {
        let query = SourceQuery::for_column(column).contains_any(MEDIA_MARKERS);
        values += feed_query(source, &query, refs);
    }
    debug!("{}: {} text columns, {} values", table, columns.len(), values);
    values
}
