use super::whole_store::scan_table;
use super::{attribute_ids, feed_query, AttributeCodes, Collector};
use crate::reference::ReferenceSetBuilder;
use crate::storage::{SourceQuery, TextSource};
use tracing::warn;

const CONFIG_PATH_PATTERNS: &[&str] = &["amasty_megamenu/%", "%/megamenu/%", "%/mega_menu/%"];
const CATEGORY_ATTRIBUTE_PATTERNS: &[&str] = &["%menu%", "%mega%"];
const CATEGORY_VALUE_TABLES: &[&str] = &[
    "catalog_category_entity_varchar",
    "catalog_category_entity_text",
];

/// The plugin's own tables are named `amasty_*` with a `mega` or `menu` token.
pub fn is_mega_menu_table(table: &str) -> bool {
    let lowered = table.to_lowercase();
    lowered.contains("amasty") && (lowered.contains("mega") || lowered.contains("menu"))
}

/// Mega menu plugin tables, settings and category attributes.
pub struct MegaMenu;

impl Collector for MegaMenu {
    fn name(&self) -> &str {
        "mega menu"
    }

    fn collect(&self, source: &dyn TextSource, refs: &mut ReferenceSetBuilder) -> usize {
        let mut values = 0;

        match source.tables() {
            Ok(tables) => {
                for table in tables.iter().filter(|t| is_mega_menu_table(t)) {
                    values += scan_table(source, table, refs);
                }
            }
            Err(err) => warn!("Could not list tables for mega menu: {}", err),
        }

        for column in ["path", "value"] {
            let query = SourceQuery::new("core_config_data", column)
                .not_empty()
                .like_any("path", CONFIG_PATH_PATTERNS);
            values += feed_query(source, &query, refs);
        }

        let ids = attribute_ids(
            source,
            Some("catalog_category"),
            AttributeCodes::Like(CATEGORY_ATTRIBUTE_PATTERNS),
        );
        if !ids.is_empty() {
            for table in CATEGORY_VALUE_TABLES {
                let query = SourceQuery::new(*table, "value")
                    .not_empty()
                    .in_values("attribute_id", &ids);
                values += feed_query(source, &query, refs);
            }
        }
        values
    }
}
