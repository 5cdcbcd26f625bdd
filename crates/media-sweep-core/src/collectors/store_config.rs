use super::{feed_structured, stream_or_skip, Collector};
use crate::reference::ReferenceSetBuilder;
use crate::storage::{RawTextValue, SourceQuery, TextSource};

const CONFIG_TABLE: &str = "core_config_data";

/// Known upload settings and the directory their values are relative to.
pub const CONFIG_UPLOAD_DIRS: &[(&str, &str)] = &[
    ("design/header/logo_src", "logo"),
    ("design/header/logo_src_small", "logo"),
    ("design/email/logo", "email/logo"),
    ("sales/identity/logo", "sales/store/logo"),
    ("design/head/shortcut_icon", "favicon"),
];

const FALLBACK_PATH_PATTERNS: &[&str] = &["%logo%", "%favicon%"];

/// Logo, favicon and email-logo settings.
pub struct StoreConfig;

impl Collector for StoreConfig {
    fn name(&self) -> &str {
        "store config"
    }

    fn collect(&self, source: &dyn TextSource, refs: &mut ReferenceSetBuilder) -> usize {
        let mut values = 0;
        for &(path, upload_dir) in CONFIG_UPLOAD_DIRS {
            let query = SourceQuery::new(CONFIG_TABLE, "value")
                .not_empty()
                .in_values("path", &[path]);
            values += stream_or_skip(source, &query, &mut |raw: RawTextValue| {
                feed_structured(refs, &raw, upload_dir)
            });
        }

        // Any other logo/favicon-looking setting, taken verbatim.
        let fallback = SourceQuery::new(CONFIG_TABLE, "value")
            .not_empty()
            .like_any("path", FALLBACK_PATH_PATTERNS);
        values += stream_or_skip(source, &fallback, &mut |raw: RawTextValue| {
            refs.feed_reference(raw.value.trim());
            refs.feed_text(&raw);
        });
        values
    }
}
