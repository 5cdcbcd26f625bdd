pub mod decode;
pub mod patterns;
pub mod serialized;
pub mod value;

use crate::storage::RawTextValue;
use std::collections::HashSet;

/// Nesting levels of JSON / serialized payloads followed before giving up.
const MAX_NESTING: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Pattern battery on the raw value only.
    Fast,
    /// Pattern battery plus decode variants and JSON / serialized harvesting.
    Intensive,
}

#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    mode: ExtractionMode,
}

impl Pipeline {
    pub fn new(mode: ExtractionMode) -> Self {
        Self { mode }
    }

    /// Raw (un-normalized) references found in one text value.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut out = Vec::new();
        self.extract_into(text, 0, &mut out);
        out
    }

    /// Deduplicated raw references across a stream of values.
    pub fn collect<I>(&self, values: I) -> HashSet<String>
    where
        I: IntoIterator<Item = RawTextValue>,
    {
        let mut refs = HashSet::new();
        for value in values {
            refs.extend(self.extract(&value.value));
        }
        refs
    }

    fn extract_into(&self, text: &str, depth: usize, out: &mut Vec<String>) {
        patterns::extract_all(text, out);
        if self.mode == ExtractionMode::Fast {
            return;
        }

        for (index, variant) in decode::variants(text).iter().enumerate() {
            if index > 0 {
                patterns::extract_all(variant, out);
            }
            if depth >= MAX_NESTING {
                continue;
            }
            for leaf in value::json_leaves(variant) {
                self.extract_into(&leaf, depth + 1, out);
            }
            for leaf in serialized::string_leaves(variant) {
                self.extract_into(&leaf, depth + 1, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(value: &str) -> RawTextValue {
        RawTextValue::new(value, "test")
    }

    #[test]
    fn test_fast_mode_skips_decoding() {
        let pipeline = Pipeline::new(ExtractionMode::Fast);
        assert!(pipeline.extract("%252Fmedia%252Ffoo.png").is_empty());
    }

    #[test]
    fn test_intensive_mode_decodes_twice() {
        let pipeline = Pipeline::new(ExtractionMode::Intensive);
        assert!(pipeline
            .extract("%252Fmedia%252Ffoo.png")
            .contains(&"/media/foo.png".to_string()));
    }

    #[test]
    fn test_escaped_json_leaf() {
        let pipeline = Pipeline::new(ExtractionMode::Intensive);
        let text = r#"{"image":"wysiwyg\/promo.png"}"#;
        assert!(pipeline.extract(text).contains(&"wysiwyg/promo.png".to_string()));
        assert!(Pipeline::new(ExtractionMode::Fast).extract(text).is_empty());
    }

    #[test]
    fn test_json_leaf_inside_serialized_value() {
        let json = r#"{"image":"wysiwyg\/promo.png"}"#;
        let text = format!(r#"a:1:{{s:6:"widget";s:{}:"{}";}}"#, json.len(), json);
        let pipeline = Pipeline::new(ExtractionMode::Intensive);
        assert!(pipeline
            .extract(&text)
            .contains(&"wysiwyg/promo.png".to_string()));
    }

    #[test]
    fn test_collect_deduplicates() {
        let pipeline = Pipeline::new(ExtractionMode::Fast);
        let refs = pipeline.collect(vec![
            raw("<img src=\"/media/a.png\">"),
            raw("url(/media/a.png)"),
        ]);
        assert_eq!(refs.len(), 1);
        assert!(refs.contains("/media/a.png"));
    }
}
