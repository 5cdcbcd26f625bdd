use crate::extract::Pipeline;
use crate::normalize::{normalize, CanonicalPath};
use crate::storage::RawTextValue;
use std::collections::HashMap;

/// Canonical paths the data store refers to, keyed case-insensitively.
/// Frozen once built.
#[derive(Debug, Default, Clone)]
pub struct ReferenceSet {
    paths: HashMap<String, CanonicalPath>,
}

impl ReferenceSet {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// `key` must already be case-folded.
    pub fn contains_key(&self, key: &str) -> bool {
        self.paths.contains_key(key)
    }

    pub fn contains(&self, path: &CanonicalPath) -> bool {
        self.paths.contains_key(&path.key())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalPath> {
        self.paths.values()
    }
}

impl FromIterator<CanonicalPath> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = CanonicalPath>>(iter: I) -> Self {
        let mut paths = HashMap::new();
        for path in iter {
            paths.entry(path.key()).or_insert(path);
        }
        ReferenceSet { paths }
    }
}

/// Accumulates references during the collection phase.
pub struct ReferenceSetBuilder {
    pipeline: Pipeline,
    paths: HashMap<String, CanonicalPath>,
}

impl ReferenceSetBuilder {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            paths: HashMap::new(),
        }
    }

    /// Runs a text value through the extraction pipeline and keeps every
    /// reference that normalizes. Returns how many new paths were added.
    pub fn feed_text(&mut self, raw: &RawTextValue) -> usize {
        let refs = self.pipeline.extract(&raw.value);
        refs.iter().filter(|r| self.insert(r)).count()
    }

    /// Adds a value that is itself a reference, bypassing extraction.
    pub fn feed_reference(&mut self, reference: &str) -> bool {
        self.insert(reference)
    }

    pub(crate) fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn build(self) -> ReferenceSet {
        ReferenceSet { paths: self.paths }
    }

    fn insert(&mut self, reference: &str) -> bool {
        match normalize(reference) {
            Some(path) => {
                let key = path.key();
                if self.paths.contains_key(&key) {
                    false
                } else {
                    self.paths.insert(key, path);
                    true
                }
            }
            None => false,
        }
    }
}
