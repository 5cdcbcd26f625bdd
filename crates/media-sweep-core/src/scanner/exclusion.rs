/// Prefixes that are always merged into the caller's exclusions.
pub const PROTECTED_EXCLUSIONS: &[&str] = &["amasty/webp", "logo"];

/// Generated caches, staging areas and plugin internals the scanner never reports.
const ALWAYS_SKIP_PREFIXES: &[&str] = &[
    "catalog/product/cache/",
    "tmp/",
    "captcha/",
    "import/",
    "downloadable/tmp/",
    "amasty/",
    "amasty/webp/",
    "amasty/webp/wysiwyg/",
    "logo/",
];

const SENTINEL_BASENAMES: &[&str] = &[".htaccess", "placeholder", "index.php", "index.html"];

/// Case-insensitive path prefixes that keep files out of candidacy.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    prefixes: Vec<String>,
}

impl ExclusionSet {
    /// Seeds the protected prefixes, then adds `user` ones. Entries are
    /// trimmed of slashes, lower-cased and deduplicated; blank entries are dropped.
    pub fn new<S: AsRef<str>>(user: &[S]) -> Self {
        let mut prefixes: Vec<String> = Vec::new();
        let all = PROTECTED_EXCLUSIONS
            .iter()
            .copied()
            .chain(user.iter().map(|s| s.as_ref()));
        for raw in all {
            let prefix = raw.trim().trim_matches('/').to_lowercase();
            if !prefix.is_empty() && !prefixes.contains(&prefix) {
                prefixes.push(prefix);
            }
        }
        ExclusionSet { prefixes }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// `relative` is a path under the media root. A prefix only matches whole
    /// directory names: `logo` covers `logo/a.png` but not `logos/a.png`.
    pub fn is_excluded(&self, relative: &str) -> bool {
        let path = relative.replace('\\', "/");
        let path = path.trim_start_matches('/').to_lowercase();
        self.prefixes
            .iter()
            .any(|prefix| path.starts_with(&format!("{prefix}/")))
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        ExclusionSet::new::<&str>(&[])
    }
}

/// True for files the scanner drops before reference matching.
pub fn is_always_skipped(relative: &str) -> bool {
    let path = relative.replace('\\', "/");
    let path = path.trim_start_matches('/').to_lowercase();
    if ALWAYS_SKIP_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return true;
    }
    let basename = path.rsplit('/').next().unwrap_or(&path);
    SENTINEL_BASENAMES.contains(&basename)
}
