use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    static ref SCHEME_HOST: Regex =
        Regex::new(r"(?i)^(?:https?:)?//[^/]+/").expect("SCHEME_HOST regex");
    static ref STORAGE_ROOT_PREFIX: Regex =
        Regex::new(r"(?i)^/?pub/media/").expect("STORAGE_ROOT_PREFIX regex");
    static ref MEDIA_PREFIX: Regex = Regex::new(r"(?i)^/?media/").expect("MEDIA_PREFIX regex");
    static ref GENERATED_CACHE: Regex =
        Regex::new(r"(?i)^catalog/product/cache/").expect("GENERATED_CACHE regex");
    static ref TRANSIENT: Regex =
        Regex::new(r"(?i)^(?:\.htaccess|placeholder/|captcha/|tmp/)").expect("TRANSIENT regex");
}

/// Media-root-relative path of a referenced file. Never empty, never starts
/// or ends with `/`. Original casing is kept; comparisons go through [`key`].
///
/// [`key`]: CanonicalPath::key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalPath(String);

impl CanonicalPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded comparison key.
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalizes a raw reference, or rejects it.
///
/// Query strings and fragments are kept as-is, so `pic.png?v=2` stays distinct
/// from `pic.png`.
pub fn normalize(raw: &str) -> Option<CanonicalPath> {
    let path = strip_prefixes(&raw.replace('\\', "/"));

    if path.is_empty() || path.ends_with('/') {
        return None;
    }
    if GENERATED_CACHE.is_match(&path) || TRANSIENT.is_match(&path) {
        return None;
    }
    Some(CanonicalPath(path))
}

/// Comparison key for a file found under the media root, matching
/// [`CanonicalPath::key`] for the same file.
pub fn file_key(relative: &str) -> String {
    strip_prefixes(&relative.replace('\\', "/")).to_lowercase()
}

/// Strips scheme+host, storage-root and media-root prefixes and leading
/// slashes until nothing changes.
fn strip_prefixes(value: &str) -> String {
    let mut path = value.trim().to_string();
    loop {
        let mut next = SCHEME_HOST.replace(&path, "").into_owned();
        next = STORAGE_ROOT_PREFIX.replace(&next, "").into_owned();
        next = MEDIA_PREFIX.replace(&next, "").into_owned();
        let next = next.trim_start_matches('/').trim().to_string();
        if next == path {
            return path;
        }
        path = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(raw: &str) -> Option<String> {
        normalize(raw).map(CanonicalPath::into_string)
    }

    #[test]
    fn test_strips_scheme_host_and_roots() {
        assert_eq!(
            norm("https://shop.example.com/media/wysiwyg/a.png").as_deref(),
            Some("wysiwyg/a.png")
        );
        assert_eq!(
            norm("http://shop.example.com/pub/media/logo/x.svg").as_deref(),
            Some("logo/x.svg")
        );
        assert_eq!(
            norm("//cdn.example.com/media/catalog/product/a/b/c.jpg").as_deref(),
            Some("catalog/product/a/b/c.jpg")
        );
        assert_eq!(norm("/media/foo.png").as_deref(), Some("foo.png"));
        assert_eq!(norm("  wysiwyg\\win\\path.gif ").as_deref(), Some("wysiwyg/win/path.gif"));
    }

    #[test]
    fn test_rejections() {
        assert_eq!(norm(""), None);
        assert_eq!(norm("   "), None);
        assert_eq!(norm("/media/"), None);
        assert_eq!(norm("wysiwyg/folder/"), None);
        assert_eq!(norm("catalog/product/cache/abc/a.jpg"), None);
        assert_eq!(norm("/media/Catalog/Product/Cache/x.jpg"), None);
        assert_eq!(norm(".htaccess"), None);
        assert_eq!(norm("placeholder/default.jpg"), None);
        assert_eq!(norm("captcha/base/x.png"), None);
        assert_eq!(norm("tmp/upload.png"), None);
    }

    #[test]
    fn test_query_string_passes_through() {
        assert_eq!(norm("/media/pic.png?v=2").as_deref(), Some("pic.png?v=2"));
        assert_eq!(norm("media/pic.png#top").as_deref(), Some("pic.png#top"));
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "https://x.test/media/wysiwyg/a.png",
            "media/media/nested.png",
            "/pub/media//double//slash.png",
            "media/ spaced.png",
            "Logo/Stores/1/Brand.PNG",
            "pic.png?v=2",
        ];
        for raw in inputs {
            let once = normalize(raw).unwrap();
            let twice = normalize(once.as_str()).unwrap();
            assert_eq!(once, twice, "not idempotent for {raw:?}");
            assert!(!once.as_str().starts_with('/'));
            assert!(!once.as_str().ends_with('/'));
            assert!(!once.as_str().is_empty());
        }
    }

    #[test]
    fn test_key_is_case_insensitive() {
        let reference = normalize("/media/Logo/Brand.PNG").unwrap();
        assert_eq!(reference.as_str(), "Logo/Brand.PNG");
        assert_eq!(reference.key(), file_key("logo/brand.png"));
        assert_eq!(file_key("pub/media/LOGO/brand.png"), "logo/brand.png");
    }
}
