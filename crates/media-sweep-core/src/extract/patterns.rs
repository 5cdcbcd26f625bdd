//! Regex battery that pulls candidate media references out of free text.
//!
//! The extractors overlap on purpose. A reference matched twice costs a
//! duplicate that normalization folds away; a reference missed costs a file.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ABSOLUTE_MEDIA_URL: Regex =
        Regex::new(r#"(?i)https?://[^"']*/media/[^"')\s]+"#).expect("ABSOLUTE_MEDIA_URL regex");
    static ref MEDIA_TOKEN: Regex =
        Regex::new(r#"(?i)(?:^|[^a-z0-9_/])(/?media/[^"')\s]+)"#).expect("MEDIA_TOKEN regex");
    static ref QUOTED_MEDIA_PATH: Regex = Regex::new(
        r#"(?i)"((?:https?://[^"\s]*?)?/?media/[^"]+)"|'((?:https?://[^'\s]*?)?/?media/[^']+)'"#
    )
    .expect("QUOTED_MEDIA_PATH regex");
    static ref MEDIA_DIRECTIVE: Regex = Regex::new(
        r#"(?i)\{\{\s*media\s+url\s*=\s*(?:["']([^"']+)["']|([^\s"'}]+))\s*\}\}"#
    )
    .expect("MEDIA_DIRECTIVE regex");
    static ref KNOWN_PREFIX_PATH: Regex = Regex::new(
        r#"(?i)\b((?:catalog/product|wysiwyg|logo|favicon|captcha|attribute/swatch|category|downloadable|email|theme|amasty|pagebuilder)/[A-Za-z0-9_\-./]+?\.(?:png|jpe?g|gif|webp|svg|bmp|tiff))\b"#
    )
    .expect("KNOWN_PREFIX_PATH regex");
    static ref CSS_URL: Regex = Regex::new(r#"(?i)url\(([^)]+)\)"#).expect("CSS_URL regex");
    static ref MEDIA_ATTRIBUTE: Regex =
        Regex::new(r#"(?i)\b(?:src|data-src|data-original)\s*=\s*["']([^"']+)["']"#)
            .expect("MEDIA_ATTRIBUTE regex");
    static ref SRCSET_ATTRIBUTE: Regex =
        Regex::new(r#"(?i)\bsrcset\s*=\s*["']([^"']+)["']"#).expect("SRCSET_ATTRIBUTE regex");
    static ref BACKGROUND_IMAGE: Regex =
        Regex::new(r#"(?i)background-image\s*:\s*url\(([^)]+)\)"#).expect("BACKGROUND_IMAGE regex");
}

/// Runs every extractor against `text`, appending matches to `out`.
pub fn extract_all(text: &str, out: &mut Vec<String>) {
    out.extend(absolute_media_urls(text));
    out.extend(media_tokens(text));
    out.extend(quoted_media_paths(text));
    out.extend(media_directives(text));
    out.extend(known_prefix_paths(text));
    out.extend(css_urls(text));
    out.extend(html_media_attributes(text));
    out.extend(background_images(text));
}

/// `https://host/.../media/...` captured verbatim.
pub fn absolute_media_urls(text: &str) -> Vec<String> {
    ABSOLUTE_MEDIA_URL
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Bare `media/...` or `/media/...` tokens.
pub fn media_tokens(text: &str) -> Vec<String> {
    MEDIA_TOKEN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Quote-delimited media paths, absolute or relative, taken whole. File names
/// with spaces survive here while the unquoted extractors stop at the space.
pub fn quoted_media_paths(text: &str) -> Vec<String> {
    QUOTED_MEDIA_PATH
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// `{{media url="X"}}` directives, rewritten to `media/X`.
pub fn media_directives(text: &str) -> Vec<String> {
    MEDIA_DIRECTIVE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| format!("media/{}", m.as_str().trim_start_matches('/')))
        .collect()
}

/// Paths under a known upload directory ending in an image extension.
pub fn known_prefix_paths(text: &str) -> Vec<String> {
    KNOWN_PREFIX_PATH
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Contents of CSS `url(...)`.
pub fn css_urls(text: &str) -> Vec<String> {
    unquoted_captures(&CSS_URL, text)
}

/// `src`, `data-src`, `data-original` values and the URL of each `srcset` entry.
pub fn html_media_attributes(text: &str) -> Vec<String> {
    let mut refs: Vec<String> = MEDIA_ATTRIBUTE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    for caps in SRCSET_ATTRIBUTE.captures_iter(text) {
        let Some(list) = caps.get(1) else { continue };
        for entry in list.as_str().split(',') {
            if let Some(url) = entry.split_whitespace().next() {
                refs.push(url.to_string());
            }
        }
    }

    refs
}

/// `background-image: url(...)` declarations.
pub fn background_images(text: &str) -> Vec<String> {
    unquoted_captures(&BACKGROUND_IMAGE, text)
}

fn unquoted_captures(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim_matches(|c: char| c == ' ' || c == '\'' || c == '"'))
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect()
}
