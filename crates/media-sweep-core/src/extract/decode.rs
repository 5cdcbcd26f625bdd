use percent_encoding::percent_decode_str;

/// Decoded forms of a raw value: the original, one and two rounds of URL
/// decoding, HTML-entity decoding, and URL decoding of the entity-decoded form.
/// The original is always first and no form appears twice.
pub fn variants(raw: &str) -> Vec<String> {
    let mut out = vec![raw.to_string()];

    let once = url_decode(raw);
    if once != raw {
        out.push(once.clone());
    }
    let twice = url_decode(&once);
    if twice != once && twice != raw {
        push_unique(&mut out, twice);
    }

    let entities = html_escape::decode_html_entities(raw).into_owned();
    if entities != raw {
        push_unique(&mut out, entities.clone());
    }
    let entities_url = url_decode(&entities);
    if entities_url != entities {
        push_unique(&mut out, entities_url);
    }

    out
}

/// Form-style URL decoding: `+` becomes a space, `%XX` becomes the byte,
/// malformed escapes are left alone.
pub fn url_decode(value: &str) -> String {
    let spaced = value.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

fn push_unique(out: &mut Vec<String>, value: String) {
    if !out.contains(&value) {
        out.push(value);
    }
}
