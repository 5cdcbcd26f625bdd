//! Best-effort decoder for the legacy length-prefixed serialization format
//! (`a:2:{i:0;s:5:"hello";...}`) found in older configuration and widget rows.
//!
//! Only string harvesting depends on it, so class names are dropped, custom
//! payloads are kept as raw strings and back-references decode to null.

use super::value::{KeyPolicy, MapKey, Value};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

const MAX_DEPTH: usize = 64;

lazy_static! {
    static ref HEADER: Regex = Regex::new(r"^(?:a|s|O|C|b|i|d):").expect("HEADER regex");
}

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("unexpected end of input at byte {0}")]
    Eof(usize),

    #[error("expected {expected:?} at byte {pos}, found {found:?}")]
    Unexpected { expected: char, found: char, pos: usize },

    #[error("invalid number at byte {0}")]
    Number(usize),

    #[error("unknown type marker {0:?} at byte {1}")]
    UnknownType(char, usize),

    #[error("nesting deeper than {0}")]
    TooDeep(usize),
}

/// True when the text starts with a serialization type header.
pub fn looks_serialized(text: &str) -> bool {
    HEADER.is_match(text.trim_start())
}

pub fn parse(text: &str) -> Result<Value, ParseError> {
    let mut parser = Parser {
        input: text.trim_start().as_bytes(),
        pos: 0,
    };
    parser.value(0)
}

/// Every string value and string key of a serialized payload. Malformed
/// payloads yield nothing.
pub fn string_leaves(text: &str) -> Vec<String> {
    if !looks_serialized(text) {
        return Vec::new();
    }
    match parse(text) {
        Ok(value) => value.string_leaves(KeyPolicy::Include),
        Err(_) => Vec::new(),
    }
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn value(&mut self, depth: usize) -> Result<Value, ParseError> {
        if depth > MAX_DEPTH {
            return Err(ParseError::TooDeep(MAX_DEPTH));
        }
        let marker_pos = self.pos;
        let marker = self.next()?;
        match marker {
            b'N' => {
                self.expect(b';')?;
                Ok(Value::Null)
            }
            b'b' => {
                self.expect(b':')?;
                Ok(Value::Bool(self.integer(b';')? != 0))
            }
            b'i' => {
                self.expect(b':')?;
                Ok(Value::Int(self.integer(b';')?))
            }
            b'd' => {
                self.expect(b':')?;
                let start = self.pos;
                let raw = self.until(b';')?;
                let parsed = match raw {
                    "INF" => f64::INFINITY,
                    "-INF" => f64::NEG_INFINITY,
                    "NAN" => f64::NAN,
                    other => other.parse().map_err(|_| ParseError::Number(start))?,
                };
                Ok(Value::Float(parsed))
            }
            b's' | b'E' => {
                self.expect(b':')?;
                let s = self.sized_string()?;
                self.expect(b';')?;
                Ok(Value::Str(s))
            }
            b'a' => {
                self.expect(b':')?;
                let count = self.length(b':')?;
                let entries = self.entries(count, depth)?;
                Ok(Value::Map(entries))
            }
            b'O' => {
                self.expect(b':')?;
                let _class = self.sized_string()?;
                self.expect(b':')?;
                let count = self.length(b':')?;
                let entries = self.entries(count, depth)?;
                Ok(Value::Map(entries))
            }
            b'C' => {
                self.expect(b':')?;
                let _class = self.sized_string()?;
                self.expect(b':')?;
                let len = self.length(b':')?;
                self.expect(b'{')?;
                let payload = self.take(len)?;
                self.expect(b'}')?;
                Ok(Value::Str(String::from_utf8_lossy(payload).into_owned()))
            }
            b'r' | b'R' => {
                self.expect(b':')?;
                self.integer(b';')?;
                Ok(Value::Null)
            }
            other => Err(ParseError::UnknownType(other as char, marker_pos)),
        }
    }

    fn entries(&mut self, count: usize, depth: usize) -> Result<Vec<(MapKey, Value)>, ParseError> {
        self.expect(b'{')?;
        let mut entries = Vec::new();
        for _ in 0..count {
            let key = self.key()?;
            let value = self.value(depth + 1)?;
            entries.push((key, value));
        }
        self.expect(b'}')?;
        Ok(entries)
    }

    fn key(&mut self) -> Result<MapKey, ParseError> {
        let pos = self.pos;
        match self.next()? {
            b'i' => {
                self.expect(b':')?;
                Ok(MapKey::Int(self.integer(b';')?))
            }
            b's' => {
                self.expect(b':')?;
                let s = self.sized_string()?;
                self.expect(b';')?;
                Ok(MapKey::Str(s))
            }
            other => Err(ParseError::UnknownType(other as char, pos)),
        }
    }

    /// `LEN:"bytes"`, where LEN counts bytes.
    fn sized_string(&mut self) -> Result<String, ParseError> {
        let len = self.length(b':')?;
        self.expect(b'"')?;
        let bytes = self.take(len)?;
        self.expect(b'"')?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    fn length(&mut self, terminator: u8) -> Result<usize, ParseError> {
        let start = self.pos;
        let raw = self.until(terminator)?;
        raw.parse().map_err(|_| ParseError::Number(start))
    }

    fn integer(&mut self, terminator: u8) -> Result<i64, ParseError> {
        let start = self.pos;
        let raw = self.until(terminator)?;
        raw.parse().map_err(|_| ParseError::Number(start))
    }

    /// Consumes through `terminator`, returning the text before it.
    fn until(&mut self, terminator: u8) -> Result<&'a str, ParseError> {
        let input = self.input;
        let start = self.pos;
        let offset = input[start..]
            .iter()
            .position(|&b| b == terminator)
            .ok_or(ParseError::Eof(input.len()))?;
        self.pos = start + offset + 1;
        std::str::from_utf8(&input[start..start + offset]).map_err(|_| ParseError::Number(start))
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ParseError> {
        let input = self.input;
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= input.len())
            .ok_or(ParseError::Eof(input.len()))?;
        let bytes = &input[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn next(&mut self) -> Result<u8, ParseError> {
        let b = *self.input.get(self.pos).ok_or(ParseError::Eof(self.pos))?;
        self.pos += 1;
        Ok(b)
    }

    fn expect(&mut self, expected: u8) -> Result<(), ParseError> {
        let pos = self.pos;
        let found = self.next()?;
        if found == expected {
            Ok(())
        } else {
            Err(ParseError::Unexpected {
                expected: expected as char,
                found: found as char,
                pos,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_detection() {
        assert!(looks_serialized("  a:1:{i:0;s:1:\"x\";}"));
        assert!(looks_serialized("b:0;"));
        assert!(!looks_serialized("N;"));
        assert!(!looks_serialized("{\"a\":1}"));
    }

    #[test]
    fn test_nested_array_with_string_keys() {
        let text = r#"a:2:{s:5:"image";s:18:"wysiwyg/banner.jpg";s:5:"items";a:1:{i:0;s:10:"logo/a.png";}}"#;
        assert_eq!(
            string_leaves(text),
            vec!["image", "wysiwyg/banner.jpg", "items", "logo/a.png"]
        );
    }

    #[test]
    fn test_object_and_scalars() {
        let text = r#"O:8:"stdClass":4:{s:3:"src";s:5:"a.png";s:1:"n";i:42;s:1:"f";d:1.5;s:1:"b";b:1;}"#;
        let value = parse(text).unwrap();
        assert_eq!(
            value,
            Value::Map(vec![
                (MapKey::Str("src".into()), Value::Str("a.png".into())),
                (MapKey::Str("n".into()), Value::Int(42)),
                (MapKey::Str("f".into()), Value::Float(1.5)),
                (MapKey::Str("b".into()), Value::Bool(true)),
            ])
        );
    }

    #[test]
    fn test_length_counts_bytes() {
        let text = "s:9:\"caf\u{e9}.png\";";
        assert_eq!(parse(text).unwrap(), Value::Str("caf\u{e9}.png".into()));
    }

    #[test]
    fn test_custom_payload_kept_raw() {
        let text = r#"C:3:"Foo":13:{wysiwyg/x.png}"#;
        assert_eq!(string_leaves(text), vec!["wysiwyg/x.png"]);
    }

    #[test]
    fn test_malformed_yields_nothing() {
        assert!(string_leaves(r#"a:2:{i:0;s:40:"short";}"#).is_empty());
        assert!(string_leaves("s:abc").is_empty());
        assert!(parse("i:12").is_err());
    }

    #[test]
    fn test_false_bool_is_valid() {
        assert_eq!(parse("b:0;").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_depth_limit() {
        let mut text = String::new();
        for _ in 0..100 {
            text.push_str("a:1:{i:0;");
        }
        text.push_str("N;");
        for _ in 0..100 {
            text.push('}');
        }
        assert_eq!(parse(&text), Err(ParseError::TooDeep(MAX_DEPTH)));
    }
}
