/// Decoded structured payload, independent of the format it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<Value>),
    Map(Vec<(MapKey, Value)>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapKey {
    Int(i64),
    Str(String),
}

/// Whether string-typed map keys are harvested alongside string values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPolicy {
    Skip,
    Include,
}

impl Value {
    /// Every string in the structure, depth-first in document order.
    pub fn string_leaves(&self, keys: KeyPolicy) -> Vec<String> {
        let mut out = Vec::new();
        self.visit_strings(keys, &mut out);
        out
    }

    fn visit_strings(&self, keys: KeyPolicy, out: &mut Vec<String>) {
        match self {
            Value::Str(s) => out.push(s.clone()),
            Value::Array(items) => {
                for item in items {
                    item.visit_strings(keys, out);
                }
            }
            Value::Map(entries) => {
                for (key, value) in entries {
                    if let (KeyPolicy::Include, MapKey::Str(k)) = (keys, key) {
                        out.push(k.clone());
                    }
                    value.visit_strings(keys, out);
                }
            }
            Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) => {}
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(0.0)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (MapKey::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// String values of `text` when it parses as a JSON object or array.
/// Object keys are not harvested. Anything unparseable yields nothing.
pub fn json_leaves(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return Vec::new();
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(parsed) => Value::from(parsed).string_leaves(KeyPolicy::Skip),
        Err(_) => Vec::new(),
    }
}
