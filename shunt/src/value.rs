//! Runtime values
//!
//! Every expression evaluates to a [`Value`]. Coercions between the variants
//! are explicit (`as_number`, `to_text`, `is_truthy`) and only operator and
//! function code calls them.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// The dynamic result type of an evaluation
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Number(f64),
    Text(String),
    Boolean(bool),
    #[default]
    Null,
    Array(Array),
}

impl Value {
    /// Numeric view of the value, if it has one.
    ///
    /// Booleans count as 1/0 and Null as 0. Text counts only when it is a plain
    /// decimal numeral (`"12"`, `"-1.5"`, `".5"`, `"2e3"`), without surrounding
    /// whitespace.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Null => Some(0.0),
            Value::Text(s) => parse_numeral(s),
            Value::Array(_) => None,
        }
    }

    /// Text form used by concatenation and string comparison
    pub fn to_text(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Null, zero, empty text, `false` and empty arrays are false
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0,
            Value::Text(s) => !s.is_empty(),
            Value::Boolean(b) => *b,
            Value::Null => false,
            Value::Array(a) => !a.is_empty(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Text(_) => "Text",
            Value::Boolean(_) => "Boolean",
            Value::Null => "Null",
            Value::Array(_) => "Array",
        }
    }

    /// Convert into a `serde_json::Value`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Strict decimal numeral check; `str::parse::<f64>` alone would also accept
/// `inf`, `NaN` and friends.
fn parse_numeral(s: &str) -> Option<f64> {
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    let mantissa = match body.find(['e', 'E']) {
        Some(pos) => {
            let exponent = &body[pos + 1..];
            let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            &body[..pos]
        }
        None => body,
    };
    let mut digits = 0;
    let mut dots = 0;
    for b in mantissa.bytes() {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }
    s.parse::<f64>().ok()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
            Value::Array(a) => write!(f, "{}", a),
        }
    }
}

/// One element of an [`Array`]
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Positional(Value),
    Keyed(String, Value),
}

impl Entry {
    pub fn value(&self) -> &Value {
        match self {
            Entry::Positional(v) | Entry::Keyed(_, v) => v,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Entry::Positional(_) => None,
            Entry::Keyed(k, _) => Some(k),
        }
    }
}

/// Ordered container mixing positional and keyed entries.
///
/// Keys are unique. Inserting an existing key replaces the value where the key
/// first appeared.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
    entries: Vec<Entry>,
}

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Value) {
        self.entries.push(Entry::Positional(value));
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        let existing = self
            .entries
            .iter_mut()
            .find(|entry| entry.key() == Some(key.as_str()));
        match existing {
            Some(entry) => *entry = Entry::Keyed(key, value),
            None => self.entries.push(Entry::Keyed(key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|entry| entry.key() == Some(key))
            .map(Entry::value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(Entry::value)
    }

    pub fn is_list(&self) -> bool {
        self.entries
            .iter()
            .all(|entry| matches!(entry, Entry::Positional(_)))
    }

    /// Structural concatenation: a copy of `self`, then `other`'s positional
    /// entries appended and its keyed entries merged (right-hand side wins).
    pub fn concat(&self, other: &Array) -> Array {
        let mut merged = self.clone();
        for entry in &other.entries {
            match entry {
                Entry::Positional(v) => merged.push(v.clone()),
                Entry::Keyed(k, v) => merged.insert(k.clone(), v.clone()),
            }
        }
        merged
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match entry {
                Entry::Keyed(key, _) if parse_numeral(key).is_some() => write!(f, "{} -> ", key)?,
                Entry::Keyed(key, _) => write!(f, "{:?} -> ", key)?,
                Entry::Positional(_) => {}
            }
            match entry.value() {
                Value::Text(s) => write!(f, "{:?}", s)?,
                other => write!(f, "{}", other)?,
            }
        }
        write!(f, "]")
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Entry::Positional).collect(),
        }
    }
}

impl FromIterator<(String, Value)> for Array {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut array = Array::new();
        for (k, v) in iter {
            array.insert(k, v);
        }
        array
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(values.into_iter().collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Array(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Null => serializer.serialize_unit(),
            Value::Array(a) => a.serialize(serializer),
        }
    }
}

impl Serialize for Array {
    /// Lists serialize as sequences. Anything with a keyed entry becomes a map
    /// in which positional entries take the lowest ordinal not already used
    /// as an explicit key.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_list() {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for value in self.values() {
                seq.serialize_element(value)?;
            }
            return seq.end();
        }

        let taken: HashSet<&str> = self.entries.iter().filter_map(Entry::key).collect();
        let mut map = serializer.serialize_map(Some(self.len()))?;
        let mut ordinal = 0usize;
        for entry in &self.entries {
            match entry {
                Entry::Positional(v) => {
                    let mut key = ordinal.to_string();
                    while taken.contains(key.as_str()) {
                        ordinal += 1;
                        key = ordinal.to_string();
                    }
                    map.serialize_entry(&key, v)?;
                    ordinal += 1;
                }
                Entry::Keyed(k, v) => map.serialize_entry(k, v)?,
            }
        }
        map.end()
    }
}
