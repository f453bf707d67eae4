//! In-memory form of a parsed key-value file.
//!
//! A `Record` keeps the keys in file order and answers lookups
//! case-insensitively (exact spelling first), because Steam is not
//! consistent about `Apps` vs `apps` and friends.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::CoreError;

/// A leaf string or a nested block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Record(Record),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Record(_) => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            Value::Str(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    entries: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style `insert`, mostly for fixtures.
    pub fn with<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).or_else(|| {
            self.entries
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_record(&self, key: &str) -> Option<&Record> {
        self.get(key).and_then(Value::as_record)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove a key (same matching rules as `get`), keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let ix = self
            .entries
            .get_index_of(key)
            .or_else(|| self.entries.keys().position(|k| k.eq_ignore_ascii_case(key)))?;
        self.entries.shift_remove_index(ix).map(|(_, v)| v)
    }

    /// Walk nested blocks. Errors name the dotted path up to the failing key;
    /// the file path is attached by the caller.
    pub fn lookup(&self, path: &[&str]) -> Result<&Record, CoreError> {
        let mut cur = self;
        for (depth, key) in path.iter().enumerate() {
            let walked = || path[..=depth].join("/");
            cur = match cur.get(key) {
                Some(Value::Record(r)) => r,
                Some(Value::Str(_)) => {
                    return Err(CoreError::NotARecord {
                        path: PathBuf::new(),
                        key: walked(),
                    });
                }
                None => {
                    return Err(CoreError::MissingKey {
                        path: PathBuf::new(),
                        key: walked(),
                    });
                }
            };
        }
        Ok(cur)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut r = Record::new();
        for (k, v) in iter {
            r.insert(k, v);
        }
        r
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
