//! Insertion-ordered, type-tagged key/value container.
//!
//! Acts like a string-keyed map but preserves insertion order and keeps the
//! wire type of every value next to it. Only an array-backed implementation
//! exists, sized for the handful of fields a typical record carries; a
//! tree-backed variant would be needed for large maps.
//!
//! Re-inserting an existing key appends a second entry. Lookups return the
//! first match, so the appended value is invisible to `get` but is counted by
//! `len` and returned by the enumeration methods. There is no removal.

use super::data_type::DataType;
use super::value::FieldValue;

const DEFAULT_CAPACITY: usize = 8;

pub trait EmbeddedMap {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First entry stored under `key`, or `(None, DataType::Unknown)`.
    fn get(&self, key: &str) -> (Option<&FieldValue>, DataType);

    /// Appends unconditionally; never replaces an existing entry.
    fn put(&mut self, key: String, value: FieldValue, typ: DataType);

    fn value(&self, key: &str) -> Option<&FieldValue> {
        self.get(key).0
    }

    fn keys(&self) -> &[String];
    fn values(&self) -> &[FieldValue];
    fn types(&self) -> &[DataType];

    /// All three sequences, index-aligned.
    fn all(&self) -> (&[String], &[FieldValue], &[DataType]) {
        (self.keys(), self.values(), self.types())
    }
}

/// Array-backed [`EmbeddedMap`] using linear key scans.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedArrayMap {
    keys: Vec<String>,
    vals: Vec<FieldValue>,
    types: Vec<DataType>,
}

impl EmbeddedArrayMap {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            keys: Vec::with_capacity(cap),
            vals: Vec::with_capacity(cap),
            types: Vec::with_capacity(cap),
        }
    }

    /// Entries in insertion order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue, DataType)> {
        self.keys
            .iter()
            .zip(&self.vals)
            .zip(&self.types)
            .map(|((k, v), t)| (k.as_str(), v, *t))
    }
}

impl Default for EmbeddedArrayMap {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddedMap for EmbeddedArrayMap {
    fn len(&self) -> usize {
        self.keys.len()
    }

    fn get(&self, key: &str) -> (Option<&FieldValue>, DataType) {
        match self.keys.iter().position(|k| k == key) {
            Some(i) => (Some(&self.vals[i]), self.types[i]),
            None => (None, DataType::Unknown),
        }
    }

    fn put(&mut self, key: String, value: FieldValue, typ: DataType) {
        self.keys.push(key);
        self.vals.push(value);
        self.types.push(typ);
    }

    fn keys(&self) -> &[String] {
        &self.keys
    }

    fn values(&self) -> &[FieldValue] {
        &self.vals
    }

    fn types(&self) -> &[DataType] {
        &self.types
    }
}

impl std::fmt::Display for EmbeddedArrayMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let vals: Vec<String> = self.vals.iter().map(ToString::to_string).collect();
        writeln!(f, "<EmbeddedMap:")?;
        writeln!(f, "  Keys : {:?}", self.keys)?;
        writeln!(f, "  Types: {:?}", self.types)?;
        writeln!(f, "  Vals : [{}]", vals.join(", "))?;
        write!(f, ">")
    }
}
