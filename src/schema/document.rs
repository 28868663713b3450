use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::data_type::DataType;
use super::embedded_map::{EmbeddedArrayMap, EmbeddedMap};
use super::value::FieldValue;
use crate::error::OrientError;

/// Record identity: cluster id plus position inside the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rid {
    pub cluster_id: i16,
    pub cluster_pos: i64,
}

impl Rid {
    /// Identity of a record that was never persisted.
    pub const UNSET: Rid = Rid {
        cluster_id: -1,
        cluster_pos: -1,
    };

    pub fn new(cluster_id: i16, cluster_pos: i64) -> Self {
        Self {
            cluster_id,
            cluster_pos,
        }
    }

    pub fn is_unset(&self) -> bool {
        self.cluster_id < 0
    }
}

impl std::fmt::Display for Rid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}:{}", self.cluster_id, self.cluster_pos)
    }
}

impl FromStr for Rid {
    type Err = OrientError;

    /// Accepts `#12:3` or `12:3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_prefix('#').unwrap_or(s);
        let invalid = || OrientError::RecordFormat(format!("Invalid record id: {}", s));
        let (cluster, pos) = body.split_once(':').ok_or_else(invalid)?;
        Ok(Rid {
            cluster_id: cluster.trim().parse().map_err(|_| invalid())?,
            cluster_pos: pos.trim().parse().map_err(|_| invalid())?,
        })
    }
}

/// A field looked up on a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field<'a> {
    pub name: &'a str,
    pub value: &'a FieldValue,
    pub data_type: DataType,
}

/// A single dynamically typed record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    rid: Option<Rid>,
    class_name: Option<String>,
    version: i32,
    fields: EmbeddedArrayMap,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(class_name: impl Into<String>) -> Self {
        Self {
            class_name: Some(class_name.into()),
            ..Self::default()
        }
    }

    pub fn rid(&self) -> Option<Rid> {
        self.rid
    }

    pub fn set_rid(&mut self, rid: Rid) {
        self.rid = if rid.is_unset() { None } else { Some(rid) };
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn set_class_name(&mut self, class_name: impl Into<String>) {
        self.class_name = Some(class_name.into());
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn set_version(&mut self, version: i32) {
        self.version = version;
    }

    /// Append a field. Duplicate names are kept; lookups see the first one.
    pub fn set_field(&mut self, name: impl Into<String>, value: FieldValue, data_type: DataType) {
        self.fields.put(name.into(), value, data_type);
    }

    /// Builder form of [`Document::set_field`] using the value's natural type.
    pub fn field_value(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let value = value.into();
        let data_type = value.data_type();
        self.set_field(name, value, data_type);
        self
    }

    pub fn field(&self, name: &str) -> Option<Field<'_>> {
        let i = self.fields.keys().iter().position(|k| k == name)?;
        Some(Field {
            name: &self.fields.keys()[i],
            value: &self.fields.values()[i],
            data_type: self.fields.types()[i],
        })
    }

    pub fn get(&self, name: &str) -> (Option<&FieldValue>, DataType) {
        self.fields.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.fields.value(name)
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = Field<'_>> {
        self.fields.iter().map(|(name, value, data_type)| Field {
            name,
            value,
            data_type,
        })
    }

    pub fn field_names(&self) -> &[String] {
        self.fields.keys()
    }

    pub fn field_map(&self) -> &EmbeddedArrayMap {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{{", self.class_name.as_deref().unwrap_or(""))?;
        if let Some(rid) = self.rid {
            write!(f, "{}", rid)?;
            if !self.fields.is_empty() {
                f.write_str(" ")?;
            }
        }
        for (i, field) in self.fields().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field.name, field.value)?;
        }
        f.write_str("}")
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(rid) = self.rid {
            map.serialize_entry("@rid", &rid.to_string())?;
            map.serialize_entry("@version", &self.version)?;
        }
        if let Some(class) = &self.class_name {
            map.serialize_entry("@class", class)?;
        }
        for field in self.fields() {
            map.serialize_entry(field.name, field.value)?;
        }
        map.end()
    }
}
