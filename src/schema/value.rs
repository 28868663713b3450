use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::data_type::DataType;
use super::document::{Document, Rid};
use super::embedded_map::{EmbeddedArrayMap, EmbeddedMap};

/// Arbitrary precision decimal as sent by the server: an unscaled
/// big-endian two's complement integer and a base-10 scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal {
    pub scale: i32,
    pub unscaled: Vec<u8>,
}

impl Decimal {
    /// The unscaled integer, when it fits into an i128.
    pub fn unscaled_i128(&self) -> Option<i128> {
        if self.unscaled.is_empty() || self.unscaled.len() > 16 {
            return None;
        }
        let fill = if self.unscaled[0] & 0x80 != 0 { 0xFF } else { 0 };
        let mut bytes = [fill; 16];
        bytes[16 - self.unscaled.len()..].copy_from_slice(&self.unscaled);
        Some(i128::from_be_bytes(bytes))
    }
}

/// Scales beyond this are shown in raw form rather than padded with zeros.
const MAX_DISPLAY_SCALE: i32 = 1000;

impl std::fmt::Display for Decimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let n = match self.unscaled_i128() {
            Some(n) if (-MAX_DISPLAY_SCALE..=MAX_DISPLAY_SCALE).contains(&self.scale) => n,
            _ => return write!(f, "0x{}e-{}", hex::encode(&self.unscaled), self.scale),
        };
        if self.scale <= 0 {
            return write!(f, "{}{}", n, "0".repeat(self.scale.unsigned_abs() as usize));
        }
        let digits = n.unsigned_abs().to_string();
        let scale = self.scale.unsigned_abs() as usize;
        let sign = if n < 0 { "-" } else { "" };
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{}{}.{}", sign, int, frac)
        } else {
            write!(f, "{}0.{}{}", sign, "0".repeat(scale - digits.len()), digits)
        }
    }
}

/// A decoded field value. The set of variants is closed over the wire types
/// this client understands.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    String(String),
    Binary(Vec<u8>),
    Decimal(Decimal),
    Embedded(Box<Document>),
    List(Vec<FieldValue>),
    Set(Vec<FieldValue>),
    Map(EmbeddedArrayMap),
    Link(Rid),
    LinkList(Vec<Rid>),
    LinkSet(Vec<Rid>),
    LinkMap(Vec<(String, Rid)>),
    LinkBag(Vec<Rid>),
}

impl FieldValue {
    /// The wire type this value is naturally encoded as.
    pub fn data_type(&self) -> DataType {
        match self {
            FieldValue::Null => DataType::Any,
            FieldValue::Boolean(_) => DataType::Boolean,
            FieldValue::Byte(_) => DataType::Byte,
            FieldValue::Short(_) => DataType::Short,
            FieldValue::Integer(_) => DataType::Integer,
            FieldValue::Long(_) => DataType::Long,
            FieldValue::Float(_) => DataType::Float,
            FieldValue::Double(_) => DataType::Double,
            FieldValue::DateTime(_) => DataType::DateTime,
            FieldValue::Date(_) => DataType::Date,
            FieldValue::String(_) => DataType::String,
            FieldValue::Binary(_) => DataType::Binary,
            FieldValue::Decimal(_) => DataType::Decimal,
            FieldValue::Embedded(_) => DataType::Embedded,
            FieldValue::List(_) => DataType::EmbeddedList,
            FieldValue::Set(_) => DataType::EmbeddedSet,
            FieldValue::Map(_) => DataType::EmbeddedMap,
            FieldValue::Link(_) => DataType::Link,
            FieldValue::LinkList(_) => DataType::LinkList,
            FieldValue::LinkSet(_) => DataType::LinkSet,
            FieldValue::LinkMap(_) => DataType::LinkMap,
            FieldValue::LinkBag(_) => DataType::LinkBag,
        }
    }

    /// Short name used in diagnostics.
    pub fn type_name(&self) -> String {
        match self {
            FieldValue::Null => "NULL".to_string(),
            other => other.data_type().to_string(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match self {
            FieldValue::Short(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Long(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            FieldValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Double(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Binary(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            FieldValue::Embedded(doc) => Some(doc),
            _ => None,
        }
    }

    /// Elements of an embedded list or set.
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) | FieldValue::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&EmbeddedArrayMap> {
        match self {
            FieldValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<Rid> {
        match self {
            FieldValue::Link(rid) => Some(*rid),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<i16> for FieldValue {
    fn from(n: i16) -> Self {
        FieldValue::Short(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Long(n)
    }
}

impl From<f32> for FieldValue {
    fn from(n: f32) -> Self {
        FieldValue::Float(n)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(b: Vec<u8>) -> Self {
        FieldValue::Binary(b)
    }
}

impl From<Document> for FieldValue {
    fn from(doc: Document) -> Self {
        FieldValue::Embedded(Box::new(doc))
    }
}

impl From<Rid> for FieldValue {
    fn from(rid: Rid) -> Self {
        FieldValue::Link(rid)
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Byte(n) => write!(f, "{}", n),
            FieldValue::Short(n) => write!(f, "{}", n),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Long(n) => write!(f, "{}", n),
            FieldValue::Float(n) => write!(f, "{}", n),
            FieldValue::Double(n) => write!(f, "{}", n),
            FieldValue::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            FieldValue::Date(d) => write!(f, "{}", d),
            FieldValue::String(s) => write!(f, "{:?}", s),
            FieldValue::Binary(b) => write!(f, "<{} bytes>", b.len()),
            FieldValue::Decimal(d) => write!(f, "{}", d),
            FieldValue::Embedded(doc) => write!(f, "{}", doc),
            FieldValue::List(items) | FieldValue::Set(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            FieldValue::Map(map) => write!(f, "{}", map),
            FieldValue::Link(rid) => write!(f, "{}", rid),
            FieldValue::LinkList(rids) | FieldValue::LinkSet(rids) | FieldValue::LinkBag(rids) => {
                let parts: Vec<String> = rids.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            FieldValue::LinkMap(entries) => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|(k, rid)| format!("{}: {}", k, rid))
                    .collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::Boolean(b) => serializer.serialize_bool(*b),
            FieldValue::Byte(n) => serializer.serialize_i8(*n),
            FieldValue::Short(n) => serializer.serialize_i16(*n),
            FieldValue::Integer(n) => serializer.serialize_i32(*n),
            FieldValue::Long(n) => serializer.serialize_i64(*n),
            FieldValue::Float(n) => serializer.serialize_f32(*n),
            FieldValue::Double(n) => serializer.serialize_f64(*n),
            FieldValue::DateTime(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            FieldValue::Date(d) => serializer.collect_str(d),
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::Binary(b) => serializer.serialize_str(&hex::encode(b)),
            FieldValue::Decimal(d) => serializer.collect_str(d),
            FieldValue::Embedded(doc) => doc.serialize(serializer),
            FieldValue::List(items) | FieldValue::Set(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            FieldValue::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.keys().iter().zip(map.values()) {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            FieldValue::Link(rid) => serializer.collect_str(rid),
            FieldValue::LinkList(rids) | FieldValue::LinkSet(rids) | FieldValue::LinkBag(rids) => {
                let mut seq = serializer.serialize_seq(Some(rids.len()))?;
                for rid in rids {
                    seq.serialize_element(&rid.to_string())?;
                }
                seq.end()
            }
            FieldValue::LinkMap(entries) => {
                let mut out = serializer.serialize_map(Some(entries.len()))?;
                for (k, rid) in entries {
                    out.serialize_entry(k, &rid.to_string())?;
                }
                out.end()
            }
        }
    }
}
