//! Common test utilities for the binary client tests
//!
//! Provides shared helpers for:
//! - Building schemaless binary records by hand
//! - Building server response frames
//! - Building schema documents

#![allow(dead_code)]

use orientdb_client::protocol::varint::encode_signed_varint;
use orientdb_client::protocol::FrameWriter;
use orientdb_client::{DataType, Document, FieldValue};

/// Value placed in a hand-built record.
#[derive(Debug, Clone)]
pub enum TestValue {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
    Binary(Vec<u8>),
    DateTime(i64),
    Date(i64),
    Decimal(i32, Vec<u8>),
    Doc(RecordBuilder),
    List(Vec<TestValue>),
    Set(Vec<TestValue>),
    Map(Vec<(String, TestValue)>),
    Link(i16, i64),
    LinkList(Vec<(i16, i64)>),
    LinkBag(Vec<(i16, i64)>),
}

impl TestValue {
    pub fn str(s: &str) -> Self {
        TestValue::Str(s.to_string())
    }

    fn type_id(&self) -> u8 {
        let t = match self {
            TestValue::Null => DataType::Any,
            TestValue::Bool(_) => DataType::Boolean,
            TestValue::Byte(_) => DataType::Byte,
            TestValue::Short(_) => DataType::Short,
            TestValue::Int(_) => DataType::Integer,
            TestValue::Long(_) => DataType::Long,
            TestValue::Float(_) => DataType::Float,
            TestValue::Double(_) => DataType::Double,
            TestValue::Str(_) => DataType::String,
            TestValue::Binary(_) => DataType::Binary,
            TestValue::DateTime(_) => DataType::DateTime,
            TestValue::Date(_) => DataType::Date,
            TestValue::Decimal(..) => DataType::Decimal,
            TestValue::Doc(_) => DataType::Embedded,
            TestValue::List(_) => DataType::EmbeddedList,
            TestValue::Set(_) => DataType::EmbeddedSet,
            TestValue::Map(_) => DataType::EmbeddedMap,
            TestValue::Link(..) => DataType::Link,
            TestValue::LinkList(_) => DataType::LinkList,
            TestValue::LinkBag(_) => DataType::LinkBag,
        };
        t.id() as u8
    }
}

#[derive(Debug, Clone)]
enum FieldEntry {
    Named(String, TestValue),
    Global(i32, TestValue),
}

/// Builds records in the version-0 binary layout with absolute pointers.
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    class: String,
    fields: Vec<FieldEntry>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(mut self, class: &str) -> Self {
        self.class = class.to_string();
        self
    }

    pub fn field(mut self, name: &str, value: TestValue) -> Self {
        self.fields.push(FieldEntry::Named(name.to_string(), value));
        self
    }

    /// Field whose header entry references a global property id.
    pub fn global_field(mut self, id: i32, value: TestValue) -> Self {
        self.fields.push(FieldEntry::Global(id, value));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = vec![0u8];
        write_document(&mut buf, self);
        buf
    }
}

fn write_str(buf: &mut Vec<u8>, s: &str) {
    encode_signed_varint(s.len() as i64, buf);
    buf.extend_from_slice(s.as_bytes());
}

fn reserve(buf: &mut Vec<u8>) -> usize {
    let at = buf.len();
    buf.extend_from_slice(&[0; 4]);
    at
}

fn fill(buf: &mut [u8], slot: usize) {
    let target = buf.len() as i32;
    buf[slot..slot + 4].copy_from_slice(&target.to_be_bytes());
}

fn write_document(buf: &mut Vec<u8>, doc: &RecordBuilder) {
    write_str(buf, &doc.class);

    let mut slots = Vec::new();
    for entry in &doc.fields {
        match entry {
            FieldEntry::Named(name, value) => {
                write_str(buf, name);
                slots.push((reserve(buf), value));
                buf.push(value.type_id());
            }
            FieldEntry::Global(id, value) => {
                encode_signed_varint(-(*id as i64) - 1, buf);
                slots.push((reserve(buf), value));
            }
        }
    }
    buf.push(0);

    for (slot, value) in slots {
        if matches!(value, TestValue::Null) {
            continue;
        }
        fill(buf, slot);
        write_value(buf, value);
    }
}

fn write_link(buf: &mut Vec<u8>, cluster: i16, pos: i64) {
    encode_signed_varint(cluster as i64, buf);
    encode_signed_varint(pos, buf);
}

fn write_value(buf: &mut Vec<u8>, value: &TestValue) {
    match value {
        TestValue::Null => {}
        TestValue::Bool(b) => buf.push(*b as u8),
        TestValue::Byte(b) => buf.push(*b as u8),
        TestValue::Short(n) => encode_signed_varint(*n as i64, buf),
        TestValue::Int(n) => encode_signed_varint(*n as i64, buf),
        TestValue::Long(n) | TestValue::DateTime(n) | TestValue::Date(n) => {
            encode_signed_varint(*n, buf)
        }
        TestValue::Float(f) => buf.extend_from_slice(&f.to_bits().to_be_bytes()),
        TestValue::Double(f) => buf.extend_from_slice(&f.to_bits().to_be_bytes()),
        TestValue::Str(s) => write_str(buf, s),
        TestValue::Binary(b) => {
            encode_signed_varint(b.len() as i64, buf);
            buf.extend_from_slice(b);
        }
        TestValue::Decimal(scale, unscaled) => {
            buf.extend_from_slice(&scale.to_be_bytes());
            buf.extend_from_slice(&(unscaled.len() as i32).to_be_bytes());
            buf.extend_from_slice(unscaled);
        }
        TestValue::Doc(doc) => write_document(buf, doc),
        TestValue::List(items) | TestValue::Set(items) => {
            encode_signed_varint(items.len() as i64, buf);
            buf.push(DataType::Any.id() as u8);
            for item in items {
                if matches!(item, TestValue::Null) {
                    buf.push(0xFF);
                    continue;
                }
                buf.push(item.type_id());
                write_value(buf, item);
            }
        }
        TestValue::Map(entries) => {
            encode_signed_varint(entries.len() as i64, buf);
            let mut slots = Vec::new();
            for (key, value) in entries {
                buf.push(DataType::String.id() as u8);
                write_str(buf, key);
                slots.push((reserve(buf), value));
                buf.push(value.type_id());
            }
            for (slot, value) in slots {
                if matches!(value, TestValue::Null) {
                    continue;
                }
                fill(buf, slot);
                write_value(buf, value);
            }
        }
        TestValue::Link(cluster, pos) => write_link(buf, *cluster, *pos),
        TestValue::LinkList(links) => {
            encode_signed_varint(links.len() as i64, buf);
            for (cluster, pos) in links {
                write_link(buf, *cluster, *pos);
            }
        }
        TestValue::LinkBag(links) => {
            buf.push(1);
            buf.extend_from_slice(&(links.len() as i32).to_be_bytes());
            for (cluster, pos) in links {
                buf.extend_from_slice(&cluster.to_be_bytes());
                buf.extend_from_slice(&pos.to_be_bytes());
            }
        }
    }
}

/// Header of a successful response.
pub fn ok_header(session_id: i32) -> FrameWriter {
    let mut w = FrameWriter::new();
    w.write_byte(0).write_int(session_id);
    w
}

/// A full record entry inside a command response.
pub fn write_full_record(w: &mut FrameWriter, cluster: i16, pos: i64, version: i32, content: &[u8]) {
    w.write_short(0)
        .write_byte(b'd')
        .write_short(cluster)
        .write_long(pos)
        .write_int(version)
        .write_bytes(content);
}

/// Response to a database open with one cluster.
pub fn open_response(session_id: i32) -> Vec<u8> {
    let mut w = ok_header(-1);
    w.write_int(session_id)
        .write_int(-1) // no token
        .write_short(1)
        .write_string("person")
        .write_short(9)
        .write_int(-1) // no cluster config
        .write_string("2.0.18");
    w.into_inner()
}

pub fn property_doc(name: &str, type_id: i32) -> Document {
    Document::new()
        .field_value("name", name)
        .field_value("type", type_id)
        .field_value("mandatory", false)
        .field_value("notNull", true)
}

/// Schema class document shaped like the server's schema record entries.
pub fn person_class_doc() -> Document {
    Document::new()
        .field_value("name", "Person")
        .field_value("shortName", "P")
        .field_value("defaultClusterId", 5)
        .field_value(
            "clusterIds",
            FieldValue::List(vec![FieldValue::Integer(5), FieldValue::Integer(6)]),
        )
        .field_value("strictMode", true)
        .field_value("abstract", false)
}
