//! Schemaless binary record format (serializer version 0)
//!
//! Layout of a record:
//! - **Version**: one byte, always `0`
//! - **Class name**: signed varint length + UTF-8 (length 0 = no class)
//! - **Header**: entries terminated by a zero length. A positive length is a
//!   literal field name followed by an `i32` BE data pointer and a type byte;
//!   a negative length `l` names global property `-l - 1` and is followed by
//!   the pointer only.
//! - **Data**: values at the absolute offsets named by the pointers. A zero
//!   pointer is a null value.
//!
//! Embedded documents repeat the class name + header + data shape without
//! the version byte, with pointers still absolute in the outer buffer.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::{OrientError, OrientResult};
use crate::protocol::varint::{decode_signed_varint, encode_signed_varint};
use crate::schema::{
    DataType, Decimal, Document, EmbeddedArrayMap, EmbeddedMap, FieldValue, GlobalProperties, Rid,
};

pub const SERIALIZER_VERSION: u8 = 0;

/// Item type byte written for a null collection element.
const NULL_ITEM: u8 = 0xFF;

/// Link bag config bit: entries are stored inline.
const LINKBAG_EMBEDDED: u8 = 0x01;
/// Link bag config bit: a 16 byte UUID follows the config byte.
const LINKBAG_HAS_UUID: u8 = 0x02;

/// Deepest nesting of embedded documents and collections accepted.
const MAX_NESTING: u16 = 64;

/// Decode a full record (version byte included).
///
/// `globals` resolves header entries that reference a global property id;
/// without it such records fail to decode.
pub fn decode_document(bytes: &[u8], globals: Option<&GlobalProperties>) -> OrientResult<Document> {
    let Some(&version) = bytes.first() else {
        return Err(OrientError::RecordFormat("empty record".to_string()));
    };
    if version != SERIALIZER_VERSION {
        return Err(OrientError::RecordFormat(format!(
            "unsupported serializer version {}",
            version
        )));
    }

    let mut reader = RecordReader {
        buf: bytes,
        pos: 1,
        globals,
        depth: 0,
    };
    reader.read_document()
}

struct HeaderEntry {
    name: String,
    pointer: i32,
    data_type: DataType,
}

struct RecordReader<'a> {
    buf: &'a [u8],
    pos: usize,
    globals: Option<&'a GlobalProperties>,
    depth: u16,
}

impl<'a> RecordReader<'a> {
    fn truncated(&self, wanted: usize) -> OrientError {
        OrientError::RecordFormat(format!(
            "record truncated at offset {} (wanted {} more bytes of {})",
            self.pos,
            wanted,
            self.buf.len()
        ))
    }

    fn take(&mut self, n: usize) -> OrientResult<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or_else(|| self.truncated(n))?;
        let slice = self.buf.get(self.pos..end).ok_or_else(|| self.truncated(n))?;
        self.pos = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> OrientResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_i16(&mut self) -> OrientResult<i16> {
        let b = self.take(2)?;
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }

    fn read_i32(&mut self) -> OrientResult<i32> {
        let b = self.take(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_i64(&mut self) -> OrientResult<i64> {
        let b = self.take(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(b);
        Ok(i64::from_be_bytes(arr))
    }

    fn read_varint(&mut self) -> OrientResult<i64> {
        let rest = self.buf.get(self.pos..).unwrap_or_default();
        let (value, used) = decode_signed_varint(rest).ok_or_else(|| {
            OrientError::RecordFormat(format!("malformed varint at offset {}", self.pos))
        })?;
        self.pos += used;
        Ok(value)
    }

    fn read_len(&mut self) -> OrientResult<usize> {
        let at = self.pos;
        let len = self.read_varint()?;
        usize::try_from(len)
            .map_err(|_| OrientError::RecordFormat(format!("negative length {} at offset {}", len, at)))
    }

    fn read_utf8(&mut self, len: usize) -> OrientResult<String> {
        let at = self.pos;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| OrientError::RecordFormat(format!("invalid UTF-8 at offset {}", at)))
    }

    fn read_string(&mut self) -> OrientResult<String> {
        let len = self.read_len()?;
        self.read_utf8(len)
    }

    fn read_binary(&mut self) -> OrientResult<Vec<u8>> {
        let len = self.read_len()?;
        Ok(self.take(len)?.to_vec())
    }

    fn read_link(&mut self) -> OrientResult<Rid> {
        let cluster = self.read_varint()?;
        let position = self.read_varint()?;
        let cluster_id = i16::try_from(cluster)
            .map_err(|_| OrientError::RecordFormat(format!("cluster id {} out of range", cluster)))?;
        Ok(Rid::new(cluster_id, position))
    }

    fn seek(&mut self, pointer: i32) -> OrientResult<()> {
        let target = usize::try_from(pointer).ok().filter(|p| *p < self.buf.len());
        match target {
            Some(p) => {
                self.pos = p;
                Ok(())
            }
            None => Err(OrientError::RecordFormat(format!(
                "data pointer {} outside record of {} bytes",
                pointer,
                self.buf.len()
            ))),
        }
    }

    /// Run a nested reader one level deeper. Pointers may point backwards,
    /// so a cyclic record would otherwise recurse without end.
    fn nested<T>(&mut self, read: fn(&mut Self) -> OrientResult<T>) -> OrientResult<T> {
        if self.depth >= MAX_NESTING {
            return Err(OrientError::RecordFormat(format!(
                "values nested deeper than {} levels at offset {}",
                MAX_NESTING, self.pos
            )));
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    fn read_document(&mut self) -> OrientResult<Document> {
        let class_name = self.read_string()?;
        let mut doc = if class_name.is_empty() {
            Document::new()
        } else {
            Document::with_class(class_name)
        };

        let mut entries = Vec::new();
        loop {
            let len = self.read_varint()?;
            if len == 0 {
                break;
            }
            let entry = if len > 0 {
                let name = self.read_utf8(len as usize)?;
                let pointer = self.read_i32()?;
                let data_type = DataType::from_id(self.read_u8()? as i32);
                HeaderEntry {
                    name,
                    pointer,
                    data_type,
                }
            } else {
                let id = len
                    .checked_neg()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|n| i32::try_from(n).ok())
                    .ok_or_else(|| {
                        OrientError::RecordFormat(format!(
                            "global property reference {} out of range",
                            len
                        ))
                    })?;
                let prop = self
                    .globals
                    .and_then(|g| g.get(id))
                    .ok_or_else(|| {
                        OrientError::RecordFormat(format!(
                            "header references unknown global property {}",
                            id
                        ))
                    })?;
                let pointer = self.read_i32()?;
                HeaderEntry {
                    name: prop.name.clone(),
                    pointer,
                    data_type: prop.data_type,
                }
            };
            entries.push(entry);
        }

        let mut end = self.pos;
        for entry in entries {
            if entry.pointer == 0 {
                doc.set_field(entry.name, FieldValue::Null, entry.data_type);
                continue;
            }
            self.seek(entry.pointer)?;
            let value = self.read_value(entry.data_type)?;
            end = end.max(self.pos);
            doc.set_field(entry.name, value, entry.data_type);
        }
        self.pos = end;

        Ok(doc)
    }

    fn read_value(&mut self, data_type: DataType) -> OrientResult<FieldValue> {
        let value = match data_type {
            DataType::Boolean => FieldValue::Boolean(self.read_u8()? == 1),
            DataType::Byte => FieldValue::Byte(self.read_u8()? as i8),
            DataType::Short => {
                let n = self.read_varint()?;
                FieldValue::Short(narrow(n, "SHORT")?)
            }
            DataType::Integer => {
                let n = self.read_varint()?;
                FieldValue::Integer(narrow(n, "INTEGER")?)
            }
            DataType::Long => FieldValue::Long(self.read_varint()?),
            DataType::Float => FieldValue::Float(f32::from_bits(self.read_i32()? as u32)),
            DataType::Double => FieldValue::Double(f64::from_bits(self.read_i64()? as u64)),
            DataType::DateTime => {
                let millis = self.read_varint()?;
                let dt = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
                    OrientError::RecordFormat(format!("datetime {} out of range", millis))
                })?;
                FieldValue::DateTime(dt)
            }
            DataType::Date => {
                let days = self.read_varint()?;
                let date = Duration::try_days(days)
                    .and_then(|d| NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(d))
                    .ok_or_else(|| OrientError::RecordFormat(format!("date {} out of range", days)))?;
                FieldValue::Date(date)
            }
            DataType::String => FieldValue::String(self.read_string()?),
            DataType::Binary => FieldValue::Binary(self.read_binary()?),
            DataType::Decimal => {
                let scale = self.read_i32()?;
                let len = self.read_i32()?;
                let len = usize::try_from(len).map_err(|_| {
                    OrientError::RecordFormat(format!("negative decimal length {}", len))
                })?;
                FieldValue::Decimal(Decimal {
                    scale,
                    unscaled: self.take(len)?.to_vec(),
                })
            }
            DataType::Embedded => {
                FieldValue::Embedded(Box::new(self.nested(Self::read_document)?))
            }
            DataType::EmbeddedList => FieldValue::List(self.nested(Self::read_embedded_collection)?),
            DataType::EmbeddedSet => FieldValue::Set(self.nested(Self::read_embedded_collection)?),
            DataType::EmbeddedMap => FieldValue::Map(self.nested(Self::read_embedded_map)?),
            DataType::Link => FieldValue::Link(self.read_link()?),
            DataType::LinkList => FieldValue::LinkList(self.read_link_collection()?),
            DataType::LinkSet => FieldValue::LinkSet(self.read_link_collection()?),
            DataType::LinkMap => FieldValue::LinkMap(self.read_link_map()?),
            DataType::LinkBag => FieldValue::LinkBag(self.read_link_bag()?),
            DataType::Transient | DataType::Custom | DataType::Any | DataType::Unknown => {
                return Err(OrientError::RecordFormat(format!(
                    "cannot decode value of type {} at offset {}",
                    data_type, self.pos
                )))
            }
        };
        Ok(value)
    }

    fn read_embedded_collection(&mut self) -> OrientResult<Vec<FieldValue>> {
        let count = self.read_len()?;
        // Declared element type; every item repeats its own.
        let _ = self.read_u8()?;

        let mut items = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let item_type = self.read_u8()?;
            if item_type == NULL_ITEM {
                items.push(FieldValue::Null);
                continue;
            }
            items.push(self.read_value(DataType::from_id(item_type as i32))?);
        }
        Ok(items)
    }

    fn read_embedded_map(&mut self) -> OrientResult<EmbeddedArrayMap> {
        let count = self.read_len()?;
        let mut header = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let key_type = DataType::from_id(self.read_u8()? as i32);
            if key_type != DataType::String {
                return Err(OrientError::RecordFormat(format!(
                    "embedded map key of type {} at offset {}",
                    key_type, self.pos
                )));
            }
            let key = self.read_string()?;
            let pointer = self.read_i32()?;
            let value_type = self.read_u8()?;
            header.push((key, pointer, value_type));
        }

        let mut map = EmbeddedArrayMap::with_capacity(header.len());
        let mut end = self.pos;
        for (key, pointer, value_type) in header {
            if pointer == 0 || value_type == NULL_ITEM {
                map.put(key, FieldValue::Null, DataType::Any);
                continue;
            }
            let data_type = DataType::from_id(value_type as i32);
            self.seek(pointer)?;
            let value = self.read_value(data_type)?;
            end = end.max(self.pos);
            map.put(key, value, data_type);
        }
        self.pos = end;
        Ok(map)
    }

    fn read_link_collection(&mut self) -> OrientResult<Vec<Rid>> {
        let count = self.read_len()?;
        (0..count).map(|_| self.read_link()).collect()
    }

    fn read_link_map(&mut self) -> OrientResult<Vec<(String, Rid)>> {
        let count = self.read_len()?;
        let mut entries = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let _key_type = self.read_u8()?;
            let key = self.read_string()?;
            entries.push((key, self.read_link()?));
        }
        Ok(entries)
    }

    fn read_link_bag(&mut self) -> OrientResult<Vec<Rid>> {
        let config = self.read_u8()?;
        if config & LINKBAG_HAS_UUID != 0 {
            self.take(16)?;
        }
        if config & LINKBAG_EMBEDDED == 0 {
            return Err(OrientError::RecordFormat(
                "tree-based link bags are not supported".to_string(),
            ));
        }
        let size = self.read_i32()?;
        let size = usize::try_from(size)
            .map_err(|_| OrientError::RecordFormat(format!("negative link bag size {}", size)))?;
        let mut rids = Vec::with_capacity(size.min(1024));
        for _ in 0..size {
            let cluster_id = self.read_i16()?;
            let cluster_pos = self.read_i64()?;
            rids.push(Rid::new(cluster_id, cluster_pos));
        }
        Ok(rids)
    }
}

fn narrow<T: TryFrom<i64>>(n: i64, type_name: &str) -> OrientResult<T> {
    T::try_from(n).map_err(|_| OrientError::RecordFormat(format!("{} out of range for {}", n, type_name)))
}

/// Serialize positional command parameters as a record holding one
/// `params` map of `"0"`, `"1"`, ... to string values.
pub fn encode_params(params: &[String]) -> Vec<u8> {
    let mut buf = vec![SERIALIZER_VERSION];
    encode_signed_varint(0, &mut buf); // no class name

    write_name(&mut buf, "params");
    let params_ptr = reserve_pointer(&mut buf);
    buf.push(DataType::EmbeddedMap.id() as u8);
    encode_signed_varint(0, &mut buf); // end of header

    fill_pointer(&mut buf, params_ptr);
    encode_signed_varint(params.len() as i64, &mut buf);
    let mut value_ptrs = Vec::with_capacity(params.len());
    for i in 0..params.len() {
        buf.push(DataType::String.id() as u8);
        write_name(&mut buf, &i.to_string());
        value_ptrs.push(reserve_pointer(&mut buf));
        buf.push(DataType::String.id() as u8);
    }
    for (param, ptr) in params.iter().zip(value_ptrs) {
        fill_pointer(&mut buf, ptr);
        write_name(&mut buf, param);
    }
    buf
}

fn write_name(buf: &mut Vec<u8>, s: &str) {
    encode_signed_varint(s.len() as i64, buf);
    buf.extend_from_slice(s.as_bytes());
}

fn reserve_pointer(buf: &mut Vec<u8>) -> usize {
    let at = buf.len();
    buf.extend_from_slice(&[0; 4]);
    at
}

/// Point the reserved slot at the current end of the buffer.
fn fill_pointer(buf: &mut [u8], slot: usize) {
    let target = buf.len() as i32;
    buf[slot..slot + 4].copy_from_slice(&target.to_be_bytes());
}
