//! Record Decoder Tests
//!
//! Tests for the schemaless binary record format including:
//! - Scalar and temporal values
//! - Embedded documents and collections
//! - Links
//! - Global property headers
//! - Malformed input

mod common;

use chrono::{NaiveDate, TimeZone, Utc};
use common::{RecordBuilder, TestValue};
use orientdb_client::protocol::varint::encode_signed_varint;
use orientdb_client::schema::{GlobalProperties, GlobalProperty};
use orientdb_client::serializer::{decode_document, encode_params};
use orientdb_client::{DataType, EmbeddedMap, FieldValue, OrientError, Rid};

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn test_decode_scalars() {
    let bytes = RecordBuilder::new()
        .class("Person")
        .field("name", TestValue::str("Ada"))
        .field("active", TestValue::Bool(true))
        .field("flags", TestValue::Byte(-3))
        .field("small", TestValue::Short(-300))
        .field("age", TestValue::Int(36))
        .field("big", TestValue::Long(1 << 40))
        .field("ratio", TestValue::Float(0.5))
        .field("score", TestValue::Double(-2.25))
        .field("blob", TestValue::Binary(vec![1, 2, 3]))
        .build();

    let doc = decode_document(&bytes, None).unwrap();

    assert_eq!(doc.class_name(), Some("Person"));
    assert_eq!(doc.len(), 9);
    assert_eq!(doc.value("name").and_then(|v| v.as_str()), Some("Ada"));
    assert_eq!(doc.value("active").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(doc.value("flags"), Some(&FieldValue::Byte(-3)));
    assert_eq!(doc.value("small").and_then(|v| v.as_i16()), Some(-300));
    assert_eq!(doc.value("age").and_then(|v| v.as_i32()), Some(36));
    assert_eq!(doc.value("big").and_then(|v| v.as_i64()), Some(1 << 40));
    assert_eq!(doc.value("ratio").and_then(|v| v.as_f32()), Some(0.5));
    assert_eq!(doc.value("score").and_then(|v| v.as_f64()), Some(-2.25));
    assert_eq!(doc.value("blob").and_then(|v| v.as_bytes()), Some(&[1u8, 2, 3][..]));

    let (_, typ) = doc.get("age");
    assert_eq!(typ, DataType::Integer);
}

#[test]
fn test_field_order_is_preserved() {
    let bytes = RecordBuilder::new()
        .field("z", TestValue::Int(1))
        .field("a", TestValue::Int(2))
        .field("m", TestValue::Int(3))
        .build();

    let doc = decode_document(&bytes, None).unwrap();
    assert_eq!(doc.field_names(), ["z", "a", "m"]);
    assert_eq!(doc.class_name(), None);
}

#[test]
fn test_decode_temporal_and_decimal() {
    let bytes = RecordBuilder::new()
        .field("at", TestValue::DateTime(1_500_000_000_123))
        .field("day", TestValue::Date(365))
        .field("price", TestValue::Decimal(2, vec![0x04, 0xD2]))
        .build();

    let doc = decode_document(&bytes, None).unwrap();

    let expected = Utc.timestamp_millis_opt(1_500_000_000_123).unwrap();
    assert_eq!(doc.value("at"), Some(&FieldValue::DateTime(expected)));
    assert_eq!(
        doc.value("day"),
        Some(&FieldValue::Date(NaiveDate::from_ymd_opt(1971, 1, 1).unwrap()))
    );
    match doc.value("price") {
        Some(FieldValue::Decimal(d)) => {
            assert_eq!(d.scale, 2);
            assert_eq!(d.unscaled_i128(), Some(1234));
            assert_eq!(d.to_string(), "12.34");
        }
        other => panic!("expected decimal, got {:?}", other),
    }
}

#[test]
fn test_null_pointer_is_null_value() {
    let bytes = RecordBuilder::new()
        .field("missing", TestValue::Null)
        .field("present", TestValue::str("x"))
        .build();

    let doc = decode_document(&bytes, None).unwrap();
    assert_eq!(doc.value("missing"), Some(&FieldValue::Null));
    assert_eq!(doc.value("present").and_then(|v| v.as_str()), Some("x"));
}

// ============================================================================
// Nested values
// ============================================================================

#[test]
fn test_decode_embedded_document() {
    let address = RecordBuilder::new()
        .class("Address")
        .field("city", TestValue::str("Paris"))
        .field("zip", TestValue::Int(75001));
    let bytes = RecordBuilder::new()
        .field("name", TestValue::str("Ada"))
        .field("address", TestValue::Doc(address))
        .field("after", TestValue::Int(7))
        .build();

    let doc = decode_document(&bytes, None).unwrap();

    let address = doc.value("address").and_then(|v| v.as_document()).unwrap();
    assert_eq!(address.class_name(), Some("Address"));
    assert_eq!(address.value("city").and_then(|v| v.as_str()), Some("Paris"));
    assert_eq!(address.value("zip").and_then(|v| v.as_i32()), Some(75001));
    assert_eq!(doc.value("after").and_then(|v| v.as_i32()), Some(7));
}

#[test]
fn test_decode_embedded_list_and_set() {
    let bytes = RecordBuilder::new()
        .field(
            "tags",
            TestValue::List(vec![TestValue::str("a"), TestValue::Int(2), TestValue::Null]),
        )
        .field("ids", TestValue::Set(vec![TestValue::Long(9)]))
        .build();

    let doc = decode_document(&bytes, None).unwrap();

    assert_eq!(
        doc.value("tags").and_then(|v| v.as_list()),
        Some(
            &[
                FieldValue::String("a".to_string()),
                FieldValue::Integer(2),
                FieldValue::Null
            ][..]
        )
    );
    assert_eq!(doc.value("ids"), Some(&FieldValue::Set(vec![FieldValue::Long(9)])));
}

#[test]
fn test_decode_embedded_map() {
    let bytes = RecordBuilder::new()
        .field(
            "attrs",
            TestValue::Map(vec![
                ("color".to_string(), TestValue::str("red")),
                ("size".to_string(), TestValue::Int(3)),
                ("gone".to_string(), TestValue::Null),
            ]),
        )
        .build();

    let doc = decode_document(&bytes, None).unwrap();
    let attrs = doc.value("attrs").and_then(|v| v.as_map()).unwrap();

    assert_eq!(attrs.keys(), ["color", "size", "gone"]);
    assert_eq!(attrs.get("size"), (Some(&FieldValue::Integer(3)), DataType::Integer));
    assert_eq!(attrs.value("gone"), Some(&FieldValue::Null));
}

// ============================================================================
// Links
// ============================================================================

#[test]
fn test_decode_links() {
    let bytes = RecordBuilder::new()
        .field("owner", TestValue::Link(9, 0))
        .field("friends", TestValue::LinkList(vec![(9, 1), (9, 2)]))
        .field("edges", TestValue::LinkBag(vec![(12, 40)]))
        .build();

    let doc = decode_document(&bytes, None).unwrap();

    assert_eq!(doc.value("owner").and_then(|v| v.as_link()), Some(Rid::new(9, 0)));
    assert_eq!(
        doc.value("friends"),
        Some(&FieldValue::LinkList(vec![Rid::new(9, 1), Rid::new(9, 2)]))
    );
    assert_eq!(
        doc.value("edges"),
        Some(&FieldValue::LinkBag(vec![Rid::new(12, 40)]))
    );
}

// ============================================================================
// Global property headers
// ============================================================================

fn globals() -> GlobalProperties {
    let mut g = GlobalProperties::new();
    g.insert(GlobalProperty {
        id: 0,
        name: "name".to_string(),
        data_type: DataType::String,
    });
    g.insert(GlobalProperty {
        id: 3,
        name: "age".to_string(),
        data_type: DataType::Integer,
    });
    g
}

#[test]
fn test_decode_global_property_fields() {
    let bytes = RecordBuilder::new()
        .class("Person")
        .global_field(0, TestValue::str("Ada"))
        .global_field(3, TestValue::Int(36))
        .field("nick", TestValue::str("A"))
        .build();

    let globals = globals();
    let doc = decode_document(&bytes, Some(&globals)).unwrap();

    assert_eq!(doc.field_names(), ["name", "age", "nick"]);
    assert_eq!(doc.get("age"), (Some(&FieldValue::Integer(36)), DataType::Integer));
}

#[test]
fn test_global_property_without_table_fails() {
    let bytes = RecordBuilder::new().global_field(0, TestValue::str("Ada")).build();
    assert!(matches!(
        decode_document(&bytes, None),
        Err(OrientError::RecordFormat(_))
    ));
}

#[test]
fn test_unknown_global_property_fails() {
    let bytes = RecordBuilder::new().global_field(42, TestValue::Int(1)).build();
    let globals = globals();
    assert!(matches!(
        decode_document(&bytes, Some(&globals)),
        Err(OrientError::RecordFormat(_))
    ));
}

// ============================================================================
// Malformed input
// ============================================================================

#[test]
fn test_empty_record_fails() {
    assert!(matches!(
        decode_document(&[], None),
        Err(OrientError::RecordFormat(_))
    ));
}

#[test]
fn test_unsupported_serializer_version_fails() {
    let mut bytes = RecordBuilder::new().field("a", TestValue::Int(1)).build();
    bytes[0] = 1;
    assert!(matches!(
        decode_document(&bytes, None),
        Err(OrientError::RecordFormat(_))
    ));
}

#[test]
fn test_truncated_record_fails() {
    let bytes = RecordBuilder::new()
        .field("name", TestValue::str("a long enough value"))
        .build();
    let truncated = &bytes[..bytes.len() - 5];
    assert!(matches!(
        decode_document(truncated, None),
        Err(OrientError::RecordFormat(_))
    ));
}

// ============================================================================
// Hostile input
// ============================================================================

/// Record with one named field `a` of `type_id` whose value bytes follow
/// the header directly.
fn single_field(type_id: DataType, value: &[u8]) -> Vec<u8> {
    // version, empty class, name "a", pointer, type, end of header
    let mut bytes = vec![0, 0, 2, b'a', 0, 0, 0, 10, type_id.id() as u8, 0];
    bytes.extend_from_slice(value);
    bytes
}

fn assert_record_format(bytes: &[u8], globals: Option<&GlobalProperties>) {
    match decode_document(bytes, globals) {
        Err(OrientError::RecordFormat(_)) => {}
        other => panic!("expected RecordFormat, got {:?}", other),
    }
}

#[test]
fn test_global_reference_length_min_fails() {
    let mut bytes = vec![0, 0];
    encode_signed_varint(i64::MIN, &mut bytes);
    bytes.extend_from_slice(&[0, 0, 0, 0, 0]);

    let globals = globals();
    assert_record_format(&bytes, Some(&globals));
}

#[test]
fn test_global_reference_beyond_i32_fails() {
    // Names id 2^32, which must not wrap around to global property 0.
    let mut bytes = vec![0, 0];
    encode_signed_varint(-(1i64 << 32) - 1, &mut bytes);
    let pointer = bytes.len() as i32 + 5;
    bytes.extend_from_slice(&pointer.to_be_bytes());
    bytes.push(0);
    encode_signed_varint(42, &mut bytes);

    let globals = globals();
    assert_record_format(&bytes, Some(&globals));
}

#[test]
fn test_cyclic_embedded_pointer_fails() {
    // Field `a` is EMBEDDED and points back at the record's own class name.
    let bytes = [0, 0, 2, b'a', 0, 0, 0, 1, DataType::Embedded.id() as u8, 0];
    assert_record_format(&bytes, None);
}

#[test]
fn test_cyclic_map_pointer_fails() {
    // Map entry `k` points back at the map that contains it.
    let mut bytes = vec![0, 0, 2, b'm', 0, 0, 0, 10, DataType::EmbeddedMap.id() as u8, 0];
    bytes.extend_from_slice(&[2, DataType::String.id() as u8, 2, b'k', 0, 0, 0, 10]);
    bytes.push(DataType::EmbeddedMap.id() as u8);
    assert_record_format(&bytes, None);
}

#[test]
fn test_deep_but_finite_nesting_decodes() {
    let mut inner = RecordBuilder::new().field("leaf", TestValue::Int(1));
    for _ in 0..10 {
        inner = RecordBuilder::new().field("child", TestValue::Doc(inner));
    }
    let doc = decode_document(&inner.build(), None).unwrap();

    let mut current = &doc;
    for _ in 0..10 {
        current = current.value("child").and_then(|v| v.as_document()).unwrap();
    }
    assert_eq!(current.value("leaf"), Some(&FieldValue::Integer(1)));
}

#[test]
fn test_negative_string_length_fails() {
    let mut value = Vec::new();
    encode_signed_varint(-5, &mut value);
    value.extend_from_slice(b"abcde");
    assert_record_format(&single_field(DataType::String, &value), None);
}

#[test]
fn test_short_out_of_range_fails() {
    let mut value = Vec::new();
    encode_signed_varint(70_000, &mut value);
    assert_record_format(&single_field(DataType::Short, &value), None);
}

#[test]
fn test_integer_out_of_range_fails() {
    let mut value = Vec::new();
    encode_signed_varint(i64::from(i32::MAX) + 1, &mut value);
    assert_record_format(&single_field(DataType::Integer, &value), None);
}

#[test]
fn test_extreme_decimal_scale_displays_raw() {
    let mut value = i32::MIN.to_be_bytes().to_vec();
    value.extend_from_slice(&1i32.to_be_bytes());
    value.push(1);
    let doc = decode_document(&single_field(DataType::Decimal, &value), None).unwrap();

    let shown = doc.value("a").unwrap().to_string();
    assert_eq!(shown, format!("0x01e-{}", i32::MIN));
}

// ============================================================================
// Parameter records
// ============================================================================

#[test]
fn test_encode_params_decodes_as_ordered_map() {
    let bytes = encode_params(&["Ada".to_string(), "36".to_string()]);
    let doc = decode_document(&bytes, None).unwrap();

    let params = doc.value("params").and_then(|v| v.as_map()).unwrap();
    assert_eq!(params.keys(), ["0", "1"]);
    assert_eq!(params.value("0"), Some(&FieldValue::String("Ada".to_string())));
    assert_eq!(params.get("1").1, DataType::String);
}
