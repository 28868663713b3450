//! Strict field readers shared by the schema reflectors.
//!
//! A field that is absent or null yields `None`. A field that is present with
//! a different runtime type is an error; nothing is coerced.

use super::document::Document;
use super::value::FieldValue;
use crate::error::{OrientError, OrientResult};

fn present<'a>(doc: &'a Document, field: &str) -> Option<&'a FieldValue> {
    doc.value(field).filter(|v| !v.is_null())
}

fn mismatch(field: &str, expected: &'static str, actual: &FieldValue) -> OrientError {
    OrientError::UnexpectedFieldType {
        field: field.to_string(),
        expected,
        actual: actual.type_name(),
    }
}

pub(crate) fn opt_string(doc: &Document, field: &str) -> OrientResult<Option<String>> {
    match present(doc, field) {
        None => Ok(None),
        Some(v) => v
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| mismatch(field, "STRING", v)),
    }
}

pub(crate) fn opt_i32(doc: &Document, field: &str) -> OrientResult<Option<i32>> {
    match present(doc, field) {
        None => Ok(None),
        Some(v) => v.as_i32().map(Some).ok_or_else(|| mismatch(field, "INTEGER", v)),
    }
}

pub(crate) fn opt_bool(doc: &Document, field: &str) -> OrientResult<Option<bool>> {
    match present(doc, field) {
        None => Ok(None),
        Some(v) => v.as_bool().map(Some).ok_or_else(|| mismatch(field, "BOOLEAN", v)),
    }
}

pub(crate) fn opt_f32(doc: &Document, field: &str) -> OrientResult<Option<f32>> {
    match present(doc, field) {
        None => Ok(None),
        Some(v) => v.as_f32().map(Some).ok_or_else(|| mismatch(field, "FLOAT", v)),
    }
}

pub(crate) fn opt_list<'a>(doc: &'a Document, field: &str) -> OrientResult<Option<&'a [FieldValue]>> {
    match present(doc, field) {
        None => Ok(None),
        Some(v) => v
            .as_list()
            .map(Some)
            .ok_or_else(|| mismatch(field, "EMBEDDEDLIST", v)),
    }
}

pub(crate) fn i32_items(field: &str, items: &[FieldValue]) -> OrientResult<Vec<i32>> {
    items
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_i32()
                .ok_or_else(|| mismatch(&format!("{}[{}]", field, i), "INTEGER", v))
        })
        .collect()
}

pub(crate) fn string_items(field: &str, items: &[FieldValue]) -> OrientResult<Vec<String>> {
    items
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| mismatch(&format!("{}[{}]", field, i), "STRING", v))
        })
        .collect()
}

pub(crate) fn document_items<'a>(field: &str, items: &'a [FieldValue]) -> OrientResult<Vec<&'a Document>> {
    items
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_document()
                .ok_or_else(|| mismatch(&format!("{}[{}]", field, i), "EMBEDDED", v))
        })
        .collect()
}

/// Refuse fields whose wire shape is not known rather than guessing at it.
pub(crate) fn reject_custom_fields(doc: &Document, owner: &str) -> OrientResult<()> {
    if present(doc, "customFields").is_some() {
        return Err(OrientError::UnimplementedSchemaFeature(format!(
            "customFields on {} (server payload shape unknown)",
            owner
        )));
    }
    Ok(())
}
