use serde::Serialize;

use super::data_type::DataType;
use super::document::Document;
use super::reflect::{opt_bool, opt_i32, opt_string, reject_custom_fields};
use crate::error::OrientResult;

/// A declared property of a schema class.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Property {
    pub name: String,
    pub data_type: Option<DataType>,
    pub global_id: Option<i32>,
    pub mandatory: bool,
    pub readonly: bool,
    pub not_null: bool,
    pub min: Option<String>,
    pub max: Option<String>,
    pub regexp: Option<String>,
    pub default_value: Option<String>,
    pub linked_type: Option<DataType>,
    pub linked_class: Option<String>,
    pub collate: Option<String>,
}

impl Property {
    /// Build a property from one entry of a class's `properties` collection.
    pub fn from_document(doc: &Document) -> OrientResult<Self> {
        reject_custom_fields(doc, "property")?;

        Ok(Self {
            name: opt_string(doc, "name")?.unwrap_or_default(),
            data_type: opt_i32(doc, "type")?.map(DataType::from_id),
            global_id: opt_i32(doc, "globalId")?,
            mandatory: opt_bool(doc, "mandatory")?.unwrap_or(false),
            readonly: opt_bool(doc, "readonly")?.unwrap_or(false),
            not_null: opt_bool(doc, "notNull")?.unwrap_or(false),
            min: opt_string(doc, "min")?,
            max: opt_string(doc, "max")?,
            regexp: opt_string(doc, "regexp")?,
            default_value: opt_string(doc, "defaultValue")?,
            linked_type: opt_i32(doc, "linkedType")?.map(DataType::from_id),
            linked_class: opt_string(doc, "linkedClass")?,
            collate: opt_string(doc, "collate")?,
        })
    }
}
