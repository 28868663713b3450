//! Document and schema data model
//!
//! Query results and schema metadata both arrive as [`Document`]s: ordered,
//! type-tagged field collections. The schema record is reflected into
//! strongly typed [`Class`] and [`Property`] descriptions.

pub mod class;
pub mod data_type;
pub mod document;
pub mod embedded_map;
pub mod property;
mod reflect;
pub mod value;

use std::collections::HashMap;

use serde::Serialize;

pub use class::Class;
pub use data_type::DataType;
pub use document::{Document, Field, Rid};
pub use embedded_map::{EmbeddedArrayMap, EmbeddedMap};
pub use property::Property;
pub use value::{Decimal, FieldValue};

use crate::error::{OrientError, OrientResult};
use reflect::{document_items, opt_i32, opt_list, opt_string};

/// Database-wide property, referenced by id from record headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalProperty {
    pub id: i32,
    pub name: String,
    pub data_type: DataType,
}

impl GlobalProperty {
    pub fn from_document(doc: &Document) -> OrientResult<Self> {
        let id = opt_i32(doc, "id")?.ok_or_else(|| {
            OrientError::RecordFormat("global property without an id".to_string())
        })?;
        Ok(Self {
            id,
            name: opt_string(doc, "name")?.unwrap_or_default(),
            data_type: opt_i32(doc, "type")?
                .map(DataType::from_id)
                .unwrap_or(DataType::Unknown),
        })
    }
}

/// Id-indexed table of global properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GlobalProperties {
    by_id: HashMap<i32, GlobalProperty>,
}

impl GlobalProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, prop: GlobalProperty) {
        self.by_id.insert(prop.id, prop);
    }

    pub fn get(&self, id: i32) -> Option<&GlobalProperty> {
        self.by_id.get(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// The database schema as loaded from the schema record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    pub version: i32,
    /// Keyed by class name.
    pub classes: HashMap<String, Class>,
    pub global_properties: GlobalProperties,
}

impl Schema {
    pub fn from_document(doc: &Document) -> OrientResult<Self> {
        let mut schema = Schema {
            version: opt_i32(doc, "schemaVersion")?.unwrap_or_default(),
            ..Schema::default()
        };

        if let Some(items) = opt_list(doc, "globalProperties")? {
            for prop_doc in document_items("globalProperties", items)? {
                schema
                    .global_properties
                    .insert(GlobalProperty::from_document(prop_doc)?);
            }
        }

        if let Some(items) = opt_list(doc, "classes")? {
            for class_doc in document_items("classes", items)? {
                let class = Class::from_document(class_doc)?;
                schema.classes.insert(class.name.clone(), class);
            }
        }

        Ok(schema)
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.classes.get(name)
    }

    pub fn global_property(&self, id: i32) -> Option<&GlobalProperty> {
        self.global_properties.get(id)
    }
}
