use std::collections::HashMap;

use serde::Serialize;

use super::document::Document;
use super::property::Property;
use super::reflect::{
    document_items, i32_items, opt_bool, opt_f32, opt_i32, opt_list, opt_string,
    reject_custom_fields, string_items,
};
use crate::error::OrientResult;

/// Schema description of a database class.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Class {
    pub name: String,
    pub short_name: String,
    /// Keyed by property name.
    pub properties: HashMap<String, Property>,
    pub default_cluster_id: i32,
    pub cluster_ids: Vec<i32>,
    pub super_class: String,
    pub super_classes: Vec<String>,
    pub over_size: f32,
    pub strict_mode: bool,
    pub abstract_class: bool,
    pub cluster_selection: String,
    pub custom_fields: HashMap<String, String>,
}

impl Class {
    /// Reflect a class out of one entry of the schema record's `classes`.
    ///
    /// Absent or null fields keep their zero value. A field holding a value
    /// of the wrong runtime type fails the whole conversion, as does any
    /// non-null `customFields`.
    pub fn from_document(doc: &Document) -> OrientResult<Self> {
        reject_custom_fields(doc, "class")?;

        let mut class = Class::default();

        if let Some(name) = opt_string(doc, "name")? {
            class.name = name;
        }
        if let Some(short_name) = opt_string(doc, "shortName")? {
            class.short_name = short_name;
        }

        if let Some(items) = opt_list(doc, "properties")? {
            for prop_doc in document_items("properties", items)? {
                let prop = Property::from_document(prop_doc)?;
                class.properties.insert(prop.name.clone(), prop);
            }
        }

        if let Some(id) = opt_i32(doc, "defaultClusterId")? {
            class.default_cluster_id = id;
        }
        if let Some(items) = opt_list(doc, "clusterIds")? {
            class.cluster_ids = i32_items("clusterIds", items)?;
        }

        if let Some(items) = opt_list(doc, "superClasses")? {
            class.super_classes = string_items("superClasses", items)?;
        }
        match opt_string(doc, "superClass")? {
            Some(super_class) => class.super_class = super_class,
            None => {
                if let Some(first) = class.super_classes.first() {
                    class.super_class = first.clone();
                }
            }
        }

        if let Some(over_size) = opt_f32(doc, "overSize")? {
            class.over_size = over_size;
        }
        if let Some(strict) = opt_bool(doc, "strictMode")? {
            class.strict_mode = strict;
        }
        if let Some(is_abstract) = opt_bool(doc, "abstract")? {
            class.abstract_class = is_abstract;
        }
        if let Some(selection) = opt_string(doc, "clusterSelection")? {
            class.cluster_selection = selection;
        }

        Ok(class)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }
}
