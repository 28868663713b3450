use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OrientError;

/// Database flavour requested when opening or creating a database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    #[default]
    Document,
    Graph,
}

impl DatabaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::Document => "document",
            DatabaseType::Graph => "graph",
        }
    }
}

impl FromStr for DatabaseType {
    type Err = OrientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "document" => Ok(DatabaseType::Document),
            "graph" => Ok(DatabaseType::Graph),
            _ => Err(OrientError::InvalidDatabaseType(s.to_string())),
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage engine backing a database on the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageType {
    #[default]
    #[serde(rename = "plocal")]
    Persistent,
    #[serde(rename = "memory")]
    Volatile,
}

impl StorageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Persistent => "plocal",
            StorageType::Volatile => "memory",
        }
    }
}

impl FromStr for StorageType {
    type Err = OrientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plocal" => Ok(StorageType::Persistent),
            "memory" => Ok(StorageType::Volatile),
            _ => Err(OrientError::InvalidStorageType(s.to_string())),
        }
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
