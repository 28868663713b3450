use serde::{Serialize, Serializer};

/// Runtime type tag carried next to every stored value.
///
/// The discriminants are the server's wire type ids. `Unknown` is the
/// sentinel returned for lookup misses and for ids this client does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum DataType {
    Boolean = 0,
    Integer = 1,
    Short = 2,
    Long = 3,
    Float = 4,
    Double = 5,
    DateTime = 6,
    String = 7,
    Binary = 8,
    Embedded = 9,
    EmbeddedList = 10,
    EmbeddedSet = 11,
    EmbeddedMap = 12,
    Link = 13,
    LinkList = 14,
    LinkSet = 15,
    LinkMap = 16,
    Byte = 17,
    Transient = 18,
    Date = 19,
    Custom = 20,
    Decimal = 21,
    LinkBag = 22,
    Any = 23,
    Unknown = -1,
}

impl DataType {
    /// Total over its input: unrecognised ids map to `Unknown`.
    pub fn from_id(id: i32) -> DataType {
        match id {
            0 => DataType::Boolean,
            1 => DataType::Integer,
            2 => DataType::Short,
            3 => DataType::Long,
            4 => DataType::Float,
            5 => DataType::Double,
            6 => DataType::DateTime,
            7 => DataType::String,
            8 => DataType::Binary,
            9 => DataType::Embedded,
            10 => DataType::EmbeddedList,
            11 => DataType::EmbeddedSet,
            12 => DataType::EmbeddedMap,
            13 => DataType::Link,
            14 => DataType::LinkList,
            15 => DataType::LinkSet,
            16 => DataType::LinkMap,
            17 => DataType::Byte,
            18 => DataType::Transient,
            19 => DataType::Date,
            20 => DataType::Custom,
            21 => DataType::Decimal,
            22 => DataType::LinkBag,
            23 => DataType::Any,
            _ => DataType::Unknown,
        }
    }

    pub fn id(self) -> i8 {
        self as i8
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::Boolean => "BOOLEAN",
            DataType::Integer => "INTEGER",
            DataType::Short => "SHORT",
            DataType::Long => "LONG",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
            DataType::DateTime => "DATETIME",
            DataType::String => "STRING",
            DataType::Binary => "BINARY",
            DataType::Embedded => "EMBEDDED",
            DataType::EmbeddedList => "EMBEDDEDLIST",
            DataType::EmbeddedSet => "EMBEDDEDSET",
            DataType::EmbeddedMap => "EMBEDDEDMAP",
            DataType::Link => "LINK",
            DataType::LinkList => "LINKLIST",
            DataType::LinkSet => "LINKSET",
            DataType::LinkMap => "LINKMAP",
            DataType::Byte => "BYTE",
            DataType::Transient => "TRANSIENT",
            DataType::Date => "DATE",
            DataType::Custom => "CUSTOM",
            DataType::Decimal => "DECIMAL",
            DataType::LinkBag => "LINKBAG",
            DataType::Any => "ANY",
            DataType::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
