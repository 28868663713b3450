use thiserror::Error;

use crate::protocol::{MAX_SUPPORTED_BINARY_PROTOCOL_VERSION, MIN_SUPPORTED_BINARY_PROTOCOL_VERSION};

/// One entry of the exception chain the server sends back with an error status.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ServerException {
    pub class: String,
    pub message: String,
}

impl std::fmt::Display for ServerException {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.class, self.message)
    }
}

#[derive(Error, Debug)]
pub enum OrientError {
    #[error(
        "server binary protocol version `{server_version}` is outside client supported version range: {}-{}",
        MIN_SUPPORTED_BINARY_PROTOCOL_VERSION,
        MAX_SUPPORTED_BINARY_PROTOCOL_VERSION
    )]
    UnsupportedVersion { server_version: i16 },

    #[error("Incorrect number of bytes read from connection. Expected: {expected}; Actual: {actual}")]
    IncorrectNetworkRead { expected: usize, actual: usize },

    #[error("Session not initialized. Call open_database or connect_server first.")]
    SessionNotInitialized,

    #[error("Field '{field}' has unexpected type: expected {expected}, found {actual}")]
    UnexpectedFieldType {
        field: String,
        expected: &'static str,
        actual: String,
    },

    #[error("Schema feature not implemented: {0}")]
    UnimplementedSchemaFeature(String),

    #[error("Storage Type is not valid: {0}")]
    InvalidStorageType(String),

    #[error("Database Type is not valid: {0}")]
    InvalidDatabaseType(String),

    #[error("Record format error: {0}")]
    RecordFormat(String),

    #[error("Server error: {}", format_exceptions(.exceptions))]
    Server { exceptions: Vec<ServerException> },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type OrientResult<T> = Result<T, OrientError>;

fn format_exceptions(exceptions: &[ServerException]) -> String {
    exceptions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" <- ")
}

impl OrientError {
    /// The innermost server exception class, if this is a server error.
    pub fn server_class(&self) -> Option<&str> {
        match self {
            OrientError::Server { exceptions } => exceptions.first().map(|e| e.class.as_str()),
            _ => None,
        }
    }
}

impl serde::Serialize for OrientError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
