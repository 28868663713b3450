//! Wire protocol definitions for the binary client
//!
//! Requests are framed as `[opcode: u8][session id: i32 BE][payload]` and
//! responses as `[status: u8][session id: i32 BE][payload]`. Strings and byte
//! arrays carry an `i32` length prefix where `-1` marks null.

pub mod codec;
pub mod request;
pub mod response;
pub mod types;
pub mod varint;

pub use codec::{FrameWriter, MAX_MESSAGE_SIZE};
pub use request::{encode_request, CommandKind, Operation, Request};
pub use response::{read_response_header, ResponseStatus};
pub use types::{DatabaseType, StorageType};

/// Oldest server protocol this client speaks (server release 2.0).
pub const MIN_SUPPORTED_BINARY_PROTOCOL_VERSION: i16 = 28;
/// Newest server protocol this client speaks.
pub const MAX_SUPPORTED_BINARY_PROTOCOL_VERSION: i16 = 30;

pub const DEFAULT_PORT: u16 = 2424;

pub const DRIVER_NAME: &str = "orientdb-client (rust)";
pub const DRIVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Record serializer requested at connect time.
pub const SERIALIZER_NAME: &str = "ORecordSerializerBinary";

/// Session id sent before the server has assigned one.
pub const NO_SESSION: i32 = -1;

/// Check a server-advertised protocol version against the supported range.
pub fn is_supported_version(version: i16) -> bool {
    (MIN_SUPPORTED_BINARY_PROTOCOL_VERSION..=MAX_SUPPORTED_BINARY_PROTOCOL_VERSION)
        .contains(&version)
}
