//! OrientDB binary protocol client
//!
//! Opens server or database sessions over the binary protocol, sends SQL
//! queries and commands, and decodes the answers into schemaless
//! [`Document`]s. The database schema can be loaded and reflected into
//! [`Class`] / [`Property`] descriptions.
//!
//! ```no_run
//! use orientdb_client::{ClientBuilder, DatabaseType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), orientdb_client::OrientError> {
//!     let mut client = ClientBuilder::new("localhost:2424")
//!         .database("demo", DatabaseType::Document, "admin", "admin")
//!         .build()
//!         .await?;
//!
//!     let docs = client.sql_query("SELECT FROM Person", "", &[]).await?;
//!     for doc in docs {
//!         println!("{}", doc);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod schema;
pub mod serializer;

pub use client::{ClientBuilder, CommandResult, OrientClient, SessionKind};
pub use config::ClientConfig;
pub use error::{OrientError, OrientResult, ServerException};
pub use protocol::{DatabaseType, StorageType};
pub use schema::{
    Class, DataType, Document, EmbeddedArrayMap, EmbeddedMap, Field, FieldValue, Property, Rid,
    Schema,
};
