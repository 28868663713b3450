use tokio::io::{AsyncRead, AsyncWrite};

use super::record::RECORD_TYPE_BYTES;
use super::OrientClient;
use crate::error::{OrientError, OrientResult};
use crate::schema::{Rid, Schema};

/// The storage configuration record of every database.
const CONFIG_RID: Rid = Rid {
    cluster_id: 0,
    cluster_pos: 0,
};

/// Find the schema record id in the `|`-separated storage configuration
/// text. It is the first field that reads as a `#cluster:position` id.
pub(crate) fn schema_rid_from_config(config: &str) -> Option<Rid> {
    config
        .split('|')
        .map(str::trim)
        .filter(|token| token.starts_with('#'))
        .find_map(|token| token.parse().ok())
}

impl<S> OrientClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Load the database schema and cache it on the client.
    ///
    /// The cached global property table is used to decode records whose
    /// headers reference properties by id.
    pub async fn load_schema(&mut self) -> OrientResult<&Schema> {
        let config = self
            .load_raw_record(CONFIG_RID, "")
            .await?
            .ok_or_else(|| OrientError::Protocol("storage configuration record missing".to_string()))?;
        if config.record_type != RECORD_TYPE_BYTES {
            return Err(OrientError::RecordFormat(format!(
                "storage configuration has record type '{}'",
                config.record_type as char
            )));
        }

        let text = String::from_utf8_lossy(&config.content);
        let schema_rid = schema_rid_from_config(&text).ok_or_else(|| {
            OrientError::RecordFormat("no schema record id in storage configuration".to_string())
        })?;
        tracing::debug!("Schema record is {}", schema_rid);

        let record = self
            .load_raw_record(schema_rid, "*:-1")
            .await?
            .ok_or_else(|| OrientError::Protocol(format!("schema record {} missing", schema_rid)))?;
        let doc = record.into_document(None)?;
        let schema = Schema::from_document(&doc)?;

        tracing::info!(
            "Loaded schema version {} with {} classes",
            schema.version,
            schema.classes.len()
        );
        let schema = self.schema.insert(schema);
        Ok(&*schema)
    }
}
