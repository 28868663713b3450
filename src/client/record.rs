use tokio::io::{AsyncRead, AsyncWrite};

use super::OrientClient;
use crate::error::{OrientError, OrientResult};
use crate::protocol::codec::{read_byte, read_bytes, read_int, read_long, read_short};
use crate::protocol::Request;
use crate::schema::{Document, GlobalProperties, Rid};
use crate::serializer::decode_document;

/// Record type byte of a document record.
pub(crate) const RECORD_TYPE_DOCUMENT: u8 = b'd';
/// Record type byte of a raw byte record.
pub(crate) const RECORD_TYPE_BYTES: u8 = b'b';

const RECORD_FULL: i16 = 0;
const RECORD_NULL: i16 = -2;
const RECORD_RID_ONLY: i16 = -3;

/// A record as it comes off the wire, before its content is decoded.
#[derive(Debug, Clone)]
pub(crate) struct RawRecord {
    pub rid: Rid,
    pub version: i32,
    pub record_type: u8,
    pub content: Vec<u8>,
}

impl RawRecord {
    pub(crate) fn into_document(self, globals: Option<&GlobalProperties>) -> OrientResult<Document> {
        if self.record_type != RECORD_TYPE_DOCUMENT {
            return Err(OrientError::RecordFormat(format!(
                "record {} has type '{}', expected a document",
                self.rid, self.record_type as char
            )));
        }
        let mut doc = decode_document(&self.content, globals)?;
        doc.set_rid(self.rid);
        doc.set_version(self.version);
        Ok(doc)
    }
}

/// A result slot inside a command response.
#[derive(Debug, Clone)]
pub(crate) enum RecordSlot {
    Null,
    RidOnly(Rid),
    Full(RawRecord),
}

/// Read one `i16`-classified record from a command response.
pub(crate) async fn read_record_slot<R>(reader: &mut R) -> OrientResult<RecordSlot>
where
    R: AsyncRead + Unpin,
{
    match read_short(reader).await? {
        RECORD_NULL => Ok(RecordSlot::Null),
        RECORD_RID_ONLY => {
            let cluster_id = read_short(reader).await?;
            let cluster_pos = read_long(reader).await?;
            Ok(RecordSlot::RidOnly(Rid::new(cluster_id, cluster_pos)))
        }
        RECORD_FULL => {
            let record_type = read_byte(reader).await?;
            let cluster_id = read_short(reader).await?;
            let cluster_pos = read_long(reader).await?;
            let version = read_int(reader).await?;
            let content = read_bytes(reader).await?.unwrap_or_default();
            Ok(RecordSlot::Full(RawRecord {
                rid: Rid::new(cluster_id, cluster_pos),
                version,
                record_type,
                content,
            }))
        }
        other => Err(OrientError::Protocol(format!(
            "Unknown record classifier: {}",
            other
        ))),
    }
}

impl<S> OrientClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Load a record by id without decoding its content.
    pub(crate) async fn load_raw_record(
        &mut self,
        rid: Rid,
        fetch_plan: &str,
    ) -> OrientResult<Option<RawRecord>> {
        let session_id = self.require_database_session()?;
        let request = Request::RecordLoad {
            rid,
            fetch_plan: fetch_plan.to_string(),
            ignore_cache: true,
        };
        self.round_trip(&request, session_id).await?;

        let mut record = None;
        loop {
            match read_byte(&mut self.stream).await? {
                0 => break,
                1 => {
                    let record_type = read_byte(&mut self.stream).await?;
                    let version = read_int(&mut self.stream).await?;
                    let content = read_bytes(&mut self.stream).await?.unwrap_or_default();
                    record = Some(RawRecord {
                        rid,
                        version,
                        record_type,
                        content,
                    });
                }
                2 => {
                    // Prefetched linked record; not cached by this client.
                    let _ = read_record_slot(&mut self.stream).await?;
                }
                other => {
                    return Err(OrientError::Protocol(format!(
                        "Unexpected record load status: {}",
                        other
                    )))
                }
            }
        }
        Ok(record)
    }

    /// Load and decode a document by id. `None` if the record does not exist.
    pub async fn load_record(&mut self, rid: Rid, fetch_plan: &str) -> OrientResult<Option<Document>> {
        let raw = self.load_raw_record(rid, fetch_plan).await?;
        let globals = self.schema.as_ref().map(|s| &s.global_properties);
        raw.map(|r| r.into_document(globals)).transpose()
    }
}
