use tokio::io::{AsyncRead, AsyncWrite};

use super::record::{read_record_slot, RecordSlot};
use super::OrientClient;
use crate::error::{OrientError, OrientResult};
use crate::protocol::codec::{read_byte, read_int, read_string};
use crate::protocol::{CommandKind, Request};
use crate::schema::Document;

/// Decoded answer to a query or command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandResult {
    /// Records returned, in server order.
    pub documents: Vec<Document>,
    /// Scalar answer (e.g. an affected-row count) when no records came back.
    pub scalar: Option<String>,
}

impl CommandResult {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty() && self.scalar.is_none()
    }
}

impl<S> OrientClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Run an idempotent SQL query and return its records.
    pub async fn sql_query(
        &mut self,
        sql: &str,
        fetch_plan: &str,
        params: &[&str],
    ) -> OrientResult<Vec<Document>> {
        let kind = CommandKind::Query {
            limit: -1,
            fetch_plan: fetch_plan.to_string(),
        };
        Ok(self.execute(kind, sql, params).await?.documents)
    }

    /// Run a SQL command (insert, update, DDL...).
    pub async fn sql_command(&mut self, sql: &str, params: &[&str]) -> OrientResult<CommandResult> {
        self.execute(CommandKind::Command, sql, params).await
    }

    async fn execute(
        &mut self,
        kind: CommandKind,
        text: &str,
        params: &[&str],
    ) -> OrientResult<CommandResult> {
        let session_id = self.require_database_session()?;
        let request = Request::Command {
            kind,
            text: text.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
        };
        self.round_trip(&request, session_id).await?;

        let mut slots = Vec::new();
        let mut scalar = None;

        let result_type = read_byte(&mut self.stream).await?;
        match result_type {
            b'n' => {}
            b'r' => push_slot(&mut slots, read_record_slot(&mut self.stream).await?),
            b'l' | b's' => {
                let count = read_int(&mut self.stream).await?;
                for _ in 0..count {
                    push_slot(&mut slots, read_record_slot(&mut self.stream).await?);
                }
            }
            b'a' => scalar = read_string(&mut self.stream).await?,
            other => {
                return Err(OrientError::Protocol(format!(
                    "Unsupported command result type: '{}'",
                    other as char
                )))
            }
        }

        // Prefetched records follow the result, terminated by 0.
        loop {
            match read_byte(&mut self.stream).await? {
                0 => break,
                2 => {
                    let _ = read_record_slot(&mut self.stream).await?;
                }
                other => {
                    return Err(OrientError::Protocol(format!(
                        "Unexpected prefetch status: {}",
                        other
                    )))
                }
            }
        }

        let globals = self.schema.as_ref().map(|s| &s.global_properties);
        let mut documents = Vec::with_capacity(slots.len());
        for slot in slots {
            match slot {
                RecordSlot::Full(raw) => documents.push(raw.into_document(globals)?),
                RecordSlot::RidOnly(rid) => {
                    let mut doc = Document::new();
                    doc.set_rid(rid);
                    documents.push(doc);
                }
                RecordSlot::Null => {}
            }
        }

        tracing::debug!(
            "Command returned {} documents{}",
            documents.len(),
            if scalar.is_some() { " and a scalar" } else { "" }
        );
        Ok(CommandResult { documents, scalar })
    }
}

fn push_slot(slots: &mut Vec<RecordSlot>, slot: RecordSlot) {
    if !matches!(slot, RecordSlot::Null) {
        slots.push(slot);
    }
}
