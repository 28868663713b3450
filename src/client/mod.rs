//! Binary protocol session
//!
//! A client owns one connection and runs one request at a time; every
//! operation takes `&mut self`. The server announces its protocol version as
//! soon as the socket opens, and the client refuses to go further when that
//! version is outside the supported range.

mod builder;
mod database;
mod query;
mod record;
mod schema;

pub use builder::ClientBuilder;
pub use query::CommandResult;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::{OrientError, OrientResult};
use crate::protocol::codec::read_short;
use crate::protocol::{
    encode_request, is_supported_version, read_response_header, Request,
};
use crate::schema::Schema;

/// What kind of session the server granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionKind {
    /// Administrative session from `connect_server`.
    Server,
    /// Session bound to an open database.
    Database { name: String },
}

#[derive(Debug, Clone)]
struct Session {
    id: i32,
    kind: SessionKind,
}

/// Cluster advertised by the server when a database is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterInfo {
    pub name: String,
    pub id: i16,
}

pub struct OrientClient<S = TcpStream> {
    stream: S,
    protocol_version: i16,
    session: Option<Session>,
    clusters: Vec<ClusterInfo>,
    server_release: Option<String>,
    schema: Option<Schema>,
}

impl OrientClient<TcpStream> {
    /// Connect to a server (e.g. "localhost:2424") and check its protocol version.
    pub async fn connect(addr: &str) -> OrientResult<Self> {
        let stream = TcpStream::connect(addr).await.map_err(|e| {
            OrientError::Connection(format!("Failed to connect to {}: {}", addr, e))
        })?;

        stream.set_nodelay(true).map_err(|e| {
            OrientError::Connection(format!("Failed to set TCP_NODELAY: {}", e))
        })?;

        tracing::debug!("Connected to {}", addr);
        Self::handshake(stream).await
    }
}

impl<S> OrientClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Read the server's protocol version from a fresh stream.
    ///
    /// Nothing is written to the stream when the version is unsupported.
    pub async fn handshake(mut stream: S) -> OrientResult<Self> {
        let server_version = read_short(&mut stream).await?;
        if !is_supported_version(server_version) {
            tracing::warn!("Rejecting server protocol version {}", server_version);
            return Err(OrientError::UnsupportedVersion { server_version });
        }
        tracing::info!("Server speaks binary protocol version {}", server_version);

        Ok(Self {
            stream,
            protocol_version: server_version,
            session: None,
            clusters: Vec::new(),
            server_release: None,
            schema: None,
        })
    }

    pub fn protocol_version(&self) -> i16 {
        self.protocol_version
    }

    pub fn session_id(&self) -> Option<i32> {
        self.session.as_ref().map(|s| s.id)
    }

    pub fn session_kind(&self) -> Option<&SessionKind> {
        self.session.as_ref().map(|s| &s.kind)
    }

    pub fn is_session_initialized(&self) -> bool {
        self.session.is_some()
    }

    /// Clusters of the open database, as reported by the server.
    pub fn clusters(&self) -> &[ClusterInfo] {
        &self.clusters
    }

    pub fn server_release(&self) -> Option<&str> {
        self.server_release.as_deref()
    }

    /// Schema cached by the last `load_schema` call.
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    fn require_database_session(&self) -> OrientResult<i32> {
        match &self.session {
            Some(Session {
                id,
                kind: SessionKind::Database { .. },
            }) => Ok(*id),
            _ => Err(OrientError::SessionNotInitialized),
        }
    }

    fn require_server_session(&self) -> OrientResult<i32> {
        match &self.session {
            Some(Session {
                id,
                kind: SessionKind::Server,
            }) => Ok(*id),
            _ => Err(OrientError::SessionNotInitialized),
        }
    }

    /// Write one request frame.
    async fn send(&mut self, request: &Request, session_id: i32) -> OrientResult<()> {
        let data = encode_request(request, session_id, self.protocol_version);
        tracing::debug!(
            "-> {:?} (session {}, {} bytes)",
            request.operation(),
            session_id,
            data.len()
        );

        self.stream
            .write_all(&data)
            .await
            .map_err(|e| OrientError::Connection(format!("Write failed: {}", e)))?;
        self.stream
            .flush()
            .await
            .map_err(|e| OrientError::Connection(format!("Flush failed: {}", e)))?;
        Ok(())
    }

    /// Send a request and consume the response header.
    async fn round_trip(&mut self, request: &Request, session_id: i32) -> OrientResult<()> {
        self.send(request, session_id).await?;
        let answered = read_response_header(&mut self.stream).await?;
        tracing::debug!("<- {:?} ok (session {})", request.operation(), answered);
        Ok(())
    }
}
