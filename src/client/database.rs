use tokio::io::{AsyncRead, AsyncWrite};

use super::{ClusterInfo, OrientClient, Session, SessionKind};
use crate::error::OrientResult;
use crate::protocol::codec::{read_bool, read_bytes, read_int, read_short, read_string};
use crate::protocol::{DatabaseType, Request, StorageType, NO_SESSION};

impl<S> OrientClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Open a server-level session for administrative operations.
    pub async fn connect_server(&mut self, username: &str, password: &str) -> OrientResult<()> {
        let request = Request::Connect {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.round_trip(&request, NO_SESSION).await?;

        let session_id = read_int(&mut self.stream).await?;
        let _token = read_bytes(&mut self.stream).await?;

        tracing::info!("Server session {} opened as {}", session_id, username);
        self.session = Some(Session {
            id: session_id,
            kind: SessionKind::Server,
        });
        self.schema = None;
        Ok(())
    }

    /// Open a database session.
    pub async fn open_database(
        &mut self,
        database: &str,
        db_type: DatabaseType,
        username: &str,
        password: &str,
    ) -> OrientResult<()> {
        let request = Request::DbOpen {
            database: database.to_string(),
            db_type,
            username: username.to_string(),
            password: password.to_string(),
        };
        self.round_trip(&request, NO_SESSION).await?;

        let session_id = read_int(&mut self.stream).await?;
        let _token = read_bytes(&mut self.stream).await?;

        let num_clusters = read_short(&mut self.stream).await?;
        let mut clusters = Vec::with_capacity(num_clusters.max(0) as usize);
        for _ in 0..num_clusters {
            let name = read_string(&mut self.stream).await?.unwrap_or_default();
            let id = read_short(&mut self.stream).await?;
            clusters.push(ClusterInfo { name, id });
        }
        let _cluster_config = read_bytes(&mut self.stream).await?;
        let release = read_string(&mut self.stream).await?;

        tracing::info!(
            "Database '{}' opened (session {}, {} clusters, server {})",
            database,
            session_id,
            clusters.len(),
            release.as_deref().unwrap_or("unknown")
        );

        self.session = Some(Session {
            id: session_id,
            kind: SessionKind::Database {
                name: database.to_string(),
            },
        });
        self.clusters = clusters;
        self.server_release = release;
        self.schema = None;
        Ok(())
    }

    /// Close the open database. The server hangs up without answering, so
    /// the client cannot be used for further requests afterwards.
    pub async fn close_database(&mut self) -> OrientResult<()> {
        let session_id = self.require_database_session()?;
        self.send(&Request::DbClose, session_id).await?;

        tracing::info!("Database session {} closed", session_id);
        self.session = None;
        self.clusters.clear();
        self.schema = None;
        Ok(())
    }

    /// Create a database. Requires a server session.
    pub async fn create_database(
        &mut self,
        database: &str,
        db_type: DatabaseType,
        storage: StorageType,
    ) -> OrientResult<()> {
        let session_id = self.require_server_session()?;
        let request = Request::DbCreate {
            database: database.to_string(),
            db_type,
            storage,
        };
        self.round_trip(&request, session_id).await?;
        tracing::info!("Created {} database '{}' ({})", db_type, database, storage);
        Ok(())
    }

    /// Ask whether a database exists. Requires a server session.
    pub async fn database_exists(
        &mut self,
        database: &str,
        storage: StorageType,
    ) -> OrientResult<bool> {
        let session_id = self.require_server_session()?;
        let request = Request::DbExist {
            database: database.to_string(),
            storage,
        };
        self.round_trip(&request, session_id).await?;
        read_bool(&mut self.stream).await
    }

    /// Drop a database. Requires a server session.
    pub async fn drop_database(&mut self, database: &str, storage: StorageType) -> OrientResult<()> {
        let session_id = self.require_server_session()?;
        let request = Request::DbDrop {
            database: database.to_string(),
            storage,
        };
        self.round_trip(&request, session_id).await?;
        tracing::info!("Dropped database '{}'", database);
        Ok(())
    }
}
