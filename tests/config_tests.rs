//! Configuration Tests
//!
//! Tests for client configuration loading:
//! - TOML files
//! - Connection strings
//! - Builder wiring

use std::io::Write;

use orientdb_client::{ClientBuilder, ClientConfig, DatabaseType, OrientError};
use tempfile::NamedTempFile;

// ============================================================================
// TOML
// ============================================================================

#[test]
fn test_load_toml_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
host = "db.internal"
port = 2480
database = "demo"
username = "reader"
password = "pw"
db_type = "graph"
"#
    )
    .unwrap();

    let config = ClientConfig::load(Some(file.path())).unwrap();

    // Environment overrides may apply on developer machines; only check
    // fields that no ORIENTDB_* variable is expected to touch in CI.
    assert_eq!(config.db_type, DatabaseType::Graph);
    if std::env::var("ORIENTDB_HOST").is_err() {
        assert_eq!(config.host, "db.internal");
    }
    if std::env::var("ORIENTDB_PORT").is_err() {
        assert_eq!(config.port, 2480);
    }
    if std::env::var("ORIENTDB_DATABASE").is_err() {
        assert_eq!(config.database, "demo");
    }
}

#[test]
fn test_partial_toml_uses_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "database = \"demo\"").unwrap();

    let config = ClientConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.db_type, DatabaseType::Document);
    if std::env::var("ORIENTDB_PORT").is_err() {
        assert_eq!(config.port, 2424);
    }
}

#[test]
fn test_invalid_toml_is_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "port = \"not a number\"").unwrap();

    assert!(matches!(
        ClientConfig::load(Some(file.path())),
        Err(OrientError::Config(_))
    ));
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");
    assert!(matches!(
        ClientConfig::load(Some(path.as_path())),
        Err(OrientError::Config(_))
    ));
}

// ============================================================================
// Connection strings
// ============================================================================

#[test]
fn test_dsn_with_port() {
    let config = ClientConfig::from_dsn("admin@secret:db.internal:2425/demo").unwrap();
    assert_eq!(config.username, "admin");
    assert_eq!(config.password, "secret");
    assert_eq!(config.host, "db.internal");
    assert_eq!(config.port, 2425);
    assert_eq!(config.database, "demo");
    assert_eq!(config.address(), "db.internal:2425");
}

#[test]
fn test_dsn_default_port() {
    let config = ClientConfig::from_dsn("admin@secret:localhost/demo").unwrap();
    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, 2424);
}

#[test]
fn test_invalid_dsn() {
    for dsn in ["localhost/demo", "admin@secret:localhost", "admin@secret:host:port/demo"] {
        assert!(
            matches!(ClientConfig::from_dsn(dsn), Err(OrientError::Config(_))),
            "{} should be rejected",
            dsn
        );
    }
}

// ============================================================================
// Builder
// ============================================================================

#[tokio::test]
async fn test_builder_connection_refused() {
    // Bind then drop a listener to get a port nobody listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let result = ClientBuilder::new(&addr).timeout_ms(1000).build().await;
    assert!(matches!(result, Err(OrientError::Connection(_))));
}

#[tokio::test]
async fn test_builder_opens_server_session() {
    use orientdb_client::protocol::FrameWriter;
    use orientdb_client::SessionKind;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(&29i16.to_be_bytes()).await.unwrap();

        // Opcode and session id of the connect request.
        let mut head = [0u8; 5];
        socket.read_exact(&mut head).await.unwrap();
        assert_eq!(head[0], 2);

        let mut answer = FrameWriter::new();
        answer.write_byte(0).write_int(-1).write_int(11).write_int(-1);
        socket.write_all(answer.as_slice()).await.unwrap();

        // Keep the socket open until the client is done with it.
        let mut rest = Vec::new();
        let _ = socket.read_to_end(&mut rest).await;
    });

    let client = ClientBuilder::new(&addr)
        .server("root", "secret")
        .build()
        .await
        .unwrap();

    assert_eq!(client.protocol_version(), 29);
    assert_eq!(client.session_id(), Some(11));
    assert_eq!(client.session_kind(), Some(&SessionKind::Server));

    drop(client);
    server.await.unwrap();
}
