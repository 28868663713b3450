use tokio::io::AsyncRead;

use super::codec::{read_byte, read_bytes, read_int, read_string};
use crate::error::{OrientError, OrientResult, ServerException};

/// Leading status byte of every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Ok,
    Error,
}

impl ResponseStatus {
    pub fn from_byte(b: u8) -> OrientResult<Self> {
        match b {
            0 => Ok(ResponseStatus::Ok),
            1 => Ok(ResponseStatus::Error),
            other => Err(OrientError::Protocol(format!(
                "Unknown response status byte: {}",
                other
            ))),
        }
    }
}

/// Read the status byte and session id that open every response.
///
/// An error status is turned into `OrientError::Server` after draining the
/// exception chain, so the connection is left at a frame boundary.
pub async fn read_response_header<R>(reader: &mut R) -> OrientResult<i32>
where
    R: AsyncRead + Unpin,
{
    let status = ResponseStatus::from_byte(read_byte(reader).await?)?;
    let session_id = read_int(reader).await?;

    match status {
        ResponseStatus::Ok => Ok(session_id),
        ResponseStatus::Error => Err(read_server_error(reader).await?),
    }
}

/// Drain `(1, class, message)*  0  serialized-exception` into an error value.
async fn read_server_error<R>(reader: &mut R) -> OrientResult<OrientError>
where
    R: AsyncRead + Unpin,
{
    let mut exceptions = Vec::new();
    loop {
        let more = read_byte(reader).await?;
        if more == 0 {
            break;
        }
        let class = read_string(reader).await?.unwrap_or_default();
        let message = read_string(reader).await?.unwrap_or_default();
        exceptions.push(ServerException { class, message });
    }

    // Java-serialized exception, unusable outside the JVM.
    let _ = read_bytes(reader).await?;

    tracing::warn!(
        "Server returned error: {}",
        exceptions
            .first()
            .map(|e| e.message.as_str())
            .unwrap_or("<empty exception chain>")
    );
    Ok(OrientError::Server { exceptions })
}
