//! Big-endian primitives used by the request/response framing.
//!
//! Every fixed-length read goes through [`read_exact_bytes`], which either
//! fills the whole buffer or fails with `IncorrectNetworkRead` carrying the
//! expected and actual byte counts. Short reads are never retried or padded.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{OrientError, OrientResult};

/// Largest string/bytes payload accepted from the server.
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Outgoing request buffer.
#[derive(Debug, Default)]
pub struct FrameWriter {
    buf: Vec<u8>,
}

impl FrameWriter {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    pub fn write_byte(&mut self, b: u8) -> &mut Self {
        self.buf.push(b);
        self
    }

    pub fn write_bool(&mut self, b: bool) -> &mut Self {
        self.write_byte(b as u8)
    }

    pub fn write_short(&mut self, n: i16) -> &mut Self {
        self.buf.extend_from_slice(&n.to_be_bytes());
        self
    }

    pub fn write_int(&mut self, n: i32) -> &mut Self {
        self.buf.extend_from_slice(&n.to_be_bytes());
        self
    }

    pub fn write_long(&mut self, n: i64) -> &mut Self {
        self.buf.extend_from_slice(&n.to_be_bytes());
        self
    }

    /// Length-prefixed byte array.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_int(bytes.len() as i32);
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn write_string(&mut self, s: &str) -> &mut Self {
        self.write_bytes(s.as_bytes())
    }

    /// A null string is encoded as length -1.
    pub fn write_null_string(&mut self) -> &mut Self {
        self.write_int(-1)
    }

    pub fn write_opt_string(&mut self, s: Option<&str>) -> &mut Self {
        match s {
            Some(s) => self.write_string(s),
            None => self.write_null_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Read exactly `n` bytes or fail with the number actually received.
pub async fn read_exact_bytes<R>(reader: &mut R, n: usize) -> OrientResult<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; n];
    let mut filled = 0;
    while filled < n {
        let read = reader.read(&mut buf[filled..]).await?;
        if read == 0 {
            return Err(OrientError::IncorrectNetworkRead {
                expected: n,
                actual: filled,
            });
        }
        filled += read;
    }
    Ok(buf)
}

async fn read_array<R, const N: usize>(reader: &mut R) -> OrientResult<[u8; N]>
where
    R: AsyncRead + Unpin,
{
    let bytes = read_exact_bytes(reader, N).await?;
    let mut arr = [0u8; N];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}

pub async fn read_byte<R: AsyncRead + Unpin>(reader: &mut R) -> OrientResult<u8> {
    Ok(read_array::<R, 1>(reader).await?[0])
}

pub async fn read_bool<R: AsyncRead + Unpin>(reader: &mut R) -> OrientResult<bool> {
    Ok(read_byte(reader).await? == 1)
}

pub async fn read_short<R: AsyncRead + Unpin>(reader: &mut R) -> OrientResult<i16> {
    Ok(i16::from_be_bytes(read_array(reader).await?))
}

pub async fn read_int<R: AsyncRead + Unpin>(reader: &mut R) -> OrientResult<i32> {
    Ok(i32::from_be_bytes(read_array(reader).await?))
}

pub async fn read_long<R: AsyncRead + Unpin>(reader: &mut R) -> OrientResult<i64> {
    Ok(i64::from_be_bytes(read_array(reader).await?))
}

/// Length-prefixed byte array; a negative length is the null marker.
pub async fn read_bytes<R: AsyncRead + Unpin>(reader: &mut R) -> OrientResult<Option<Vec<u8>>> {
    let len = read_int(reader).await?;
    if len < 0 {
        return Ok(None);
    }
    let len = len as usize;
    if len > MAX_MESSAGE_SIZE {
        return Err(OrientError::Protocol(format!(
            "Payload of {} bytes exceeds limit of {}",
            len, MAX_MESSAGE_SIZE
        )));
    }
    read_exact_bytes(reader, len).await.map(Some)
}

pub async fn read_string<R: AsyncRead + Unpin>(reader: &mut R) -> OrientResult<Option<String>> {
    match read_bytes(reader).await? {
        Some(bytes) => String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| OrientError::Protocol(format!("Invalid UTF-8 in string: {}", e))),
        None => Ok(None),
    }
}
