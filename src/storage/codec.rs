//! Binary encoding of tables for storage.
//!
//! Layout: the 4-byte magic `DVTB`, one format version byte, the CRC32 of the
//! payload (little endian), then the payload: an Arrow IPC file holding the
//! table. Anything else is rejected as corrupt before the payload is parsed.

use crate::error::{ExplorerError, Result};
use polars::prelude::*;
use std::io::Cursor;

const MAGIC: &[u8; 4] = b"DVTB";

/// Version written by [`encode`] and the only one [`decode`] accepts.
/// Version 1 had no payload checksum.
pub const FORMAT_VERSION: u8 = 2;

const CHECKSUM_OFFSET: usize = MAGIC.len() + 1;
const HEADER_LEN: usize = CHECKSUM_OFFSET + 4;

pub fn encode(df: &DataFrame) -> Result<Vec<u8>> {
    let mut payload = Vec::with_capacity(df.estimated_size());
    let mut df = df.clone();
    IpcWriter::new(&mut payload)
        .with_compression(None)
        .finish(&mut df)
        .map_err(|e| ExplorerError::DataProcessing(format!("Failed to encode table: {e}")))?;

    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(MAGIC);
    buf.push(FORMAT_VERSION);
    buf.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

pub fn decode(bytes: &[u8]) -> Result<DataFrame> {
    let Some((header, payload)) = bytes.split_at_checked(HEADER_LEN) else {
        return Err(ExplorerError::CorruptEncoding(format!(
            "expected at least {HEADER_LEN} bytes, got {}",
            bytes.len()
        )));
    };

    let (magic, rest) = header.split_at(MAGIC.len());
    if magic != MAGIC {
        return Err(ExplorerError::CorruptEncoding(
            "missing table header".to_owned(),
        ));
    }

    let Some((&version, checksum)) = rest.split_first() else {
        return Err(ExplorerError::CorruptEncoding("missing format version".to_owned()));
    };
    if version != FORMAT_VERSION {
        return Err(ExplorerError::CorruptEncoding(format!(
            "unsupported format version {version}"
        )));
    }

    let stored = <[u8; 4]>::try_from(checksum)
        .map_err(|_| ExplorerError::CorruptEncoding("missing payload checksum".to_owned()))?;
    if u32::from_le_bytes(stored) != crc32fast::hash(payload) {
        return Err(ExplorerError::CorruptEncoding(
            "payload checksum mismatch".to_owned(),
        ));
    }

    IpcReader::new(Cursor::new(payload.to_vec()))
        .finish()
        .map_err(|e| ExplorerError::CorruptEncoding(e.to_string()))
}
