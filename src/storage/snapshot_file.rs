use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::core::{IndexError, IndexSnapshot};

pub const MAGIC: &[u8; 4] = b"PXRC";
pub const FORMAT_VERSION: u16 = 1;
pub const EXTENSION: &str = "prc";

// Header: Magic(4) Version(u16) JsonLength(u32)
const HEADER_LEN: usize = 10;
const MAX_LZ4_RATIO: u64 = 255;
/// Largest JSON record accepted on import (1 GiB).
pub const MAX_RECORD_LEN: u32 = 1 << 30;

/// Encode a snapshot as header + LZ4 block of its JSON record.
pub fn encode(snapshot: &IndexSnapshot) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(snapshot).context("Failed to serialize snapshot")?;
    let raw_len = u32::try_from(json.len())
        .ok()
        .filter(|&len| len <= MAX_RECORD_LEN)
        .context("Snapshot too large for format")?;
    let body = lz4::block::compress(&json, None, false).context("LZ4 compression failed")?;

    let mut data = Vec::with_capacity(HEADER_LEN + body.len());
    data.extend_from_slice(MAGIC);
    data.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    data.extend_from_slice(&raw_len.to_le_bytes());
    data.extend_from_slice(&body);
    Ok(data)
}

/// Decode bytes produced by [`encode`]. Every failure is reported as
/// [`IndexError::MalformedSnapshot`].
pub fn decode(data: &[u8]) -> Result<IndexSnapshot, IndexError> {
    let malformed = |msg: String| IndexError::MalformedSnapshot(msg);

    if data.len() < HEADER_LEN {
        return Err(malformed(format!("{} bytes is shorter than the header", data.len())));
    }
    if &data[0..4] != MAGIC {
        return Err(malformed("not a snapshot file (bad magic)".to_string()));
    }

    let version = u16::from_le_bytes([data[4], data[5]]);
    if version != FORMAT_VERSION {
        return Err(malformed(format!("unsupported format version {version}")));
    }

    let raw_len = u32::from_le_bytes([data[6], data[7], data[8], data[9]]);
    let body = &data[HEADER_LEN..];
    if raw_len > MAX_RECORD_LEN {
        return Err(malformed(format!(
            "record length {raw_len} exceeds the {MAX_RECORD_LEN} byte limit"
        )));
    }
    // LZ4 expands input by at most ~255x.
    if raw_len as u64 > body.len() as u64 * MAX_LZ4_RATIO + 16 {
        return Err(malformed(format!(
            "record length {raw_len} impossible for {} compressed bytes",
            body.len()
        )));
    }
    let raw_len = i32::try_from(raw_len).map_err(|_| malformed(format!("record length {raw_len} too large")))?;

    let json = lz4::block::decompress(body, Some(raw_len))
        .map_err(|e| malformed(format!("decompression failed: {e}")))?;
    if json.len() != raw_len as usize {
        return Err(malformed(format!(
            "decompressed {} bytes, header says {raw_len}",
            json.len()
        )));
    }

    serde_json::from_slice(&json).map_err(|e| malformed(e.to_string()))
}

/// Write the snapshot to `path`, returning the file size in bytes.
pub fn save(path: &Path, snapshot: &IndexSnapshot) -> Result<u64> {
    let data = encode(snapshot)?;
    fs::write(path, &data).with_context(|| format!("Failed to write {:?}", path))?;
    log::debug!(
        "saved snapshot to {:?}: {} colors, {} bytes",
        path,
        snapshot.index().len(),
        data.len()
    );
    Ok(data.len() as u64)
}

pub fn load(path: &Path) -> Result<IndexSnapshot> {
    let data = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let snapshot = decode(&data).with_context(|| format!("Failed to import {:?}", path))?;
    log::debug!(
        "loaded snapshot from {:?}: {} colors, {}x{}",
        path,
        snapshot.index().len(),
        snapshot.meta().width,
        snapshot.meta().height
    );
    Ok(snapshot)
}
