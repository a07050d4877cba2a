//! On-disk snapshot format
//!
//! One file holds the whole store. Framing:
//!
//! ```text
//! [magic "QSNP" (4)] [schema version u32 LE (4)] [crc32 u32 LE (4)] [bincode payload]
//! ```
//!
//! The CRC covers the payload only. Writes go to a sibling temp file followed
//! by an atomic rename, so a failed write leaves the previous snapshot intact
//! and no partial batch is ever observable.
//!
//! Schema upgrades are additive and idempotent: a loader for version N accepts
//! every version `1..=N` and upgrades in place on the next save.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use quill_core::{Error, Post, Result, Workspace};
use serde::{Deserialize, Serialize};

/// File magic, first four bytes of every snapshot.
pub const MAGIC: [u8; 4] = *b"QSNP";

/// Current schema version. Bump only for additive changes.
pub const SCHEMA_VERSION: u32 = 1;

const HEADER_LEN: usize = 12;

/// Full durable state of the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub workspaces: Vec<Workspace>,
    pub posts: Vec<Post>,
}

/// Load a snapshot from `path`.
///
/// Returns `Ok(None)` when the file does not exist (fresh store). A present
/// but malformed file is a storage error, not a silent reset.
pub fn load(path: &Path) -> Result<Option<Snapshot>> {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    decode(&bytes).map(Some)
}

/// Write `snapshot` to `path` atomically (temp file + rename).
pub fn save(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let bytes = encode(snapshot)?;

    let tmp = path.with_extension("tmp");
    {
        let mut file = File::create(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn encode(snapshot: &Snapshot) -> Result<Vec<u8>> {
    let payload =
        bincode::serialize(snapshot).map_err(|e| Error::Storage(format!("encode: {e}")))?;
    let crc = crc32fast::hash(&payload);

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&SCHEMA_VERSION.to_le_bytes());
    bytes.extend_from_slice(&crc.to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

fn decode(bytes: &[u8]) -> Result<Snapshot> {
    if bytes.len() < HEADER_LEN {
        return Err(Error::Storage("snapshot truncated".to_string()));
    }
    if bytes[0..4] != MAGIC {
        return Err(Error::Storage("snapshot has bad magic".to_string()));
    }

    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version == 0 || version > SCHEMA_VERSION {
        return Err(Error::Storage(format!(
            "snapshot schema version {version} not supported (max {SCHEMA_VERSION})"
        )));
    }

    let expected_crc = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
    let payload = &bytes[HEADER_LEN..];
    let actual_crc = crc32fast::hash(payload);
    if actual_crc != expected_crc {
        return Err(Error::Storage(format!(
            "snapshot checksum mismatch (expected {expected_crc:#010x}, got {actual_crc:#010x})"
        )));
    }

    // Version 1 is the only layout so far. Future versions decode their own
    // payload shape here and fill new fields with defaults.
    bincode::deserialize(payload).map_err(|e| Error::Storage(format!("decode: {e}")))
}
