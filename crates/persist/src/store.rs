//! File-backed checkpoint storage.
//!
//! Layout inside the save directory:
//! ```text
//! checkpoints/
//!   000000.checkpoint.cbor.zst - CBOR+zstd checkpoint envelopes, one per level exit
//!   000001.checkpoint.cbor.zst
//! high_scores.json             - see `HighScoreTable`
//! ```
//!
//! Checkpoints get their own subdirectory so that listing and verifying never trips
//! over the high-score table; both still live under the one save directory.

use crate::checkpoint::{Checkpoint, CheckpointRef};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Current checkpoint schema version.
const CHECKPOINT_SCHEMA_VERSION: u32 = 1;
const CHECKPOINT_SUFFIX: &str = ".checkpoint.cbor.zst";

/// Errors from file-backed persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CBOR serialization error: {0}")]
    CborEncode(String),
    #[error("CBOR deserialization error: {0}")]
    CborDecode(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("integrity check failed for {file}: expected {expected}, got {actual}")]
    IntegrityMismatch {
        file: String,
        expected: String,
        actual: String,
    },
    #[error("schema version mismatch: file has v{file_version}, expected v{expected_version}")]
    SchemaMismatch {
        file_version: u32,
        expected_version: u32,
    },
    #[error("checkpoint {file} holds a malformed turn at index {index}")]
    InvalidTurn { file: String, index: usize },
}

/// On-disk envelope around a checkpoint.
#[derive(Debug, Serialize, Deserialize)]
struct CheckpointFile {
    schema_version: u32,
    /// Hex SHA-256 of the CBOR encoding of `checkpoint`.
    sha256: String,
    checkpoint: Checkpoint,
}

/// Append-only directory of checkpoint files.
#[derive(Debug)]
pub struct CheckpointStore {
    dir: PathBuf,
    /// Lowest index that may still be free. Probing always confirms.
    next_index: u64,
}

impl CheckpointStore {
    /// Open or create the checkpoint directory under `save_dir`.
    pub fn open(save_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = save_dir.as_ref().join("checkpoints");
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, next_index: 0 })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a new checkpoint file and return its reference.
    ///
    /// The file name is the first free `NNNNNN` index; existing files are never touched.
    pub fn write(&mut self, checkpoint: &Checkpoint) -> Result<CheckpointRef, StoreError> {
        let payload = cbor_serialize(checkpoint)?;
        let envelope = CheckpointFile {
            schema_version: CHECKPOINT_SCHEMA_VERSION,
            sha256: sha256_hex(&payload),
            checkpoint: checkpoint.clone(),
        };
        let compressed = zstd_compress(&cbor_serialize(&envelope)?)?;

        let (index, name) = self.probe_free_name();
        write_atomic(&self.dir.join(&name), &compressed)?;
        self.next_index = index + 1;

        tracing::info!(
            file = %name,
            level = %checkpoint.level,
            turns = checkpoint.turns.len(),
            "checkpoint written"
        );
        Ok(CheckpointRef(name))
    }

    /// Read and verify a checkpoint.
    pub fn read(&self, reference: &CheckpointRef) -> Result<Checkpoint, StoreError> {
        let compressed = std::fs::read(self.dir.join(reference.as_str()))?;
        let envelope: CheckpointFile = cbor_deserialize(&zstd_decompress(&compressed)?)?;

        if envelope.schema_version != CHECKPOINT_SCHEMA_VERSION {
            return Err(StoreError::SchemaMismatch {
                file_version: envelope.schema_version,
                expected_version: CHECKPOINT_SCHEMA_VERSION,
            });
        }
        let actual = sha256_hex(&cbor_serialize(&envelope.checkpoint)?);
        if actual != envelope.sha256 {
            return Err(StoreError::IntegrityMismatch {
                file: reference.to_string(),
                expected: envelope.sha256,
                actual,
            });
        }
        if let Some(index) = envelope.checkpoint.first_malformed_turn() {
            return Err(StoreError::InvalidTurn {
                file: reference.to_string(),
                index,
            });
        }

        tracing::debug!(file = %reference, level = %envelope.checkpoint.level, "checkpoint read");
        Ok(envelope.checkpoint)
    }

    /// All checkpoint files in the directory, in name order.
    pub fn list(&self) -> Result<Vec<CheckpointRef>, StoreError> {
        let mut refs = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if name.ends_with(CHECKPOINT_SUFFIX) {
                refs.push(CheckpointRef(name));
            }
        }
        refs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(refs)
    }

    /// Read every checkpoint and report the ones that fail verification.
    pub fn verify_all(&self) -> Result<Vec<(CheckpointRef, StoreError)>, StoreError> {
        let mut failures = Vec::new();
        for reference in self.list()? {
            if let Err(e) = self.read(&reference) {
                failures.push((reference, e));
            }
        }
        Ok(failures)
    }

    fn probe_free_name(&self) -> (u64, String) {
        let mut index = self.next_index;
        loop {
            let name = format!("{index:06}{CHECKPOINT_SUFFIX}");
            if !self.dir.join(&name).exists() {
                return (index, name);
            }
            index += 1;
        }
    }
}

/// Write `data` to a temporary sibling of `path`, then rename it into place.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(data)?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}

fn cbor_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| StoreError::CborEncode(e.to_string()))?;
    Ok(buf)
}

fn cbor_deserialize<T: for<'de> Deserialize<'de>>(data: &[u8]) -> Result<T, StoreError> {
    ciborium::from_reader(data).map_err(|e| StoreError::CborDecode(e.to_string()))
}

fn zstd_compress(data: &[u8]) -> Result<Vec<u8>, StoreError> {
    let mut encoder = zstd::Encoder::new(Vec::new(), 3)?;
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn zstd_decompress(data: &[u8]) -> Result<Vec<u8>, StoreError> {
    let mut decoder = zstd::Decoder::new(data)?;
    let mut buf = Vec::new();
    decoder.read_to_end(&mut buf)?;
    Ok(buf)
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
