//! JSON snapshot of a bonding instance on disk.
//!
//! The snapshot is wrapped in a versioned envelope that records a hash over the
//! whole state, ledger balances and audit log included; loading recomputes it
//! and refuses a mismatching file.
//! Writes go to a sibling temp file first and are renamed into place.

use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::bonding::Bonding;
use crate::core::ledger::InMemoryLedger;
use crate::error::{Error, Result};
use crate::events::now_secs;
use crate::utils::constants::STATE_FORMAT_VERSION;
use crate::utils::crypto::Hash;

/// Versioned on-disk envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateEnvelope {
    /// Format version
    pub version: u32,
    /// When the snapshot was written (unix seconds)
    pub saved_at: u64,
    /// [`Bonding::content_hash`] at write time
    pub content_hash: Hash,
    /// The full state
    pub bonding: Bonding<InMemoryLedger>,
}

/// A state snapshot file
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    /// Bind to a path; nothing is read or written yet
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the snapshot
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a snapshot has been written
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load and verify the snapshot
    pub fn load(&self) -> Result<Bonding<InMemoryLedger>> {
        let file = File::open(&self.path).map_err(|e| {
            Error::Storage(format!("Failed to open {}: {}", self.path.display(), e))
        })?;

        let envelope: StateEnvelope = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::Deserialization(e.to_string()))?;

        if envelope.version != STATE_FORMAT_VERSION {
            return Err(Error::Storage(format!(
                "Unsupported state format version {} (expected {})",
                envelope.version, STATE_FORMAT_VERSION
            )));
        }

        let actual = envelope.bonding.content_hash()?;
        if actual != envelope.content_hash {
            return Err(Error::Storage(format!(
                "Content hash mismatch: recorded {}, computed {}",
                envelope.content_hash, actual
            )));
        }

        tracing::debug!(path = %self.path.display(), "state loaded");
        Ok(envelope.bonding)
    }

    /// Write the snapshot atomically
    pub fn save(&self, bonding: &Bonding<InMemoryLedger>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::Storage(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        let envelope = StateEnvelope {
            version: STATE_FORMAT_VERSION,
            saved_at: now_secs(),
            content_hash: bonding.content_hash()?,
            bonding: bonding.clone(),
        };

        let tmp = self.temp_path();
        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&tmp)
                .map_err(|e| Error::Storage(format!("Failed to open {}: {}", tmp.display(), e)))?;

            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &envelope)
                .map_err(|e| Error::Serialization(e.to_string()))?;
            writer
                .flush()
                .map_err(|e| Error::Storage(format!("Failed to flush {}: {}", tmp.display(), e)))?;
        }

        fs::rename(&tmp, &self.path).map_err(|e| {
            Error::Storage(format!("Failed to move snapshot into place: {}", e))
        })?;

        tracing::debug!(path = %self.path.display(), "state saved");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
