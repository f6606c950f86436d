//! # Durable Store
//!
//! Atomic load/save of the registry state blob.
//!
//! ## Framing
//!
//! `[magic: 8 bytes][crc32: u32 LE][payload]` where the payload is the
//! codec's encoded root node. The CRC is verified on load; a mismatch is
//! reported as corruption, never as partial data.
//!
//! ## Atomicity
//!
//! Saves write a sibling temp file, fsync it, then rename over the
//! target. A failure anywhere leaves the previous durable copy intact.

use crate::codec::{decode_state, encode_state, DecodeContext};
use crate::domain::errors::StoreError;
use crate::domain::state::RegistryState;
use crate::ports::outbound::ScopeIdentity;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const MAGIC: &[u8; 8] = b"TCPAREG\0";

/// Wrap an encoded payload in the on-disk framing.
pub(crate) fn frame(payload: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(MAGIC.len() + 4 + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&crc32fast::hash(payload).to_le_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

/// Result of a load attempt. The caller substitutes a fresh empty state
/// for both `Absent` and `Corrupt`; only `Corrupt` is logged as data
/// loss.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded {
        state: RegistryState,
        /// Schema version the file was written at. Below the current
        /// version means an upgrade happened and the caller should
        /// re-persist.
        decoded_version: u32,
    },
    Absent,
    Corrupt,
}

pub struct DurableStore {
    path: PathBuf,
}

impl DurableStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Encode and atomically replace the persisted state.
    pub fn save(
        &self,
        state: &RegistryState,
        scopes: &dyn ScopeIdentity,
    ) -> Result<(), StoreError> {
        let bytes = frame(&encode_state(state, scopes));

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        let written = (|| -> io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
            fs::rename(&tmp, &self.path)
        })();

        if let Err(err) = written {
            // The rename never happened; the previous copy is untouched.
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }

        tracing::debug!(
            "[tc-reg] state saved: {} bytes to {}",
            bytes.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Read and decode the persisted state.
    pub fn load(&self, ctx: &DecodeContext<'_>) -> LoadOutcome {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return LoadOutcome::Absent,
            Err(err) => {
                tracing::warn!("[tc-reg] state file unreadable: {err}");
                return LoadOutcome::Corrupt;
            }
        };

        if bytes.len() < MAGIC.len() + 4 || &bytes[..MAGIC.len()] != MAGIC {
            tracing::warn!("[tc-reg] state file has no valid header; discarding");
            return LoadOutcome::Corrupt;
        }

        let expected = u32::from_le_bytes(
            bytes[MAGIC.len()..MAGIC.len() + 4]
                .try_into()
                .expect("4-byte slice"),
        );
        let payload = &bytes[MAGIC.len() + 4..];
        if crc32fast::hash(payload) != expected {
            tracing::warn!("[tc-reg] state file checksum mismatch; discarding");
            return LoadOutcome::Corrupt;
        }

        match decode_state(payload, ctx) {
            Ok(Some(state)) => {
                let decoded_version = state.version;
                LoadOutcome::Loaded {
                    state,
                    decoded_version,
                }
            }
            Ok(None) => {
                tracing::warn!("[tc-reg] state file root not recognized; discarding");
                LoadOutcome::Corrupt
            }
            Err(err) => {
                tracing::warn!("[tc-reg] state file decode failed: {err}; discarding");
                LoadOutcome::Corrupt
            }
        }
    }
}
