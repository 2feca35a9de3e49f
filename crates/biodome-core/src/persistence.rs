//! Persistence records — a versioned snapshot of the whole game.
//!
//! The engine materializes current values (not an event log) after every
//! mutation and hands them to a [`StateStore`]. Bincode is the record
//! codec; the store itself is a collaborator and may put the bytes
//! anywhere.

use std::io::{Read, Write};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use biodome_logic::metrics::MetricSet;
use biodome_logic::victory::GameResult;

use crate::board::RoomBoard;
use crate::error::StoreError;
use crate::players::{PlayerId, Roster};

/// Increment when the record layout changes.
pub const SAVE_VERSION: u32 = 1;

/// Materialized current state of a game.
///
/// The deadline is stored as seconds remaining at save time; restore
/// re-anchors it against the local clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedGame {
    pub version: u32,
    pub roster: Roster,
    pub board: RoomBoard,
    pub metrics: MetricSet,
    pub started: bool,
    pub remaining_secs: Option<u64>,
    pub result: Option<GameResult>,
    pub code_validator: Option<PlayerId>,
}

/// Durable-storage seam. The engine calls it; it does not retry.
pub trait StateStore: Send + Sync {
    fn save(&self, game: &PersistedGame) -> Result<(), StoreError>;
    fn load(&self) -> Result<Option<PersistedGame>, StoreError>;
}

/// Encode a record with the bincode codec.
pub fn encode(game: &PersistedGame) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(game).map_err(|e| StoreError::Codec(e.to_string()))
}

/// Decode a record, rejecting unknown save versions.
pub fn decode(bytes: &[u8]) -> Result<PersistedGame, StoreError> {
    let game: PersistedGame =
        bincode::deserialize(bytes).map_err(|e| StoreError::Codec(e.to_string()))?;
    if game.version != SAVE_VERSION {
        return Err(StoreError::Version(game.version));
    }
    Ok(game)
}

/// Write a record to any `Write` destination.
pub fn save_to_writer<W: Write>(game: &PersistedGame, mut writer: W) -> Result<(), StoreError> {
    let bytes = encode(game)?;
    writer.write_all(&bytes)?;
    Ok(())
}

/// Read a record back from any `Read` source.
pub fn load_from_reader<R: Read>(mut reader: R) -> Result<PersistedGame, StoreError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode(&bytes)
}

/// In-memory store for tests and the sim harness.
#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Option<Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes currently held, if any. For assertions.
    pub fn saved_len(&self) -> Option<usize> {
        self.lock_slot().as_ref().map(|bytes| bytes.len())
    }

    fn lock_slot(&self) -> std::sync::MutexGuard<'_, Option<Vec<u8>>> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StateStore for MemoryStore {
    fn save(&self, game: &PersistedGame) -> Result<(), StoreError> {
        let bytes = encode(game)?;
        *self.lock_slot() = Some(bytes);
        Ok(())
    }

    fn load(&self) -> Result<Option<PersistedGame>, StoreError> {
        match self.lock_slot().as_deref() {
            Some(bytes) => decode(bytes).map(Some),
            None => Ok(None),
        }
    }
}
