//! Score persistence boundary
//!
//! Write-only: each finished round of a signed-in player produces one
//! `ScoreRecord`, stored under a key derived from the user id. Nothing is
//! ever read back into gameplay. A failing sink is logged and ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::driver::RoundSummary;
use crate::session::Session;
use crate::sim::RoundEndReason;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Could not encode score record")]
    Encode(#[from] serde_json::Error),
    #[error("Storage is unavailable")]
    Unavailable,
    #[error("Storage rejected the write: {0}")]
    Rejected(String),
}

/// One finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub uid: String,
    pub score: u32,
    pub reason: RoundEndReason,
    /// Unix timestamp (ms) when the round ended
    pub timestamp: f64,
}

impl ScoreRecord {
    /// Storage key for this record's user
    pub fn key(&self) -> String {
        score_key(&self.uid)
    }
}

pub fn score_key(uid: &str) -> String {
    format!("scores/{}", uid)
}

/// Key/value write path for score records
pub trait ScoreSink {
    fn write(&mut self, record: &ScoreRecord) -> Result<(), PersistError>;
}

/// In-memory sink; the last write per key wins
#[derive(Debug, Default, Clone)]
pub struct MemoryScoreSink {
    pub entries: HashMap<String, String>,
    pub writes: u32,
}

impl ScoreSink for MemoryScoreSink {
    fn write(&mut self, record: &ScoreRecord) -> Result<(), PersistError> {
        let json = serde_json::to_string(record)?;
        self.entries.insert(record.key(), json);
        self.writes += 1;
        Ok(())
    }
}

/// Browser LocalStorage sink
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageScoreSink;

#[cfg(target_arch = "wasm32")]
impl ScoreSink for LocalStorageScoreSink {
    fn write(&mut self, record: &ScoreRecord) -> Result<(), PersistError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(PersistError::Unavailable)?;
        let json = serde_json::to_string(record)?;
        storage
            .set_item(&format!("fruit_slice/{}", record.key()), &json)
            .map_err(|e| PersistError::Rejected(format!("{:?}", e)))
    }
}

/// Write a finished round for the signed-in user.
///
/// Returns true if a record was written. Guests are skipped and sink errors
/// are logged, never propagated.
pub fn record_round(
    sink: &mut dyn ScoreSink,
    session: &Session,
    round: RoundSummary,
    timestamp: f64,
) -> bool {
    let Some(user) = session.user() else {
        return false;
    };
    let record = ScoreRecord {
        uid: user.uid.clone(),
        score: round.final_score,
        reason: round.reason,
        timestamp,
    };
    match sink.write(&record) {
        Ok(()) => {
            log::info!("Score {} saved for {}", record.score, record.uid);
            true
        }
        Err(e) => {
            log::warn!("Could not save score: {}", e);
            false
        }
    }
}
