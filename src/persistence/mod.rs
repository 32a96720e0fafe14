//! Save/load of a running game
//!
//! Features:
//! - Versioned JSON envelope
//! - Tuning and obstacle slot bookkeeping revalidated on load
//!
//! Pending events are not saved; a restored game resumes with an empty queue.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::GameState;
use crate::tuning::TuningError;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported snapshot version {found} (expected {expected})", expected = SNAPSHOT_VERSION)]
    UnsupportedVersion { found: u32 },
    #[error("snapshot carries invalid tuning: {0}")]
    Tuning(#[from] TuningError),
    #[error("snapshot obstacle arena is corrupt: {0}")]
    CorruptArena(&'static str),
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    state: &'a GameState,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    state: serde_json::Value,
}

/// Serialize a game into a versioned JSON snapshot
pub fn save_snapshot(state: &GameState) -> Result<String, SnapshotError> {
    let json = serde_json::to_string(&EnvelopeRef {
        version: SNAPSHOT_VERSION,
        state,
    })?;
    log::debug!("Snapshot saved ({} bytes, score {})", json.len(), state.score());
    Ok(json)
}

/// Restore a game from a snapshot produced by [`save_snapshot`]
pub fn load_snapshot(json: &str) -> Result<GameState, SnapshotError> {
    let envelope: Envelope = serde_json::from_str(json)?;
    if envelope.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: envelope.version,
        });
    }
    let state: GameState = serde_json::from_value(envelope.state)?;
    state.tuning().validate()?;
    state
        .obstacles()
        .validate(state.tuning().max_obstacles)
        .map_err(SnapshotError::CorruptArena)?;
    log::info!(
        "Snapshot restored ({:?}, score {}, {} obstacles)",
        state.phase(),
        state.score(),
        state.obstacles().len()
    );
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    #[test]
    fn test_round_trip_preserves_state() {
        let mut state = GameState::new(42);
        state.start();
        state.countdown_finished();
        for _ in 0..90 {
            state.advance(1.0 / 60.0);
        }

        let json = save_snapshot(&state).expect("serializes");
        let restored = load_snapshot(&json).expect("deserializes");
        assert_eq!(restored.phase(), GamePhase::Playing);
        assert_eq!(restored.score(), state.score());
        assert_eq!(restored.obstacles().snapshot(), state.obstacles().snapshot());
        assert!(restored.events().is_empty());
    }

    #[test]
    fn test_rejects_unknown_version() {
        let state = GameState::new(1);
        let json = save_snapshot(&state)
            .expect("serializes")
            .replacen("\"version\":1", "\"version\":99", 1);
        assert!(matches!(
            load_snapshot(&json),
            Err(SnapshotError::UnsupportedVersion { found: 99 })
        ));
    }

    fn tampered(edit: impl FnOnce(&mut serde_json::Value)) -> String {
        let mut state = GameState::new(3);
        state.start();
        state.countdown_finished();
        let json = save_snapshot(&state).expect("serializes");
        let mut value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
        edit(&mut value["state"]["obstacles"]);
        value.to_string()
    }

    #[test]
    fn test_rejects_out_of_range_free_slot() {
        let json = tampered(|arena| arena["free"] = serde_json::json!([99]));
        assert!(matches!(
            load_snapshot(&json),
            Err(SnapshotError::CorruptArena(_))
        ));
    }

    #[test]
    fn test_rejects_arena_smaller_than_cap() {
        let json = tampered(|arena| {
            arena["slots"] = serde_json::json!([]);
            arena["free"] = serde_json::json!([]);
            arena["order"] = serde_json::json!([]);
        });
        assert!(matches!(
            load_snapshot(&json),
            Err(SnapshotError::CorruptArena(_))
        ));
    }

    #[test]
    fn test_restored_game_keeps_spawning() {
        let json = tampered(|_| {});
        let mut restored = load_snapshot(&json).expect("untouched snapshot loads");
        for _ in 0..600 {
            restored.advance(1.0 / 60.0);
        }
        assert!(restored.obstacles().len() <= restored.tuning().max_obstacles);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(load_snapshot("[]"), Err(SnapshotError::Json(_))));
    }
}
