use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::GameId;

/// Per-game result payload, tagged by `gameId` on the wire so the optional
/// `level`/`rounds` fields only exist for the games that produce them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "gameId")]
pub enum GameOutcome {
    #[serde(rename = "reflex-counter")]
    ReflexCounter,
    #[serde(rename = "sequence-memory")]
    SequenceMemory { level: u8 },
    #[serde(rename = "mystery-reward")]
    MysteryReward { rounds: u8 },
}

impl GameOutcome {
    pub fn game_id(&self) -> GameId {
        match self {
            GameOutcome::ReflexCounter => GameId::ReflexCounter,
            GameOutcome::SequenceMemory { .. } => GameId::SequenceMemory,
            GameOutcome::MysteryReward { .. } => GameId::MysteryReward,
        }
    }
}

/// One finished play. Created exactly once when a session terminates, never
/// mutated afterwards; the history log is the sole source of truth for stats
/// and rankings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub outcome: GameOutcome,
    pub game_name: String,
    pub score: u32,
    pub played_at: DateTime<Utc>,
    pub user_id: String,
}

impl PlayRecord {
    pub fn new(outcome: GameOutcome, score: u32, user_id: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            outcome,
            game_name: outcome.game_id().display_name().to_string(),
            score,
            played_at: Utc::now(),
            user_id,
        }
    }

    pub fn game_id(&self) -> GameId {
        self.outcome.game_id()
    }

    pub fn level(&self) -> Option<u8> {
        match self.outcome {
            GameOutcome::SequenceMemory { level } => Some(level),
            _ => None,
        }
    }

    pub fn rounds(&self) -> Option<u8> {
        match self.outcome {
            GameOutcome::MysteryReward { rounds } => Some(rounds),
            _ => None,
        }
    }
}
