use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::review::{Face, Rating, SessionState};

/// Every state change in a review session produces an Event.
/// Presenters render from snapshots; storage and logs consume the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: Uuid,
        deck_count: usize,
        card_count: usize,
        flip_mode: bool,
        at: DateTime<Utc>,
    },
    AnswerRevealed {
        deck_index: usize,
        card_index: usize,
        card_id: i64,
        at: DateTime<Utc>,
    },
    /// Delayed flip-mode content swap took effect.
    FaceSwapped {
        face: Face,
        at: DateTime<Utc>,
    },
    CardRated {
        card_id: i64,
        rating: Rating,
        new_bucket: u32,
        next_review: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    DeckAdvanced {
        deck_index: usize,
        deck_id: i64,
        deck_name: String,
        at: DateTime<Utc>,
    },
    SessionFinished {
        session_id: Uuid,
        reviewed: usize,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        session_id: Uuid,
        state: SessionState,
        deck_name: Option<String>,
        card_id: Option<i64>,
        remaining: usize,
        at: DateTime<Utc>,
    },
}
