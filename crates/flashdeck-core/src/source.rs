use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::deck::{ReviewSet, StudySelector};
use crate::error::{DatabaseError, FetchError, PersistError};

/// Default delay before flip-mode content switches faces.
pub const DEFAULT_FACE_SWAP_DELAY_MS: u64 = 150;

/// User settings the review engine consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySettings {
    /// Present cards as a single flipping card instead of question-then-answer.
    pub flip_mode: bool,
    /// How long the previous face stays visible while the card turns.
    pub face_swap_delay_ms: u64,
}

impl Default for StudySettings {
    fn default() -> Self {
        Self {
            flip_mode: true,
            face_swap_delay_ms: DEFAULT_FACE_SWAP_DELAY_MS,
        }
    }
}

/// One committed rating decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub card_id: i64,
    pub new_bucket: u32,
    pub next_review: DateTime<Utc>,
    pub reviewed_at: DateTime<Utc>,
}

/// Supplies the decks and cards for a study session.
pub trait ReviewSource {
    /// Load the review set for `selector`.
    ///
    /// An empty set is a valid result, not an error.
    fn fetch_review_set(&self, selector: &StudySelector) -> Result<ReviewSet, FetchError>;
}

/// Supplies the user's study preferences.
pub trait SettingsSource {
    fn fetch_settings(&self) -> Result<StudySettings, FetchError>;
}

/// Commits scheduling updates.
///
/// The session never issues the same update twice, so implementations need
/// not deduplicate.
pub trait ReviewStore {
    fn persist_rating(&mut self, update: &RatingUpdate) -> Result<(), PersistError>;
}

impl SettingsSource for StudySettings {
    fn fetch_settings(&self) -> Result<StudySettings, FetchError> {
        Ok(*self)
    }
}

impl ReviewSource for ReviewSet {
    /// Serve an already loaded set, keeping only the selected decks in
    /// selection order when a selection is given.
    fn fetch_review_set(&self, selector: &StudySelector) -> Result<ReviewSet, FetchError> {
        if selector.deck_ids.is_empty() {
            return Ok(self.clone());
        }
        let decks = selector
            .deck_ids
            .iter()
            .map(|&id| {
                self.decks
                    .iter()
                    .find(|d| d.id == id)
                    .cloned()
                    .ok_or_else(|| FetchError::from(DatabaseError::NotFound { entity: "deck", id }))
            })
            .collect::<Result<_, _>>()?;
        Ok(ReviewSet::new(decks))
    }
}

impl<S: ReviewStore + ?Sized> ReviewStore for &mut S {
    fn persist_rating(&mut self, update: &RatingUpdate) -> Result<(), PersistError> {
        (**self).persist_rating(update)
    }
}
