//! Card, deck and review-set records.
//!
//! These are owned by storage; the review engine reads them and only ever
//! changes a card through a scheduling update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A flashcard with its current scheduling position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    /// Spaced-repetition box; 0 for a new card.
    #[serde(default)]
    pub bucket: u32,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub next_review: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl Card {
    /// Whether the card should be studied at `now`.
    ///
    /// Cards that were never scheduled are always due.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review.map_or(true, |at| at <= now)
    }
}

/// A named, ordered sequence of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// Decks and cards loaded for one study session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSet {
    pub decks: Vec<Deck>,
}

impl ReviewSet {
    pub fn new(decks: Vec<Deck>) -> Self {
        Self { decks }
    }

    pub fn total_cards(&self) -> usize {
        self.decks.iter().map(|d| d.cards.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_cards() == 0
    }
}

/// Which decks to study and whether to include cards that are not yet due.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySelector {
    #[serde(default)]
    pub deck_ids: Vec<i64>,
    /// Include every card, not only the due ones.
    #[serde(default)]
    pub study_all: bool,
}

impl StudySelector {
    pub fn decks(deck_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            deck_ids: deck_ids.into_iter().collect(),
            study_all: false,
        }
    }

    pub fn with_all(mut self, study_all: bool) -> Self {
        self.study_all = study_all;
        self
    }
}
