//! SQLite-based deck and card storage.
//!
//! Provides persistent storage for:
//! - Decks and their ordered cards
//! - Each card's scheduling position (bucket, next review, last review)
//!
//! The database is the bundled implementation of the review engine's
//! [`ReviewSource`] and [`ReviewStore`] collaborators.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use super::{data_dir, migrations};
use crate::deck::{Card, Deck, ReviewSet, StudySelector};
use crate::error::{DatabaseError, FetchError, PersistError, Result, ValidationError};
use crate::source::{RatingUpdate, ReviewSource, ReviewStore};

/// Deck listing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSummary {
    pub id: i64,
    pub name: String,
    pub card_count: usize,
    pub due_count: usize,
    pub created_at: DateTime<Utc>,
}

/// SQLite database for decks and cards.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/flashdeck/flashdeck.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("flashdeck.db");
        Self::open_at(&path)
    }

    /// Open (or create) a database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::init(conn)
    }

    /// Open an in-memory database (for tests and throwaway sessions).
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // ── Decks ────────────────────────────────────────────────────────

    /// Create a deck and return its id.
    ///
    /// # Errors
    /// Returns a validation error for a blank name, or a database error if
    /// the insert fails.
    pub fn create_deck(&self, name: &str) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty("name".into()).into());
        }
        self.conn.execute(
            "INSERT INTO decks (name, created_at) VALUES (?1, ?2)",
            params![name, format_ts(Utc::now())],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(deck_id = id, name, "deck created");
        Ok(id)
    }

    /// All decks with card counts; `due_count` is relative to `now`.
    pub fn list_decks(&self, now: DateTime<Utc>) -> Result<Vec<DeckSummary>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM decks ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut decks = Vec::new();
        for row in rows {
            let (id, name, created_at) = row?;
            let cards = self.cards_in_deck(id)?;
            decks.push(DeckSummary {
                id,
                name,
                card_count: cards.len(),
                due_count: cards.iter().filter(|c| c.is_due(now)).count(),
                created_at: parse_ts(2, &created_at)?,
            });
        }
        Ok(decks)
    }

    fn deck_name(&self, deck_id: i64) -> Result<String, DatabaseError> {
        self.conn
            .query_row("SELECT name FROM decks WHERE id = ?1", params![deck_id], |row| {
                row.get::<_, String>(0)
            })
            .optional()?
            .ok_or(DatabaseError::NotFound {
                entity: "deck",
                id: deck_id,
            })
    }

    // ── Cards ────────────────────────────────────────────────────────

    /// Append a new card (bucket 0, never reviewed) to a deck.
    ///
    /// # Errors
    /// Returns an error if the deck does not exist, the content is blank, or
    /// the insert fails.
    pub fn add_card(&self, deck_id: i64, question: &str, answer: &str) -> Result<i64> {
        if question.trim().is_empty() {
            return Err(ValidationError::Empty("question".into()).into());
        }
        if answer.trim().is_empty() {
            return Err(ValidationError::Empty("answer".into()).into());
        }
        self.deck_name(deck_id)?;
        let position: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM cards WHERE deck_id = ?1",
            params![deck_id],
            |row| row.get(0),
        )?;
        self.conn.execute(
            "INSERT INTO cards (deck_id, position, question, answer, bucket)
             VALUES (?1, ?2, ?3, ?4, 0)",
            params![deck_id, position, question, answer],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(card_id = id, deck_id, position, "card added");
        Ok(id)
    }

    /// Cards of a deck in review order.
    pub fn cards_in_deck(&self, deck_id: i64) -> Result<Vec<Card>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, bucket, question, answer, next_review, last_reviewed
             FROM cards WHERE deck_id = ?1 ORDER BY position, id",
        )?;
        let rows = stmt.query_map(params![deck_id], card_from_row)?;
        let mut cards = Vec::new();
        for row in rows {
            cards.push(row?);
        }
        Ok(cards)
    }

    /// Every card across all decks.
    pub fn all_cards(&self) -> Result<Vec<Card>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, bucket, question, answer, next_review, last_reviewed
             FROM cards ORDER BY deck_id, position, id",
        )?;
        let rows = stmt.query_map([], card_from_row)?;
        let mut cards = Vec::new();
        for row in rows {
            cards.push(row?);
        }
        Ok(cards)
    }

    pub fn card(&self, card_id: i64) -> Result<Option<Card>, DatabaseError> {
        let card = self
            .conn
            .query_row(
                "SELECT id, bucket, question, answer, next_review, last_reviewed
                 FROM cards WHERE id = ?1",
                params![card_id],
                card_from_row,
            )
            .optional()?;
        Ok(card)
    }

    /// Build the review set for `selector` as of `now`.
    ///
    /// An empty `deck_ids` selects every deck. Without `study_all` only due
    /// cards are included; decks left without cards are dropped.
    ///
    /// # Errors
    /// Returns `DatabaseError::NotFound` for an unknown deck id.
    pub fn review_set_at(
        &self,
        selector: &StudySelector,
        now: DateTime<Utc>,
    ) -> Result<ReviewSet, DatabaseError> {
        let deck_ids = if selector.deck_ids.is_empty() {
            let mut stmt = self.conn.prepare("SELECT id FROM decks ORDER BY id")?;
            let ids = stmt.query_map([], |row| row.get::<_, i64>(0))?;
            ids.collect::<Result<Vec<_>, _>>()?
        } else {
            selector.deck_ids.clone()
        };

        let mut decks = Vec::with_capacity(deck_ids.len());
        for deck_id in deck_ids {
            let name = self.deck_name(deck_id)?;
            let cards: Vec<Card> = self
                .cards_in_deck(deck_id)?
                .into_iter()
                .filter(|c| selector.study_all || c.is_due(now))
                .collect();
            if !cards.is_empty() {
                decks.push(Deck {
                    id: deck_id,
                    name,
                    cards,
                });
            }
        }
        Ok(ReviewSet::new(decks))
    }

    /// Write one scheduling update.
    ///
    /// # Errors
    /// Returns `DatabaseError::NotFound` when the card does not exist.
    pub fn apply_rating(&self, update: &RatingUpdate) -> Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE cards SET bucket = ?1, next_review = ?2, last_reviewed = ?3 WHERE id = ?4",
            params![
                update.new_bucket,
                update.next_review.timestamp_millis(),
                update.reviewed_at.timestamp_millis(),
                update.card_id,
            ],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "card",
                id: update.card_id,
            });
        }
        Ok(())
    }
}

impl ReviewSource for Database {
    fn fetch_review_set(&self, selector: &StudySelector) -> Result<ReviewSet, FetchError> {
        self.review_set_at(selector, Utc::now()).map_err(FetchError::from)
    }
}

impl ReviewStore for Database {
    fn persist_rating(&mut self, update: &RatingUpdate) -> Result<(), PersistError> {
        self.apply_rating(update)
            .map_err(|e| PersistError::new(update.card_id, e.to_string()))
    }
}

fn card_from_row(row: &Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        bucket: row.get(1)?,
        question: row.get(2)?,
        answer: row.get(3)?,
        next_review: opt_ts_from_millis(4, row.get(4)?)?,
        last_reviewed: opt_ts_from_millis(5, row.get(5)?)?,
    })
}

fn format_ts(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 column; `idx` is reported on failure.
fn parse_ts(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Card schedule columns hold epoch milliseconds, which cover every
/// instant the scheduler can produce.
fn opt_ts_from_millis(idx: usize, raw: Option<i64>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    raw.map(|ms| {
        DateTime::from_timestamp_millis(ms).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                Type::Integer,
                format!("timestamp {ms} ms out of range").into(),
            )
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn cards_keep_insertion_order() {
        let db = Database::open_memory().unwrap();
        let deck = db.create_deck("Kanji").unwrap();
        let a = db.add_card(deck, "日", "sun").unwrap();
        let b = db.add_card(deck, "月", "moon").unwrap();
        let ids: Vec<i64> = db.cards_in_deck(deck).unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(db.card(a).unwrap().unwrap().bucket, 0);
    }

    #[test]
    fn blank_content_is_rejected() {
        let db = Database::open_memory().unwrap();
        assert!(db.create_deck("   ").is_err());
        let deck = db.create_deck("d").unwrap();
        assert!(matches!(
            db.add_card(deck, "", "a"),
            Err(CoreError::Validation(ValidationError::Empty(_)))
        ));
    }

    #[test]
    fn adding_to_missing_deck_fails() {
        let db = Database::open_memory().unwrap();
        assert!(matches!(
            db.add_card(42, "q", "a"),
            Err(CoreError::Database(DatabaseError::NotFound { entity: "deck", id: 42 }))
        ));
    }

    #[test]
    fn apply_rating_round_trips_timestamps() {
        let db = Database::open_memory().unwrap();
        let deck = db.create_deck("d").unwrap();
        let id = db.add_card(deck, "q", "a").unwrap();
        let update = RatingUpdate {
            card_id: id,
            new_bucket: 3,
            next_review: now() + Duration::hours(72),
            reviewed_at: now(),
        };
        db.apply_rating(&update).unwrap();
        let card = db.card(id).unwrap().unwrap();
        assert_eq!(card.bucket, 3);
        assert_eq!(card.next_review, Some(now() + Duration::hours(72)));
        assert_eq!(card.last_reviewed, Some(now()));
    }

    #[test]
    fn far_future_schedules_read_back() {
        use crate::review::{schedule, Rating};

        let db = Database::open_memory().unwrap();
        let deck = db.create_deck("d").unwrap();
        let past_9999 = db.add_card(deck, "q1", "a1").unwrap();
        let saturated = db.add_card(deck, "q2", "a2").unwrap();

        let cases = [
            (past_9999, schedule(15, Rating::Good, now())),
            (saturated, schedule(u32::MAX, Rating::Easy, now())),
        ];
        for (card_id, next) in &cases {
            db.apply_rating(&RatingUpdate {
                card_id: *card_id,
                new_bucket: next.new_bucket,
                next_review: next.next_review,
                reviewed_at: now(),
            })
            .unwrap();
        }
        assert_eq!(cases[1].1.next_review, DateTime::<Utc>::MAX_UTC);

        let cards = db.cards_in_deck(deck).unwrap();
        for ((_, next), card) in cases.iter().zip(&cards) {
            assert_eq!(card.bucket, next.new_bucket);
            let stored = card.next_review.unwrap();
            assert_eq!(stored.timestamp_millis(), next.next_review.timestamp_millis());
        }
        assert_eq!(db.all_cards().unwrap().len(), 2);
        assert_eq!(db.list_decks(now()).unwrap()[0].due_count, 0);
        let all = db
            .review_set_at(&StudySelector::decks([deck]).with_all(true), now())
            .unwrap();
        assert_eq!(all.total_cards(), 2);
    }

    #[test]
    fn conversion_errors_name_the_column() {
        let db = Database::open_memory().unwrap();
        let deck = db.create_deck("d").unwrap();
        let id = db.add_card(deck, "q", "a").unwrap();
        db.conn
            .execute("UPDATE cards SET last_reviewed = ?1 WHERE id = ?2", params![i64::MAX, id])
            .unwrap();

        let err = db
            .conn
            .query_row(
                "SELECT id, bucket, question, answer, next_review, last_reviewed
                 FROM cards WHERE id = ?1",
                params![id],
                card_from_row,
            )
            .unwrap_err();
        assert!(matches!(err, rusqlite::Error::FromSqlConversionFailure(5, Type::Integer, _)));
    }

    #[test]
    fn persisting_unknown_card_fails() {
        let mut db = Database::open_memory().unwrap();
        let err = db
            .persist_rating(&RatingUpdate {
                card_id: 9,
                new_bucket: 1,
                next_review: now(),
                reviewed_at: now(),
            })
            .unwrap_err();
        assert_eq!(err.card_id, 9);
    }

    #[test]
    fn review_set_filters_due_cards() {
        let db = Database::open_memory().unwrap();
        let deck = db.create_deck("d").unwrap();
        let due = db.add_card(deck, "q1", "a1").unwrap();
        let later = db.add_card(deck, "q2", "a2").unwrap();
        db.apply_rating(&RatingUpdate {
            card_id: later,
            new_bucket: 1,
            next_review: now() + Duration::hours(8),
            reviewed_at: now(),
        })
        .unwrap();

        let set = db.review_set_at(&StudySelector::decks([deck]), now()).unwrap();
        let ids: Vec<i64> = set.decks[0].cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![due]);

        let all = db
            .review_set_at(&StudySelector::decks([deck]).with_all(true), now())
            .unwrap();
        assert_eq!(all.total_cards(), 2);
    }

    #[test]
    fn review_set_follows_selector_order_and_drops_empty_decks() {
        let db = Database::open_memory().unwrap();
        let first = db.create_deck("first").unwrap();
        let second = db.create_deck("second").unwrap();
        let empty = db.create_deck("empty").unwrap();
        db.add_card(first, "q", "a").unwrap();
        db.add_card(second, "q", "a").unwrap();

        let set = db
            .review_set_at(&StudySelector::decks([second, empty, first]), now())
            .unwrap();
        let names: Vec<&str> = set.decks.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["second", "first"]);

        let every = db.review_set_at(&StudySelector::default(), now()).unwrap();
        assert_eq!(every.decks.len(), 2);
    }

    #[test]
    fn unknown_deck_is_a_not_found_fetch() {
        let db = Database::open_memory().unwrap();
        let err = db.fetch_review_set(&StudySelector::decks([5])).unwrap_err();
        assert_eq!(err.status, 404);
    }

    #[test]
    fn list_decks_counts_due_cards() {
        let db = Database::open_memory().unwrap();
        let deck = db.create_deck("d").unwrap();
        db.add_card(deck, "q1", "a1").unwrap();
        let later = db.add_card(deck, "q2", "a2").unwrap();
        db.apply_rating(&RatingUpdate {
            card_id: later,
            new_bucket: 1,
            next_review: now() + Duration::days(1),
            reviewed_at: now(),
        })
        .unwrap();
        let decks = db.list_decks(now()).unwrap();
        assert_eq!(decks.len(), 1);
        assert_eq!(decks[0].card_count, 2);
        assert_eq!(decks[0].due_count, 1);
    }
}
