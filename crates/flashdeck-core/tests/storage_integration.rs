//! File-backed database tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use flashdeck_core::storage::migrations::{get_schema_version, SCHEMA_VERSION};
use flashdeck_core::{Database, Rating, ReviewSession, StudySelector, StudySettings};
use rusqlite::Connection;
use tempfile::TempDir;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

#[test]
fn ratings_survive_reopening_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flashdeck.db");

    let deck = {
        let mut db = Database::open_at(&path).unwrap();
        let deck = db.create_deck("capitals").unwrap();
        db.add_card(deck, "France", "Paris").unwrap();
        db.add_card(deck, "Peru", "Lima").unwrap();

        let set = db.review_set_at(&StudySelector::decks([deck]), t0()).unwrap();
        let mut session = ReviewSession::new(set, StudySettings::default());
        session.reveal(t0());
        session.rate(Rating::Easy, t0(), &mut db).unwrap();
        deck
    };

    let db = Database::open_at(&path).unwrap();
    let cards = db.cards_in_deck(deck).unwrap();
    assert_eq!(cards[0].bucket, 1);
    assert_eq!(cards[0].next_review, Some(t0() + Duration::hours(12)));
    assert_eq!(cards[1].bucket, 0);
    assert!(cards[1].next_review.is_none());

    let due_now = db.review_set_at(&StudySelector::decks([deck]), t0()).unwrap();
    assert_eq!(due_now.total_cards(), 1);
    let due_later = db
        .review_set_at(&StudySelector::decks([deck]), t0() + Duration::hours(12))
        .unwrap();
    assert_eq!(due_later.total_cards(), 2);
}

#[test]
fn opening_migrates_to_the_latest_schema() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flashdeck.db");
    drop(Database::open_at(&path).unwrap());

    let conn = Connection::open(&path).unwrap();
    assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
}

#[test]
fn decks_list_with_due_counts() {
    let dir = TempDir::new().unwrap();
    let db = Database::open_at(&dir.path().join("flashdeck.db")).unwrap();
    let a = db.create_deck("a").unwrap();
    db.create_deck("b").unwrap();
    db.add_card(a, "q", "a").unwrap();

    let decks = db.list_decks(t0()).unwrap();
    let summary: Vec<(&str, usize, usize)> = decks
        .iter()
        .map(|d| (d.name.as_str(), d.card_count, d.due_count))
        .collect();
    assert_eq!(summary, vec![("a", 1, 1), ("b", 0, 0)]);
}
