//! Schema migrations for the deck store.
//!
//! `Database` runs [`migrate`] on every open; each step is applied once and
//! recorded in the single-row `schema_version` table.

use rusqlite::{Connection, Result as SqliteResult};

/// Version written by the newest migration.
pub const SCHEMA_VERSION: i32 = 3;

const STEPS: [(i32, fn(&Connection) -> SqliteResult<()>); 3] =
    [(1, migrate_v1), (2, migrate_v2), (3, migrate_v3)];

/// Bring `conn` up to [`SCHEMA_VERSION`].
///
/// # Errors
/// Returns the SQLite error of the first step that fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);")?;

    let current = get_schema_version(conn);
    for (version, step) in STEPS {
        if current < version {
            step(conn)?;
            set_schema_version(conn, version)?;
            tracing::debug!(version, "applied migration");
        }
    }
    Ok(())
}

/// Recorded schema version; 0 for a fresh database.
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute_batch("DELETE FROM schema_version;")?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])
        .map(|_| ())
}

/// v1: decks and cards.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS decks (
            id          INTEGER PRIMARY KEY,
            name        TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS cards (
            id            INTEGER PRIMARY KEY,
            deck_id       INTEGER NOT NULL REFERENCES decks(id) ON DELETE CASCADE,
            position      INTEGER NOT NULL,
            question      TEXT NOT NULL,
            answer        TEXT NOT NULL,
            bucket        INTEGER NOT NULL DEFAULT 0,
            next_review   TEXT,
            last_reviewed TEXT
        );",
    )
}

/// v2: indexes for the due-card query and deck ordering.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_cards_deck_position ON cards(deck_id, position);
         CREATE INDEX IF NOT EXISTS idx_cards_next_review ON cards(next_review);",
    )
}

/// v3: card schedule columns become INTEGER epoch milliseconds.
///
/// RFC 3339 text cannot represent years past 9999, which high buckets reach.
/// Text values are converted; ones SQLite cannot parse become NULL (due).
fn migrate_v3(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE cards_v3 (
            id            INTEGER PRIMARY KEY,
            deck_id       INTEGER NOT NULL REFERENCES decks(id) ON DELETE CASCADE,
            position      INTEGER NOT NULL,
            question      TEXT NOT NULL,
            answer        TEXT NOT NULL,
            bucket        INTEGER NOT NULL DEFAULT 0,
            next_review   INTEGER,
            last_reviewed INTEGER
        );

        INSERT INTO cards_v3
            (id, deck_id, position, question, answer, bucket, next_review, last_reviewed)
        SELECT id, deck_id, position, question, answer, bucket,
               CAST(ROUND((julianday(next_review) - 2440587.5) * 86400000.0) AS INTEGER),
               CAST(ROUND((julianday(last_reviewed) - 2440587.5) * 86400000.0) AS INTEGER)
        FROM cards;

        DROP TABLE cards;
        ALTER TABLE cards_v3 RENAME TO cards;

        CREATE INDEX IF NOT EXISTS idx_cards_deck_position ON cards(deck_id, position);
        CREATE INDEX IF NOT EXISTS idx_cards_next_review ON cards(next_review);",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrates_fresh_database_to_latest() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn v3_converts_text_schedules_to_millis() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE schema_version (version INTEGER PRIMARY KEY);")
            .unwrap();
        migrate_v1(&conn).unwrap();
        migrate_v2(&conn).unwrap();
        set_schema_version(&conn, 2).unwrap();
        conn.execute_batch(
            "INSERT INTO decks (id, name, created_at) VALUES (1, 'd', '2024-03-01T09:00:00.000Z');
             INSERT INTO cards (id, deck_id, position, question, answer, bucket, next_review, last_reviewed)
             VALUES (1, 1, 0, 'q', 'a', 2, '2024-03-01T09:00:00.000Z', NULL),
                    (2, 1, 1, 'q', 'a', 1, '+10000-01-01T00:00:00.000Z', NULL);",
        )
        .unwrap();

        migrate(&conn).unwrap();

        assert_eq!(get_schema_version(&conn), 3);
        let expected = chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2024, 3, 1, 9, 0, 0)
            .unwrap()
            .timestamp_millis();
        let (kind, ms): (String, i64) = conn
            .query_row(
                "SELECT typeof(next_review), next_review FROM cards WHERE id = 1",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(kind, "integer");
        assert_eq!(ms, expected);

        let unreadable: Option<i64> = conn
            .query_row("SELECT next_review FROM cards WHERE id = 2", [], |r| r.get(0))
            .unwrap();
        assert_eq!(unreadable, None);
    }
}
