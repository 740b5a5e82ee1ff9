//! # Flashdeck Core Library
//!
//! Core logic for flashdeck, a bucket-based spaced-repetition flashcard
//! trainer. The CLI binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Scheduler**: Pure functions mapping a card's bucket and a rating to
//!   the next bucket and review time
//! - **Review session**: A state machine that walks decks card by card and
//!   only advances once a rating is persisted. Flip-mode face swaps are
//!   wall-clock based; the caller invokes `tick()` to apply them
//! - **Storage**: SQLite deck/card storage and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`ReviewSession`]: Study session state machine
//! - [`StudyView`]: Keyboard-driven owner of a session
//! - [`Database`]: Deck and card persistence
//! - [`Config`]: Application configuration management
//! - [`ReviewSource`], [`SettingsSource`], [`ReviewStore`]: Collaborator traits

pub mod deck;
pub mod error;
pub mod events;
pub mod review;
pub mod source;
pub mod stats;
pub mod storage;

pub use deck::{Card, Deck, ReviewSet, StudySelector};
pub use error::{ConfigError, CoreError, DatabaseError, FetchError, PersistError, ValidationError};
pub use events::Event;
pub use review::{
    format_interval, preview, schedule, Face, KeyPress, KeyRegistry, NextReview, Phase, Rating,
    ReviewSession, SessionState, StudyView, Visible,
};
pub use source::{RatingUpdate, ReviewSource, ReviewStore, SettingsSource, StudySettings};
pub use stats::{previous_reviews, upcoming_reviews};
pub use storage::{Config, Database, DeckSummary};
