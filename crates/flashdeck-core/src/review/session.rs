//! Review session state machine.
//!
//! A session walks a [`ReviewSet`] one card at a time. Each card starts on
//! its question, is revealed, then rated. A rating is scheduled, handed to a
//! [`ReviewStore`], and only once the store confirms it does the session move
//! to the next card, the next non-empty deck, or the finished state.
//!
//! ## State Transitions
//!
//! ```text
//! Question --reveal--> Answer --rate (persisted)--> Question (next card)
//!                         |                     \--> Finished
//!                         \--rate (failed)--> Answer (same card)
//! ```
//!
//! Transitions that are not allowed in the current state are ignored and
//! leave the state untouched.
//!
//! In flip mode the card content swaps faces a short delay after the card
//! turns. The swap is wall-clock based: the caller invokes
//! [`ReviewSession::tick`] and the swap applies once its deadline has passed.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::scheduler::{self, Rating};
use crate::deck::{Card, Deck, ReviewSet, StudySelector};
use crate::error::{CoreError, FetchError, PersistError, Result};
use crate::events::Event;
use crate::source::{RatingUpdate, ReviewSource, ReviewStore, SettingsSource, StudySettings};

/// One side of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    Question,
    Answer,
}

/// What the card slot should display right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visible {
    Question,
    Answer,
    /// The card is turning back to its question side while the content
    /// still points at the answer; nothing is shown so the next card's
    /// answer is never exposed.
    Blank,
}

/// Coarse state derived from [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Question,
    Answer,
    Finished,
}

/// A face change waiting for its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceSwap {
    pub face: Face,
    pub due: DateTime<Utc>,
}

/// Observable session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub deck_index: usize,
    pub card_index: usize,
    /// Whether the answer is visible.
    pub revealed: bool,
    /// Orientation of the flip card.
    pub flipped: bool,
    /// Face the flip card content currently shows.
    pub shown_face: Face,
    #[serde(default)]
    pub face_swap: Option<FaceSwap>,
    /// A rating was handed to the store and its result is outstanding.
    pub awaiting_persist: bool,
    pub finished: bool,
    /// The review set had no cards at all.
    pub nothing_to_study: bool,
    pub flip_mode: bool,
    /// Ratings confirmed by the store.
    pub reviewed: usize,
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        if self.finished {
            Phase::Finished
        } else if self.revealed {
            Phase::Answer
        } else {
            Phase::Question
        }
    }
}

#[derive(Debug, Clone)]
struct InFlight {
    rating: Rating,
    update: RatingUpdate,
}

/// Drives one study session.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    id: Uuid,
    review_set: ReviewSet,
    state: SessionState,
    face_swap_delay: Duration,
    in_flight: Option<InFlight>,
}

impl ReviewSession {
    /// Create a session over `review_set`.
    ///
    /// Empty decks are skipped. A set without any cards starts finished,
    /// with `nothing_to_study` set.
    pub fn new(review_set: ReviewSet, settings: StudySettings) -> Self {
        let delay_ms = i64::try_from(settings.face_swap_delay_ms).unwrap_or(i64::MAX);
        let mut session = Self {
            id: Uuid::new_v4(),
            review_set,
            state: SessionState {
                deck_index: 0,
                card_index: 0,
                revealed: false,
                flipped: false,
                shown_face: Face::Question,
                face_swap: None,
                awaiting_persist: false,
                finished: false,
                nothing_to_study: false,
                flip_mode: settings.flip_mode,
                reviewed: 0,
            },
            face_swap_delay: Duration::try_milliseconds(delay_ms).unwrap_or(Duration::MAX),
            in_flight: None,
        };
        match session.first_non_empty_deck(0) {
            Some(deck_index) => session.state.deck_index = deck_index,
            None => {
                session.state.finished = true;
                session.state.nothing_to_study = true;
            }
        }
        tracing::info!(
            session_id = %session.id,
            decks = session.review_set.decks.len(),
            cards = session.review_set.total_cards(),
            flip_mode = settings.flip_mode,
            "review session created"
        );
        session
    }

    /// Fetch settings and the review set, then create a session.
    ///
    /// # Errors
    /// Returns the collaborator's `FetchError` if either fetch fails; no
    /// session exists in that case.
    pub fn start<R, S>(
        source: &R,
        settings: &S,
        selector: &StudySelector,
    ) -> Result<Self, FetchError>
    where
        R: ReviewSource + ?Sized,
        S: SettingsSource + ?Sized,
    {
        let settings = settings.fetch_settings()?;
        let review_set = source.fetch_review_set(selector)?;
        Ok(Self::new(review_set, settings))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn is_finished(&self) -> bool {
        self.state.finished
    }

    pub fn review_set(&self) -> &ReviewSet {
        &self.review_set
    }

    pub fn current_deck(&self) -> Option<&Deck> {
        if self.state.finished {
            return None;
        }
        self.review_set.decks.get(self.state.deck_index)
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.current_deck()?.cards.get(self.state.card_index)
    }

    /// Cards left to rate, the current one included.
    pub fn remaining(&self) -> usize {
        if self.state.finished {
            return 0;
        }
        let in_current = self
            .review_set
            .decks
            .get(self.state.deck_index)
            .map(|d| d.cards.len().saturating_sub(self.state.card_index))
            .unwrap_or(0);
        let after: usize = self
            .review_set
            .decks
            .iter()
            .skip(self.state.deck_index + 1)
            .map(|d| d.cards.len())
            .sum();
        in_current + after
    }

    /// Content for the card slot.
    ///
    /// In flip mode this follows the delayed face; otherwise the answer is
    /// visible exactly when revealed.
    pub fn visible(&self) -> Visible {
        if !self.state.flip_mode {
            return if self.state.revealed {
                Visible::Answer
            } else {
                Visible::Question
            };
        }
        match (self.state.flipped, self.state.shown_face) {
            (_, Face::Question) => Visible::Question,
            (true, Face::Answer) => Visible::Answer,
            (false, Face::Answer) => Visible::Blank,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, at: DateTime<Utc>) -> Event {
        Event::StateSnapshot {
            session_id: self.id,
            state: self.state.clone(),
            deck_name: self.current_deck().map(|d| d.name.clone()),
            card_id: self.current_card().map(|c| c.id),
            remaining: self.remaining(),
            at,
        }
    }

    /// Event announcing the session to presenters and logs.
    pub fn started(&self, at: DateTime<Utc>) -> Event {
        Event::SessionStarted {
            session_id: self.id,
            deck_count: self.review_set.decks.len(),
            card_count: self.review_set.total_cards(),
            flip_mode: self.state.flip_mode,
            at,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Show the answer of the current card.
    pub fn reveal(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state.finished || self.state.revealed || self.state.awaiting_persist {
            return None;
        }
        let card_id = self.current_card()?.id;
        self.state.revealed = true;
        if self.state.flip_mode {
            self.state.flipped = true;
            self.schedule_face_swap(Face::Answer, now);
        } else {
            self.state.shown_face = Face::Answer;
        }
        tracing::debug!(
            deck_index = self.state.deck_index,
            card_index = self.state.card_index,
            card_id,
            "answer revealed"
        );
        Some(Event::AnswerRevealed {
            deck_index: self.state.deck_index,
            card_index: self.state.card_index,
            card_id,
            at: now,
        })
    }

    /// Schedule the current card and mark the session as waiting for the
    /// store.
    ///
    /// Returns the update the caller must persist, or `None` when rating is
    /// not allowed right now (question side, finished, or another rating
    /// still outstanding). Resolve it with [`Self::complete_rating`].
    pub fn begin_rating(&mut self, rating: Rating, now: DateTime<Utc>) -> Option<RatingUpdate> {
        if self.state.finished || !self.state.revealed || self.in_flight.is_some() {
            return None;
        }
        let card = self.current_card()?;
        let next = scheduler::schedule(card.bucket, rating, now);
        let update = RatingUpdate {
            card_id: card.id,
            new_bucket: next.new_bucket,
            next_review: next.next_review,
            reviewed_at: now,
        };
        self.in_flight = Some(InFlight { rating, update });
        self.state.awaiting_persist = true;
        Some(update)
    }

    /// Resolve the outstanding rating with the store's result.
    ///
    /// On success the session advances and the returned events describe the
    /// move. On failure the position is kept, the card stays revealed, and
    /// the error is returned so the user can rate again.
    ///
    /// # Errors
    /// Returns `CoreError::Persist` when `result` is a failure.
    pub fn complete_rating(
        &mut self,
        result: Result<(), PersistError>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Event>> {
        let Some(InFlight { rating, update }) = self.in_flight.take() else {
            return Ok(Vec::new());
        };
        self.state.awaiting_persist = false;

        if let Err(err) = result {
            tracing::warn!(card_id = update.card_id, %rating, error = %err, "rating not saved");
            return Err(CoreError::Persist(err));
        }

        tracing::debug!(
            card_id = update.card_id,
            %rating,
            new_bucket = update.new_bucket,
            next_review = %update.next_review,
            "rating saved"
        );
        self.state.reviewed += 1;
        let mut events = vec![Event::CardRated {
            card_id: update.card_id,
            rating,
            new_bucket: update.new_bucket,
            next_review: update.next_review,
            at: now,
        }];
        events.extend(self.advance(now));
        Ok(events)
    }

    /// Rate the current card and persist the result through `store`.
    ///
    /// Returns no events when rating is not allowed in the current state.
    ///
    /// # Errors
    /// Returns `CoreError::Persist` when the store rejects the update; the
    /// session keeps its position.
    pub fn rate<S>(&mut self, rating: Rating, now: DateTime<Utc>, store: &mut S) -> Result<Vec<Event>>
    where
        S: ReviewStore + ?Sized,
    {
        let Some(update) = self.begin_rating(rating, now) else {
            return Ok(Vec::new());
        };
        let result = store.persist_rating(&update);
        self.complete_rating(result, now)
    }

    /// Apply a due face swap. Call periodically while the session is shown.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let swap = self.state.face_swap?;
        if now < swap.due {
            return None;
        }
        self.state.face_swap = None;
        self.state.shown_face = swap.face;
        Some(Event::FaceSwapped {
            face: swap.face,
            at: now,
        })
    }

    /// Switch between flip and stacked presentation.
    ///
    /// The card keeps its revealed state; any pending swap is settled
    /// immediately.
    pub fn set_flip_mode(&mut self, flip_mode: bool) {
        if self.state.flip_mode == flip_mode {
            return;
        }
        self.state.flip_mode = flip_mode;
        self.state.face_swap = None;
        self.state.flipped = flip_mode && self.state.revealed;
        self.state.shown_face = if self.state.revealed {
            Face::Answer
        } else {
            Face::Question
        };
    }

    /// Drop any pending face swap. Called when the view goes away so no
    /// timer fires into a session nobody shows.
    pub fn teardown(&mut self) {
        if self.state.face_swap.take().is_some() {
            tracing::debug!(session_id = %self.id, "pending face swap cancelled");
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn schedule_face_swap(&mut self, face: Face, now: DateTime<Utc>) {
        let due = now
            .checked_add_signed(self.face_swap_delay)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.state.face_swap = Some(FaceSwap { face, due });
    }

    fn first_non_empty_deck(&self, from: usize) -> Option<usize> {
        (from..self.review_set.decks.len()).find(|&i| !self.review_set.decks[i].cards.is_empty())
    }

    fn advance(&mut self, now: DateTime<Utc>) -> Option<Event> {
        self.state.revealed = false;
        let deck_len = self
            .review_set
            .decks
            .get(self.state.deck_index)
            .map(|d| d.cards.len())
            .unwrap_or(0);

        if self.state.card_index + 1 < deck_len {
            self.state.card_index += 1;
            self.turn_to_question(now);
            return None;
        }

        match self.first_non_empty_deck(self.state.deck_index + 1) {
            Some(deck_index) => {
                self.state.deck_index = deck_index;
                self.state.card_index = 0;
                self.turn_to_question(now);
                let deck = &self.review_set.decks[deck_index];
                tracing::debug!(deck_index, deck_id = deck.id, "deck advanced");
                Some(Event::DeckAdvanced {
                    deck_index,
                    deck_id: deck.id,
                    deck_name: deck.name.clone(),
                    at: now,
                })
            }
            None => {
                self.state.finished = true;
                self.state.flipped = false;
                self.state.face_swap = None;
                self.state.shown_face = Face::Question;
                tracing::info!(
                    session_id = %self.id,
                    reviewed = self.state.reviewed,
                    "review session finished"
                );
                Some(Event::SessionFinished {
                    session_id: self.id,
                    reviewed: self.state.reviewed,
                    at: now,
                })
            }
        }
    }

    fn turn_to_question(&mut self, now: DateTime<Utc>) {
        if self.state.flip_mode {
            self.state.flipped = false;
            self.schedule_face_swap(Face::Question, now);
        } else {
            self.state.shown_face = Face::Question;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Recorder {
        updates: Vec<RatingUpdate>,
        fail_on: Option<i64>,
    }

    impl Recorder {
        fn new() -> Self {
            Self { updates: Vec::new(), fail_on: None }
        }
    }

    impl ReviewStore for Recorder {
        fn persist_rating(&mut self, update: &RatingUpdate) -> Result<(), PersistError> {
            if self.fail_on == Some(update.card_id) {
                return Err(PersistError::new(update.card_id, "unavailable"));
            }
            self.updates.push(*update);
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn card(id: i64, bucket: u32) -> Card {
        Card {
            id,
            bucket,
            question: format!("q{id}"),
            answer: format!("a{id}"),
            next_review: None,
            last_reviewed: None,
        }
    }

    fn set(sizes: &[usize]) -> ReviewSet {
        let mut next_id = 1;
        let decks = sizes
            .iter()
            .enumerate()
            .map(|(i, &n)| Deck {
                id: i as i64 + 1,
                name: format!("deck {}", i + 1),
                cards: (0..n)
                    .map(|_| {
                        next_id += 1;
                        card(next_id - 1, 0)
                    })
                    .collect(),
            })
            .collect();
        ReviewSet::new(decks)
    }

    fn stacked() -> StudySettings {
        StudySettings { flip_mode: false, ..StudySettings::default() }
    }

    #[test]
    fn starts_on_first_question() {
        let session = ReviewSession::new(set(&[2]), stacked());
        assert_eq!(session.phase(), Phase::Question);
        assert_eq!(session.current_card().unwrap().id, 1);
        assert_eq!(session.remaining(), 2);
    }

    #[test]
    fn reveal_twice_is_a_noop() {
        let mut session = ReviewSession::new(set(&[1]), stacked());
        assert!(session.reveal(now()).is_some());
        let before = session.state().clone();
        assert!(session.reveal(now()).is_none());
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn rate_before_reveal_changes_nothing() {
        let mut session = ReviewSession::new(set(&[2]), stacked());
        let mut store = Recorder::new();
        let before = session.state().clone();
        let events = session.rate(Rating::Good, now(), &mut store).unwrap();
        assert!(events.is_empty());
        assert_eq!(session.state(), &before);
        assert!(store.updates.is_empty());
    }

    #[test]
    fn walks_cards_then_decks_then_finishes() {
        let mut session = ReviewSession::new(set(&[2, 1]), stacked());
        let mut store = Recorder::new();
        let mut visited = Vec::new();
        while !session.is_finished() {
            visited.push((session.state().deck_index, session.state().card_index));
            session.reveal(now());
            session.rate(Rating::Good, now(), &mut store).unwrap();
        }
        assert_eq!(visited, vec![(0, 0), (0, 1), (1, 0)]);
        assert_eq!(store.updates.len(), 3);
        assert_eq!(session.state().reviewed, 3);
        assert!(!session.state().nothing_to_study);
    }

    #[test]
    fn deck_advance_and_finish_emit_events() {
        let mut session = ReviewSession::new(set(&[1, 1]), stacked());
        let mut store = Recorder::new();
        session.reveal(now());
        let events = session.rate(Rating::Easy, now(), &mut store).unwrap();
        assert!(matches!(events[0], Event::CardRated { card_id: 1, rating: Rating::Easy, .. }));
        assert!(matches!(events[1], Event::DeckAdvanced { deck_index: 1, deck_id: 2, .. }));

        session.reveal(now());
        let events = session.rate(Rating::Good, now(), &mut store).unwrap();
        assert!(matches!(events[1], Event::SessionFinished { reviewed: 2, .. }));
    }

    #[test]
    fn failed_persist_holds_position() {
        let mut session = ReviewSession::new(set(&[2, 1]), stacked());
        let mut store = Recorder::new();
        store.fail_on = Some(2);

        session.reveal(now());
        session.rate(Rating::Good, now(), &mut store).unwrap();
        session.reveal(now());
        let err = session.rate(Rating::Good, now(), &mut store).unwrap_err();
        assert!(matches!(err, CoreError::Persist(ref e) if e.card_id == 2));

        let state = session.state();
        assert_eq!((state.deck_index, state.card_index), (0, 1));
        assert!(state.revealed);
        assert!(!state.awaiting_persist);

        store.fail_on = None;
        session.rate(Rating::Hard, now(), &mut store).unwrap();
        assert_eq!((session.state().deck_index, session.state().card_index), (1, 0));
    }

    #[test]
    fn single_card_again_persists_reset_and_finishes() {
        let mut session = ReviewSession::new(set(&[1]), stacked());
        let mut store = Recorder::new();
        session.reveal(now());
        session.rate(Rating::Again, now(), &mut store).unwrap();
        assert_eq!(store.updates.len(), 1);
        assert_eq!(store.updates[0].new_bucket, 0);
        assert_eq!(store.updates[0].next_review, now());
        assert!(session.is_finished());
    }

    #[test]
    fn empty_review_set_starts_finished() {
        let mut session = ReviewSession::new(ReviewSet::default(), stacked());
        assert!(session.state().finished);
        assert!(session.state().nothing_to_study);
        assert!(session.reveal(now()).is_none());
        assert!(session.current_card().is_none());
        assert_eq!(session.remaining(), 0);
    }

    #[test]
    fn empty_decks_are_skipped() {
        let mut session = ReviewSession::new(set(&[0, 1, 0, 1]), stacked());
        let mut store = Recorder::new();
        assert_eq!(session.state().deck_index, 1);
        session.reveal(now());
        session.rate(Rating::Good, now(), &mut store).unwrap();
        assert_eq!(session.state().deck_index, 3);
        session.reveal(now());
        session.rate(Rating::Good, now(), &mut store).unwrap();
        assert!(session.is_finished());

        let only_empty = ReviewSession::new(set(&[0, 0]), stacked());
        assert!(only_empty.state().nothing_to_study);
    }

    #[test]
    fn second_rating_waits_for_the_first() {
        let mut session = ReviewSession::new(set(&[2]), stacked());
        session.reveal(now());
        let update = session.begin_rating(Rating::Good, now()).unwrap();
        assert_eq!(update.card_id, 1);
        assert!(session.state().awaiting_persist);

        assert!(session.begin_rating(Rating::Easy, now()).is_none());
        let mut store = Recorder::new();
        assert!(session.rate(Rating::Easy, now(), &mut store).unwrap().is_empty());
        assert!(store.updates.is_empty());

        session.complete_rating(Ok(()), now()).unwrap();
        assert_eq!(session.state().card_index, 1);
        assert!(!session.state().revealed);
    }

    #[test]
    fn complete_without_pending_rating_is_ignored() {
        let mut session = ReviewSession::new(set(&[1]), stacked());
        let before = session.state().clone();
        assert!(session.complete_rating(Ok(()), now()).unwrap().is_empty());
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn finished_session_ignores_everything() {
        let mut session = ReviewSession::new(set(&[1]), stacked());
        let mut store = Recorder::new();
        session.reveal(now());
        session.rate(Rating::Good, now(), &mut store).unwrap();
        let before = session.state().clone();
        assert!(session.reveal(now()).is_none());
        assert!(session.rate(Rating::Good, now(), &mut store).unwrap().is_empty());
        assert_eq!(session.state(), &before);
        assert_eq!(store.updates.len(), 1);
    }

    #[test]
    fn flip_mode_swaps_face_after_delay() {
        let mut session = ReviewSession::new(set(&[2]), StudySettings::default());
        session.reveal(now());
        assert!(session.state().flipped);
        assert_eq!(session.visible(), Visible::Question);

        assert!(session.tick(now() + Duration::milliseconds(149)).is_none());
        assert_eq!(session.state().shown_face, Face::Question);

        let event = session.tick(now() + Duration::milliseconds(150)).unwrap();
        assert!(matches!(event, Event::FaceSwapped { face: Face::Answer, .. }));
        assert_eq!(session.visible(), Visible::Answer);
    }

    #[test]
    fn flip_mode_hides_next_answer_while_turning_back() {
        let mut session = ReviewSession::new(set(&[2]), StudySettings::default());
        let mut store = Recorder::new();
        session.reveal(now());
        session.tick(now() + Duration::seconds(1));

        let rated_at = now() + Duration::seconds(2);
        session.rate(Rating::Good, rated_at, &mut store).unwrap();
        assert!(!session.state().flipped);
        assert_eq!(session.state().shown_face, Face::Answer);
        assert_eq!(session.visible(), Visible::Blank);

        session.tick(rated_at + Duration::milliseconds(150));
        assert_eq!(session.visible(), Visible::Question);
    }

    #[test]
    fn teardown_cancels_pending_swap() {
        let mut session = ReviewSession::new(set(&[1]), StudySettings::default());
        session.reveal(now());
        session.teardown();
        assert!(session.state().face_swap.is_none());
        assert!(session.tick(now() + Duration::seconds(5)).is_none());
        assert_eq!(session.state().shown_face, Face::Question);
    }

    #[test]
    fn switching_to_stacked_settles_faces() {
        let mut session = ReviewSession::new(set(&[1]), StudySettings::default());
        session.reveal(now());
        session.set_flip_mode(false);
        assert!(!session.state().flipped);
        assert!(session.state().face_swap.is_none());
        assert_eq!(session.visible(), Visible::Answer);

        session.set_flip_mode(true);
        assert!(session.state().flipped);
        assert_eq!(session.visible(), Visible::Answer);
    }

    #[test]
    fn start_propagates_fetch_errors() {
        struct Down;
        impl ReviewSource for Down {
            fn fetch_review_set(&self, _: &StudySelector) -> Result<ReviewSet, FetchError> {
                Err(FetchError::new(503, "Service unavailable"))
            }
        }
        let err = ReviewSession::start(&Down, &StudySettings::default(), &StudySelector::default())
            .unwrap_err();
        assert_eq!(err.status, 503);
    }

    #[test]
    fn snapshot_reports_current_card() {
        let session = ReviewSession::new(set(&[2]), stacked());
        match session.snapshot(now()) {
            Event::StateSnapshot { card_id, deck_name, remaining, state, .. } => {
                assert_eq!(card_id, Some(1));
                assert_eq!(deck_name.as_deref(), Some("deck 1"));
                assert_eq!(remaining, 2);
                assert_eq!(state.phase(), Phase::Question);
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
