//! The study view: a [`ReviewSession`] plus the resources that exist only
//! while it is on screen (key bindings, the pending face swap, the active
//! rating button).

use chrono::{DateTime, Utc};

use super::keys::{command_for, Command, Key, KeyGuard, KeyPress, KeyRegistry};
use super::scheduler::Rating;
use super::session::ReviewSession;
use crate::error::Result;
use crate::events::Event;
use crate::source::ReviewStore;

pub struct StudyView {
    session: ReviewSession,
    bindings: Vec<KeyGuard>,
    rating_context: Option<Rating>,
}

impl StudyView {
    /// Show `session` and bind Space and Enter in `registry`.
    pub fn open(session: ReviewSession, registry: &KeyRegistry) -> Self {
        let bindings = vec![registry.bind(Key::Space), registry.bind(Key::Enter)];
        tracing::debug!(session_id = %session.id(), "study view opened");
        Self {
            session,
            bindings,
            rating_context: None,
        }
    }

    pub fn session(&self) -> &ReviewSession {
        &self.session
    }

    pub fn is_open(&self) -> bool {
        !self.bindings.is_empty()
    }

    pub fn rating_context(&self) -> Option<Rating> {
        self.rating_context
    }

    /// Select which rating Enter submits; `None` submits `Good`.
    pub fn set_rating_context(&mut self, rating: Option<Rating>) {
        self.rating_context = rating;
    }

    pub fn set_flip_mode(&mut self, flip_mode: bool) {
        if self.is_open() {
            self.session.set_flip_mode(flip_mode);
        }
    }

    /// Handle a key press. Keys arriving after [`Self::close`] are ignored.
    ///
    /// # Errors
    /// Propagates a failed rating; the session keeps its position.
    pub fn handle_key<S>(&mut self, press: KeyPress, now: DateTime<Utc>, store: &mut S) -> Result<Vec<Event>>
    where
        S: ReviewStore + ?Sized,
    {
        if !self.bindings.iter().any(|b| b.key() == press.key) {
            return Ok(Vec::new());
        }
        match command_for(press, self.session.state(), self.rating_context) {
            Some(Command::Reveal) => Ok(self.session.reveal(now).into_iter().collect()),
            Some(Command::Rate(rating)) => self.rate(rating, now, store),
            None => Ok(Vec::new()),
        }
    }

    /// Reveal through a button or a click on the card.
    pub fn reveal(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.is_open() {
            return None;
        }
        self.session.reveal(now)
    }

    /// Rate through a button. Clears the rating context once the card moves
    /// on.
    ///
    /// # Errors
    /// Propagates a failed rating; the session keeps its position.
    pub fn rate<S>(&mut self, rating: Rating, now: DateTime<Utc>, store: &mut S) -> Result<Vec<Event>>
    where
        S: ReviewStore + ?Sized,
    {
        if !self.is_open() {
            return Ok(Vec::new());
        }
        let events = self.session.rate(rating, now, store)?;
        if !events.is_empty() {
            self.rating_context = None;
        }
        Ok(events)
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.is_open() {
            return None;
        }
        self.session.tick(now)
    }

    /// Unbind keys and cancel the pending face swap. Idempotent.
    pub fn close(&mut self) {
        if self.bindings.is_empty() {
            return;
        }
        self.bindings.clear();
        self.session.teardown();
        tracing::debug!(session_id = %self.session.id(), "study view closed");
    }
}

impl Drop for StudyView {
    fn drop(&mut self) {
        self.close();
    }
}
