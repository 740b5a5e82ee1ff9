//! Keyboard bindings for the study view.
//!
//! Key handlers are global for as long as they are bound, so bindings are
//! handed out as guards: dropping a [`KeyGuard`] unbinds it. The registry is
//! single-threaded, matching the event loop that delivers key presses.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::scheduler::Rating;
use super::session::{Phase, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Space,
    Enter,
    Char(char),
    Other,
}

/// A single key press as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    /// Auto-repeat from a held key.
    pub repeat: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self { key, repeat: false }
    }

    pub fn repeated(key: Key) -> Self {
        Self { key, repeat: true }
    }
}

/// What a bound key asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reveal,
    Rate(Rating),
}

/// Map a key press to a command for the given session state.
///
/// Space reveals on the question side and is ignored on repeat. Enter rates
/// on the answer side with the active rating context, falling back to
/// `Good` (the plain "next" advance of flip mode).
pub fn command_for(
    press: KeyPress,
    state: &SessionState,
    rating_context: Option<Rating>,
) -> Option<Command> {
    match (press.key, state.phase()) {
        (Key::Space, Phase::Question) if !press.repeat => Some(Command::Reveal),
        (Key::Enter, Phase::Answer) => Some(Command::Rate(rating_context.unwrap_or(Rating::Good))),
        _ => None,
    }
}

/// Set of currently bound keys.
#[derive(Debug, Clone, Default)]
pub struct KeyRegistry {
    bound: Rc<RefCell<Vec<(u64, Key)>>>,
    next_id: Rc<Cell<u64>>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` until the returned guard is dropped.
    #[must_use = "the binding is released as soon as the guard is dropped"]
    pub fn bind(&self, key: Key) -> KeyGuard {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.bound.borrow_mut().push((id, key));
        KeyGuard {
            id,
            key,
            bound: Rc::clone(&self.bound),
        }
    }

    pub fn is_bound(&self, key: Key) -> bool {
        self.bound.borrow().iter().any(|(_, k)| *k == key)
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.bound.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A live key binding. Unbinds on drop.
#[derive(Debug)]
pub struct KeyGuard {
    id: u64,
    key: Key,
    bound: Rc<RefCell<Vec<(u64, Key)>>>,
}

impl KeyGuard {
    pub fn key(&self) -> Key {
        self.key
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        self.bound.borrow_mut().retain(|(id, _)| *id != self.id);
    }
}
