//! Review forecast and history.
//!
//! Both views bucket cards into 31 day slots, slot 0 being today. Cards
//! that fall outside the window, or that lack the relevant timestamp, are
//! not counted.

use chrono::{DateTime, Utc};

use crate::deck::Card;

/// Number of day slots (today plus the next or previous 30 days).
pub const STATS_DAYS: usize = 31;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Cards coming up for review, by day from `now`.
///
/// A card due in 1 ms lands in slot 1; an overdue card within the last day
/// lands in slot 0.
pub fn upcoming_reviews<'a, I>(cards: I, now: DateTime<Utc>) -> [u32; STATS_DAYS]
where
    I: IntoIterator<Item = &'a Card>,
{
    let mut days = [0u32; STATS_DAYS];
    for card in cards {
        let Some(next) = card.next_review else {
            continue;
        };
        let ms = (next - now).num_milliseconds();
        // ceil(ms / DAY_MS)
        let day = -(-ms).div_euclid(DAY_MS);
        bump(&mut days, day);
    }
    days
}

/// Cards reviewed in the past, by whole days elapsed since their last review.
pub fn previous_reviews<'a, I>(cards: I, now: DateTime<Utc>) -> [u32; STATS_DAYS]
where
    I: IntoIterator<Item = &'a Card>,
{
    let mut days = [0u32; STATS_DAYS];
    for card in cards {
        let Some(last) = card.last_reviewed else {
            continue;
        };
        let day = (now - last).num_milliseconds().div_euclid(DAY_MS);
        bump(&mut days, day);
    }
    days
}

fn bump(days: &mut [u32; STATS_DAYS], day: i64) {
    if let Some(slot) = usize::try_from(day).ok().and_then(|d| days.get_mut(d)) {
        *slot += 1;
    }
}
