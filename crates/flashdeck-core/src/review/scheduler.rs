//! Bucket-based interval scheduler.
//!
//! Every card sits in a bucket. A review moves it to a new bucket and sets
//! its next review to `now + 8h * 3^bucket * factor`, where the factor comes
//! from the confidence rating. `Again` drops the card back to bucket 0 with a
//! zero-length interval; every other rating promotes it by one bucket, `Hard`
//! included.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Base review interval: 8 hours.
pub const BASE_INTERVAL_MS: i64 = 8 * 60 * 60 * 1000;

/// Growth per bucket.
pub const BUCKET_BASE: f64 = 3.0;

const MS_PER_MINUTE: i64 = 60 * 1000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Self-reported recall quality for a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// All ratings in button order.
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    /// Interval scale factor applied on top of the bucket multiplier.
    pub fn scale_factor(self) -> f64 {
        match self {
            Rating::Again => 0.0,
            Rating::Hard => 0.75,
            Rating::Good => 1.0,
            Rating::Easy => 1.5,
        }
    }

    /// Confidence level 1-4 as shown on the rating buttons.
    pub fn level(self) -> u8 {
        match self {
            Rating::Again => 1,
            Rating::Hard => 2,
            Rating::Good => 3,
            Rating::Easy => 4,
        }
    }

    /// Map a confidence level 1-4 to a rating.
    ///
    /// # Errors
    /// Returns `ValidationError::InvalidRating` for anything outside 1-4.
    pub fn from_level(level: u8) -> Result<Self, ValidationError> {
        match level {
            1 => Ok(Rating::Again),
            2 => Ok(Rating::Hard),
            3 => Ok(Rating::Good),
            4 => Ok(Rating::Easy),
            other => Err(ValidationError::InvalidRating(other.to_string())),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Again => "Again",
            Rating::Hard => "Hard",
            Rating::Good => "Good",
            Rating::Easy => "Easy",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Rating {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(level) = trimmed.parse::<u8>() {
            return Rating::from_level(level);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "again" => Ok(Rating::Again),
            "hard" => Ok(Rating::Hard),
            "good" => Ok(Rating::Good),
            "easy" => Ok(Rating::Easy),
            _ => Err(ValidationError::InvalidRating(trimmed.to_string())),
        }
    }
}

/// Scheduler output for one rating decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextReview {
    pub new_bucket: u32,
    pub next_review: DateTime<Utc>,
}

/// Length of the interval a rating produces from `bucket`.
///
/// Saturates at the largest representable duration for very high buckets.
pub fn interval(bucket: u32, rating: Rating) -> Duration {
    let factor = rating.scale_factor();
    if factor == 0.0 {
        return Duration::zero();
    }
    // powi takes an i32; anything past i32::MAX is infinite anyway.
    let exponent = i32::try_from(bucket).unwrap_or(i32::MAX);
    let ms = BASE_INTERVAL_MS as f64 * BUCKET_BASE.powi(exponent) * factor;
    if !ms.is_finite() || ms >= Duration::MAX.num_milliseconds() as f64 {
        return Duration::MAX;
    }
    Duration::try_milliseconds(ms.round() as i64).unwrap_or(Duration::MAX)
}

/// Bucket a card moves to after `rating`.
pub fn next_bucket(bucket: u32, rating: Rating) -> u32 {
    match rating {
        Rating::Again => 0,
        Rating::Hard | Rating::Good | Rating::Easy => bucket.saturating_add(1),
    }
}

/// Compute the new bucket and next review time for a card.
pub fn schedule(bucket: u32, rating: Rating, now: DateTime<Utc>) -> NextReview {
    let next_review = now
        .checked_add_signed(interval(bucket, rating))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    NextReview {
        new_bucket: next_bucket(bucket, rating),
        next_review,
    }
}

/// Outcomes for every rating, in button order.
pub fn preview(bucket: u32, now: DateTime<Utc>) -> [(Rating, NextReview); 4] {
    Rating::ALL.map(|rating| (rating, schedule(bucket, rating, now)))
}

/// Format an interval for a rating button label.
///
/// Days are always shown when non-zero, hours only up to 4 days out, and
/// minutes only within the first 4 hours of a same-day interval.
pub fn format_interval(interval: Duration) -> String {
    let ms = interval.num_milliseconds().max(0);
    let days = ms / MS_PER_DAY;
    let hours = (ms % MS_PER_DAY) / MS_PER_HOUR;
    let rem_hour_ms = ms % MS_PER_HOUR;
    // Round half up.
    let minutes = (rem_hour_ms + MS_PER_MINUTE / 2) / MS_PER_MINUTE;

    let mut parts = Vec::with_capacity(3);
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 && days <= 4 {
        parts.push(format!("{hours}h"));
    }
    if days == 0 && hours <= 4 {
        parts.push(format!("{minutes}m"));
    }
    parts.join(" ")
}
