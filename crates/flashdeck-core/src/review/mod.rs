mod keys;
mod scheduler;
mod session;
mod view;

pub use keys::{command_for, Command, Key, KeyGuard, KeyPress, KeyRegistry};
pub use scheduler::{
    format_interval, interval, next_bucket, preview, schedule, NextReview, Rating,
    BASE_INTERVAL_MS, BUCKET_BASE,
};
pub use session::{Face, FaceSwap, Phase, ReviewSession, SessionState, Visible};
pub use view::StudyView;
