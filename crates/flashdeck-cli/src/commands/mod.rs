pub mod card;
pub mod config;
pub mod deck;
pub mod preview;
pub mod stats;
pub mod study;
