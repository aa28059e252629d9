//! Flashcard decks and spaced repetition
//!
//! This module provides:
//! - Deck and card persistence with a recoverable deck index
//! - SM-2 family review scheduling
//! - Validated card payloads (flashcard, multiple choice, true/false)
//! - Dashboard statistics and template export

pub mod algorithm;
pub mod clock;
pub mod content;
pub mod dashboard;
pub mod export;
pub mod models;
pub mod storage;

pub use algorithm::{calculate_next_review, Rating, ReviewResult};
pub use clock::{Clock, FixedClock, SystemClock};
pub use content::CardPayload;
pub use dashboard::DashboardData;
pub use export::{export_deck, DeckExport, Template};
pub use models::*;
pub use storage::FlashcardStorage;
