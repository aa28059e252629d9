//! Flashcard decks with spaced repetition scheduling.
//!
//! Decks are created from card payloads produced by an external generation
//! step, reviewed with four-level recall ratings, and summarized for a
//! progress dashboard. State lives in JSON files under a storage root chosen
//! by the caller.

pub mod config;
pub mod errors;
pub mod flashcards;
pub mod storage;

pub use config::StudyConfig;
pub use errors::{ErrorKind, Result, StudyError};
pub use flashcards::{CardPayload, FlashcardStorage, Rating};
