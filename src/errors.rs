//! Error types for the study store and scheduler

use thiserror::Error;

/// Broad classification of a [`StudyError`], for callers that translate
/// failures into user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input; nothing was changed
    Validation,
    /// Unknown deck or card id; nothing was changed
    NotFound,
    /// Underlying read or write failure
    Storage,
}

#[derive(Error, Debug)]
pub enum StudyError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Deck not found: {0}")]
    DeckNotFound(String),

    #[error("Card not found: {card_id} (deck {deck_id})")]
    CardNotFound { deck_id: String, card_id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt record {path}: {message}")]
    CorruptRecord { path: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data directory not found")]
    DataDirNotFound,
}

impl StudyError {
    pub fn validation(message: impl Into<String>) -> Self {
        StudyError::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StudyError::Validation(_) | StudyError::Config(_) => ErrorKind::Validation,
            StudyError::DeckNotFound(_) | StudyError::CardNotFound { .. } => ErrorKind::NotFound,
            StudyError::Io(_)
            | StudyError::Json(_)
            | StudyError::CorruptRecord { .. }
            | StudyError::DataDirNotFound => ErrorKind::Storage,
        }
    }
}

pub type Result<T> = std::result::Result<T, StudyError>;
