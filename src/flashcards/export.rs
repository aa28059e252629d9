//! Deck data for the flashcard and quiz display templates

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::models::{Card, Deck};
use crate::errors::{Result, StudyError};

/// Answer offered next to the card's back when it has no quiz options
const FALLBACK_OPTION: &str = "I don't know";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Flashcards,
    Quiz,
}

impl FromStr for Template {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "flashcards" => Ok(Template::Flashcards),
            "quiz" => Ok(Template::Quiz),
            other => Err(StudyError::validation(format!("unknown template: {}", other))),
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Template::Flashcards => f.write_str("flashcards"),
            Template::Quiz => f.write_str("quiz"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct: usize,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DeckExport {
    Flashcards { title: String, cards: Vec<Card> },
    Quiz { title: String, questions: Vec<QuizQuestion> },
}

pub fn export_deck(deck: &Deck, template: Template) -> DeckExport {
    match template {
        Template::Flashcards => DeckExport::Flashcards {
            title: deck.name.clone(),
            cards: deck.cards.clone(),
        },
        Template::Quiz => DeckExport::Quiz {
            title: deck.name.clone(),
            questions: deck.cards.iter().map(quiz_question).collect(),
        },
    }
}

fn quiz_question(card: &Card) -> QuizQuestion {
    match &card.quiz {
        Some(quiz) => QuizQuestion {
            question: card.front.clone(),
            options: quiz.options.clone(),
            correct: quiz.correct,
            explanation: quiz.explanation.clone().unwrap_or_default(),
        },
        None => QuizQuestion {
            question: card.front.clone(),
            options: vec![card.back.clone(), FALLBACK_OPTION.to_string()],
            correct: 0,
            explanation: String::new(),
        },
    }
}

impl DeckExport {
    /// Script snippet the display templates read their data from
    pub fn to_script(&self) -> Result<String> {
        Ok(match self {
            DeckExport::Flashcards { title, cards } => format!(
                "const DECK_TITLE = {};\nconst CARDS = {};",
                serde_json::to_string(title)?,
                serde_json::to_string(cards)?
            ),
            DeckExport::Quiz { title, questions } => format!(
                "const QUIZ_TITLE = {};\nconst QUESTIONS = {};",
                serde_json::to_string(title)?,
                serde_json::to_string(questions)?
            ),
        })
    }
}
