//! Card payloads handed in by the content generation step
//!
//! Three shapes are accepted, tagged by `"type"`:
//!
//! ```json
//! {"front": "Term", "back": "Definition"}
//! {"type": "multipleChoice", "question": "...", "options": ["a", "b"], "correct": 0}
//! {"type": "trueFalse", "statement": "...", "answer": true}
//! ```
//!
//! An untagged object is a flashcard, which keeps plain `[{front, back}]`
//! files loadable.

use serde::{Deserialize, Deserializer, Serialize};

use super::models::QuizDetail;
use crate::errors::{Result, StudyError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FlashcardItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MultipleChoiceItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub question: String,
    pub options: Vec<String>,
    pub correct: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TrueFalseItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub statement: String,
    pub answer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CardPayload {
    Flashcard(FlashcardItem),
    MultipleChoice(MultipleChoiceItem),
    TrueFalse(TrueFalseItem),
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum TaggedPayload {
    Flashcard(FlashcardItem),
    MultipleChoice(MultipleChoiceItem),
    TrueFalse(TrueFalseItem),
}

impl<'de> Deserialize<'de> for CardPayload {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let value = serde_json::Value::deserialize(deserializer)?;
        if value.get("type").is_some() {
            let tagged: TaggedPayload = serde_json::from_value(value).map_err(D::Error::custom)?;
            Ok(match tagged {
                TaggedPayload::Flashcard(item) => CardPayload::Flashcard(item),
                TaggedPayload::MultipleChoice(item) => CardPayload::MultipleChoice(item),
                TaggedPayload::TrueFalse(item) => CardPayload::TrueFalse(item),
            })
        } else {
            serde_json::from_value(value)
                .map(CardPayload::Flashcard)
                .map_err(D::Error::custom)
        }
    }
}

/// A validated payload reduced to what a card stores
#[derive(Debug, Clone, PartialEq)]
pub struct CardParts {
    pub id: Option<String>,
    pub front: String,
    pub back: String,
    pub quiz: Option<QuizDetail>,
}

impl CardPayload {
    pub fn flashcard(front: impl Into<String>, back: impl Into<String>) -> Self {
        CardPayload::Flashcard(FlashcardItem {
            id: None,
            front: front.into(),
            back: back.into(),
        })
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            CardPayload::Flashcard(item) => item.id.as_deref(),
            CardPayload::MultipleChoice(item) => item.id.as_deref(),
            CardPayload::TrueFalse(item) => item.id.as_deref(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(id) = self.id() {
            require_text("id", id)?;
        }

        match self {
            CardPayload::Flashcard(item) => {
                require_text("front", &item.front)?;
                require_text("back", &item.back)
            }
            CardPayload::MultipleChoice(item) => {
                require_text("question", &item.question)?;
                if item.options.len() < 2 {
                    return Err(StudyError::validation(format!(
                        "multiple choice item needs at least 2 options, got {}",
                        item.options.len()
                    )));
                }
                for option in &item.options {
                    require_text("option", option)?;
                }
                if item.correct >= item.options.len() {
                    return Err(StudyError::validation(format!(
                        "correct index {} is out of range for {} options",
                        item.correct,
                        item.options.len()
                    )));
                }
                Ok(())
            }
            CardPayload::TrueFalse(item) => require_text("statement", &item.statement),
        }
    }

    /// Validate and convert into card content
    pub fn into_parts(self) -> Result<CardParts> {
        self.validate()?;

        Ok(match self {
            CardPayload::Flashcard(item) => CardParts {
                id: item.id,
                front: item.front,
                back: item.back,
                quiz: None,
            },
            CardPayload::MultipleChoice(item) => {
                let back = with_explanation(&item.options[item.correct], item.explanation.as_deref());
                CardParts {
                    id: item.id,
                    front: item.question,
                    back,
                    quiz: Some(QuizDetail {
                        options: item.options,
                        correct: item.correct,
                        explanation: item.explanation,
                    }),
                }
            }
            CardPayload::TrueFalse(item) => {
                let answer = if item.answer { "True" } else { "False" };
                CardParts {
                    id: item.id,
                    front: item.statement,
                    back: with_explanation(answer, item.explanation.as_deref()),
                    quiz: Some(QuizDetail {
                        options: vec!["True".to_string(), "False".to_string()],
                        correct: if item.answer { 0 } else { 1 },
                        explanation: item.explanation,
                    }),
                }
            }
        })
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(StudyError::validation(format!("{} must not be empty", field)))
    } else {
        Ok(())
    }
}

fn with_explanation(answer: &str, explanation: Option<&str>) -> String {
    match explanation.map(str::trim).filter(|e| !e.is_empty()) {
        Some(explanation) => format!("{}\n\n{}", answer, explanation),
        None => answer.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> CardPayload {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_untagged_object_is_flashcard() {
        let payload = parse(r#"{"front": "Mitochondria", "back": "Powerhouse of the cell"}"#);
        assert_eq!(payload, CardPayload::flashcard("Mitochondria", "Powerhouse of the cell"));
    }

    #[test]
    fn test_tagged_multiple_choice() {
        let payload = parse(
            r#"{"type": "multipleChoice", "question": "2 + 2?", "options": ["4", "5", "22"], "correct": 0, "explanation": "Arithmetic"}"#,
        );
        let parts = payload.into_parts().unwrap();

        assert_eq!(parts.front, "2 + 2?");
        assert_eq!(parts.back, "4\n\nArithmetic");
        let quiz = parts.quiz.unwrap();
        assert_eq!(quiz.options.len(), 3);
        assert_eq!(quiz.correct, 0);
    }

    #[test]
    fn test_true_false_item() {
        let parts = parse(r#"{"type": "trueFalse", "statement": "The sun is a star", "answer": true}"#)
            .into_parts()
            .unwrap();
        assert_eq!(parts.back, "True");
        assert_eq!(parts.quiz.unwrap().correct, 0);

        let parts = parse(r#"{"type": "trueFalse", "statement": "Bats are birds", "answer": false}"#)
            .into_parts()
            .unwrap();
        assert_eq!(parts.back, "False");
        assert_eq!(parts.quiz.unwrap().correct, 1);
    }

    #[test]
    fn test_malformed_shapes_rejected() {
        assert!(serde_json::from_str::<CardPayload>(r#"{"front": "only front"}"#).is_err());
        assert!(serde_json::from_str::<CardPayload>(r#"{"type": "essay", "prompt": "x"}"#).is_err());
        assert!(serde_json::from_str::<CardPayload>(r#"{"front": "a", "back": "b", "hint": "c"}"#).is_err());
        assert!(serde_json::from_str::<CardPayload>(r#"["front", "back"]"#).is_err());
    }

    #[test]
    fn test_validation_errors() {
        let blank = CardPayload::flashcard("  ", "back");
        assert!(matches!(blank.validate(), Err(StudyError::Validation(_))));

        let one_option = CardPayload::MultipleChoice(MultipleChoiceItem {
            id: None,
            question: "Q".into(),
            options: vec!["only".into()],
            correct: 0,
            explanation: None,
        });
        assert!(one_option.validate().is_err());

        let out_of_range = CardPayload::MultipleChoice(MultipleChoiceItem {
            id: None,
            question: "Q".into(),
            options: vec!["a".into(), "b".into()],
            correct: 2,
            explanation: None,
        });
        let err = out_of_range.into_parts().unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_payload_serializes_with_tag() {
        let value = serde_json::to_value(CardPayload::flashcard("f", "b")).unwrap();
        assert_eq!(value["type"], "flashcard");
        let back: CardPayload = serde_json::from_value(value).unwrap();
        assert_eq!(back, CardPayload::flashcard("f", "b"));
    }
}
