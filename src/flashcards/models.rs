//! Data models for decks, cards and the deck index

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::algorithm::{Rating, DEFAULT_EASE};

/// Multiple-choice detail kept on cards created from quiz items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDetail {
    pub options: Vec<String>,
    /// Index into `options`
    pub correct: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// A flashcard together with its spaced repetition state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub front: String,
    pub back: String,
    /// Days until the next review
    #[serde(default)]
    pub interval: u32,
    #[serde(default = "default_ease")]
    pub ease: f64,
    /// First day on which the card should be reviewed
    #[serde(deserialize_with = "legacy::deserialize_due")]
    pub due: NaiveDate,
    /// Successful reviews since the last lapse
    #[serde(default)]
    pub reps: u32,
    /// Lifetime count of "Again" ratings
    #[serde(default)]
    pub lapses: u32,
    #[serde(
        default,
        deserialize_with = "legacy::deserialize_opt_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "legacy::deserialize_opt_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_review: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_rating: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizDetail>,
}

fn default_ease() -> f64 {
    DEFAULT_EASE
}

impl Card {
    pub fn new(id: String, front: String, back: String, today: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            id,
            front,
            back,
            interval: 0,
            ease: DEFAULT_EASE,
            due: today,
            reps: 0,
            lapses: 0,
            created: Some(now),
            last_review: None,
            last_rating: None,
            quiz: None,
        }
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        today >= self.due
    }

    /// Never reviewed
    pub fn is_new(&self) -> bool {
        self.last_review.is_none() && self.reps == 0 && self.lapses == 0
    }
}

/// A named, ordered collection of cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: String,
    pub name: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(deserialize_with = "legacy::deserialize_datetime")]
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

pub(crate) fn default_source() -> String {
    "manual".to_string()
}

impl Deck {
    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    pub fn card_mut(&mut self, card_id: &str) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == card_id)
    }

    pub fn summary(&self) -> DeckSummary {
        DeckSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            source: self.source.clone(),
            created: self.created,
            card_count: self.cards.len(),
        }
    }
}

/// Index entry for a deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSummary {
    pub id: String,
    pub name: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(deserialize_with = "legacy::deserialize_datetime")]
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub card_count: usize,
}

/// Review counters kept alongside the deck index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStats {
    #[serde(default, alias = "totalReviews")]
    pub total_reviewed: u64,
    /// Consecutive study days ending on `last_study_date`
    #[serde(default)]
    pub streak: u32,
    #[serde(
        default,
        alias = "lastStudy",
        deserialize_with = "legacy::deserialize_opt_date"
    )]
    pub last_study_date: Option<NaiveDate>,
    /// Reviews per study day
    #[serde(default)]
    pub activity: BTreeMap<NaiveDate, u32>,
}

impl StudyStats {
    /// Count one review made on `today`
    pub fn record_review(&mut self, today: NaiveDate) {
        self.total_reviewed += 1;
        *self.activity.entry(today).or_insert(0) += 1;

        // A clock that moved backwards keeps the later study day
        self.streak = match self.last_study_date {
            Some(last) => match (today - last).num_days() {
                d if d <= 0 => self.streak.max(1),
                1 => self.streak + 1,
                _ => 1,
            },
            None => 1,
        };
        self.last_study_date = self.last_study_date.max(Some(today));
    }
}

/// The `decks.json` record: deck summaries in creation order plus counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    #[serde(default)]
    pub decks: Vec<DeckSummary>,
    #[serde(default)]
    pub stats: StudyStats,
}

impl Index {
    pub fn get(&self, deck_id: &str) -> Option<&DeckSummary> {
        self.decks.iter().find(|d| d.id == deck_id)
    }

    pub fn contains(&self, deck_id: &str) -> bool {
        self.get(deck_id).is_some()
    }

    /// Replace the entry for `summary.id` in place, or append it
    pub fn upsert(&mut self, summary: DeckSummary) {
        match self.decks.iter_mut().find(|d| d.id == summary.id) {
            Some(existing) => *existing = summary,
            None => self.decks.push(summary),
        }
    }

    pub fn remove(&mut self, deck_id: &str) -> bool {
        let before = self.decks.len();
        self.decks.retain(|d| d.id != deck_id);
        self.decks.len() != before
    }
}

/// A due card along with the deck it belongs to
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueCard {
    pub deck_id: String,
    pub deck_name: String,
    /// Position of the card within its deck
    pub position: usize,
    pub card: Card,
}

/// Readers for the timestamp shapes found in older study data: RFC 3339,
/// naive local ISO datetimes, plain dates, and `null` for "due any time".
mod legacy {
    use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .or_else(|| Some(naive.and_utc()));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub fn parse_date(s: &str) -> Option<NaiveDate> {
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(date);
        }
        parse_datetime(s).map(|dt| dt.with_timezone(&Local).date_naive())
    }

    pub fn deserialize_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_datetime(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub fn deserialize_opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse_datetime(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", raw))),
            None => Ok(None),
        }
    }

    pub fn deserialize_opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse_date(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date: {}", raw))),
            None => Ok(None),
        }
    }

    /// `null` means the card was never scheduled and is due immediately.
    pub fn deserialize_due<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(deserialize_opt_date(deserializer)?.unwrap_or_else(never_scheduled))
    }

    pub fn never_scheduled() -> NaiveDate {
        NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN)
    }
}
