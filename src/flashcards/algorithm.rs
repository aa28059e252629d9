//! SM-2 family review scheduling
//!
//! Four recall ratings drive every transition of a card's
//! `(interval, ease, reps, lapses, due)` state:
//! - Again (0): forgotten, review again tomorrow
//! - Hard (1): recalled with difficulty
//! - Good (2): recalled after some hesitation
//! - Easy (3): perfect recall
//!
//! The functions here are pure; the store applies and persists the result.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::models::Card;
use crate::errors::StudyError;

/// Ease assigned to new cards
pub const DEFAULT_EASE: f64 = 2.5;

/// Minimum ease after a decreasing transition
pub const MIN_EASE: f64 = 2.13;

/// Interval of the first successful review of a new card
const FIRST_INTERVAL: u32 = 1;

const HARD_MULTIPLIER: f64 = 1.2;
const EASY_BONUS: f64 = 1.3;

const AGAIN_EASE_PENALTY: f64 = 0.20;
const HARD_EASE_PENALTY: f64 = 0.15;
const EASY_EASE_BONUS: f64 = 0.15;

/// A recall rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rating {
    Again = 0,
    Hard = 1,
    Good = 2,
    Easy = 3,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    pub fn label(self) -> &'static str {
        match self {
            Rating::Again => "again",
            Rating::Hard => "hard",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<i32> for Rating {
    type Error = StudyError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rating::Again),
            1 => Ok(Rating::Hard),
            2 => Ok(Rating::Good),
            3 => Ok(Rating::Easy),
            other => Err(StudyError::validation(format!(
                "rating must be 0 (again), 1 (hard), 2 (good) or 3 (easy), got {}",
                other
            ))),
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = StudyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::try_from(i32::from(value))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating as u8
    }
}

/// Accepts either the number or the name, case-insensitive
impl FromStr for Rating {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<i32>() {
            return Rating::try_from(n);
        }
        Rating::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| StudyError::validation(format!("unknown rating: {}", s)))
    }
}

/// Scheduling state after a review
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewResult {
    pub interval: u32,
    pub ease: f64,
    pub reps: u32,
    pub lapses: u32,
    pub due: NaiveDate,
}

/// Compute the state `card` moves to when rated `rating` on `today`.
pub fn calculate_next_review(card: &Card, rating: Rating, today: NaiveDate) -> ReviewResult {
    let mut reps = card.reps;
    let mut lapses = card.lapses;
    let mut ease = card.ease;
    let interval;

    match rating {
        Rating::Again => {
            reps = 0;
            interval = 1;
            ease = (ease - AGAIN_EASE_PENALTY).max(MIN_EASE);
            lapses += 1;
        }
        Rating::Hard => {
            reps += 1;
            interval = grow(card.interval, HARD_MULTIPLIER);
            ease = (ease - HARD_EASE_PENALTY).max(MIN_EASE);
        }
        Rating::Good => {
            reps += 1;
            interval = if card.interval == 0 {
                FIRST_INTERVAL
            } else {
                grow(card.interval, ease)
            };
        }
        Rating::Easy => {
            reps += 1;
            interval = grow(card.interval, ease * EASY_BONUS);
            ease += EASY_EASE_BONUS;
        }
    }

    ReviewResult {
        interval,
        ease: round_ease(ease),
        reps,
        lapses,
        due: add_days(today, interval),
    }
}

/// `max(1, round(interval * factor))`, rounding half away from zero
fn grow(interval: u32, factor: f64) -> u32 {
    let next = (f64::from(interval) * factor).round();
    if next >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        (next as u32).max(1)
    }
}

/// Ease is kept to two decimals so repeated transitions don't drift
fn round_ease(ease: f64) -> f64 {
    (ease * 100.0).round() / 100.0
}

fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Interval each rating would give, in `Rating::ALL` order
pub fn preview_intervals(card: &Card, today: NaiveDate) -> [u32; 4] {
    Rating::ALL.map(|rating| calculate_next_review(card, rating, today).interval)
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: u32) -> String {
    if days == 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn new_card() -> Card {
        Card::new("deck-0".into(), "front".into(), "back".into(), today(), Utc::now())
    }

    fn apply(card: &mut Card, rating: Rating) -> ReviewResult {
        let result = calculate_next_review(card, rating, today());
        card.interval = result.interval;
        card.ease = result.ease;
        card.reps = result.reps;
        card.lapses = result.lapses;
        card.due = result.due;
        result
    }

    #[test]
    fn test_good_good_again_sequence() {
        let mut card = new_card();

        let first = apply(&mut card, Rating::Good);
        assert_eq!(first.reps, 1);
        assert_eq!(first.interval, 1);
        assert_eq!(first.ease, 2.5);
        assert_eq!(first.due, today() + Days::new(1));

        let second = apply(&mut card, Rating::Good);
        assert_eq!(second.reps, 2);
        assert_eq!(second.interval, 3);
        assert_eq!(second.due, today() + Days::new(3));

        let third = apply(&mut card, Rating::Again);
        assert_eq!(third.reps, 0);
        assert_eq!(third.interval, 1);
        assert_eq!(third.ease, 2.3);
        assert_eq!(third.lapses, 1);
        assert_eq!(third.due, today() + Days::new(1));
    }

    #[test]
    fn test_again_resets_any_state() {
        for (reps, interval) in [(0, 0), (1, 1), (7, 45), (30, 400)] {
            let mut card = new_card();
            card.reps = reps;
            card.interval = interval;
            card.lapses = 2;

            let result = calculate_next_review(&card, Rating::Again, today());
            assert_eq!(result.reps, 0);
            assert_eq!(result.interval, 1);
            assert_eq!(result.lapses, 3);
        }
    }

    #[test]
    fn test_ease_floor_under_repeated_again() {
        let mut card = new_card();
        let mut previous = card.ease;

        for _ in 0..20 {
            let result = apply(&mut card, Rating::Again);
            assert!(result.ease >= MIN_EASE);
            assert!(result.ease <= previous);
            previous = result.ease;
        }
        assert_eq!(card.ease, MIN_EASE);
        assert_eq!(card.lapses, 20);
    }

    #[test]
    fn test_hard_growth_and_penalty() {
        let mut card = new_card();
        card.reps = 3;
        card.interval = 10;

        let result = calculate_next_review(&card, Rating::Hard, today());
        assert_eq!(result.interval, 12);
        assert_eq!(result.ease, 2.35);
        assert_eq!(result.reps, 4);

        card.interval = 0;
        assert_eq!(calculate_next_review(&card, Rating::Hard, today()).interval, 1);

        card.ease = 2.2;
        assert_eq!(calculate_next_review(&card, Rating::Hard, today()).ease, MIN_EASE);
    }

    #[test]
    fn test_easy_growth_and_bonus() {
        let mut card = new_card();
        card.reps = 2;
        card.interval = 4;

        // round(4 * 2.5 * 1.3) = 13
        let result = calculate_next_review(&card, Rating::Easy, today());
        assert_eq!(result.interval, 13);
        assert_eq!(result.ease, 2.65);
        assert_eq!(result.due, today() + Days::new(13));
    }

    #[test]
    fn test_easy_never_shorter_than_good() {
        for interval in [0u32, 1, 2, 3, 6, 17, 90] {
            for ease in [MIN_EASE, 2.3, 2.5, 2.8, 3.4] {
                let mut card = new_card();
                card.reps = 1;
                card.interval = interval;
                card.ease = ease;

                let good = calculate_next_review(&card, Rating::Good, today()).interval;
                let easy = calculate_next_review(&card, Rating::Easy, today()).interval;
                assert!(easy >= good, "interval {} ease {}: easy {} < good {}", interval, ease, easy, good);
            }
        }
    }

    #[test]
    fn test_good_keeps_ease() {
        let mut card = new_card();
        card.interval = 5;
        card.ease = 2.13;
        let result = calculate_next_review(&card, Rating::Good, today());
        assert_eq!(result.ease, 2.13);
        assert_eq!(result.interval, 11);
    }

    #[test]
    fn test_rating_parsing() {
        assert_eq!(Rating::try_from(0).unwrap(), Rating::Again);
        assert_eq!(Rating::try_from(3).unwrap(), Rating::Easy);
        assert!(matches!(Rating::try_from(5), Err(StudyError::Validation(_))));
        assert!(matches!(Rating::try_from(-1), Err(StudyError::Validation(_))));

        assert_eq!("2".parse::<Rating>().unwrap(), Rating::Good);
        assert_eq!("Hard".parse::<Rating>().unwrap(), Rating::Hard);
        assert_eq!(" easy ".parse::<Rating>().unwrap(), Rating::Easy);
        assert!("meh".parse::<Rating>().is_err());
    }

    #[test]
    fn test_rating_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Rating::Good).unwrap(), "2");
        let rating: Rating = serde_json::from_str("0").unwrap();
        assert_eq!(rating, Rating::Again);
        assert!(serde_json::from_str::<Rating>("4").is_err());
    }

    #[test]
    fn test_preview_intervals() {
        let mut card = new_card();
        card.reps = 2;
        card.interval = 10;
        assert_eq!(preview_intervals(&card, today()), [1, 12, 25, 33]);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "now");
        assert_eq!(format_interval(1), "1d");
        assert_eq!(format_interval(5), "5d");
        assert_eq!(format_interval(7), "1w");
        assert_eq!(format_interval(14), "2w");
        assert_eq!(format_interval(30), "1mo");
        assert_eq!(format_interval(90), "3mo");
        assert_eq!(format_interval(365), "1y");
        assert_eq!(format_interval(730), "2y");
    }
}
