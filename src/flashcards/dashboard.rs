//! Progress summary for the study dashboard

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::models::{Card, Deck, StudyStats};

/// Consecutive successful reviews after which a card counts as mastered.
/// `reps` resets on "Again", so this also means no lapse since.
pub const DEFAULT_MASTERY_REPS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckBreakdown {
    pub id: String,
    pub name: String,
    pub source: String,
    pub card_count: usize,
    pub due: usize,
    pub new: usize,
    pub mastered: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub total_cards: usize,
    pub due_today: usize,
    pub new_cards: usize,
    pub mastered: usize,
    pub streak: u32,
    pub total_reviewed: u64,
    pub last_study_date: Option<NaiveDate>,
    pub decks: Vec<DeckBreakdown>,
    pub activity: BTreeMap<NaiveDate, u32>,
}

pub fn is_mastered(card: &Card, mastery_reps: u32) -> bool {
    card.reps >= mastery_reps
}

/// Aggregate `decks` (in index order) and the review counters.
pub fn build_dashboard(
    stats: &StudyStats,
    decks: &[Deck],
    today: NaiveDate,
    mastery_reps: u32,
) -> DashboardData {
    let breakdowns: Vec<DeckBreakdown> = decks
        .iter()
        .map(|deck| DeckBreakdown {
            id: deck.id.clone(),
            name: deck.name.clone(),
            source: deck.source.clone(),
            card_count: deck.cards.len(),
            due: deck.cards.iter().filter(|c| c.is_due(today)).count(),
            new: deck.cards.iter().filter(|c| c.is_new()).count(),
            mastered: deck
                .cards
                .iter()
                .filter(|c| is_mastered(c, mastery_reps))
                .count(),
        })
        .collect();

    DashboardData {
        total_cards: breakdowns.iter().map(|d| d.card_count).sum(),
        due_today: breakdowns.iter().map(|d| d.due).sum(),
        new_cards: breakdowns.iter().map(|d| d.new).sum(),
        mastered: breakdowns.iter().map(|d| d.mastered).sum(),
        streak: current_streak(stats, today),
        total_reviewed: stats.total_reviewed,
        last_study_date: stats.last_study_date,
        decks: breakdowns,
        activity: stats.activity.clone(),
    }
}

/// Consecutive study days ending today, or yesterday when nothing has been
/// reviewed yet today. Falls back to the stored counter when there is no
/// activity log.
pub fn current_streak(stats: &StudyStats, today: NaiveDate) -> u32 {
    let studied = |day: NaiveDate| stats.activity.get(&day).is_some_and(|&n| n > 0);

    if stats.activity.is_empty() {
        return match stats.last_study_date {
            Some(last) if (0..=1).contains(&(today - last).num_days()) => stats.streak,
            _ => 0,
        };
    }

    let mut check = if studied(today) {
        today
    } else {
        match previous_day(today) {
            Some(yesterday) if studied(yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    loop {
        streak += 1;
        match previous_day(check) {
            Some(day) if studied(day) => check = day,
            _ => break,
        }
    }
    streak
}

fn previous_day(day: NaiveDate) -> Option<NaiveDate> {
    day.checked_sub_days(Days::new(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stats_with_activity(days: &[NaiveDate]) -> StudyStats {
        let mut stats = StudyStats::default();
        for day in days {
            stats.record_review(*day);
        }
        stats
    }

    fn card(id: &str, due: NaiveDate, reps: u32, lapses: u32) -> Card {
        let mut card = Card::new(id.into(), "f".into(), "b".into(), due, Utc::now());
        card.reps = reps;
        card.lapses = lapses;
        if reps > 0 || lapses > 0 {
            card.last_review = Some(Utc::now());
        }
        card
    }

    #[test]
    fn test_streak_counts_back_from_today() {
        let stats = stats_with_activity(&[date(2026, 4, 1), date(2026, 4, 2), date(2026, 4, 3)]);
        assert_eq!(current_streak(&stats, date(2026, 4, 3)), 3);
    }

    #[test]
    fn test_streak_survives_until_end_of_today() {
        let stats = stats_with_activity(&[date(2026, 4, 1), date(2026, 4, 2)]);
        assert_eq!(current_streak(&stats, date(2026, 4, 3)), 2);
    }

    #[test]
    fn test_streak_broken_by_missed_day() {
        let stats = stats_with_activity(&[date(2026, 4, 1), date(2026, 4, 2)]);
        assert_eq!(current_streak(&stats, date(2026, 4, 4)), 0);

        let gap = stats_with_activity(&[date(2026, 4, 1), date(2026, 4, 3), date(2026, 4, 4)]);
        assert_eq!(current_streak(&gap, date(2026, 4, 4)), 2);
    }

    #[test]
    fn test_streak_without_activity_log() {
        let stats = StudyStats {
            streak: 6,
            last_study_date: Some(date(2026, 4, 9)),
            ..Default::default()
        };
        assert_eq!(current_streak(&stats, date(2026, 4, 10)), 6);
        assert_eq!(current_streak(&stats, date(2026, 4, 12)), 0);
        assert_eq!(current_streak(&StudyStats::default(), date(2026, 4, 12)), 0);
    }

    #[test]
    fn test_build_dashboard_counts() {
        let today = date(2026, 6, 10);
        let created = Utc::now();
        let deck = Deck {
            id: "chem-a1b2c3".into(),
            name: "Chemistry".into(),
            source: "pdf".into(),
            created,
            cards: vec![
                card("chem-a1b2c3-0", today, 0, 0),
                card("chem-a1b2c3-1", date(2026, 6, 1), 2, 1),
                card("chem-a1b2c3-2", date(2026, 7, 1), 5, 0),
                card("chem-a1b2c3-3", date(2026, 9, 1), 8, 3),
            ],
        };
        let empty = Deck {
            id: "empty-000000".into(),
            name: "Empty".into(),
            source: "manual".into(),
            created,
            cards: Vec::new(),
        };
        let stats = stats_with_activity(&[date(2026, 6, 9), date(2026, 6, 10)]);

        let data = build_dashboard(&stats, &[deck, empty], today, DEFAULT_MASTERY_REPS);

        assert_eq!(data.total_cards, 4);
        assert_eq!(data.due_today, 2);
        assert_eq!(data.new_cards, 1);
        assert_eq!(data.mastered, 2);
        assert_eq!(data.streak, 2);
        assert_eq!(data.total_reviewed, 2);
        assert_eq!(data.decks.len(), 2);
        assert_eq!(data.decks[0].source, "pdf");
        assert_eq!(data.decks[1].card_count, 0);
    }

    #[test]
    fn test_mastery_threshold_is_configurable() {
        let c = card("x-0", date(2026, 1, 1), 3, 0);
        assert!(!is_mastered(&c, DEFAULT_MASTERY_REPS));
        assert!(is_mastered(&c, 3));
    }
}
