use study_buddy_lib::flashcards::algorithm::{format_interval, preview_intervals};
use study_buddy_lib::flashcards::{Card, Rating};

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in `color` when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Single-line version of card text, cut at `max` characters
pub fn one_line(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}

/// Scheduling state of a card, e.g. "new" or "due 2026-10-20, every 6d, ease 2.50"
pub fn card_status(card: &Card, today: chrono::NaiveDate, use_color: bool) -> String {
    if card.is_new() {
        return paint("new", Color::CYAN, use_color);
    }
    let due = if card.is_due(today) {
        paint(&format!("due {}", card.due), Color::YELLOW, use_color)
    } else {
        format!("due {}", card.due)
    };
    let mut status = format!(
        "{}, every {}, ease {:.2}",
        due,
        format_interval(card.interval),
        card.ease
    );
    if card.lapses > 0 {
        status.push_str(&format!(", {} lapses", card.lapses));
    }
    status
}

/// Next interval for each rating, e.g. "again 1d · hard 2d · good 5d · easy 1w"
pub fn rating_preview(card: &Card, today: chrono::NaiveDate, use_color: bool) -> String {
    let intervals = preview_intervals(card, today);
    Rating::ALL
        .iter()
        .zip(intervals)
        .map(|(rating, days)| {
            let label = paint(rating.label(), rating_color(*rating), use_color);
            format!("{} {}", label, format_interval(days))
        })
        .collect::<Vec<_>>()
        .join(" · ")
}

pub fn rating_color(rating: Rating) -> &'static str {
    match rating {
        Rating::Again => Color::RED,
        Rating::Hard => Color::YELLOW,
        Rating::Good => Color::GREEN,
        Rating::Easy => Color::BLUE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_one_line() {
        assert_eq!(one_line("What is\n  a monad?", 40), "What is a monad?");
        assert_eq!(one_line("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_plain_preview_for_new_card() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let card = Card::new("d-0".into(), "Q".into(), "A".into(), today, Utc::now());
        assert_eq!(card_status(&card, today, false), "new");
        assert!(rating_preview(&card, today, false).starts_with("again 1d · hard 1d · good 1d"));
    }
}
