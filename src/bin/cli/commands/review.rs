use anyhow::{Context, Result};

use study_buddy_lib::flashcards::algorithm::format_interval;
use study_buddy_lib::Rating;

use crate::app::App;
use crate::render::terminal::{paint, rating_color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    query: &str,
    card_id: &str,
    rating: &str,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let rating: Rating = rating.parse()?;
    let deck = app.find_deck(query)?;
    let card = app
        .storage
        .review(&deck.id, card_id, rating)
        .with_context(|| format!("Failed to review card '{}'", card_id))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        OutputFormat::Plain => {
            println!(
                "Rated {} {}: next review in {} ({}), ease {:.2}",
                card.id,
                paint(rating.label(), rating_color(rating), use_color),
                format_interval(card.interval),
                card.due,
                card.ease
            );
        }
    }

    Ok(())
}
