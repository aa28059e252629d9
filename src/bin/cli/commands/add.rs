use anyhow::{bail, Context, Result};

use study_buddy_lib::CardPayload;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    query: &str,
    cards: Vec<CardPayload>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    if cards.is_empty() {
        bail!("No cards to add");
    }

    let summary = app.find_deck(query)?;
    let added = cards.len();
    let deck = app
        .storage
        .add_cards(&summary.id, cards)
        .with_context(|| format!("Failed to add cards to '{}'", summary.name))?;

    match format {
        OutputFormat::Json => {
            let new_cards = &deck.cards[deck.cards.len() - added..];
            println!("{}", serde_json::to_string_pretty(new_cards)?);
        }
        OutputFormat::Plain => {
            println!(
                "Added {} cards to {} ({} total)",
                added,
                paint(&deck.name, Color::BOLD, use_color),
                deck.cards.len()
            );
        }
    }

    Ok(())
}
