use anyhow::{Context, Result};

use study_buddy_lib::CardPayload;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    name: &str,
    source: Option<&str>,
    cards: Vec<CardPayload>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let source = source.unwrap_or(&app.config.default_source);
    let deck = app
        .storage
        .create_deck(name, source, cards)
        .with_context(|| format!("Failed to create deck '{}'", name))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&deck)?);
        }
        OutputFormat::Plain => {
            println!(
                "Created {} ({}) with {} cards",
                paint(&deck.name, Color::BOLD, use_color),
                deck.id,
                deck.cards.len()
            );
        }
    }

    Ok(())
}
