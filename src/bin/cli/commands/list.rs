use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let decks = app.list_decks()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&decks)?);
        }
        OutputFormat::Plain => {
            if decks.is_empty() {
                println!("(no decks)");
                return Ok(());
            }
            for deck in &decks {
                println!(
                    "{}  {} ({} cards, {})",
                    paint(&deck.name, Color::BOLD, use_color),
                    paint(&deck.id, Color::GRAY, use_color),
                    deck.card_count,
                    deck.source
                );
            }
        }
    }

    Ok(())
}
