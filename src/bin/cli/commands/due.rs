use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal::{self, paint, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    deck: Option<&str>,
    limit: Option<usize>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let deck_id = match deck {
        Some(query) => Some(app.find_deck(query)?.id),
        None => None,
    };
    let mut due = app
        .storage
        .get_due_cards(deck_id.as_deref())
        .context("Failed to collect due cards")?;
    let total = due.len();
    if let Some(limit) = limit {
        due.truncate(limit);
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&due)?);
        }
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("Nothing due. Come back tomorrow.");
                return Ok(());
            }

            let today = app.storage.today();
            println!("{} cards due", total);
            println!();
            for item in &due {
                println!(
                    "{} {} {}",
                    paint(&item.deck_name, Color::CYAN, use_color),
                    paint(&item.card.id, Color::GRAY, use_color),
                    terminal::one_line(&item.card.front, 60)
                );
                println!("    {}", terminal::rating_preview(&item.card, today, use_color));
            }
            if due.len() < total {
                println!("\n... and {} more", total - due.len());
            }
        }
    }

    Ok(())
}
