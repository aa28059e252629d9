use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let data = app
        .storage
        .get_dashboard_data()
        .context("Failed to build dashboard")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        OutputFormat::Plain => {
            println!(
                "{} cards · {} due · {} new · {} mastered",
                data.total_cards,
                paint(&data.due_today.to_string(), Color::YELLOW, use_color),
                data.new_cards,
                paint(&data.mastered.to_string(), Color::GREEN, use_color)
            );
            let last = data
                .last_study_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "never".to_string());
            println!(
                "Streak {} days · {} reviews · last studied {}",
                data.streak, data.total_reviewed, last
            );

            if !data.decks.is_empty() {
                println!();
                for deck in &data.decks {
                    println!(
                        "  {} ({}): {} due, {} new, {}/{} mastered",
                        paint(&deck.name, Color::BOLD, use_color),
                        deck.source,
                        deck.due,
                        deck.new,
                        deck.mastered,
                        deck.card_count
                    );
                }
            }
        }
    }

    Ok(())
}
