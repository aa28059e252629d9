use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{self, paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, query: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let deck = app.load_deck(query)?;

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&deck)?);
        return Ok(());
    }

    let today = app.storage.today();
    println!("{}", paint(&deck.name, Color::BOLD, use_color));
    println!(
        "{}",
        paint(
            &format!(
                "{} · {} · created {}",
                deck.id,
                deck.source,
                deck.created.format("%Y-%m-%d")
            ),
            Color::DIM,
            use_color
        )
    );

    if deck.cards.is_empty() {
        println!("\n(no cards)");
        return Ok(());
    }

    println!();
    for card in &deck.cards {
        println!(
            "{} {}",
            paint(&card.id, Color::GRAY, use_color),
            terminal::one_line(&card.front, 60)
        );
        println!("    {}", terminal::one_line(&card.back, 72));
        println!("    {}", terminal::card_status(card, today, use_color));
    }

    Ok(())
}
