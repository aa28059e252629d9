use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, query: &str, format: &OutputFormat) -> Result<()> {
    let deck = app.find_deck(query)?;
    app.storage
        .delete_deck(&deck.id)
        .with_context(|| format!("Failed to delete deck '{}'", deck.name))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "deleted": deck.id }));
        }
        OutputFormat::Plain => {
            println!("Deleted {} ({})", deck.name, deck.id);
        }
    }

    Ok(())
}
