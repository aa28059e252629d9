use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let index = app.storage.rebuild_index().context("Failed to rebuild index")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&index)?);
        }
        OutputFormat::Plain => {
            println!("Indexed {} decks in {}", index.decks.len(), app.storage.root().display());
        }
    }

    Ok(())
}
