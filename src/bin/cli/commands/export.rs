use anyhow::Result;

use study_buddy_lib::flashcards::{export_deck, Template};

use crate::app::App;

pub fn run(app: &App, query: &str, template: Template, script: bool) -> Result<()> {
    let deck = app.load_deck(query)?;
    let export = export_deck(&deck, template);
    log::debug!("Exporting deck {} for the {} template", deck.id, template);

    if script {
        println!("{}", export.to_script()?);
    } else {
        println!("{}", serde_json::to_string_pretty(&export)?);
    }

    Ok(())
}
