use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use study_buddy_lib::config::{self, StudyConfig};
use study_buddy_lib::flashcards::{Deck, DeckSummary};
use study_buddy_lib::{ErrorKind, FlashcardStorage};

/// Shared application state for CLI commands
pub struct App {
    pub config: StudyConfig,
    pub storage: FlashcardStorage,
}

impl App {
    /// Initialize from the resolved storage root
    pub fn new(data_dir: Option<PathBuf>, config_path: Option<&Path>) -> Result<Self> {
        let config = StudyConfig::load(config_path).context("Failed to load configuration")?;
        let root = config::resolve_data_dir(data_dir, &config)
            .context("Failed to get data directory")?;
        log::debug!("Using storage root {}", root.display());

        let storage = FlashcardStorage::new(root).with_mastery_reps(config.mastery_reps);
        Ok(Self { config, storage })
    }

    pub fn list_decks(&self) -> Result<Vec<DeckSummary>> {
        self.storage.list_decks().context("Failed to read deck index")
    }

    /// Find a deck by id or name (case-insensitive prefix match)
    pub fn find_deck(&self, query: &str) -> Result<DeckSummary> {
        let decks = self.list_decks()?;

        // Exact id, then exact name
        if let Some(deck) = decks.iter().find(|d| d.id == query) {
            return Ok(deck.clone());
        }
        let query_lower = query.to_lowercase();
        if let Some(deck) = decks.iter().find(|d| d.name.to_lowercase() == query_lower) {
            return Ok(deck.clone());
        }

        let matches: Vec<&DeckSummary> = decks
            .iter()
            .filter(|d| {
                d.id.starts_with(&query_lower) || d.name.to_lowercase().starts_with(&query_lower)
            })
            .collect();

        match matches.len() {
            0 => {
                // A record the index lost track of is still addressable by id
                match self.storage.load_deck(query) {
                    Ok(deck) => Ok(deck.summary()),
                    Err(e) if e.kind() == ErrorKind::NotFound => bail!(
                        "No deck matching '{}'. Available decks:\n{}",
                        query,
                        format_candidates(decks.iter())
                    ),
                    Err(e) => Err(e).context(format!("Failed to load deck '{}'", query)),
                }
            }
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous deck name '{}'. Matches:\n{}",
                query,
                format_candidates(matches.into_iter())
            ),
        }
    }

    /// Find and load a deck with all its cards
    pub fn load_deck(&self, query: &str) -> Result<Deck> {
        let summary = self.find_deck(query)?;
        self.storage
            .load_deck(&summary.id)
            .with_context(|| format!("Failed to load deck '{}'", summary.name))
    }
}

fn format_candidates<'a>(decks: impl Iterator<Item = &'a DeckSummary>) -> String {
    let lines: Vec<String> = decks
        .map(|d| format!("  - {} ({})", d.name, d.id))
        .collect();
    if lines.is_empty() {
        "  (no decks)".to_string()
    } else {
        lines.join("\n")
    }
}
