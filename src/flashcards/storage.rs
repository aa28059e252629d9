//! Storage operations for decks and review state
//!
//! Directory structure under the storage root:
//! ```text
//! {root}/
//! ├── decks.json       # Index: deck summaries and review counters
//! └── {deck-id}.json   # One record per deck, cards included
//! ```
//!
//! Deck records are written before the index, and every file write is an
//! atomic replace. The index can always be rebuilt from the deck records
//! with [`FlashcardStorage::rebuild_index`].

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};

use super::algorithm::{calculate_next_review, Rating, ReviewResult};
use super::clock::{Clock, SystemClock};
use super::content::CardPayload;
use super::dashboard::{build_dashboard, DashboardData, DEFAULT_MASTERY_REPS};
use super::models::*;
use crate::errors::{Result, StudyError};
use crate::storage::{is_temp_file, read_json, write_json};

const INDEX_FILE: &str = "decks.json";
const MAX_SLUG_LEN: usize = 30;
const MAX_ID_ATTEMPTS: u32 = 1000;

/// Storage manager for decks, cards and the deck index
pub struct FlashcardStorage {
    root: PathBuf,
    clock: Box<dyn Clock>,
    mastery_reps: u32,
}

impl FlashcardStorage {
    pub fn new(root: PathBuf) -> Self {
        Self::with_clock(root, Box::new(SystemClock))
    }

    pub fn with_clock(root: PathBuf, clock: Box<dyn Clock>) -> Self {
        Self {
            root,
            clock,
            mastery_reps: DEFAULT_MASTERY_REPS,
        }
    }

    pub fn with_mastery_reps(mut self, mastery_reps: u32) -> Self {
        self.mastery_reps = mastery_reps;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The study day reviews are scheduled from
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    fn deck_path(&self, deck_id: &str) -> Result<PathBuf> {
        if !is_valid_deck_id(deck_id) {
            return Err(StudyError::DeckNotFound(deck_id.to_string()));
        }
        Ok(self.root.join(format!("{}.json", deck_id)))
    }

    /// Create the storage root if needed
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    // ==================== Index ====================

    /// Read the index; a missing file is an empty index
    pub fn load_index(&self) -> Result<Index> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(Index::default());
        }
        read_json(&path)
    }

    fn save_index(&self, index: &Index) -> Result<()> {
        write_json(&self.index_path(), index)
    }

    /// Recreate the index from the deck records on disk. Review counters are
    /// kept from the previous index when it is still readable.
    pub fn rebuild_index(&self) -> Result<Index> {
        self.init()?;

        let stats = match self.load_index() {
            Ok(index) => index.stats,
            Err(e) => {
                log::warn!("Discarding unreadable index counters: {}", e);
                StudyStats::default()
            }
        };

        let mut summaries = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !is_deck_record(&path) {
                continue;
            }
            match read_json::<Deck>(&path) {
                Ok(deck) if path.file_stem().is_some_and(|stem| stem == deck.id.as_str()) => {
                    summaries.push(deck.summary())
                }
                Ok(deck) => log::warn!(
                    "Skipping deck record {} stored under id {}",
                    path.display(),
                    deck.id
                ),
                Err(e) => log::warn!("Skipping unreadable deck record {}: {}", path.display(), e),
            }
        }
        summaries.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));

        let index = Index {
            decks: summaries,
            stats,
        };
        self.save_index(&index)?;
        log::info!("Rebuilt deck index with {} decks", index.decks.len());
        Ok(index)
    }

    // ==================== Deck Operations ====================

    /// List deck summaries from the index, in creation order
    pub fn list_decks(&self) -> Result<Vec<DeckSummary>> {
        Ok(self.load_index()?.decks)
    }

    /// Review counters from the index
    pub fn get_stats(&self) -> Result<StudyStats> {
        Ok(self.load_index()?.stats)
    }

    /// Create a deck with an initial (possibly empty) set of cards
    pub fn create_deck(&self, name: &str, source: &str, cards: Vec<CardPayload>) -> Result<Deck> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StudyError::validation("deck name must not be empty"));
        }
        for payload in &cards {
            payload.validate()?;
        }

        self.init()?;
        let now = self.clock.now();
        let index = self.load_index()?;
        let deck_id = self.generate_deck_id(name, now, &index)?;

        let source = source.trim();
        let mut deck = Deck {
            id: deck_id,
            name: name.to_string(),
            source: if source.is_empty() {
                default_source()
            } else {
                source.to_string()
            },
            created: now,
            cards: Vec::new(),
        };
        let new_cards = self.build_cards(&deck, cards)?;
        deck.cards = new_cards;

        self.persist_deck(&deck, |_| {})?;
        log::info!("Created deck {} ({} cards)", deck.id, deck.cards.len());
        Ok(deck)
    }

    /// Load a deck with all its cards
    pub fn load_deck(&self, deck_id: &str) -> Result<Deck> {
        let path = self.deck_path(deck_id)?;
        if !path.exists() {
            return Err(StudyError::DeckNotFound(deck_id.to_string()));
        }
        read_json(&path)
    }

    /// Overwrite a deck record and refresh its index summary
    pub fn save_deck(&self, deck: &Deck) -> Result<()> {
        if deck.name.trim().is_empty() {
            return Err(StudyError::validation("deck name must not be empty"));
        }
        if !is_valid_deck_id(&deck.id) {
            return Err(StudyError::validation(format!("invalid deck id: {}", deck.id)));
        }
        validate_cards(deck)?;
        self.persist_deck(deck, |_| {})
    }

    /// Append cards to an existing deck
    pub fn add_cards(&self, deck_id: &str, cards: Vec<CardPayload>) -> Result<Deck> {
        for payload in &cards {
            payload.validate()?;
        }

        let mut deck = self.load_deck(deck_id)?;
        let new_cards = self.build_cards(&deck, cards)?;
        let added = new_cards.len();
        deck.cards.extend(new_cards);

        self.persist_deck(&deck, |_| {})?;
        log::info!("Added {} cards to deck {}", added, deck.id);
        Ok(deck)
    }

    /// Delete a deck record and its index entry
    pub fn delete_deck(&self, deck_id: &str) -> Result<()> {
        let path = self.deck_path(deck_id)?;
        let index_exists = self.index_path().exists();
        // An unreadable index fails the delete before the record is removed
        let mut index = if index_exists {
            Some(self.load_index()?)
        } else {
            None
        };

        let had_record = path.exists();
        let removed = index.as_mut().is_some_and(|index| index.remove(deck_id));
        if !had_record && !removed {
            return Err(StudyError::DeckNotFound(deck_id.to_string()));
        }

        if had_record {
            fs::remove_file(&path)?;
        }
        if let Some(index) = index.filter(|_| removed) {
            self.save_index(&index)?;
        }
        log::info!("Deleted deck {}", deck_id);
        Ok(())
    }

    /// Write the deck record, then the index. The index is read first, so an
    /// unreadable index fails the operation before the record changes.
    fn persist_deck(&self, deck: &Deck, update: impl FnOnce(&mut Index)) -> Result<()> {
        let path = self.deck_path(&deck.id)?;
        let mut index = self.load_index()?;

        write_json(&path, deck)?;
        index.upsert(deck.summary());
        update(&mut index);
        self.save_index(&index)
    }

    fn generate_deck_id(&self, name: &str, now: DateTime<Utc>, index: &Index) -> Result<String> {
        let slug = slugify(name);
        for attempt in 0..MAX_ID_ATTEMPTS {
            let seed = if attempt == 0 {
                format!("{}{}", name, now.to_rfc3339())
            } else {
                format!("{}{}#{}", name, now.to_rfc3339(), attempt)
            };
            let digest = format!("{:x}", md5::compute(seed.as_bytes()));
            let id = format!("{}-{}", slug, &digest[..6]);

            if !index.contains(&id) && !self.deck_path(&id)?.exists() {
                return Ok(id);
            }
        }
        Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("no free deck id for {}", slug),
        )
        .into())
    }

    /// Turn validated payloads into new cards for `deck`, assigning
    /// `{deck_id}-{n}` ids where the payload has none
    fn build_cards(&self, deck: &Deck, payloads: Vec<CardPayload>) -> Result<Vec<Card>> {
        let today = self.clock.today();
        let now = self.clock.now();

        let mut taken: HashSet<String> = deck.cards.iter().map(|c| c.id.clone()).collect();
        for payload in &payloads {
            if let Some(id) = payload.id() {
                if !taken.insert(id.to_string()) {
                    return Err(StudyError::validation(format!(
                        "duplicate card id {} in deck {}",
                        id, deck.id
                    )));
                }
            }
        }

        let mut next = deck.cards.len();
        let mut cards = Vec::with_capacity(payloads.len());
        for payload in payloads {
            let parts = payload.into_parts()?;
            let id = match parts.id {
                Some(id) => id,
                None => loop {
                    let candidate = format!("{}-{}", deck.id, next);
                    next += 1;
                    if taken.insert(candidate.clone()) {
                        break candidate;
                    }
                },
            };

            let mut card = Card::new(id, parts.front, parts.back, today, now);
            card.quiz = parts.quiz;
            cards.push(card);
        }
        Ok(cards)
    }

    // ==================== Review Operations ====================

    /// Load every deck listed in the index, skipping missing records
    fn load_indexed_decks(&self, index: &Index) -> Result<Vec<Deck>> {
        let mut decks = Vec::with_capacity(index.decks.len());
        for summary in &index.decks {
            match self.load_deck(&summary.id) {
                Ok(deck) => decks.push(deck),
                Err(StudyError::DeckNotFound(id)) => {
                    log::warn!("Deck {} is in the index but has no record", id);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(decks)
    }

    /// Cards due today or earlier, oldest due first. Ties are ordered by
    /// deck id, then by position in the deck.
    pub fn get_due_cards(&self, deck_id: Option<&str>) -> Result<Vec<DueCard>> {
        let decks = match deck_id {
            Some(id) => vec![self.load_deck(id)?],
            None => self.load_indexed_decks(&self.load_index()?)?,
        };
        let today = self.clock.today();

        let mut due_cards: Vec<DueCard> = decks
            .into_iter()
            .flat_map(|deck| {
                let Deck { id, name, cards, .. } = deck;
                cards
                    .into_iter()
                    .enumerate()
                    .filter(|(_, card)| card.is_due(today))
                    .map(move |(position, card)| DueCard {
                        deck_id: id.clone(),
                        deck_name: name.clone(),
                        position,
                        card,
                    })
            })
            .collect();

        due_cards.sort_by(|a, b| {
            a.card
                .due
                .cmp(&b.card.due)
                .then_with(|| a.deck_id.cmp(&b.deck_id))
                .then_with(|| a.position.cmp(&b.position))
        });
        Ok(due_cards)
    }

    /// Apply a rating to a card, persist the deck and count the review
    pub fn review(&self, deck_id: &str, card_id: &str, rating: Rating) -> Result<Card> {
        let mut deck = self.load_deck(deck_id)?;
        let today = self.clock.today();
        let now = self.clock.now();

        let card = deck
            .card_mut(card_id)
            .ok_or_else(|| StudyError::CardNotFound {
                deck_id: deck_id.to_string(),
                card_id: card_id.to_string(),
            })?;

        let ReviewResult {
            interval,
            ease,
            reps,
            lapses,
            due,
        } = calculate_next_review(card, rating, today);

        card.interval = interval;
        card.ease = ease;
        card.reps = reps;
        card.lapses = lapses;
        card.due = due;
        card.last_review = Some(now);
        card.last_rating = Some(rating);
        let updated = card.clone();

        self.persist_deck(&deck, |index| index.stats.record_review(today))?;
        log::debug!(
            "Reviewed {} as {}: interval {}d, ease {:.2}, due {}",
            card_id,
            rating,
            updated.interval,
            updated.ease,
            updated.due
        );
        Ok(updated)
    }

    /// Review with a raw rating value (0-3), rejected before anything is read
    pub fn submit_review(&self, deck_id: &str, card_id: &str, rating: i32) -> Result<Card> {
        let rating = Rating::try_from(rating)?;
        self.review(deck_id, card_id, rating)
    }

    /// Aggregate statistics across every indexed deck
    pub fn get_dashboard_data(&self) -> Result<DashboardData> {
        let index = self.load_index()?;
        let decks = self.load_indexed_decks(&index)?;
        Ok(build_dashboard(
            &index.stats,
            &decks,
            self.clock.today(),
            self.mastery_reps,
        ))
    }
}

/// Card ids must be unique and non-empty, and both sides must have text
fn validate_cards(deck: &Deck) -> Result<()> {
    let mut seen = HashSet::with_capacity(deck.cards.len());
    for card in &deck.cards {
        if card.id.trim().is_empty() {
            return Err(StudyError::validation(format!("card without id in deck {}", deck.id)));
        }
        if !seen.insert(card.id.as_str()) {
            return Err(StudyError::validation(format!(
                "duplicate card id {} in deck {}",
                card.id, deck.id
            )));
        }
        if card.front.trim().is_empty() || card.back.trim().is_empty() {
            return Err(StudyError::validation(format!("card {} has an empty side", card.id)));
        }
    }
    Ok(())
}

/// Lowercase ASCII alphanumerics joined by `-`, at most 30 characters
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "deck".to_string()
    } else {
        slug.to_string()
    }
}

/// Deck ids name files directly under the root, so anything that could
/// escape it or collide with the index is refused.
fn is_valid_deck_id(deck_id: &str) -> bool {
    !deck_id.is_empty()
        && !deck_id.starts_with('.')
        && !deck_id.contains(['/', '\\', '\0'])
        && deck_id != "decks"
}

fn is_deck_record(path: &Path) -> bool {
    path.is_file()
        && path.extension().is_some_and(|ext| ext == "json")
        && !is_temp_file(path)
        && path.file_name().is_some_and(|name| name != INDEX_FILE)
}
