mod app;
mod commands;
mod render;

use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use study_buddy_lib::flashcards::Template;
use study_buddy_lib::CardPayload;

#[derive(Parser)]
#[command(name = "study-buddy", about = "Flashcard decks and spaced repetition reviews", version)]
struct Cli {
    /// Storage root (default: $STUDY_DATA_DIR, then config, then platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (default: <config dir>/study-buddy/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum TemplateArg {
    Flashcards,
    Quiz,
}

impl From<TemplateArg> for Template {
    fn from(arg: TemplateArg) -> Self {
        match arg {
            TemplateArg::Flashcards => Template::Flashcards,
            TemplateArg::Quiz => Template::Quiz,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// List all decks
    List,

    /// Show a deck and its cards
    Show {
        /// Deck id or name (case-insensitive prefix match)
        deck: String,
    },

    /// Create a deck from a JSON array of cards
    Create {
        /// Deck name
        name: String,
        /// Where the cards came from (manual, studium, pdf, ...)
        #[arg(long)]
        source: Option<String>,
        /// JSON file with cards (use "-" to read from stdin)
        #[arg(long)]
        cards: Option<String>,
    },

    /// Append cards to a deck
    Add {
        /// Deck id or name
        deck: String,
        /// JSON file with cards (use "-" to read from stdin)
        #[arg(long)]
        cards: String,
    },

    /// List cards due for review
    Due {
        /// Only cards from this deck
        #[arg(long)]
        deck: Option<String>,
        /// Maximum cards to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Rate a card: 0/again, 1/hard, 2/good, 3/easy
    Review {
        /// Deck id or name
        deck: String,
        /// Card id
        card: String,
        /// Rating
        rating: String,
    },

    /// Show study progress
    Dashboard,

    /// Export a deck for the display templates
    Export {
        /// Deck id or name
        deck: String,
        #[arg(long, value_enum, default_value = "flashcards")]
        template: TemplateArg,
        /// Emit the script snippet instead of JSON
        #[arg(long)]
        script: bool,
    },

    /// Delete a deck and its cards
    Delete {
        /// Deck id or name
        deck: String,
    },

    /// Rebuild the deck index from the deck files
    Reindex,
}

/// Read card payloads from a file, from stdin for "-", or from piped stdin
/// when no source is given
fn read_cards(source: Option<&str>) -> Result<Vec<CardPayload>> {
    let raw = match source {
        Some("-") => Some(read_stdin()?),
        Some(path) => Some(
            std::fs::read_to_string(path).with_context(|| format!("Failed to read cards from {}", path))?,
        ),
        None if !std::io::stdin().is_terminal() => Some(read_stdin()?),
        None => None,
    };

    match raw {
        Some(text) if !text.trim().is_empty() => {
            serde_json::from_str(&text).context("Cards must be a JSON array of card objects")
        }
        _ => Ok(Vec::new()),
    }
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;
    Ok(buf)
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.data_dir, cli.config.as_deref())?;

    match cli.command {
        Command::List => {
            commands::list::run(&app, &cli.format, use_color)?;
        }
        Command::Show { deck } => {
            commands::show::run(&app, &deck, &cli.format, use_color)?;
        }
        Command::Create { name, source, cards } => {
            let cards = read_cards(cards.as_deref())?;
            commands::create::run(&app, &name, source.as_deref(), cards, &cli.format, use_color)?;
        }
        Command::Add { deck, cards } => {
            let cards = read_cards(Some(&cards))?;
            commands::add::run(&app, &deck, cards, &cli.format, use_color)?;
        }
        Command::Due { deck, limit } => {
            commands::due::run(&app, deck.as_deref(), limit, &cli.format, use_color)?;
        }
        Command::Review { deck, card, rating } => {
            commands::review::run(&app, &deck, &card, &rating, &cli.format, use_color)?;
        }
        Command::Dashboard => {
            commands::dashboard::run(&app, &cli.format, use_color)?;
        }
        Command::Export { deck, template, script } => {
            commands::export::run(&app, &deck, template.into(), script)?;
        }
        Command::Delete { deck } => {
            commands::delete::run(&app, &deck, &cli.format)?;
        }
        Command::Reindex => {
            commands::reindex::run(&app, &cli.format)?;
        }
    }

    Ok(())
}
