//! Configuration and storage root resolution
//!
//! The storage root is chosen, in order, from the `--data-dir` flag, the
//! `STUDY_DATA_DIR` environment variable, `data_dir` in the config file, an
//! existing OpenClaw workspace, and finally the platform data directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, StudyError};
use crate::flashcards::dashboard::DEFAULT_MASTERY_REPS;

pub const DATA_DIR_ENV: &str = "STUDY_DATA_DIR";

const APP_DIR: &str = "study-buddy";
const CONFIG_FILE: &str = "config.toml";

/// Contents of `config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case", deny_unknown_fields)]
pub struct StudyConfig {
    /// Storage root for deck records and the deck index
    pub data_dir: Option<PathBuf>,
    /// Consecutive successful reviews for a card to count as mastered
    pub mastery_reps: u32,
    /// Provenance tag for decks created without one
    pub default_source: String,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            mastery_reps: DEFAULT_MASTERY_REPS,
            default_source: "manual".to_string(),
        }
    }
}

impl StudyConfig {
    /// Load from `path`, which must exist, or from the default location if
    /// present. Falls back to defaults when no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)
            .map_err(|e| StudyError::Config(format!("{}: {}", path.display(), e)))?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| StudyError::Config(e.to_string()))?;
        if config.mastery_reps == 0 {
            return Err(StudyError::Config("mastery_reps must be at least 1".to_string()));
        }
        Ok(config)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR).join(CONFIG_FILE))
}

/// Platform default storage root. An existing OpenClaw workspace keeps its
/// `study-data` directory.
pub fn default_data_dir() -> Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        let workspace = home.join(".openclaw").join("workspace");
        if workspace.is_dir() {
            return Ok(workspace.join("study-data"));
        }
    }
    dirs::data_local_dir()
        .map(|p| p.join(APP_DIR))
        .ok_or(StudyError::DataDirNotFound)
}

/// Resolve the storage root from the flag, the environment and the config
pub fn resolve_data_dir(flag: Option<PathBuf>, config: &StudyConfig) -> Result<PathBuf> {
    let env = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
    pick_data_dir(flag, env, config).map_or_else(default_data_dir, Ok)
}

fn pick_data_dir(flag: Option<PathBuf>, env: Option<PathBuf>, config: &StudyConfig) -> Option<PathBuf> {
    let non_empty = |p: &PathBuf| !p.as_os_str().is_empty();
    flag.filter(non_empty)
        .or_else(|| env.filter(non_empty))
        .or_else(|| config.data_dir.clone().filter(non_empty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_defaults() {
        let config = StudyConfig::parse("").unwrap();
        assert_eq!(config, StudyConfig::default());
        assert_eq!(config.mastery_reps, 5);
    }

    #[test]
    fn test_parse_values() {
        let config = StudyConfig::parse(
            r#"
            data_dir = "/srv/study"
            mastery_reps = 8
            default_source = "studium"
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/study")));
        assert_eq!(config.mastery_reps, 8);
        assert_eq!(config.default_source, "studium");
    }

    #[test]
    fn test_parse_rejects_bad_config() {
        assert!(matches!(StudyConfig::parse("mastery_reps = 0"), Err(StudyError::Config(_))));
        assert!(matches!(StudyConfig::parse("colour = \"red\""), Err(StudyError::Config(_))));
        assert!(matches!(StudyConfig::parse("mastery_reps = \"five\""), Err(StudyError::Config(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "mastery_reps = 3\n").unwrap();

        assert_eq!(StudyConfig::load(Some(&path)).unwrap().mastery_reps, 3);
        assert!(StudyConfig::load(Some(&temp.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_data_dir_precedence() {
        let config = StudyConfig {
            data_dir: Some(PathBuf::from("/from/config")),
            ..Default::default()
        };

        assert_eq!(
            pick_data_dir(Some("/from/flag".into()), Some("/from/env".into()), &config),
            Some(PathBuf::from("/from/flag"))
        );
        assert_eq!(
            pick_data_dir(None, Some("/from/env".into()), &config),
            Some(PathBuf::from("/from/env"))
        );
        assert_eq!(
            pick_data_dir(None, Some(PathBuf::new()), &config),
            Some(PathBuf::from("/from/config"))
        );
        assert_eq!(pick_data_dir(None, None, &StudyConfig::default()), None);
    }
}
