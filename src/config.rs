//! Runtime configuration
//!
//! Read from the environment (after `.env` is loaded by the binary).

use crate::error::{CatatError, Result};
use crate::lexicon::LexiconConfig;
use std::env;
use std::path::PathBuf;
use tracing::info;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_AUTO_COMMIT_THRESHOLD: u8 = 25;
pub const DEFAULT_MIN_MESSAGE_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// JSON lexicon replacing the built-in Indonesian tables
    pub lexicon_path: Option<PathBuf>,
    pub intake: IntakePolicy,
}

/// How the message layer acts on a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakePolicy {
    /// Readings at or above this confidence are booked without asking
    pub auto_commit_threshold: u8,
    /// Shorter messages are ignored before classification
    pub min_message_len: usize,
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self {
            auto_commit_threshold: DEFAULT_AUTO_COMMIT_THRESHOLD,
            min_message_len: DEFAULT_MIN_MESSAGE_LEN,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            lexicon_path: None,
            intake: IntakePolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT").or_else(|| lookup("API_PORT")) {
            Some(value) => parse_var("PORT", &value)?,
            None => defaults.port,
        };

        let auto_commit_threshold = match lookup("AUTO_COMMIT_THRESHOLD") {
            Some(value) => parse_var("AUTO_COMMIT_THRESHOLD", &value)?,
            None => defaults.intake.auto_commit_threshold,
        };

        let min_message_len = match lookup("MIN_MESSAGE_LEN") {
            Some(value) => parse_var("MIN_MESSAGE_LEN", &value)?,
            None => defaults.intake.min_message_len,
        };

        let lexicon_path = lookup("LEXICON_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            port,
            lexicon_path,
            intake: IntakePolicy {
                auto_commit_threshold,
                min_message_len,
            },
        })
    }

    /// The configured lexicon file, or the built-in one. Validated either way.
    pub fn load_lexicon(&self) -> Result<LexiconConfig> {
        match &self.lexicon_path {
            Some(path) => LexiconConfig::from_file(path),
            None => {
                info!("Using built-in Indonesian lexicon");
                let lexicon = LexiconConfig::indonesian();
                lexicon.validate()?;
                Ok(lexicon)
            }
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CatatError::Config(format!("{} has invalid value '{}'", key, value)))
}
