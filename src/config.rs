//! Process-wide configuration
//!
//! Read once at startup and immutable afterwards. The interview texts come
//! from a built-in locale bundle, optionally overridden key by key from a
//! JSON file; numeric limits and the completion service come from
//! environment variables.

use crate::feedback::FeedbackKeywords;
use crate::llm::LlmConfig;
use crate::prompts::PromptTable;
use crate::recommendation::RecommendationPrompt;
use crate::summary::TripTypeCatalog;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MAX_ERRORS: u32 = 3;
const DEFAULT_RECOMMENDATION_TIMEOUT_SECS: u64 = 30;

const LOCALE_VAR: &str = "TRAVEL_AGENT_LOCALE";
const CONFIG_FILE_VAR: &str = "TRAVEL_AGENT_CONFIG";
const MAX_ERRORS_VAR: &str = "TRAVEL_AGENT_MAX_ERRORS";
const TIMEOUT_VAR: &str = "TRAVEL_AGENT_RECOMMENDATION_TIMEOUT_SECS";

/// Configuration errors, reported at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown locale {0:?} (expected \"en\" or \"ru\")")]
    UnknownLocale(String),
    #[error("invalid value {value:?} for {var}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything the interview needs besides the recommendation client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewConfig {
    pub prompts: PromptTable,
    pub feedback: FeedbackKeywords,
    pub trip_types: TripTypeCatalog,
    pub recommendation: RecommendationPrompt,
    /// Tokens that make a step-8 answer count as "yes"
    pub affirmative_tokens: Vec<String>,
    /// Phrases that abandon the current session
    pub restart_phrases: Vec<String>,
    pub max_errors: u32,
    pub recommendation_timeout_secs: u64,
}

impl InterviewConfig {
    pub fn english() -> Self {
        Self {
            prompts: PromptTable::english(),
            feedback: FeedbackKeywords::english(),
            trip_types: TripTypeCatalog::english(),
            recommendation: RecommendationPrompt::english(),
            affirmative_tokens: to_strings(&["yes", "yeah", "yep", "sure", "of course"]),
            restart_phrases: to_strings(&[
                "start over",
                "start again",
                "start a new trip",
                "plan another trip",
            ]),
            max_errors: DEFAULT_MAX_ERRORS,
            recommendation_timeout_secs: DEFAULT_RECOMMENDATION_TIMEOUT_SECS,
        }
    }

    pub fn russian() -> Self {
        Self {
            prompts: PromptTable::russian(),
            feedback: FeedbackKeywords::russian(),
            trip_types: TripTypeCatalog::russian(),
            recommendation: RecommendationPrompt::russian(),
            affirmative_tokens: to_strings(&["да", "конечно", "давайте"]),
            restart_phrases: to_strings(&["начать заново", "начать сначала", "начнём сначала"]),
            max_errors: DEFAULT_MAX_ERRORS,
            recommendation_timeout_secs: DEFAULT_RECOMMENDATION_TIMEOUT_SECS,
        }
    }

    pub fn recommendation_timeout(&self) -> Duration {
        Duration::from_secs(self.recommendation_timeout_secs)
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Built-in text bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    English,
    Russian,
}

impl Locale {
    pub fn bundle(self) -> InterviewConfig {
        match self {
            Locale::English => InterviewConfig::english(),
            Locale::Russian => InterviewConfig::russian(),
        }
    }
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "ru" | "russian" => Ok(Locale::Russian),
            _ => Err(ConfigError::UnknownLocale(s.to_string())),
        }
    }
}

/// Complete process configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub locale: Locale,
    pub interview: InterviewConfig,
    pub llm: LlmConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let lookup = |name: &str| std::env::var(name).ok();
        let (locale, interview) = load_interview(lookup)?;
        let llm = LlmConfig::from_env().map_err(|value| ConfigError::InvalidNumber {
            var: "LLM_MAX_TOKENS",
            value,
        })?;
        Ok(Self {
            locale,
            interview,
            llm,
        })
    }
}

/// Build the interview configuration from variables resolved by `lookup`
pub fn load_interview(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(Locale, InterviewConfig), ConfigError> {
    let locale = match lookup(LOCALE_VAR) {
        Some(raw) => raw.parse()?,
        None => Locale::default(),
    };
    let mut config = locale.bundle();

    if let Some(path) = lookup(CONFIG_FILE_VAR) {
        let path = PathBuf::from(path);
        config = apply_file(&config, &path)?;
        tracing::info!(path = %path.display(), "Applied interview config overrides");
    }

    if let Some(raw) = lookup(MAX_ERRORS_VAR) {
        config.max_errors = parse_number(MAX_ERRORS_VAR, &raw)?;
    }
    if let Some(raw) = lookup(TIMEOUT_VAR) {
        config.recommendation_timeout_secs = parse_number(TIMEOUT_VAR, &raw)?;
    }

    if config.recommendation_timeout_secs > DEFAULT_RECOMMENDATION_TIMEOUT_SECS {
        tracing::warn!(
            timeout_secs = config.recommendation_timeout_secs,
            "Recommendation timeout above 30s keeps the caller waiting"
        );
    }

    Ok((locale, config))
}

fn parse_number<T: FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: raw.to_string(),
    })
}

/// Merge a partial JSON config file over `base`
fn apply_file(base: &InterviewConfig, path: &Path) -> Result<InterviewConfig, ConfigError> {
    let parse_err = |source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let overlay: Value = serde_json::from_str(&raw).map_err(parse_err)?;

    let mut merged = serde_json::to_value(base).map_err(parse_err)?;
    merge_json(&mut merged, overlay);
    serde_json::from_value(merged).map_err(parse_err)
}

/// Objects merge key by key; any other overlay value replaces the base
fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                merge_json(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, overlay) => *base = overlay,
    }
}
