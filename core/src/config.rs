use crate::error::ConfigError;
use crate::tokenizer::ENGLISH_STOPWORDS;
use rust_stemmers::Algorithm;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Language of the corpus; selects the stemmer and the default stopword set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    French,
    German,
    Spanish,
    Italian,
    Portuguese,
    Dutch,
    Swedish,
    Russian,
}

impl Language {
    pub fn algorithm(self) -> Algorithm {
        match self {
            Language::English => Algorithm::English,
            Language::French => Algorithm::French,
            Language::German => Algorithm::German,
            Language::Spanish => Algorithm::Spanish,
            Language::Italian => Algorithm::Italian,
            Language::Portuguese => Algorithm::Portuguese,
            Language::Dutch => Algorithm::Dutch,
            Language::Swedish => Algorithm::Swedish,
            Language::Russian => Algorithm::Russian,
        }
    }

    /// Only English ships a built-in list; other languages take theirs from
    /// `AnalyzerConfig::stopwords`.
    pub fn default_stopwords(self) -> &'static [&'static str] {
        match self {
            Language::English => ENGLISH_STOPWORDS,
            _ => &[],
        }
    }

    fn name(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::French => "french",
            Language::German => "german",
            Language::Spanish => "spanish",
            Language::Italian => "italian",
            Language::Portuguese => "portuguese",
            Language::Dutch => "dutch",
            Language::Swedish => "swedish",
            Language::Russian => "russian",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "french" | "fr" => Ok(Language::French),
            "german" | "de" => Ok(Language::German),
            "spanish" | "es" => Ok(Language::Spanish),
            "italian" | "it" => Ok(Language::Italian),
            "portuguese" | "pt" => Ok(Language::Portuguese),
            "dutch" | "nl" => Ok(Language::Dutch),
            "swedish" | "sv" => Ok(Language::Swedish),
            "russian" | "ru" => Ok(Language::Russian),
            _ => Err(ConfigError::UnknownLanguage(s.to_string())),
        }
    }
}

/// When to throw away a persisted index and build a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RebuildPolicy {
    /// Build only when no complete index exists. Stale indexes are used as-is.
    #[default]
    IfMissing,
    /// Also rebuild when the corpus fingerprint differs from the recorded one.
    IfStale,
    Always,
}

impl FromStr for RebuildPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "if-missing" | "missing" => Ok(RebuildPolicy::IfMissing),
            "if-stale" | "stale" => Ok(RebuildPolicy::IfStale),
            "always" => Ok(RebuildPolicy::Always),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub language: Language,
    /// Replaces the language's built-in stopword set when present.
    pub stopwords: Option<Vec<String>>,
    pub unicode_normalize: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self { language: Language::English, stopwords: None, unicode_normalize: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub corpus: PathBuf,
    pub index_dir: PathBuf,
    pub rebuild: RebuildPolicy,
    /// Number of partitions for the index build. 1 builds sequentially.
    pub build_threads: usize,
    pub analyzer: AnalyzerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            corpus: PathBuf::from("enwiki-latest-abstract1.xml"),
            index_dir: PathBuf::from("./index"),
            rebuild: RebuildPolicy::IfMissing,
            build_threads: 1,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }
}
