use crate::config::{AnalyzerConfig, Language};
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::Stemmer;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"\p{L}+").expect("valid regex");
    static ref DEFAULT_ANALYZER: Analyzer = Analyzer::new(Language::English);
}

/// Function words dropped from English text before stemming.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "and", "be", "have", "i",
    "in", "of", "that", "the", "to",
    "is", "it", "for", "an", "as",
    "at", "by", "from", "he", "on",
    "or", "this", "was", "were",
    "with", "are", "but", "not",
];

/// Split text into maximal runs of letters. Everything else separates tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    RE.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Lowercase each token. Lowercasing can emit combining marks ("İ" becomes
/// "i\u{307}"); those are dropped so every token stays a single letter run.
pub fn lowercase_filter(tokens: Vec<String>) -> Vec<String> {
    tokens.into_iter().map(|t| fold_case(&t)).filter(|t| !t.is_empty()).collect()
}

fn fold_case(token: &str) -> String {
    let lower = token.to_lowercase();
    RE.find_iter(&lower).map(|m| m.as_str()).collect()
}

/// Upper bound on re-stemming a token while looking for a fixed point.
const MAX_STEM_PASSES: usize = 8;

/// Analyze with the default English pipeline.
pub fn analyze(text: &str) -> Vec<String> {
    DEFAULT_ANALYZER.analyze(text)
}

/// Text to term pipeline: tokenize, lowercase, drop stopwords, stem. Stems
/// that are themselves stopwords ("being" stems to "be") are dropped too, so
/// analyzing the output again changes nothing.
///
/// Total over every input string; the only state is the stopword set and the
/// stemmer picked at construction.
pub struct Analyzer {
    language: Language,
    stemmer: Stemmer,
    stopwords: HashSet<String>,
    unicode_normalize: bool,
}

impl Analyzer {
    pub fn new(language: Language) -> Self {
        Self::from_config(&AnalyzerConfig { language, ..AnalyzerConfig::default() })
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        let stopwords = match &config.stopwords {
            Some(words) => words
                .iter()
                .map(|w| if config.unicode_normalize { w.nfkc().collect::<String>() } else { w.clone() })
                .map(|w| fold_case(&w))
                .collect(),
            None => config.language.default_stopwords().iter().map(|w| w.to_string()).collect(),
        };
        Self {
            language: config.language,
            stemmer: Stemmer::create(config.language.algorithm()),
            stopwords,
            unicode_normalize: config.unicode_normalize,
        }
    }

    pub fn language(&self) -> Language { self.language }

    pub fn is_stopword(&self, token: &str) -> bool { self.stopwords.contains(token) }

    /// Tokenize, applying NFKC first when enabled so composed and decomposed
    /// forms of the same word produce the same token.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        if self.unicode_normalize {
            let normalized = text.nfkc().collect::<String>();
            tokenize(&normalized)
        } else {
            tokenize(text)
        }
    }

    pub fn stopword_filter(&self, tokens: Vec<String>) -> Vec<String> {
        tokens.into_iter().filter(|t| !self.is_stopword(t)).collect()
    }

    /// Stem each token to a fixed point. A single Snowball pass is not
    /// idempotent ("universal" -> "univers" -> "univ").
    pub fn stemmer_filter(&self, tokens: Vec<String>) -> Vec<String> {
        tokens.into_iter().map(|t| self.stem(t)).collect()
    }

    fn stem(&self, mut token: String) -> String {
        for _ in 0..MAX_STEM_PASSES {
            let stem = self.stemmer.stem(&token);
            if stem == token.as_str() {
                break;
            }
            token = stem.into_owned();
        }
        token
    }

    pub fn analyze(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenize(text);
        let tokens = lowercase_filter(tokens);
        let tokens = self.stopword_filter(tokens);
        let stems = self.stemmer_filter(tokens);
        self.stopword_filter(stems)
    }
}

impl Default for Analyzer {
    fn default() -> Self { Self::new(Language::English) }
}
