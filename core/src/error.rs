use std::path::PathBuf;
use thiserror::Error;

/// Failure to read or decode the document corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("malformed JSON in {}: {source}", .path.display())]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("malformed JSON in {} at line {line}: {source}", .path.display())]
    JsonLine { path: PathBuf, line: usize, source: serde_json::Error },
    #[error("malformed XML in {}: {source}", .path.display())]
    Xml { path: PathBuf, source: quick_xml::de::DeError },
    #[error("failed to walk corpus directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("unsupported corpus format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("corpus of {0} documents exceeds the document id range")]
    TooManyDocuments(usize),
}

/// Failure of the persisted index.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("postings store: {0}")]
    Sled(#[from] sled::Error),
    #[error("index file io: {0}")]
    Io(#[from] std::io::Error),
    #[error("document table encoding: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("index metadata: {0}")]
    Meta(#[from] serde_json::Error),
    #[error("corrupt posting key for term {term:?}")]
    CorruptKey { term: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid config {}: {source}", .path.display())]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
    #[error("unknown rebuild policy: {0}")]
    UnknownPolicy(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Corpus(#[from] CorpusError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no complete index at {} and no corpus loaded to build one", .0.display())]
    NothingToServe(PathBuf),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
