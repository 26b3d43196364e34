//! Boolean full-text search: text analysis, an inverted index of sorted
//! posting lists, AND queries by posting intersection, and a sled-backed
//! persisted index answering the same queries.

pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod index;
pub mod persist;
pub mod postings;
pub mod query;
pub mod scan;
pub mod tokenizer;

pub use config::{AnalyzerConfig, EngineConfig, Language, RebuildPolicy};
pub use corpus::{load_documents, Document};
pub use engine::SearchEngine;
pub use error::{ConfigError, CorpusError, Error, Result, StorageError};
pub use index::{DocId, DocMeta, InvertedIndex};
pub use persist::{MemoryStore, PostingStore, SledStore};
pub use postings::intersect;
pub use query::{PostingSource, QueryEngine};
pub use tokenizer::{analyze, Analyzer};
