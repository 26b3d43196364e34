use crate::config::{EngineConfig, RebuildPolicy};
use crate::corpus::{fingerprint, Document};
use crate::error::CorpusError;
use crate::error::{Error, Result, StorageError};
use crate::index::{DocId, DocMeta, InvertedIndex};
use crate::persist::{self, IndexPaths, MetaFile, PostingStore, SledStore, FORMAT_VERSION};
use crate::query::QueryEngine;
use crate::tokenizer::Analyzer;
use time::format_description::well_known::Rfc3339;

/// A persisted index opened for querying, plus the document table used to
/// turn result ids into titles.
pub struct SearchEngine {
    query: QueryEngine<SledStore>,
    docs: Vec<DocMeta>,
    meta: MetaFile,
}

impl SearchEngine {
    /// Open the index under `config.index_dir`, building it from `docs` when
    /// the rebuild policy asks for it. Without a corpus, an existing complete
    /// index is served as-is. An opened index is always queried with the
    /// analyzer settings it was built with.
    pub fn open(config: &EngineConfig, docs: Option<&[Document]>) -> Result<Self> {
        let paths = IndexPaths::new(&config.index_dir);
        let complete = paths.is_complete();
        let rebuild = match (docs, config.rebuild) {
            (None, _) if complete => {
                tracing::warn!(index = %paths.root.display(), "no corpus loaded, serving existing index");
                false
            }
            (None, _) => return Err(Error::NothingToServe(paths.root)),
            (Some(_), RebuildPolicy::Always) => true,
            (Some(_), RebuildPolicy::IfMissing) => !complete,
            (Some(docs), RebuildPolicy::IfStale) => !complete || is_stale(config, &paths, docs)?,
        };

        match docs {
            Some(docs) if rebuild => Self::build(config, docs),
            Some(docs) => {
                let table = docs.iter().map(Document::meta).collect();
                Self::load(config, &paths, Some(table))
            }
            None => Self::load(config, &paths, None),
        }
    }

    /// Build from scratch, discarding whatever is under `config.index_dir`.
    pub fn build(config: &EngineConfig, docs: &[Document]) -> Result<Self> {
        let num_docs = DocId::try_from(docs.len()).map_err(|_| CorpusError::TooManyDocuments(docs.len()))?;
        let paths = IndexPaths::new(&config.index_dir);
        persist::remove_index(&paths)?;

        let analyzer = Analyzer::from_config(&config.analyzer);
        let index = if config.build_threads > 1 {
            InvertedIndex::build_parallel(&analyzer, docs, config.build_threads)
        } else {
            let mut index = InvertedIndex::new();
            index.add(&analyzer, docs);
            index
        };
        tracing::info!(num_docs = docs.len(), num_terms = index.len(), num_postings = index.num_postings(), "built index");

        let store = SledStore::open(paths.postings_dir())?;
        store.put_index(&index)?;
        let table: Vec<DocMeta> = docs.iter().map(Document::meta).collect();
        persist::save_docs(&paths, &table)?;
        let meta = MetaFile {
            num_docs,
            num_terms: index.len(),
            created_at: time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default(),
            version: FORMAT_VERSION,
            analyzer: config.analyzer.clone(),
            fingerprint: fingerprint(docs),
        };
        persist::save_meta(&paths, &meta)?;
        tracing::info!(index = %paths.root.display(), "index persisted");

        Ok(Self { query: QueryEngine::new(analyzer, store), docs: table, meta })
    }

    fn load(config: &EngineConfig, paths: &IndexPaths, docs: Option<Vec<DocMeta>>) -> Result<Self> {
        let meta = persist::load_meta(paths)?;
        if meta.analyzer != config.analyzer {
            tracing::warn!(
                built = %meta.analyzer.language,
                configured = %config.analyzer.language,
                "index was built with other analyzer settings, querying with the recorded ones"
            );
        }
        let docs = match docs {
            Some(docs) => docs,
            None => persist::load_docs(paths)?,
        };
        let store = SledStore::open(paths.postings_dir())?;
        let analyzer = Analyzer::from_config(&meta.analyzer);
        tracing::info!(
            num_docs = meta.num_docs,
            num_terms = meta.num_terms,
            created_at = %meta.created_at,
            language = %analyzer.language(),
            "opened index"
        );
        Ok(Self { query: QueryEngine::new(analyzer, store), docs, meta })
    }

    pub fn search(&self, query: &str) -> Result<Vec<DocId>, StorageError> {
        self.query.search(query)
    }

    pub fn doc(&self, id: DocId) -> Option<&DocMeta> { self.docs.get(id as usize) }

    pub fn meta(&self) -> &MetaFile { &self.meta }

    pub fn store(&self) -> &SledStore { self.query.source() }
}

fn is_stale(config: &EngineConfig, paths: &IndexPaths, docs: &[Document]) -> Result<bool> {
    let meta = persist::load_meta(paths)?;
    let stale = meta.fingerprint != fingerprint(docs) || meta.analyzer != config.analyzer;
    if stale {
        tracing::info!(index = %paths.root.display(), "corpus or analyzer changed since index build");
    }
    Ok(stale)
}
