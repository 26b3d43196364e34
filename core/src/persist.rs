use crate::config::AnalyzerConfig;
use crate::error::StorageError;
use crate::index::{DocId, DocMeta, InvertedIndex};
use crate::query::PostingSource;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::{self, create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: usize,
    pub created_at: String,
    pub version: u32,
    /// Analysis the postings were built with. Queries must use the same.
    pub analyzer: AnalyzerConfig,
    /// Corpus fingerprint at build time, see `corpus::fingerprint`.
    pub fingerprint: String,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn postings_dir(&self) -> PathBuf { self.root.join("postings") }
    fn docs(&self) -> PathBuf { self.root.join("docs.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }

    /// The meta file is written last, so its presence marks a finished build.
    pub fn is_complete(&self) -> bool { self.meta().is_file() }
}

/// Keyed posting storage. `get` returns ascending, duplicate-free ids and an
/// empty list for unknown terms.
pub trait PostingStore {
    fn put(&self, term: &str, doc_id: DocId) -> Result<(), StorageError>;

    fn get(&self, term: &str) -> Result<Vec<DocId>, StorageError>;

    fn flush(&self) -> Result<(), StorageError> { Ok(()) }

    /// Bulk write of a whole index.
    fn put_index(&self, index: &InvertedIndex) -> Result<(), StorageError> {
        for (term, ids) in index.iter() {
            for &id in ids {
                self.put(term, id)?;
            }
        }
        self.flush()
    }
}

/// In-memory store. Appends in arrival order and sorts on read.
#[derive(Default)]
pub struct MemoryStore {
    lists: RwLock<HashMap<String, Vec<DocId>>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

impl PostingStore for MemoryStore {
    fn put(&self, term: &str, doc_id: DocId) -> Result<(), StorageError> {
        self.lists.write().entry(term.to_string()).or_default().push(doc_id);
        Ok(())
    }

    fn get(&self, term: &str) -> Result<Vec<DocId>, StorageError> {
        let mut ids = self.lists.read().get(term).cloned().unwrap_or_default();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}

impl PostingSource for MemoryStore {
    type Error = StorageError;

    fn postings(&self, term: &str) -> Result<Cow<'_, [DocId]>, StorageError> {
        self.get(term).map(Cow::Owned)
    }
}

/// sled-backed store. One key per posting: `term 0x00 doc_id(be32)`, so a
/// prefix scan over `term 0x00` yields the term's ids in ascending order.
pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Ok(Self { db: sled::open(path)? })
    }

    fn prefix(term: &str) -> Vec<u8> {
        let mut key = Vec::with_capacity(term.len() + 5);
        key.extend_from_slice(term.as_bytes());
        key.push(0);
        key
    }

    fn key(term: &str, doc_id: DocId) -> Vec<u8> {
        let mut key = Self::prefix(term);
        key.extend_from_slice(&doc_id.to_be_bytes());
        key
    }
}

impl PostingStore for SledStore {
    fn put(&self, term: &str, doc_id: DocId) -> Result<(), StorageError> {
        self.db.insert(Self::key(term, doc_id), Vec::<u8>::new())?;
        Ok(())
    }

    fn get(&self, term: &str) -> Result<Vec<DocId>, StorageError> {
        let prefix = Self::prefix(term);
        let mut ids = Vec::new();
        for entry in self.db.scan_prefix(&prefix) {
            let (key, _) = entry?;
            let id_bytes: [u8; 4] = key[prefix.len()..]
                .try_into()
                .map_err(|_| StorageError::CorruptKey { term: term.to_string() })?;
            ids.push(DocId::from_be_bytes(id_bytes));
        }
        Ok(ids)
    }

    fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }

    fn put_index(&self, index: &InvertedIndex) -> Result<(), StorageError> {
        let mut batch = sled::Batch::default();
        for (term, ids) in index.iter() {
            for &id in ids {
                batch.insert(Self::key(term, id), Vec::<u8>::new());
            }
        }
        self.db.apply_batch(batch)?;
        self.flush()
    }
}

impl PostingSource for SledStore {
    type Error = StorageError;

    fn postings(&self, term: &str) -> Result<Cow<'_, [DocId]>, StorageError> {
        self.get(term).map(Cow::Owned)
    }
}

/// Document table, indexed by id.
pub fn save_docs(paths: &IndexPaths, docs: &[DocMeta]) -> Result<(), StorageError> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.docs())?;
    let bytes = bincode::serialize(docs)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_docs(paths: &IndexPaths) -> Result<Vec<DocMeta>, StorageError> {
    let mut f = File::open(paths.docs())?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let docs = bincode::deserialize(&buf)?;
    Ok(docs)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<(), StorageError> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile, StorageError> {
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

/// Delete a previous index so a rebuild starts from nothing.
pub fn remove_index(paths: &IndexPaths) -> Result<(), StorageError> {
    if paths.root.exists() {
        fs::remove_dir_all(&paths.root)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_sorts_on_read() {
        let store = MemoryStore::new();
        for id in [7, 2, 9, 2, 0] {
            store.put("term", id).unwrap();
        }
        assert_eq!(store.get("term").unwrap(), vec![0, 2, 7, 9]);
        assert!(store.get("other").unwrap().is_empty());
    }

    #[test]
    fn sled_keys_do_not_leak_across_prefixes() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledStore::open(dir.path().join("postings")).unwrap();
        store.put("cat", 3).unwrap();
        store.put("cats", 1).unwrap();
        store.put("cat", 256).unwrap();
        store.put("cat", 1).unwrap();
        assert_eq!(store.get("cat").unwrap(), vec![1, 3, 256]);
        assert_eq!(store.get("cats").unwrap(), vec![1]);
        assert!(store.get("ca").unwrap().is_empty());
    }
}
