use crate::corpus::Document;
use crate::postings::union;
use crate::tokenizer::Analyzer;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type DocId = u32;

/// Display fields of a document, kept beside the index so results can be
/// printed without the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocMeta {
    pub title: String,
    pub url: String,
}

/// Term to ascending, duplicate-free document ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<DocId>>,
    /// Highest id added so far, to detect callers breaking id order.
    last_doc: Option<DocId>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Index documents in the order given. Ids are expected to be
    /// non-decreasing across calls; an id lower than one already seen is
    /// still placed at its sorted position.
    pub fn add(&mut self, analyzer: &Analyzer, docs: &[Document]) {
        for doc in docs {
            self.add_terms(doc.id, analyzer.analyze(&doc.text));
        }
    }

    /// Append one document's terms. All terms of a document must arrive in a
    /// single call.
    pub fn add_terms<I>(&mut self, doc_id: DocId, terms: I)
    where
        I: IntoIterator<Item = String>,
    {
        if let Some(last) = self.last_doc {
            if doc_id < last {
                tracing::warn!(doc_id, last, "document added out of id order");
            }
        }
        self.last_doc = Some(self.last_doc.map_or(doc_id, |last| last.max(doc_id)));
        for term in terms {
            let ids = self.postings.entry(term).or_default();
            match ids.last() {
                Some(&last) if last == doc_id => {}
                Some(&last) if last > doc_id => {
                    if let Err(pos) = ids.binary_search(&doc_id) {
                        ids.insert(pos, doc_id);
                    }
                }
                _ => ids.push(doc_id),
            }
        }
    }

    /// Build over `partitions` contiguous chunks in parallel and merge the
    /// partial indexes. Ids must already be assigned.
    pub fn build_parallel(analyzer: &Analyzer, docs: &[Document], partitions: usize) -> Self {
        let chunk = docs.len().div_ceil(partitions.max(1)).max(1);
        let partials: Vec<InvertedIndex> = docs
            .par_chunks(chunk)
            .map(|part| {
                let mut idx = InvertedIndex::new();
                idx.add(analyzer, part);
                idx
            })
            .collect();
        partials.into_iter().fold(InvertedIndex::new(), |mut acc, part| {
            acc.merge(part);
            acc
        })
    }

    /// Union another index into this one, term by term.
    pub fn merge(&mut self, other: InvertedIndex) {
        for (term, ids) in other.postings {
            match self.postings.get_mut(&term) {
                Some(existing) => *existing = union(existing, &ids),
                None => {
                    self.postings.insert(term, ids);
                }
            }
        }
        self.last_doc = match (self.last_doc, other.last_doc) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }

    pub fn postings(&self, term: &str) -> Option<&[DocId]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DocId])> {
        self.postings.iter().map(|(t, ids)| (t.as_str(), ids.as_slice()))
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }

    pub fn num_postings(&self) -> usize { self.postings.values().map(Vec::len).sum() }
}
