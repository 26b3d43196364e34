use crate::index::{DocId, InvertedIndex};
use crate::postings::intersect;
use crate::tokenizer::Analyzer;
use std::borrow::Cow;
use std::convert::Infallible;

/// Anything that can hand out the posting list of a term. An absent term
/// yields an empty list.
pub trait PostingSource {
    type Error;

    fn postings(&self, term: &str) -> Result<Cow<'_, [DocId]>, Self::Error>;
}

impl PostingSource for InvertedIndex {
    type Error = Infallible;

    fn postings(&self, term: &str) -> Result<Cow<'_, [DocId]>, Infallible> {
        Ok(Cow::Borrowed(InvertedIndex::postings(self, term).unwrap_or(&[])))
    }
}

/// AND over the terms' posting lists. No terms matches nothing, and the
/// fold stops at the first term without postings.
pub fn conjunction<S>(source: &S, terms: &[String]) -> Result<Vec<DocId>, S::Error>
where
    S: PostingSource + ?Sized,
{
    let mut terms = terms.iter();
    let Some(first) = terms.next() else {
        return Ok(Vec::new());
    };
    let mut result = source.postings(first)?.into_owned();
    for term in terms {
        if result.is_empty() {
            break;
        }
        let ids = source.postings(term)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        result = intersect(&result, &ids);
    }
    Ok(result)
}

/// Answers free-text queries against a posting source.
pub struct QueryEngine<S> {
    analyzer: Analyzer,
    source: S,
}

impl<S: PostingSource> QueryEngine<S> {
    pub fn new(analyzer: Analyzer, source: S) -> Self {
        Self { analyzer, source }
    }

    pub fn search(&self, query: &str) -> Result<Vec<DocId>, S::Error> {
        let terms = self.analyzer.analyze(query);
        let result = conjunction(&self.source, &terms)?;
        tracing::debug!(?terms, hits = result.len(), "query");
        Ok(result)
    }

    pub fn analyzer(&self) -> &Analyzer { &self.analyzer }

    pub fn source(&self) -> &S { &self.source }
}

impl QueryEngine<InvertedIndex> {
    pub fn search_in_memory(&self, query: &str) -> Vec<DocId> {
        match self.search(query) {
            Ok(ids) => ids,
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    struct CountingSource {
        lists: HashMap<String, Vec<DocId>>,
        lookups: RefCell<Vec<String>>,
    }

    impl PostingSource for CountingSource {
        type Error = Infallible;

        fn postings(&self, term: &str) -> Result<Cow<'_, [DocId]>, Infallible> {
            self.lookups.borrow_mut().push(term.to_string());
            Ok(Cow::Borrowed(self.lists.get(term).map(Vec::as_slice).unwrap_or(&[])))
        }
    }

    #[test]
    fn missing_term_stops_the_fold() {
        let source = CountingSource {
            lists: HashMap::from([("a".to_string(), vec![1, 2]), ("c".to_string(), vec![2])]),
            lookups: RefCell::new(Vec::new()),
        };
        let terms: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(conjunction(&source, &terms), Ok(vec![]));
        assert_eq!(*source.lookups.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn no_terms_matches_nothing() {
        let source = CountingSource { lists: HashMap::new(), lookups: RefCell::new(Vec::new()) };
        assert_eq!(conjunction(&source, &[]), Ok(vec![]));
        assert!(source.lookups.borrow().is_empty());
    }
}
