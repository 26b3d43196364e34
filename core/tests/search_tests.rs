use fts_core::persist::{MemoryStore, PostingStore, SledStore};
use fts_core::postings::is_strictly_increasing;
use fts_core::{Analyzer, DocId, Document, InvertedIndex, QueryEngine};
use tempfile::tempdir;

fn donut_corpus() -> Vec<Document> {
    vec![
        Document::new(0, "Glass plate".into(), "https://example.com/0".into(), "A donut on a glass plate. Only the donuts.".into()),
        Document::new(1, "Donut".into(), "https://example.com/1".into(), "Donut is a donut".into()),
    ]
}

fn larger_corpus() -> Vec<Document> {
    let texts = [
        "The cat sat on the mat",
        "Cats and dogs living together",
        "A dog chased the cat around the garden",
        "Gardens of stone and glass",
        "Running dogs run faster than sitting cats",
        "Stone plates, glass plates and a donut",
        "Nothing here but numbers 1234",
        "the a of",
    ];
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| Document::new(i as DocId, format!("doc {i}"), String::new(), t.to_string()))
        .collect()
}

fn memory_engine(docs: &[Document]) -> QueryEngine<InvertedIndex> {
    let analyzer = Analyzer::default();
    let mut index = InvertedIndex::new();
    index.add(&analyzer, docs);
    QueryEngine::new(analyzer, index)
}

const QUERIES: &[&str] = &[
    "donut", "cat", "cats dogs", "glass plate", "garden", "stone glass", "run dog cat", "the a of", "", "zebra cat", "dog zebra",
];

#[test]
fn donut_scenario() {
    let engine = memory_engine(&donut_corpus());
    assert_eq!(engine.search_in_memory("donut"), vec![0, 1]);
    assert_eq!(engine.search_in_memory("donuts"), vec![0, 1]);
    assert_eq!(engine.search_in_memory("glass donut"), vec![0]);
    assert!(engine.search_in_memory("cat").is_empty());
}

#[test]
fn stopword_only_query_matches_nothing() {
    let engine = memory_engine(&larger_corpus());
    assert!(engine.search_in_memory("the a of").is_empty());
    assert!(engine.search_in_memory("").is_empty());
    assert!(engine.search_in_memory("!!! 42").is_empty());
}

#[test]
fn absent_term_empties_result() {
    let engine = memory_engine(&larger_corpus());
    assert!(!engine.search_in_memory("cat").is_empty());
    assert!(engine.search_in_memory("cat zebra").is_empty());
    assert!(engine.search_in_memory("zebra cat").is_empty());
}

#[test]
fn and_semantics() {
    let engine = memory_engine(&larger_corpus());
    assert_eq!(engine.search_in_memory("cat"), vec![0, 1, 2, 4]);
    assert_eq!(engine.search_in_memory("dog"), vec![1, 2, 4]);
    assert_eq!(engine.search_in_memory("cat dog"), vec![1, 2, 4]);
    assert_eq!(engine.search_in_memory("glass plate"), vec![5]);
}

#[test]
fn postings_stay_strictly_increasing() {
    let engine = memory_engine(&larger_corpus());
    for (_, ids) in engine.source().iter() {
        assert!(is_strictly_increasing(ids));
    }
}

#[test]
fn persisted_search_matches_memory() {
    let docs = larger_corpus();
    let memory = memory_engine(&docs);

    let fake = MemoryStore::new();
    fake.put_index(memory.source()).unwrap();
    let fake = QueryEngine::new(Analyzer::default(), fake);

    let dir = tempdir().unwrap();
    let sled = SledStore::open(dir.path().join("postings")).unwrap();
    sled.put_index(memory.source()).unwrap();
    let sled = QueryEngine::new(Analyzer::default(), sled);

    for q in QUERIES {
        let expected = memory.search_in_memory(q);
        assert_eq!(fake.search(q).unwrap(), expected, "memory store, query {q:?}");
        assert_eq!(sled.search(q).unwrap(), expected, "sled store, query {q:?}");
    }
}

#[test]
fn store_written_in_any_order_still_answers_sorted() {
    let docs = larger_corpus();
    let memory = memory_engine(&docs);
    let analyzer = Analyzer::default();
    let store = MemoryStore::new();
    for doc in docs.iter().rev() {
        for term in analyzer.analyze(&doc.text) {
            store.put(&term, doc.id).unwrap();
        }
    }
    let engine = QueryEngine::new(analyzer, store);
    for q in QUERIES {
        assert_eq!(engine.search(q).unwrap(), memory.search_in_memory(q), "query {q:?}");
    }
}
