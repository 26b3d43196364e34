use fts_core::tokenizer::{analyze, lowercase_filter, tokenize, Analyzer};

#[test]
fn it_normalizes_and_stems() {
    let words = analyze("Running Runners RUN! The donuts.");
    // Stemming to "run" should appear
    assert!(words.contains(&"run".to_string()));
    assert!(words.contains(&"donut".to_string()));
}

#[test]
fn it_filters_stopwords() {
    let words = analyze("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert_eq!(words.len(), 5);
}

#[test]
fn empty_and_letterless_input() {
    assert!(analyze("").is_empty());
    assert!(analyze("1234 !!! -- 5.6").is_empty());
    assert!(analyze("the a of").is_empty());
}

#[test]
fn unicode_letters_are_alphabetic() {
    assert_eq!(tokenize("Ærøskøbing—Zürich, 東京!"), vec!["Ærøskøbing", "Zürich", "東京"]);
    assert_eq!(lowercase_filter(tokenize("ÆRØ ZÜRICH")), vec!["ærø", "zürich"]);
}

#[test]
fn composed_and_decomposed_forms_agree() {
    let analyzer = Analyzer::default();
    assert_eq!(analyzer.analyze("café"), analyzer.analyze("cafe\u{301}"));
}

#[test]
fn tokenize_is_idempotent_on_joined_output() {
    for text in ["A donut on a glass plate. Only the donuts.", "x1y2z3", "  spaced   out\twords\n", ""] {
        let tokens = tokenize(text);
        assert_eq!(tokenize(&tokens.join(" ")), tokens);
    }
}

#[test]
fn stages_are_idempotent() {
    let analyzer = Analyzer::default();
    let tokens = lowercase_filter(tokenize("The quick runners were running past glasses of donuts"));

    let once = analyzer.stopword_filter(tokens.clone());
    assert_eq!(analyzer.stopword_filter(once.clone()), once);

    let stemmed = analyzer.stemmer_filter(once);
    assert_eq!(analyzer.stemmer_filter(stemmed.clone()), stemmed);
    assert_eq!(stemmed, vec!["quick", "runner", "run", "past", "glass", "donut"]);
}

#[test]
fn analysis_is_deterministic() {
    let text = "Donut is a donut";
    assert_eq!(analyze(text), analyze(text));
    assert_eq!(analyze(text), vec!["donut", "donut"]);
    assert_eq!(analyze("donut"), vec!["donut"]);
}

const WORDS: &[&str] = &[
    "universal", "universities", "agreed", "agreement", "being", "having", "generously", "generalization",
    "relational", "conditional", "hopefully", "electricity", "sensitivity", "running", "cried", "happiness",
    "controlling", "national", "nationales", "feed", "agree", "possibly", "organization", "communism",
];

#[test]
fn stemming_twice_equals_stemming_once() {
    let analyzer = Analyzer::default();
    for word in WORDS {
        let once = analyzer.stemmer_filter(vec![word.to_string()]);
        assert_eq!(analyzer.stemmer_filter(once.clone()), once, "word {word:?}");
    }
}

#[test]
fn reanalysis_is_a_no_op() {
    let analyzer = Analyzer::default();
    for word in WORDS {
        let terms = analyzer.analyze(word);
        assert_eq!(analyzer.analyze(&terms.join(" ")), terms, "word {word:?}");
    }
    let text = WORDS.join(" ");
    let terms = analyzer.analyze(&text);
    assert_eq!(analyzer.analyze(&terms.join(" ")), terms);
}

#[test]
fn stems_that_are_stopwords_are_dropped() {
    assert!(analyze("being").is_empty());
    assert!(analyze("having").is_empty());
    assert_eq!(analyze("being agreed"), analyze("agreed"));
}
