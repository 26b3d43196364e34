//! Linear scans over raw document text. These bypass the index entirely and
//! match exact text rather than analyzed terms.

use crate::corpus::Document;
use crate::index::DocId;
use regex::RegexBuilder;

/// Documents whose text contains `needle` verbatim (case-sensitive).
pub fn scan_contains(docs: &[Document], needle: &str) -> Vec<DocId> {
    docs.iter().filter(|d| d.text.contains(needle)).map(|d| d.id).collect()
}

/// Documents whose text matches `pattern` as a whole word, ignoring case.
/// `pattern` is a regular expression.
pub fn scan_regex(docs: &[Document], pattern: &str) -> Result<Vec<DocId>, regex::Error> {
    let re = RegexBuilder::new(&format!(r"\b(?:{pattern})\b")).case_insensitive(true).build()?;
    Ok(docs.iter().filter(|d| re.is_match(&d.text)).map(|d| d.id).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Document> {
        vec![
            Document::new(0, "a".into(), String::new(), "A donut on a glass plate. Only the donuts.".into()),
            Document::new(1, "b".into(), String::new(), "Donut is a donut".into()),
            Document::new(2, "c".into(), String::new(), "doughnut".into()),
        ]
    }

    #[test]
    fn contains_is_case_sensitive_substring() {
        assert_eq!(scan_contains(&corpus(), "donut"), vec![0, 1]);
        assert_eq!(scan_contains(&corpus(), "Donut"), vec![1]);
        assert_eq!(scan_contains(&corpus(), "nut"), vec![0, 1, 2]);
    }

    #[test]
    fn regex_matches_whole_words() {
        assert_eq!(scan_regex(&corpus(), "DONUT").unwrap(), vec![0, 1]);
        assert_eq!(scan_regex(&corpus(), "donuts?|doughnut").unwrap(), vec![0, 1, 2]);
        assert!(scan_regex(&corpus(), "nut").unwrap().is_empty());
        assert!(scan_regex(&corpus(), "(").is_err());
    }
}
