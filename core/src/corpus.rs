use crate::error::CorpusError;
use crate::index::{DocId, DocMeta};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub url: String,
    pub text: String,
}

impl Document {
    pub fn new(id: DocId, title: String, url: String, text: String) -> Self {
        Self { id, title, url, text }
    }

    pub fn meta(&self) -> DocMeta {
        DocMeta { title: self.title.clone(), url: self.url.clone() }
    }
}

/// One record as it appears in the source, before an id is assigned.
#[derive(Debug, Deserialize)]
struct InputDoc {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(rename = "abstract", alias = "body", alias = "text", default)]
    text: String,
}

/// Wikipedia abstract dump: `<feed><doc>...</doc>...</feed>`.
#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "doc", default)]
    docs: Vec<InputDoc>,
}

/// Load a corpus file (`.xml`, `.json`, `.jsonl`) or a directory of them.
/// Ids are assigned from 0 in file order; directories are walked in sorted
/// path order so the assignment is stable.
pub fn load_documents<P: AsRef<Path>>(path: P) -> Result<Vec<Document>, CorpusError> {
    let path = path.as_ref();
    let mut files: Vec<PathBuf> = Vec::new();
    if path.is_dir() {
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            let p = entry.path();
            if p.is_file() && matches!(extension(p), Some("xml" | "json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else {
        files.push(path.to_path_buf());
    }

    let mut records = Vec::new();
    for file in &files {
        read_records(file, &mut records)?;
    }
    let docs = records
        .into_iter()
        .enumerate()
        .map(|(i, r)| doc_id(i).map(|id| Document::new(id, r.title, r.url, r.text)))
        .collect::<Result<Vec<_>, CorpusError>>()?;
    tracing::info!(num_docs = docs.len(), files = files.len(), "loaded corpus");
    Ok(docs)
}

/// Id for the document at position `index` of the corpus.
pub fn doc_id(index: usize) -> Result<DocId, CorpusError> {
    DocId::try_from(index).map_err(|_| CorpusError::TooManyDocuments(index.saturating_add(1)))
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|s| s.to_str())
}

fn read_records(file: &Path, out: &mut Vec<InputDoc>) -> Result<(), CorpusError> {
    let io_err = |source| CorpusError::Io { path: file.to_path_buf(), source };
    let reader = BufReader::new(File::open(file).map_err(io_err)?);
    match extension(file) {
        Some("xml") => {
            let feed: Feed = quick_xml::de::from_reader(reader)
                .map_err(|source| CorpusError::Xml { path: file.to_path_buf(), source })?;
            out.extend(feed.docs);
        }
        Some("jsonl") => {
            for (n, line) in reader.lines().enumerate() {
                let line = line.map_err(io_err)?;
                if line.trim().is_empty() { continue; }
                let doc: InputDoc = serde_json::from_str(&line)
                    .map_err(|source| CorpusError::JsonLine { path: file.to_path_buf(), line: n + 1, source })?;
                out.push(doc);
            }
        }
        Some("json") => {
            let json_err = |source| CorpusError::Json { path: file.to_path_buf(), source };
            let json: serde_json::Value = serde_json::from_reader(reader).map_err(json_err)?;
            match json {
                serde_json::Value::Array(arr) => {
                    for v in arr {
                        out.push(serde_json::from_value(v).map_err(json_err)?);
                    }
                }
                other => out.push(serde_json::from_value(other).map_err(json_err)?),
            }
        }
        _ => return Err(CorpusError::UnsupportedFormat(file.to_path_buf())),
    }
    Ok(())
}

/// SHA-1 over every document's title, url and text, in id order.
pub fn fingerprint(docs: &[Document]) -> String {
    let mut hasher = Sha1::new();
    for doc in docs {
        for field in [&doc.title, &doc.url, &doc.text] {
            hasher.update(field.as_bytes());
            hasher.update([0u8]);
        }
    }
    format!("{:x}", hasher.finalize())
}
