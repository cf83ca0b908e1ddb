//! Reading documents from delimited text and JSON files.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::document::{DocId, Document};

const ID: &str = "id";
const URL: &str = "url";
const DATE: &str = "pub_date";
const TITLE: &str = "title";
const TEXT: &str = "news_text";

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: DocId,
    #[serde(default)]
    title: String,
    #[serde(alias = "body", alias = "news_text")]
    text: String,
    #[serde(default, alias = "source")]
    url: Option<String>,
    #[serde(default, alias = "pub_date", alias = "timestamp")]
    date: Option<String>,
}

impl From<InputDoc> for Document {
    fn from(doc: InputDoc) -> Self {
        Document { id: doc.id, source: doc.url, date: doc.date, title: doc.title, text: doc.text }
    }
}

/// Column positions taken from the header line.
struct Columns {
    id: usize,
    url: Option<usize>,
    date: Option<usize>,
    title: Option<usize>,
    text: Option<usize>,
}

impl Columns {
    fn from_header(header: &str, delimiter: char) -> Result<Self> {
        let names: Vec<&str> = header.split(delimiter).map(str::trim).collect();
        let find = |name: &str| names.iter().position(|n| n.eq_ignore_ascii_case(name));
        Ok(Self {
            id: find(ID).with_context(|| format!("header has no {ID:?} column"))?,
            url: find(URL),
            date: find(DATE),
            title: find(TITLE),
            text: find(TEXT),
        })
    }
}

/// Parse delimited text with a header line. Quotes are kept as literal
/// text. Rows without a numeric id are skipped.
pub fn parse_delimited<R: Read>(reader: R, delimiter: char) -> Result<Vec<Document>> {
    let mut lines = BufReader::new(reader).lines();
    let header = loop {
        match lines.next() {
            Some(line) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => return Ok(Vec::new()),
        }
    };
    let columns = Columns::from_header(header.trim_start_matches('\u{feff}'), delimiter)?;

    let mut docs = Vec::new();
    for (row, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(delimiter).collect();
        let cell = |pos: Option<usize>| pos.and_then(|p| fields.get(p)).map(|s| s.trim_end_matches('\r'));
        let optional = |pos: Option<usize>| cell(pos).filter(|s| !s.trim().is_empty()).map(str::to_string);

        let raw_id = cell(Some(columns.id)).unwrap_or_default().trim();
        let Ok(id) = raw_id.parse::<DocId>() else {
            tracing::warn!(row = row + 2, id = raw_id, "skipping row without a numeric id");
            continue;
        };
        docs.push(Document {
            id,
            source: optional(columns.url),
            date: optional(columns.date),
            title: cell(columns.title).unwrap_or_default().to_string(),
            text: cell(columns.text).unwrap_or_default().to_string(),
        });
    }
    Ok(docs)
}

/// One JSON document object per line.
pub fn parse_json_lines<R: Read>(reader: R) -> Result<Vec<Document>> {
    let mut docs = Vec::new();
    for (row, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: InputDoc = serde_json::from_str(&line).with_context(|| format!("line {}", row + 1))?;
        docs.push(doc.into());
    }
    Ok(docs)
}

/// A JSON array of document objects, or a single object.
pub fn parse_json<R: Read>(reader: R) -> Result<Vec<Document>> {
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(reader))?;
    match json {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|v| -> Result<Document> { Ok(serde_json::from_value::<InputDoc>(v)?.into()) })
            .collect(),
        serde_json::Value::Object(_) => Ok(vec![serde_json::from_value::<InputDoc>(json)?.into()]),
        _ => Ok(Vec::new()),
    }
}

/// Load one file, choosing the parser by extension.
pub fn load_file(path: &Path, delimiter: char) -> Result<Vec<Document>> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let docs = match path.extension().and_then(|s| s.to_str()) {
        Some("jsonl") => parse_json_lines(f),
        Some("json") => parse_json(f),
        _ => parse_delimited(f, delimiter),
    }
    .with_context(|| format!("reading documents from {}", path.display()))?;
    tracing::debug!(path = %path.display(), docs = docs.len(), "loaded file");
    Ok(docs)
}

/// Load a file, or every file below a directory in file-name order.
pub fn load_path<P: AsRef<Path>>(path: P, delimiter: char) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let mut files: Vec<PathBuf> = Vec::new();
    if path.is_dir() {
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
    } else {
        files.push(path.to_path_buf());
    }

    let mut docs = Vec::new();
    for file in files {
        docs.extend(load_file(&file, delimiter)?);
    }
    tracing::info!(path = %path.display(), num_docs = docs.len(), "ingested documents");
    Ok(docs)
}
