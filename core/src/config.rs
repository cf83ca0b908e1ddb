use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Which index implementation backs the query runner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexVariant {
    /// Exact-match dictionary, no wildcard support.
    Inverted,
    /// Rotated dictionary entries in a prefix trie, supports `*` queries.
    #[default]
    Permuterm,
}

/// Backing trie for the permuterm index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrieKind {
    #[default]
    Compact,
    Simple,
}

/// Normalization settings shared by index construction and query terms.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub stop_words: Vec<String>,
    /// Fold umlauts and sharp s to their two-letter ASCII spelling.
    pub fold_diacritics: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            stop_words: ["der", "die", "das", "den", "dem", "des", "ein", "eine"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            fold_diacritics: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub variant: IndexVariant,
    pub trie: TrieKind,
    /// Field separator of delimited document files.
    pub delimiter: char,
    pub analyzer: AnalyzerConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            variant: IndexVariant::default(),
            trie: TrieKind::default(),
            delimiter: '\t',
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
        let config = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SearchConfig = serde_json::from_str(r#"{"variant":"inverted","delimiter":","}"#).unwrap();
        assert_eq!(config.variant, IndexVariant::Inverted);
        assert_eq!(config.trie, TrieKind::Compact);
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.analyzer.stop_words.len(), 8);
        assert!(config.analyzer.fold_diacritics);
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search.json");
        std::fs::write(&path, r#"{"trie":"simple","analyzer":{"stop_words":["und"]}}"#).unwrap();
        let config = SearchConfig::from_json_file(&path).unwrap();
        assert_eq!(config.trie, TrieKind::Simple);
        assert_eq!(config.analyzer.stop_words, vec!["und".to_string()]);
        assert!(config.analyzer.fold_diacritics);
    }
}
