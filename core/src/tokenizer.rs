use std::fmt;

use crate::config::AnalyzerConfig;
use crate::normalizer::Normalizer;

type CharRule = Box<dyn Fn(char) -> bool + Send + Sync>;

/// Splits text into raw tokens using two per-character rules.
///
/// Every character matching `split` ends the current token. The splitting
/// character then starts the next token, unless `erase` also matches it, in
/// which case it is dropped. Empty tokens are never emitted.
pub struct Tokenizer {
    split: CharRule,
    erase: CharRule,
}

impl Tokenizer {
    pub fn new<S, E>(split: S, erase: E) -> Self
    where
        S: Fn(char) -> bool + Send + Sync + 'static,
        E: Fn(char) -> bool + Send + Sync + 'static,
    {
        Self { split: Box::new(split), erase: Box::new(erase) }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut start = 0;
        for (i, c) in text.char_indices() {
            if !(self.split)(c) {
                continue;
            }
            if i > start {
                tokens.push(text[start..i].to_string());
            }
            start = if (self.erase)(c) { i + c.len_utf8() } else { i };
        }
        if start < text.len() {
            tokens.push(text[start..].to_string());
        }
        tokens
    }
}

impl Default for Tokenizer {
    /// Split on anything that is not a letter or digit, drop whitespace.
    fn default() -> Self {
        Self::new(|c| !c.is_alphanumeric(), char::is_whitespace)
    }
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer").finish_non_exhaustive()
    }
}

/// Tokenizer and normalizer applied together to document text.
#[derive(Debug, Default)]
pub struct Analyzer {
    tokenizer: Tokenizer,
    normalizer: Normalizer,
}

impl Analyzer {
    pub fn new(tokenizer: Tokenizer, normalizer: Normalizer) -> Self {
        Self { tokenizer, normalizer }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(Tokenizer::default(), Normalizer::new(config))
    }

    /// Distinct normalized terms of `text`, in order of first occurrence.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        self.normalizer.normalize(self.tokenizer.tokenize(text))
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }
}
