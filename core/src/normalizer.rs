use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

use crate::config::AnalyzerConfig;

lazy_static! {
    static ref ALNUM: Regex = Regex::new(r"[\p{L}\p{N}]").expect("valid regex");
}

const FOLDS: [(char, &str); 4] = [('ü', "ue"), ('ä', "ae"), ('ö', "oe"), ('ß', "ss")];

/// Turns raw tokens into dictionary terms. The same normalizer must be used
/// for building an index and for the terms queried against it.
#[derive(Debug, Clone)]
pub struct Normalizer {
    stop_words: HashSet<String>,
    fold_diacritics: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&AnalyzerConfig::default())
    }
}

impl Normalizer {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            stop_words: config.stop_words.iter().map(|w| w.to_lowercase()).collect(),
            fold_diacritics: config.fold_diacritics,
        }
    }

    /// Normalize one token, `None` if it is dropped.
    pub fn normalize_term(&self, token: &str) -> Option<String> {
        let composed: String = token.nfc().collect();
        let mut term = composed.trim().to_lowercase();
        if self.fold_diacritics {
            term = fold(&term);
        }
        if !ALNUM.is_match(&term) || self.stop_words.contains(&term) {
            return None;
        }
        Some(term)
    }

    /// Normalize a token sequence into distinct terms, first occurrence first.
    pub fn normalize<I, S>(&self, tokens: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut terms = Vec::new();
        for token in tokens {
            if let Some(term) = self.normalize_term(token.as_ref()) {
                if seen.insert(term.clone()) {
                    terms.push(term);
                }
            }
        }
        terms
    }
}

fn fold(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        match FOLDS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_punctuation_and_blank_tokens() {
        let terms = Normalizer::default().normalize(["This", "is", "a", "sentence", ".", " "]);
        assert_eq!(terms, vec!["this", "is", "a", "sentence"]);
    }

    #[test]
    fn folds_german_characters() {
        let tokens = ["Straße", "München", ".", "Fußgängerübergänge", "Größenmaßstäbe"];
        let terms = Normalizer::default().normalize(tokens);
        assert_eq!(terms, vec!["strasse", "muenchen", "fussgaengeruebergaenge", "groessenmassstaebe"]);
    }

    #[test]
    fn composes_before_folding() {
        // "u" followed by a combining diaeresis
        let decomposed = "Mu\u{308}nchen";
        assert_eq!(Normalizer::default().normalize_term(decomposed).as_deref(), Some("muenchen"));
    }

    #[test]
    fn removes_stop_words_and_duplicates() {
        let terms = Normalizer::default().normalize(["Der", "Hund", "der", "hund", "EINE", "Katze"]);
        assert_eq!(terms, vec!["hund", "katze"]);
    }

    #[test]
    fn folding_can_be_disabled() {
        let config = AnalyzerConfig { stop_words: Vec::new(), fold_diacritics: false };
        let normalizer = Normalizer::new(&config);
        assert_eq!(normalizer.normalize_term(" Weiß ").as_deref(), Some("weiß"));
        assert_eq!(normalizer.normalize_term("der").as_deref(), Some("der"));
    }

    #[test]
    fn wildcards_survive() {
        assert_eq!(Normalizer::default().normalize_term("Lo*").as_deref(), Some("lo*"));
        assert_eq!(Normalizer::default().normalize_term("*"), None);
    }
}
