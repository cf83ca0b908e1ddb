//! Permuterm index: every rotation of every `$`-terminated term is stored in
//! a prefix trie, so a query with wildcards can be rotated until its single
//! wildcard trails and then answered with one prefix search.

use crate::dictionary::TermDictionary;
use crate::document::{DocId, Document, DocumentStore};
use crate::error::{Result, SearchError};
use crate::index::{group_terms, Index, TermMatch};
use crate::tokenizer::Analyzer;
use crate::trie::{CompactTrie, PrefixTrie};

/// Marks the end of a term inside its rotations.
pub const TERMINATOR: char = '$';
/// Matches any sequence of characters in a query.
pub const WILDCARD: char = '*';

/// Rewrite a normalized query so that its wildcard, if any, is the last
/// character and the term end is marked with [`TERMINATOR`].
///
/// | query  | rotated |
/// |--------|---------|
/// | `X`    | `X$`    |
/// | `X*`   | `$X*`   |
/// | `*X`   | `X$*`   |
/// | `X*Y`  | `Y$X*`  |
/// | `*X*`  | `X*`    |
///
/// A query containing [`TERMINATOR`] is rejected, since its prefix would
/// reach across the term boundary of stored rotations.
pub fn rotate(term: &str) -> Result<String> {
    if term.contains(TERMINATOR) {
        return Err(SearchError::ReservedCharacter { term: term.to_string(), ch: TERMINATOR });
    }
    let wildcards = term.matches(WILDCARD).count();
    let leading = term.starts_with(WILDCARD);
    let trailing = term.ends_with(WILDCARD);
    let invalid = |reason| SearchError::InvalidWildcardPattern { pattern: term.to_string(), reason };

    match wildcards {
        0 => Ok(format!("{term}{TERMINATOR}")),
        1 if trailing => Ok(format!("{TERMINATOR}{term}")),
        1 if leading => Ok(format!("{}{TERMINATOR}{WILDCARD}", &term[1..])),
        1 => {
            let (head, tail) = term.split_once(WILDCARD).unwrap_or((term, ""));
            Ok(format!("{tail}{TERMINATOR}{head}{WILDCARD}"))
        }
        2 if leading && trailing && term.len() > 2 => Ok(term[1..].to_string()),
        2 if leading && trailing => Err(invalid("wildcards enclose an empty term")),
        2 => Err(invalid("two wildcards must sit at both ends of the term")),
        _ => Err(invalid("at most two wildcards are supported")),
    }
}

/// Move the first `k` characters of `s` to its end.
pub fn rotate_left(s: &str, k: usize) -> String {
    let n = s.chars().count();
    if n == 0 {
        return String::new();
    }
    let split = s.char_indices().nth(k % n).map_or(s.len(), |(i, _)| i);
    format!("{}{}", &s[split..], &s[..split])
}

/// All rotations of `terminated`, starting with the string itself. Each next
/// rotation moves the first character to the end.
pub fn rotations(terminated: &str) -> Vec<String> {
    let mut current = terminated.to_string();
    let mut out = Vec::with_capacity(terminated.len());
    for _ in 0..terminated.chars().count() {
        let next = rotate_left(&current, 1);
        out.push(current);
        current = next;
    }
    out
}

/// Recover the plain term from a rotated dictionary key, e.g. `em$lor` ->
/// `lorem`. Keys without a terminator are returned unchanged.
pub fn unrotate(key: &str) -> String {
    match key.split_once(TERMINATOR) {
        Some((before, after)) => format!("{after}{before}"),
        None => key.to_string(),
    }
}

/// Wildcard-capable index over a prefix trie of term rotations.
#[derive(Debug)]
pub struct PermutermIndex<T: PrefixTrie = CompactTrie> {
    trie: T,
    dictionary: TermDictionary,
    docs: DocumentStore,
    analyzer: Analyzer,
}

impl<T: PrefixTrie> PermutermIndex<T> {
    /// Fails when a normalized term contains [`TERMINATOR`] or [`WILDCARD`].
    pub fn build(documents: Vec<Document>, analyzer: Analyzer) -> Result<Self> {
        let mut index = Self {
            trie: T::default(),
            dictionary: TermDictionary::new(),
            docs: DocumentStore::new(documents),
            analyzer,
        };
        for (term, doc_ids) in group_terms(index.docs.iter(), &index.analyzer) {
            index.add_term(&term, &doc_ids)?;
        }
        tracing::info!(
            num_docs = index.docs.len(),
            num_posting_lists = index.dictionary.posting_list_count(),
            num_rotations = index.dictionary.len(),
            "built permuterm index"
        );
        Ok(index)
    }

    /// Store `term` under all its rotations, all pointing at one posting list.
    fn add_term(&mut self, term: &str, doc_ids: &[DocId]) -> Result<()> {
        if let Some(ch) = term.chars().find(|&c| c == TERMINATOR || c == WILDCARD) {
            return Err(SearchError::ReservedCharacter { term: term.to_string(), ch });
        }
        let terminated = format!("{term}{TERMINATOR}");
        let posting_list_id = self.dictionary.add_or_merge(&terminated, doc_ids);
        for rotation in rotations(&terminated) {
            self.dictionary.link(&rotation, posting_list_id);
            self.trie.insert(&rotation, posting_list_id);
        }
        Ok(())
    }

    pub fn dictionary(&self) -> &TermDictionary {
        &self.dictionary
    }

    pub fn trie(&self) -> &T {
        &self.trie
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }
}

impl<T: PrefixTrie> Index for PermutermIndex<T> {
    fn lookup(&self, raw_term: &str) -> Result<Vec<TermMatch<'_>>> {
        let Some(term) = self.analyzer.normalizer().normalize_term(raw_term) else {
            return Ok(Vec::new());
        };
        let rotated = rotate(&term)?;
        let matches: Vec<TermMatch<'_>> = match rotated.strip_suffix(WILDCARD) {
            Some(prefix) => self
                .trie
                .find_with_prefix(prefix)
                .into_iter()
                .filter_map(|m| {
                    let postings = self.dictionary.postings(m.posting_list_id)?;
                    Some(TermMatch { term: m.term, postings })
                })
                .collect(),
            None => self
                .trie
                .find_exact(&rotated)
                .and_then(|id| self.dictionary.postings(id))
                .map(|postings| TermMatch { term: rotated.clone(), postings })
                .into_iter()
                .collect(),
        };
        tracing::debug!(%term, %rotated, matches = matches.len(), "permuterm lookup");
        Ok(matches)
    }

    fn document(&self, id: DocId) -> Result<&Document> {
        self.docs.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryRunner;
    use crate::trie::SimpleTrie;
    use proptest::prelude::*;

    #[test]
    fn rotate_queries() {
        assert_eq!(rotate("X").unwrap(), "X$");
        assert_eq!(rotate("X*").unwrap(), "$X*");
        assert_eq!(rotate("*X").unwrap(), "X$*");
        assert_eq!(rotate("*X*").unwrap(), "X*");
        assert_eq!(rotate("X*Y").unwrap(), "Y$X*");

        assert_eq!(rotate("test").unwrap(), "test$");
        assert_eq!(rotate("test*").unwrap(), "$test*");
        assert_eq!(rotate("*test").unwrap(), "test$*");
        assert_eq!(rotate("*test*").unwrap(), "test*");
        assert_eq!(rotate("test*example").unwrap(), "example$test*");
    }

    #[test]
    fn rotate_rejects_bad_wildcards() {
        for pattern in ["a*b*c", "*a*b", "a**", "**a", "*a*b*", "****", "**"] {
            assert!(
                matches!(rotate(pattern), Err(SearchError::InvalidWildcardPattern { .. })),
                "{pattern} should be rejected"
            );
        }
    }

    #[test]
    fn enclosing_wildcards_need_a_term() {
        let err = rotate("**").unwrap_err();
        assert_eq!(
            err,
            SearchError::InvalidWildcardPattern {
                pattern: "**".into(),
                reason: "wildcards enclose an empty term"
            }
        );
    }

    #[test]
    fn rotate_rejects_terminator() {
        for pattern in ["$", "a$b", "*m$l*", "*em$*", "lo$*"] {
            assert_eq!(
                rotate(pattern),
                Err(SearchError::ReservedCharacter { term: pattern.into(), ch: TERMINATOR })
            );
        }
    }

    #[test]
    fn lone_wildcard_matches_everything() {
        assert_eq!(rotate("*").unwrap(), "$*");
    }

    #[test]
    fn rotations_of_terminated_term() {
        assert_eq!(rotations("ab$"), vec!["ab$", "b$a", "$ab"]);
        assert_eq!(rotations("äb$"), vec!["äb$", "b$ä", "$äb"]);
        assert!(rotations("").is_empty());
    }

    #[test]
    fn unrotate_keys() {
        assert_eq!(unrotate("em$lor"), "lorem");
        assert_eq!(unrotate("$lorem"), "lorem");
        assert_eq!(unrotate("lorem$"), "lorem");
        assert_eq!(unrotate("plain"), "plain");
    }

    proptest! {
        #[test]
        fn rotation_round_trip(term in "[a-zäöü0-9]{0,10}", k in 0usize..32) {
            let terminated = format!("{term}{TERMINATOR}");
            let n = terminated.chars().count();
            let all = rotations(&terminated);
            prop_assert_eq!(all.len(), n);
            for (i, rotation) in all.iter().enumerate() {
                prop_assert_eq!(rotation, &rotate_left(&terminated, i));
                prop_assert_eq!(rotate_left(rotation, n - i), terminated.clone());
                prop_assert_eq!(unrotate(rotation), term.clone());
            }
            let shifted = rotate_left(&terminated, k);
            prop_assert_eq!(rotate_left(&shifted, n - k % n), terminated);
        }
    }

    fn corpus() -> Vec<Document> {
        vec![
            Document::new(1, "Test document number 1. Ut enim ad minim veniam. Look."),
            Document::new(2, "Test document number 2. Lorem ipsum."),
            Document::new(3, "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor."),
        ]
    }

    #[test]
    fn exact_query_without_wildcard() {
        let index: PermutermIndex = PermutermIndex::build(corpus(), Analyzer::default()).unwrap();
        let matches = index.lookup("Lorem").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].term, "lorem$");
        assert_eq!(matches[0].postings, &[2, 3]);
    }

    #[test]
    fn trailing_wildcard() {
        let index: PermutermIndex = PermutermIndex::build(corpus(), Analyzer::default()).unwrap();
        let matches = index.lookup("Lo*").unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].term, "$look");
        assert_eq!(matches[0].postings, &[1]);
        assert_eq!(matches[1].term, "$lorem");
        assert_eq!(matches[1].postings, &[2, 3]);
    }

    #[test]
    fn leading_middle_and_enclosing_wildcards() {
        let index: PermutermIndex = PermutermIndex::build(corpus(), Analyzer::default()).unwrap();

        let ending: Vec<String> = index.lookup("*um").unwrap().into_iter().map(|m| unrotate(&m.term)).collect();
        assert_eq!(ending, vec!["ipsum"]);

        let middle: Vec<String> = index.lookup("d*r").unwrap().into_iter().map(|m| unrotate(&m.term)).collect();
        assert_eq!(middle, vec!["dolor"]);

        let inner = index.lookup("*psu*").unwrap();
        assert_eq!(inner.len(), 1);
        assert_eq!(unrotate(&inner[0].term), "ipsum");
        assert_eq!(inner[0].postings, &[2, 3]);
    }

    #[test]
    fn invalid_pattern_surfaces() {
        let index: PermutermIndex = PermutermIndex::build(corpus(), Analyzer::default()).unwrap();
        assert!(matches!(index.lookup("l*r*m"), Err(SearchError::InvalidWildcardPattern { .. })));
        assert!(index.lookup("missing").unwrap().is_empty());
        assert!(index.lookup("*").unwrap().is_empty());
    }

    #[test]
    fn terminator_in_query_does_not_cross_rotations() {
        let docs = vec![Document::new(1, "lorem"), Document::new(2, "ipsum")];
        let index: PermutermIndex = PermutermIndex::build(docs, Analyzer::default()).unwrap();
        let runner = QueryRunner::new(&index);
        for query in ["*m$l*", "*em$*"] {
            assert_eq!(
                runner.query(query),
                Err(SearchError::ReservedCharacter { term: query.into(), ch: '$' })
            );
        }
        assert_eq!(runner.query("*em*").unwrap(), vec![1]);
    }

    #[test]
    fn all_rotations_share_one_posting_list() {
        let index: PermutermIndex = PermutermIndex::build(corpus(), Analyzer::default()).unwrap();
        let dict = index.dictionary();
        let id = dict.entry("lorem$").unwrap().posting_list_id;
        for rotation in rotations("lorem$") {
            assert_eq!(dict.entry(&rotation).unwrap().posting_list_id, id);
            assert_eq!(index.trie().find_exact(&rotation), Some(id));
        }
    }

    #[test]
    fn reserved_characters_fail_the_build() {
        let tokenizer = crate::tokenizer::Tokenizer::new(char::is_whitespace, char::is_whitespace);
        let analyzer = Analyzer::new(tokenizer, Default::default());
        let err = PermutermIndex::<CompactTrie>::build(vec![Document::new(1, "price $5")], analyzer).unwrap_err();
        assert_eq!(err, SearchError::ReservedCharacter { term: "$5".into(), ch: '$' });
    }

    #[test]
    fn simple_trie_backing_agrees() {
        let compact: PermutermIndex = PermutermIndex::build(corpus(), Analyzer::default()).unwrap();
        let simple: PermutermIndex<SimpleTrie> = PermutermIndex::build(corpus(), Analyzer::default()).unwrap();
        for query in ["lo*", "*um", "d*r", "*i*", "test", "nothing*"] {
            assert_eq!(compact.lookup(query).unwrap(), simple.lookup(query).unwrap(), "{query}");
        }
    }
}
