use crate::document::DocId;
use crate::error::Result;
use crate::index::{Index, TermMatch};

/// Boolean queries over any [`Index`].
pub struct QueryRunner<'a, I: Index + ?Sized> {
    index: &'a I,
}

impl<'a, I: Index + ?Sized> QueryRunner<'a, I> {
    pub fn new(index: &'a I) -> Self {
        Self { index }
    }

    /// Documents containing `term`. A wildcard term matching several
    /// dictionary entries yields the union of their posting lists.
    pub fn query(&self, term: &str) -> Result<Vec<DocId>> {
        let matches = self.index.lookup(term)?;
        Ok(merge_matches(&matches))
    }

    /// Documents containing both terms.
    pub fn query_and(&self, first: &str, second: &str) -> Result<Vec<DocId>> {
        let left = self.query(first)?;
        let right = self.query(second)?;
        let hits = intersect(&left, &right);
        tracing::debug!(first, second, left = left.len(), right = right.len(), hits = hits.len(), "and query");
        Ok(hits)
    }
}

fn merge_matches(matches: &[TermMatch<'_>]) -> Vec<DocId> {
    match matches {
        [] => Vec::new(),
        [only] => only.postings.to_vec(),
        [first, rest @ ..] => rest.iter().fold(first.postings.to_vec(), |acc, m| union(&acc, m.postings)),
    }
}

/// Intersection of two strictly ascending lists.
pub fn intersect(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    intersect_counted(a, b).0
}

/// Intersection plus the number of cursor advances it took.
pub(crate) fn intersect_counted(a: &[DocId], b: &[DocId]) -> (Vec<DocId>, usize) {
    let mut out = Vec::new();
    let mut i = 0usize;
    let mut j = 0usize;
    let mut steps = 0usize;
    while i < a.len() && j < b.len() {
        let x = a[i];
        let y = b[j];
        if x == y {
            out.push(x);
            i += 1;
            j += 1;
            steps += 2;
        } else if x < y {
            i += 1;
            steps += 1;
        } else {
            j += 1;
            steps += 1;
        }
    }
    (out, steps)
}

/// Union of two strictly ascending lists, itself strictly ascending.
pub fn union(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let mut i = 0usize;
    let mut j = 0usize;
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            out.push(a[i]);
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            out.push(a[i]);
            i += 1;
        } else {
            out.push(b[j]);
            j += 1;
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::error::SearchError;
    use proptest::prelude::*;
    use std::collections::{BTreeSet, HashMap};

    /// Fixed term -> posting list table.
    struct FakeIndex {
        lists: HashMap<&'static str, Vec<(&'static str, Vec<DocId>)>>,
    }

    impl FakeIndex {
        fn new(entries: Vec<(&'static str, Vec<DocId>)>) -> Self {
            let lists = entries.into_iter().map(|(term, ids)| (term, vec![(term, ids)])).collect();
            Self { lists }
        }
    }

    impl Index for FakeIndex {
        fn lookup(&self, raw_term: &str) -> Result<Vec<TermMatch<'_>>> {
            Ok(self
                .lists
                .get(raw_term)
                .map(|entries| {
                    entries.iter().map(|(term, ids)| TermMatch { term: term.to_string(), postings: ids }).collect()
                })
                .unwrap_or_default())
        }

        fn document(&self, id: DocId) -> Result<&Document> {
            Err(SearchError::DocumentNotFound(id))
        }
    }

    fn fake() -> FakeIndex {
        FakeIndex::new(vec![
            ("test", vec![1, 2, 4, 5, 6, 8, 9]),
            ("example", vec![2, 4, 6, 7, 9, 10]),
            ("document", vec![1, 3, 7, 9, 10]),
            ("disjoint", vec![11, 12]),
        ])
    }

    #[test]
    fn single_term() {
        let index = fake();
        let runner = QueryRunner::new(&index);
        let result = runner.query("example").unwrap();
        assert_eq!(result.len(), 6);
        assert_eq!(result[3], 7);
        assert!(runner.query("absent").unwrap().is_empty());
    }

    #[test]
    fn two_terms() {
        let index = fake();
        let runner = QueryRunner::new(&index);
        assert_eq!(runner.query_and("example", "test").unwrap(), vec![2, 4, 6, 9]);
        assert_eq!(runner.query_and("test", "example").unwrap(), vec![2, 4, 6, 9]);
        assert!(runner.query_and("example", "disjoint").unwrap().is_empty());
        assert!(runner.query_and("absent", "test").unwrap().is_empty());
    }

    #[test]
    fn runner_over_trait_object() {
        let index = fake();
        let dyn_index: &dyn Index = &index;
        let runner = QueryRunner::new(dyn_index);
        assert_eq!(runner.query_and("document", "test").unwrap(), vec![1, 9]);
    }

    #[test]
    fn wildcard_matches_are_merged() {
        let mut index = fake();
        index.lists.insert("ex*", vec![("$example", vec![2, 4, 6]), ("$exit", vec![1, 4, 20])]);
        let runner = QueryRunner::new(&index);
        assert_eq!(runner.query("ex*").unwrap(), vec![1, 2, 4, 6, 20]);
        assert_eq!(runner.query_and("ex*", "document").unwrap(), vec![1]);
    }

    #[test]
    fn union_of_sorted_lists() {
        assert_eq!(union(&[1, 3, 5], &[2, 3, 6, 7]), vec![1, 2, 3, 5, 6, 7]);
        assert_eq!(union(&[], &[4]), vec![4]);
    }

    fn sorted_unique() -> impl Strategy<Value = Vec<DocId>> {
        prop::collection::btree_set(0u32..200, 0..60).prop_map(|s| s.into_iter().collect())
    }

    proptest! {
        #[test]
        fn intersection_matches_brute_force(a in sorted_unique(), b in sorted_unique()) {
            let expected: Vec<DocId> = a.iter().copied().filter(|x| b.contains(x)).collect();
            let (got, steps) = intersect_counted(&a, &b);
            prop_assert_eq!(got, expected);
            prop_assert!(steps <= a.len() + b.len());
        }

        #[test]
        fn union_matches_set_union(a in sorted_unique(), b in sorted_unique()) {
            let expected: Vec<DocId> = a.iter().chain(b.iter()).copied().collect::<BTreeSet<_>>().into_iter().collect();
            prop_assert_eq!(union(&a, &b), expected);
        }
    }
}
