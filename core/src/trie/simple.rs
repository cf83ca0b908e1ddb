use std::collections::HashMap;

use super::{sort_matches, PrefixMatch, PrefixTrie};
use crate::dictionary::PostingListId;

const ROOT: usize = 0;

/// One node per character.
#[derive(Debug, Clone)]
pub struct SimpleTrie {
    nodes: Vec<Node>,
    terms: usize,
}

#[derive(Debug, Clone, Default)]
struct Node {
    posting_list_id: Option<PostingListId>,
    children: HashMap<char, usize>,
}

impl Default for SimpleTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleTrie {
    pub fn new() -> Self {
        Self { nodes: vec![Node::default()], terms: 0 }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn follow(&self, prefix: &str) -> Option<usize> {
        prefix.chars().try_fold(ROOT, |node, ch| self.nodes[node].children.get(&ch).copied())
    }
}

impl PrefixTrie for SimpleTrie {
    fn insert(&mut self, term: &str, posting_list_id: PostingListId) {
        let mut current = ROOT;
        for ch in term.chars() {
            current = match self.nodes[current].children.get(&ch) {
                Some(&idx) => idx,
                None => {
                    self.nodes.push(Node::default());
                    let idx = self.nodes.len() - 1;
                    self.nodes[current].children.insert(ch, idx);
                    idx
                }
            };
        }
        if self.nodes[current].posting_list_id.replace(posting_list_id).is_none() {
            self.terms += 1;
        }
    }

    fn find_exact(&self, term: &str) -> Option<PostingListId> {
        self.follow(term).and_then(|node| self.nodes[node].posting_list_id)
    }

    fn find_with_prefix(&self, prefix: &str) -> Vec<PrefixMatch> {
        let Some(start) = self.follow(prefix) else {
            return Vec::new();
        };
        let mut matches = Vec::new();
        let mut stack = vec![(start, prefix.to_string())];
        while let Some((node, path)) = stack.pop() {
            for (&ch, &child) in &self.nodes[node].children {
                let mut child_path = path.clone();
                child_path.push(ch);
                stack.push((child, child_path));
            }
            if let Some(posting_list_id) = self.nodes[node].posting_list_id {
                matches.push(PrefixMatch { term: path, posting_list_id });
            }
        }
        sort_matches(matches)
    }

    fn len(&self) -> usize {
        self.terms
    }
}
