use std::collections::HashMap;
use std::mem;

use super::{sort_matches, PrefixMatch, PrefixTrie};
use crate::dictionary::PostingListId;

const ROOT: usize = 0;

/// Radix tree: every edge carries a non-empty label and no two children of
/// a node start with the same character. Only the root has an empty label.
#[derive(Debug, Clone)]
pub struct CompactTrie {
    nodes: Vec<Node>,
    terms: usize,
}

#[derive(Debug, Clone, Default)]
struct Node {
    label: String,
    posting_list_id: Option<PostingListId>,
    children: HashMap<char, usize>,
}

impl Default for CompactTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl CompactTrie {
    pub fn new() -> Self {
        Self { nodes: vec![Node::default()], terms: 0 }
    }

    /// Number of allocated nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn add_node(&mut self, label: String, posting_list_id: Option<PostingListId>) -> usize {
        self.nodes.push(Node { label, posting_list_id, children: HashMap::new() });
        self.nodes.len() - 1
    }

    fn attach(&mut self, parent: usize, label: &str, posting_list_id: PostingListId) {
        let first = first_char(label);
        let child = self.add_node(label.to_string(), Some(posting_list_id));
        self.nodes[parent].children.insert(first, child);
        self.terms += 1;
    }

    fn set_posting(&mut self, node: usize, posting_list_id: PostingListId) {
        if self.nodes[node].posting_list_id.replace(posting_list_id).is_none() {
            self.terms += 1;
        }
    }

    /// Cut `node`'s label at byte offset `at`. The tail, the posting id and
    /// all children move into a new single child.
    fn split(&mut self, node: usize, at: usize) {
        let tail = self.nodes[node].label.split_off(at);
        let posting_list_id = self.nodes[node].posting_list_id.take();
        let children = mem::take(&mut self.nodes[node].children);
        let first = first_char(&tail);
        let child = self.add_node(tail, posting_list_id);
        self.nodes[child].children = children;
        self.nodes[node].children.insert(first, child);
    }

    /// Node whose path starts with `prefix` and ends at or after it, with
    /// that node's full path from the root.
    fn find_node(&self, prefix: &str) -> Option<(usize, String)> {
        let mut node = ROOT;
        let mut rest = prefix;
        let mut path = String::with_capacity(prefix.len());
        loop {
            let label = self.nodes[node].label.as_str();
            let shared = shared_prefix_len(rest, label);
            if shared == rest.len() {
                path.push_str(label);
                return Some((node, path));
            }
            if shared < label.len() {
                return None;
            }
            path.push_str(label);
            rest = &rest[shared..];
            node = *self.nodes[node].children.get(&first_char(rest))?;
        }
    }
}

impl PrefixTrie for CompactTrie {
    fn insert(&mut self, term: &str, posting_list_id: PostingListId) {
        let mut node = ROOT;
        let mut rest = term;
        loop {
            let label = self.nodes[node].label.as_str();
            if rest == label {
                self.set_posting(node, posting_list_id);
                return;
            }
            let shared = shared_prefix_len(rest, label);
            let label_consumed = shared == label.len();
            rest = &rest[shared..];

            if rest.is_empty() {
                // the term ends inside this label
                self.split(node, shared);
                self.set_posting(node, posting_list_id);
                return;
            }
            if label_consumed {
                match self.nodes[node].children.get(&first_char(rest)) {
                    Some(&child) => node = child,
                    None => {
                        self.attach(node, rest, posting_list_id);
                        return;
                    }
                }
            } else {
                self.split(node, shared);
                self.attach(node, rest, posting_list_id);
                return;
            }
        }
    }

    fn find_exact(&self, term: &str) -> Option<PostingListId> {
        let mut node = ROOT;
        let mut rest = term;
        loop {
            let label = self.nodes[node].label.as_str();
            let shared = shared_prefix_len(rest, label);
            if shared < label.len() {
                return None;
            }
            rest = &rest[shared..];
            if rest.is_empty() {
                return self.nodes[node].posting_list_id;
            }
            node = *self.nodes[node].children.get(&first_char(rest))?;
        }
    }

    fn find_with_prefix(&self, prefix: &str) -> Vec<PrefixMatch> {
        let Some((start, path)) = self.find_node(prefix) else {
            return Vec::new();
        };
        let mut matches = Vec::new();
        let mut stack = vec![(start, path)];
        while let Some((node, path)) = stack.pop() {
            let current = &self.nodes[node];
            for &child in current.children.values() {
                let mut child_path = path.clone();
                child_path.push_str(&self.nodes[child].label);
                stack.push((child, child_path));
            }
            if let Some(posting_list_id) = current.posting_list_id {
                matches.push(PrefixMatch { term: path, posting_list_id });
            }
        }
        sort_matches(matches)
    }

    fn len(&self) -> usize {
        self.terms
    }
}

/// Byte length of the longest common leading substring, on char boundaries.
fn shared_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()))
}

fn first_char(s: &str) -> char {
    s.chars().next().unwrap_or_default()
}
