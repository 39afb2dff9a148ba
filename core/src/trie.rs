//! Prefix trie over codepoints, stored as an arena of nodes.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Index of a node inside the arena. The root is always `0`.
type NodeId = u32;

const ROOT: NodeId = 0;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Node<V> {
    children: AHashMap<char, NodeId>,
    value: Option<V>,
}

impl<V> Node<V> {
    fn new() -> Self {
        Self {
            children: AHashMap::new(),
            value: None,
        }
    }
}

/// A trie mapping codepoint sequences to values.
///
/// Nodes live in a single `Vec` and refer to their children by index, so
/// the structure has no per-node boxing and serializes as a flat list.
/// Removing a word clears the value but keeps the path, which leaves every
/// other word and prefix intact.
///
/// # Example
/// ```
/// use libjieba_core::trie::Trie;
///
/// let mut trie = Trie::new();
/// trie.insert("北京", 1u32);
/// trie.insert("北京大学", 2u32);
///
/// assert_eq!(trie.get("北京"), Some(&1));
/// assert_eq!(trie.get("北"), None);
///
/// let input: Vec<char> = "北京大学".chars().collect();
/// let ends: Vec<usize> = trie.walk_prefixes(&input, 0, 8).map(|(end, _)| end).collect();
/// assert_eq!(ends, vec![2, 4]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trie<V> {
    nodes: Vec<Node<V>>,
    len: usize,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Trie<V> {
    /// Create an empty trie holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            len: 0,
        }
    }

    /// Number of words (nodes carrying a value).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `word`, returning the value it replaced.
    ///
    /// An empty word is ignored and `None` is returned.
    pub fn insert(&mut self, word: &str, value: V) -> Option<V> {
        if word.is_empty() {
            return None;
        }
        let mut node = ROOT;
        for ch in word.chars() {
            node = match self.nodes[node as usize].children.get(&ch) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len() as NodeId;
                    self.nodes.push(Node::new());
                    self.nodes[node as usize].children.insert(ch, child);
                    child
                }
            };
        }
        let previous = self.nodes[node as usize].value.replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Remove `word`, returning its value if it was present.
    pub fn remove(&mut self, word: &str) -> Option<V> {
        let node = self.find(word)?;
        let previous = self.nodes[node as usize].value.take();
        if previous.is_some() {
            self.len -= 1;
        }
        previous
    }

    /// Exact lookup.
    pub fn get(&self, word: &str) -> Option<&V> {
        self.find(word)
            .and_then(|node| self.nodes[node as usize].value.as_ref())
    }

    /// Exact lookup over a codepoint slice.
    pub fn get_chars(&self, word: &[char]) -> Option<&V> {
        let mut node = ROOT;
        for ch in word {
            node = *self.nodes[node as usize].children.get(ch)?;
        }
        if node == ROOT {
            return None;
        }
        self.nodes[node as usize].value.as_ref()
    }

    /// True if `word` is a stored word, not merely a prefix.
    pub fn contains_word(&self, word: &str) -> bool {
        self.get(word).is_some()
    }

    /// Iterate values in arena order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.nodes.iter().filter_map(|n| n.value.as_ref())
    }

    /// Walk the trie from `input[start]` and yield every stored word that
    /// starts there, as `(exclusive end index, value)`, shortest first.
    ///
    /// At most `max_len` codepoints are consumed.
    pub fn walk_prefixes<'t, 'i>(
        &'t self,
        input: &'i [char],
        start: usize,
        max_len: usize,
    ) -> PrefixWalk<'t, 'i, V> {
        let limit = input.len().min(start.saturating_add(max_len));
        PrefixWalk {
            trie: self,
            input,
            node: ROOT,
            idx: start,
            limit,
        }
    }

    fn find(&self, word: &str) -> Option<NodeId> {
        if word.is_empty() {
            return None;
        }
        let mut node = ROOT;
        for ch in word.chars() {
            node = *self.nodes[node as usize].children.get(&ch)?;
        }
        Some(node)
    }
}

/// Iterator returned by [`Trie::walk_prefixes`].
pub struct PrefixWalk<'t, 'i, V> {
    trie: &'t Trie<V>,
    input: &'i [char],
    node: NodeId,
    idx: usize,
    limit: usize,
}

impl<'t, 'i, V> Iterator for PrefixWalk<'t, 'i, V> {
    type Item = (usize, &'t V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.idx < self.limit {
            let ch = self.input[self.idx];
            let child = *self.trie.nodes[self.node as usize].children.get(&ch)?;
            self.node = child;
            self.idx += 1;
            if let Some(value) = &self.trie.nodes[child as usize].value {
                return Some((self.idx, value));
            }
        }
        None
    }
}
