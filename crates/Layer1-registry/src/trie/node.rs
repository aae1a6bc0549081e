//! Trie node - one slot in the arena

use std::collections::HashMap;

/// A single node in the namespace trie.
///
/// Children are addressed by arena index rather than owned boxes, so the
/// whole tree can be discarded in one `Vec::clear`. A node may hold a value
/// for the path that terminates on it, or exist purely to route to
/// descendants.
#[derive(Debug, Clone)]
pub(super) struct TrieNode<V> {
    /// Value stored at the path terminating on this node
    pub(super) value: Option<V>,

    /// Mapping from namespace segment to child arena index
    pub(super) children: HashMap<String, usize>,
}

impl<V> TrieNode<V> {
    pub(super) fn new() -> Self {
        Self {
            value: None,
            children: HashMap::new(),
        }
    }
}
