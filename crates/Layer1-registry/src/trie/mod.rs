//! Namespace Trie - 계층적 키 저장소
//!
//! Stores values at exact namespace paths: the event name `"a.b.c"` becomes
//! the segment path `["a", "b", "c"]`. Lookup is exact-path only - there is
//! no wildcard or prefix matching. Nodes are created lazily on first set and
//! live in a flat arena indexed by `usize`.

mod node;

use node::TrieNode;

/// Arena index of the root node.
const ROOT: usize = 0;

/// A tree keyed by successive namespace segments.
///
/// Each node may hold a value for the path that terminates there;
/// intermediate nodes may exist with no value, purely to route to
/// descendants. All operations are total: an empty path is valid and
/// addresses the root node.
#[derive(Debug, Clone)]
pub struct NamespaceTrie<V> {
    nodes: Vec<TrieNode<V>>,
}

impl<V> NamespaceTrie<V> {
    /// 빈 trie 생성 (루트 노드 하나)
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::new()],
        }
    }

    /// Value stored at the exact path, if any.
    pub fn get_value(&self, path: &[&str]) -> Option<&V> {
        let idx = self.find(path)?;
        self.nodes[idx].value.as_ref()
    }

    /// Mutable value stored at the exact path, if any.
    pub fn get_value_mut(&mut self, path: &[&str]) -> Option<&mut V> {
        let idx = self.find(path)?;
        self.nodes[idx].value.as_mut()
    }

    /// Store `new_value` at the exact path, creating nodes as needed.
    ///
    /// If a value already exists at the terminal node, `merge` combines
    /// `new_value` into it in place - the stored value keeps its identity,
    /// which callers rely on for flags carried alongside merged data.
    /// Returns the resulting stored value.
    pub fn set_value<M>(&mut self, path: &[&str], new_value: V, merge: M) -> &mut V
    where
        M: FnOnce(&mut V, V),
    {
        let mut idx = ROOT;
        for segment in path {
            idx = match self.nodes[idx].children.get(*segment) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::new());
                    self.nodes[idx]
                        .children
                        .insert((*segment).to_string(), child);
                    child
                }
            };
        }

        match self.nodes[idx].value.take() {
            Some(mut existing) => {
                merge(&mut existing, new_value);
                self.nodes[idx].value.insert(existing)
            }
            None => self.nodes[idx].value.insert(new_value),
        }
    }

    /// Discard all nodes; every subsequent lookup returns `None`.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(TrieNode::new());
    }

    /// True if no value is stored anywhere in the tree.
    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|n| n.value.is_none())
    }

    /// Number of nodes currently allocated, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every path whose node holds a value, collected depth-first.
    ///
    /// Order is unspecified beyond parent-before-child.
    pub fn paths_with_values(&self) -> Vec<Vec<String>> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        self.collect_paths(ROOT, &mut prefix, &mut out);
        out
    }

    fn collect_paths(&self, idx: usize, prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
        if self.nodes[idx].value.is_some() {
            out.push(prefix.clone());
        }
        for (segment, &child) in &self.nodes[idx].children {
            prefix.push(segment.clone());
            self.collect_paths(child, prefix, out);
            prefix.pop();
        }
    }

    /// Arena index of the node at the exact path, if every segment routes.
    fn find(&self, path: &[&str]) -> Option<usize> {
        let mut idx = ROOT;
        for segment in path {
            idx = *self.nodes[idx].children.get(*segment)?;
        }
        Some(idx)
    }
}

impl<V> Default for NamespaceTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_on_empty_trie() {
        let trie: NamespaceTrie<u32> = NamespaceTrie::new();
        assert!(trie.get_value(&["a"]).is_none());
        assert!(trie.get_value(&["a", "b"]).is_none());
        assert!(trie.get_value(&[]).is_none());
        assert_eq!(trie.node_count(), 1);
    }

    #[test]
    fn test_set_then_get_exact_path() {
        let mut trie = NamespaceTrie::new();
        trie.set_value(&["a", "b", "c"], 7, |_, _| {});

        assert_eq!(trie.get_value(&["a", "b", "c"]), Some(&7));
        // Intermediate nodes route but hold no value
        assert!(trie.get_value(&["a"]).is_none());
        assert!(trie.get_value(&["a", "b"]).is_none());
        // No prefix or extension matching
        assert!(trie.get_value(&["a", "b", "c", "d"]).is_none());
        assert_eq!(trie.node_count(), 4);
    }

    #[test]
    fn test_root_path_holds_a_value() {
        let mut trie = NamespaceTrie::new();
        trie.set_value(&[], 42, |_, _| {});
        assert_eq!(trie.get_value(&[]), Some(&42));
        assert_eq!(trie.node_count(), 1);
    }

    #[test]
    fn test_sibling_paths_are_independent() {
        let mut trie = NamespaceTrie::new();
        trie.set_value(&["a", "b"], 1, |_, _| {});
        trie.set_value(&["a", "c"], 2, |_, _| {});

        assert_eq!(trie.get_value(&["a", "b"]), Some(&1));
        assert_eq!(trie.get_value(&["a", "c"]), Some(&2));
        // "a" is shared, so: root + a + b + c
        assert_eq!(trie.node_count(), 4);
    }

    #[test]
    fn test_merge_combines_in_place() {
        let mut trie = NamespaceTrie::new();
        trie.set_value(&["x"], vec![1], |_, _| {});
        let merged = trie.set_value(&["x"], vec![2, 3], |existing, new| {
            existing.extend(new);
        });
        assert_eq!(merged, &vec![1, 2, 3]);
        assert_eq!(trie.get_value(&["x"]), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn test_merge_not_called_on_first_set() {
        let mut trie = NamespaceTrie::new();
        let stored = trie.set_value(&["x"], 5, |_, _| {
            panic!("merge must not run when no value exists");
        });
        assert_eq!(*stored, 5);
    }

    #[test]
    fn test_clear_discards_everything() {
        let mut trie = NamespaceTrie::new();
        trie.set_value(&["a", "b"], 1, |_, _| {});
        trie.set_value(&["c"], 2, |_, _| {});
        assert!(!trie.is_empty());

        trie.clear();
        assert!(trie.is_empty());
        assert_eq!(trie.node_count(), 1);
        assert!(trie.get_value(&["a", "b"]).is_none());
        assert!(trie.get_value(&["c"]).is_none());

        // Reusable after clear
        trie.set_value(&["a"], 9, |_, _| {});
        assert_eq!(trie.get_value(&["a"]), Some(&9));
    }

    #[test]
    fn test_paths_with_values() {
        let mut trie = NamespaceTrie::new();
        trie.set_value(&["a", "b"], 1, |_, _| {});
        trie.set_value(&["a", "b", "c"], 2, |_, _| {});
        trie.set_value(&["d"], 3, |_, _| {});

        let mut paths = trie.paths_with_values();
        paths.sort();
        assert_eq!(
            paths,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["a".to_string(), "b".to_string(), "c".to_string()],
                vec!["d".to_string()],
            ]
        );
    }
}
