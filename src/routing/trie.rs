//! Per-method route tree.
//!
//! Nodes live in a flat arena and reference their children by index, one
//! arena per HTTP method. Children are kept in a single ordered list so that
//! match priority between literal and parametric siblings is decided by
//! registration order, which existing route sets depend on.

/// Handle of a node inside a [`Trie`] arena.
pub type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug)]
struct Node {
    /// The literal segment this node represents, e.g. `p`, `:lang` or
    /// `*filepath`. Empty only for the root.
    segment: String,
    /// The full original pattern. Some only on a node that is the exact
    /// terminal of a registered route; intermediate nodes created while
    /// inserting a longer pattern carry None.
    pattern: Option<String>,
    /// Child handles, in registration order.
    children: Vec<NodeId>,
    /// Whether `segment` starts with `:` or `*`.
    parametric: bool,
}

impl Node {
    fn new(segment: &str) -> Self {
        Self {
            segment: segment.to_string(),
            pattern: None,
            children: Vec::new(),
            parametric: segment.starts_with([':', '*']),
        }
    }

    fn is_wildcard(&self) -> bool {
        self.segment.starts_with('*')
    }
}

#[derive(Debug)]
pub struct Trie {
    nodes: Vec<Node>,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("")],
        }
    }

    /// Inserts `pattern`, pre-segmented into `parts`, and marks the terminal
    /// node with the full pattern.
    ///
    /// At each level the first child whose segment equals the part is
    /// reused; failing that, the first parametric child is reused even when
    /// its segment text differs. Only when neither exists is a new child
    /// appended. Inserting a second pattern that collapses onto an existing
    /// terminal overwrites that node's pattern.
    pub fn insert(&mut self, pattern: &str, parts: &[&str]) {
        let mut current = ROOT;
        for part in parts {
            let found = self.nodes[current]
                .children
                .iter()
                .copied()
                .find(|&child| self.nodes[child].segment == *part)
                .or_else(|| {
                    self.nodes[current]
                        .children
                        .iter()
                        .copied()
                        .find(|&child| self.nodes[child].parametric)
                });
            current = match found {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::new(part));
                    self.nodes[current].children.push(child);
                    child
                }
            };
        }
        self.nodes[current].pattern = Some(pattern.to_string());
    }

    /// Resolves the segmented request path to the pattern of a terminal
    /// node, backtracking through candidate children in registration order.
    pub fn search(&self, parts: &[&str]) -> Option<&str> {
        self.search_at(ROOT, parts, 0)
            .and_then(|node| self.nodes[node].pattern.as_deref())
    }

    fn search_at(&self, node: NodeId, parts: &[&str], depth: usize) -> Option<NodeId> {
        let current = &self.nodes[node];
        // A wildcard matches every remaining segment at once.
        if current.is_wildcard() {
            return current.pattern.is_some().then_some(node);
        }
        if depth == parts.len() {
            if current.pattern.is_some() {
                return Some(node);
            }
            // A trailing wildcard also binds an empty remainder, so a path
            // that stops right before the wildcard still matches.
            return current.children.iter().copied().find(|&child| {
                self.nodes[child].is_wildcard() && self.nodes[child].pattern.is_some()
            });
        }
        let part = parts[depth];
        for &child in &current.children {
            if self.nodes[child].segment == part || self.nodes[child].parametric {
                if let Some(found) = self.search_at(child, parts, depth + 1) {
                    return Some(found);
                }
            }
        }
        None
    }
}
