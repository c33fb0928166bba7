//! Read-only views of the tree's shape, for rendering and structural fingerprints.

use alloc::collections::VecDeque;
use core::fmt::{self, Write};
use core::iter::FusedIterator;

use smallvec::{SmallVec, smallvec};

use super::OSAvlSet;
use crate::raw::{Handle, Node, RawOSAvlTree};

/// A snapshot of one node as reported by [`OSAvlSet::nodes`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NodeInfo {
    pub handle: Handle,
    pub key: i64,
    pub height: u32,
    pub subtree_size: usize,
    /// `None` for the root.
    pub parent: Option<Handle>,
    pub left: Option<Handle>,
    pub right: Option<Handle>,
}

impl NodeInfo {
    fn new(tree: &RawOSAvlTree, handle: Handle, node: &Node) -> Self {
        Self {
            handle,
            key: node.key(),
            height: node.height(),
            subtree_size: node.subtree_size(),
            parent: tree.parent_of(handle),
            left: node.left,
            right: node.right,
        }
    }
}

/// Breadth-first iterator over the nodes of an [`OSAvlSet`].
///
/// This `struct` is created by [`OSAvlSet::nodes`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct BreadthFirst<'a> {
    tree: &'a RawOSAvlTree,
    queue: VecDeque<Handle>,
}

impl Iterator for BreadthFirst<'_> {
    type Item = NodeInfo;

    fn next(&mut self) -> Option<NodeInfo> {
        let tree = self.tree;
        let handle = self.queue.pop_front()?;
        let node = tree.node(handle)?;
        self.queue.extend(node.left);
        self.queue.extend(node.right);
        Some(NodeInfo::new(tree, handle, node))
    }
}

impl FusedIterator for BreadthFirst<'_> {}

/// Pending output for the iterative preorder walk in [`OSAvlSet::write_brackets`].
enum Frame {
    Subtree(Option<Handle>),
    Text(&'static str),
}

impl OSAvlSet {
    /// Visits every node level by level, starting at the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlSet;
    ///
    /// let set = OSAvlSet::try_from_iter([1, 2, 3]).unwrap();
    /// let keys: Vec<i64> = set.nodes().map(|node| node.key).collect();
    /// assert_eq!(keys, [2, 1, 3]);
    /// ```
    pub fn nodes(&self) -> BreadthFirst<'_> {
        BreadthFirst {
            tree: &self.tree,
            queue: self.tree.root().into_iter().collect(),
        }
    }

    /// Writes the tree in preorder bracket notation: `(key left right)`, with `()` for an
    /// absent subtree. This is also what `Display` prints.
    ///
    /// # Errors
    ///
    /// Only those reported by `out`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlSet;
    ///
    /// let set = OSAvlSet::try_from_iter([10, 5, 15]).unwrap();
    /// assert_eq!(set.to_string(), "(10 (5 () ()) (15 () ()))");
    /// assert_eq!(OSAvlSet::new().to_string(), "()");
    /// ```
    pub fn write_brackets<W: Write>(&self, out: &mut W) -> fmt::Result {
        // Depth is bounded by the tree height, so the inline buffer rarely spills.
        let mut stack: SmallVec<[Frame; 32]> = smallvec![Frame::Subtree(self.tree.root())];
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Text(text) => out.write_str(text)?,
                Frame::Subtree(None) => out.write_str("()")?,
                Frame::Subtree(Some(handle)) => {
                    let Some(node) = self.tree.node(handle) else {
                        return Err(fmt::Error);
                    };
                    write!(out, "({} ", node.key())?;
                    stack.push(Frame::Text(")"));
                    stack.push(Frame::Subtree(node.right));
                    stack.push(Frame::Text(" "));
                    stack.push(Frame::Subtree(node.left));
                }
            }
        }
        Ok(())
    }

    /// Writes the tree as a Graphviz `digraph`, one record per node labelled with its key,
    /// height and subtree size. Nodes are emitted breadth-first and named after their handles.
    ///
    /// # Errors
    ///
    /// Only those reported by `out`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlSet;
    ///
    /// let set = OSAvlSet::try_from_iter([7]).unwrap();
    /// let mut dot = String::new();
    /// set.write_dot(&mut dot).unwrap();
    /// assert!(dot.contains("node_1 [label=\"{k: 7|h: 1|sz: 1}\"];"));
    /// ```
    pub fn write_dot<W: Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str("digraph G {\n")?;
        out.write_str("  rankdir=TB;\n")?;
        out.write_str("  ordering=out;\n")?;
        out.write_str("  node [shape=record];\n")?;

        for node in self.nodes() {
            let id = node.handle.index();
            writeln!(
                out,
                "  node_{id} [label=\"{{k: {}|h: {}|sz: {}}}\"];",
                node.key, node.height, node.subtree_size
            )?;
            for child in [node.left, node.right].into_iter().flatten() {
                writeln!(out, "  node_{id} -> node_{};", child.index())?;
            }
        }

        out.write_str("}\n")
    }
}

impl fmt::Display for OSAvlSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_brackets(f)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use pretty_assertions::assert_eq;

    #[test]
    fn brackets_after_rebalancing() {
        let set = OSAvlSet::try_from_iter([1, 2, 3, 4, 5, 6, 7, 9, 10]).unwrap();
        assert_eq!(
            set.to_string(),
            "(4 (2 (1 () ()) (3 () ())) (6 (5 () ()) (9 (7 () ()) (10 () ()))))"
        );
    }

    #[test]
    fn brackets_for_mixed_insertions() {
        let set = OSAvlSet::try_from_iter([10, 5, 1, 3, 7, 2, 18, 9, 12, 14]).unwrap();
        assert_eq!(
            set.to_string(),
            "(5 (2 (1 () ()) (3 () ())) (10 (7 () (9 () ())) (14 (12 () ()) (18 () ()))))"
        );
    }

    #[test]
    fn nodes_report_links_and_metadata() {
        let set = OSAvlSet::try_from_iter([10, 5, 15, 3]).unwrap();
        let nodes: Vec<NodeInfo> = set.nodes().collect();

        let keys: Vec<i64> = nodes.iter().map(|n| n.key).collect();
        assert_eq!(keys, [10, 5, 15, 3]);

        let root = nodes[0];
        assert_eq!(root.parent, None);
        assert_eq!(root.height, 3);
        assert_eq!(root.subtree_size, 4);
        assert_eq!(root.left, Some(nodes[1].handle));
        assert_eq!(root.right, Some(nodes[2].handle));
        assert_eq!(nodes[1].parent, Some(root.handle));
        assert_eq!(nodes[3].parent, Some(nodes[1].handle));

        assert_eq!(OSAvlSet::new().nodes().count(), 0);
    }

    #[test]
    fn dot_output() {
        let set = OSAvlSet::try_from_iter([1, 2, 3]).unwrap();
        let mut dot = String::new();
        set.write_dot(&mut dot).unwrap();
        assert_eq!(
            dot,
            "digraph G {\n  rankdir=TB;\n  ordering=out;\n  node [shape=record];\n  \
             node_2 [label=\"{k: 2|h: 2|sz: 3}\"];\n  node_2 -> node_1;\n  node_2 -> node_3;\n  \
             node_1 [label=\"{k: 1|h: 1|sz: 1}\"];\n  node_3 [label=\"{k: 3|h: 1|sz: 1}\"];\n}\n"
        );

        let mut empty = String::new();
        OSAvlSet::new().write_dot(&mut empty).unwrap();
        assert_eq!(empty, "digraph G {\n  rankdir=TB;\n  ordering=out;\n  node [shape=record];\n}\n");
    }
}
