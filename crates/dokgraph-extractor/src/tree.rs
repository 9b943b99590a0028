//! Tree reconstruction and markdown rendering for flat outline node lists

use crate::error::StructureError;
use dokgraph_domain::RawNode;
use std::collections::{HashMap, HashSet};

/// Deepest level below a root that an outline may nest
///
/// Building, rendering and dropping a tree recurse once per level, so the
/// limit also bounds stack use.
pub const MAX_DEPTH: usize = 256;

/// A raw node together with the subtree it owns
///
/// Children are kept in the order their nodes appeared in the input.
/// Ordering by priority is applied when rendering, not when linking.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// The node itself
    pub node: RawNode,

    /// Owned children, in input order
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Identifier of the underlying node
    pub fn id(&self) -> &str {
        &self.node.id
    }

    /// Children sorted ascending by priority, ties kept in input order
    pub fn sorted_children(&self) -> Vec<&TreeNode> {
        let mut children: Vec<&TreeNode> = self.children.iter().collect();
        // sort_by_key is stable, which is what keeps ties in input order
        children.sort_by_key(|child| child.node.priority);
        children
    }

    /// Render this subtree as an indented markdown list
    ///
    /// Each node becomes `"<2*depth spaces>- <name>\n"`, followed by
    /// `"<2*depth spaces>  <note>\n"` when it has a note, followed by its
    /// children rendered one level deeper.
    pub fn render(&self, depth: usize) -> String {
        let mut out = String::new();
        self.render_into(depth, &mut out);
        out
    }

    fn render_into(&self, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        out.push_str("- ");
        out.push_str(self.node.heading());
        out.push('\n');

        if let Some(note) = self.node.note_text() {
            out.push_str(&indent);
            out.push_str("  ");
            out.push_str(note);
            out.push('\n');
        }

        for child in self.sorted_children() {
            child.render_into(depth + 1, out);
        }
    }
}

/// The forest of root subtrees built from one flat node list
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    roots: Vec<TreeNode>,
}

impl Tree {
    /// Link a flat node list into parent-owned subtrees
    ///
    /// A node whose parent is missing, empty, or unknown becomes a root.
    /// Every other node is attached beneath its parent.
    ///
    /// # Errors
    ///
    /// - [`StructureError::DuplicateId`] if two nodes share an id
    /// - [`StructureError::Cycle`] if any node is its own transitive parent
    /// - [`StructureError::DepthExceeded`] if any node sits more than
    ///   [`MAX_DEPTH`] levels below its root
    pub fn build(nodes: &[RawNode]) -> Result<Self, StructureError> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            if index.insert(node.id.as_str(), position).is_some() {
                return Err(StructureError::DuplicateId(node.id.clone()));
            }
        }

        let mut root_positions = Vec::new();
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        let mut parents: Vec<Option<usize>> = vec![None; nodes.len()];

        for (position, node) in nodes.iter().enumerate() {
            match node.parent().and_then(|parent| index.get(parent)) {
                Some(&parent) => {
                    children[parent].push(position);
                    parents[position] = Some(parent);
                }
                None => root_positions.push(position),
            }
        }

        // Anything not reachable from a root hangs off a cycle
        let mut reached = vec![false; nodes.len()];
        let mut stack: Vec<(usize, usize)> = root_positions.iter().map(|&p| (p, 0)).collect();
        while let Some((position, depth)) = stack.pop() {
            if reached[position] {
                continue;
            }
            if depth > MAX_DEPTH {
                return Err(StructureError::DepthExceeded {
                    id: nodes[position].id.clone(),
                    max: MAX_DEPTH,
                });
            }
            reached[position] = true;
            stack.extend(children[position].iter().map(|&child| (child, depth + 1)));
        }

        if let Some(stranded) = reached.iter().position(|seen| !seen) {
            let on_cycle = find_cycle_member(stranded, &parents);
            return Err(StructureError::Cycle(nodes[on_cycle].id.clone()));
        }

        let roots = root_positions
            .into_iter()
            .map(|position| assemble(position, nodes, &children))
            .collect();

        Ok(Self { roots })
    }

    /// Root subtrees, in input order
    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    /// Root subtree with the given id
    pub fn root(&self, id: &str) -> Option<&TreeNode> {
        self.roots.iter().find(|root| root.id() == id)
    }

    /// Number of root subtrees
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Whether the tree has no nodes at all
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Render every root subtree at depth 0, in input order
    pub fn render(&self) -> String {
        self.roots.iter().map(|root| root.render(0)).collect()
    }
}

/// Render `node` and its subtree starting at `depth`
pub fn render_markdown(node: &TreeNode, depth: usize) -> String {
    node.render(depth)
}

fn assemble(position: usize, nodes: &[RawNode], children: &[Vec<usize>]) -> TreeNode {
    TreeNode {
        node: nodes[position].clone(),
        children: children[position]
            .iter()
            .map(|&child| assemble(child, nodes, children))
            .collect(),
    }
}

/// Follow parent links from `start` until a node repeats; that node is on the cycle
fn find_cycle_member(start: usize, parents: &[Option<usize>]) -> usize {
    let mut seen = HashSet::new();
    let mut current = start;
    while seen.insert(current) {
        match parents[current] {
            Some(parent) => current = parent,
            // Unreachable for stranded nodes, which always have a parent
            None => return start,
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, parent: Option<&str>, name: &str, priority: i64) -> RawNode {
        RawNode::new(id, parent, name).with_priority(priority)
    }

    #[test]
    fn test_single_node_with_note() {
        let nodes = vec![RawNode::new("a", None, "name").with_note("note")];
        let tree = Tree::build(&nodes).unwrap();
        assert_eq!(tree.roots()[0].render(0), "- name\n  note\n");
    }

    #[test]
    fn test_render_at_depth_indents_every_line() {
        let nodes = vec![
            node("s", None, "Section", 0).with_note("about"),
            node("i", Some("s"), "Item", 0),
        ];
        let tree = Tree::build(&nodes).unwrap();
        assert_eq!(
            render_markdown(&tree.roots()[0], 2),
            "    - Section\n      about\n      - Item\n"
        );
    }

    #[test]
    fn test_render_orders_children_by_priority() {
        let nodes = vec![
            node("root", None, "Root", 0),
            node("c", Some("root"), "Third", 30),
            node("a", Some("root"), "First", 10),
            node("b", Some("root"), "Second", 20),
            node("a1", Some("a"), "Nested", 0),
        ];
        let tree = Tree::build(&nodes).unwrap();

        assert_eq!(
            tree.render(),
            "- Root\n  - First\n    - Nested\n  - Second\n  - Third\n"
        );
    }

    #[test]
    fn test_priority_ties_keep_input_order() {
        let nodes = vec![
            node("root", None, "Root", 0),
            node("x", Some("root"), "X", 5),
            node("y", Some("root"), "Y", 5),
            node("z", Some("root"), "Z", 1),
        ];
        let tree = Tree::build(&nodes).unwrap();
        let names: Vec<_> = tree.roots()[0]
            .sorted_children()
            .iter()
            .map(|child| child.node.name.clone())
            .collect();
        assert_eq!(names, vec!["Z", "X", "Y"]);
    }

    #[test]
    fn test_children_linked_in_input_order() {
        let nodes = vec![
            node("root", None, "Root", 0),
            node("b", Some("root"), "B", 2),
            node("a", Some("root"), "A", 1),
        ];
        let tree = Tree::build(&nodes).unwrap();
        let ids: Vec<_> = tree.roots()[0].children.iter().map(TreeNode::id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_orphan_becomes_root() {
        let nodes = vec![
            node("root", None, "Root", 0),
            node("orphan", Some("missing"), "Orphan", 0),
        ];
        let tree = Tree::build(&nodes).unwrap();
        assert_eq!(tree.len(), 2);
        assert!(tree.root("orphan").is_some());
    }

    #[test]
    fn test_two_node_cycle_is_rejected() {
        let nodes = vec![
            node("a", Some("b"), "A", 0),
            node("b", Some("a"), "B", 0),
        ];
        let err = Tree::build(&nodes).unwrap_err();
        assert!(matches!(err, StructureError::Cycle(_)));
    }

    #[test]
    fn test_self_parent_is_a_cycle() {
        let nodes = vec![
            node("root", None, "Root", 0),
            node("loop", Some("loop"), "Loop", 0),
        ];
        assert_eq!(
            Tree::build(&nodes).unwrap_err(),
            StructureError::Cycle("loop".to_string())
        );
    }

    #[test]
    fn test_descendant_of_cycle_reports_cycle_member() {
        let nodes = vec![
            node("tail", Some("a"), "Tail", 0),
            node("a", Some("b"), "A", 0),
            node("b", Some("a"), "B", 0),
        ];
        match Tree::build(&nodes).unwrap_err() {
            StructureError::Cycle(id) => assert!(id == "a" || id == "b"),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    fn chain(len: usize) -> Vec<RawNode> {
        let mut nodes = vec![node("n0", None, "Top", 0)];
        for i in 1..len {
            let parent = format!("n{}", i - 1);
            nodes.push(node(&format!("n{}", i), Some(&parent), "Level", 0));
        }
        nodes
    }

    #[test]
    fn test_chain_at_depth_limit_builds() {
        let tree = Tree::build(&chain(MAX_DEPTH + 1)).unwrap();
        let rendered = tree.render();
        assert_eq!(rendered.lines().count(), MAX_DEPTH + 1);
        assert!(rendered.ends_with(&format!("{}- Level\n", "  ".repeat(MAX_DEPTH))));
    }

    #[test]
    fn test_chain_past_depth_limit_is_rejected() {
        assert_eq!(
            Tree::build(&chain(MAX_DEPTH + 2)).unwrap_err(),
            StructureError::DepthExceeded {
                id: format!("n{}", MAX_DEPTH + 1),
                max: MAX_DEPTH,
            }
        );
    }

    #[test]
    fn test_very_deep_chain_fails_without_overflow() {
        let err = Tree::build(&chain(100_000)).unwrap_err();
        assert!(matches!(err, StructureError::DepthExceeded { .. }));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let nodes = vec![node("a", None, "A", 0), node("a", None, "Again", 0)];
        assert_eq!(
            Tree::build(&nodes).unwrap_err(),
            StructureError::DuplicateId("a".to_string())
        );
    }

    #[test]
    fn test_empty_input_builds_empty_tree() {
        let tree = Tree::build(&[]).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.render(), "");
    }
}
