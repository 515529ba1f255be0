use std::collections::{HashMap, HashSet, VecDeque};

use super::error::FsError;
use super::id::NodeId;
use super::node::Node;

/// Owns every node of one tree, keyed by id.
///
/// The store does no cascading of its own: `remove` drops exactly one
/// node. Keeping parents and children consistent is the mutation
/// engine's job; [`NodeStore::check_invariants`] verifies it did.
#[derive(Debug, Clone)]
pub struct NodeStore {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    // id of the one node with its editing flag set, if any
    editing: Option<NodeId>,
}

impl NodeStore {
    /// Create a store holding just an empty root folder
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = Node::new_folder(NodeId::ROOT, root_name, None);
        let mut nodes = HashMap::new();
        nodes.insert(NodeId::ROOT, root);
        Self {
            nodes,
            root: NodeId::ROOT,
            editing: None,
        }
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Result<&Node, FsError> {
        self.nodes.get(&id).ok_or(FsError::NodeNotFound(id))
    }

    /// Like [`NodeStore::get`], but the node must be a folder
    pub fn folder(&self, id: NodeId) -> Result<&Node, FsError> {
        let node = self.get(id)?;
        if !node.is_folder() {
            return Err(FsError::NotAFolder(id));
        }
        Ok(node)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, FsError> {
        self.nodes.get_mut(&id).ok_or(FsError::NodeNotFound(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Insert or replace a node by its id, returning the node it replaced
    pub fn put(&mut self, node: Node) -> Option<Node> {
        let id = node.id();
        if node.is_editing() {
            self.editing = Some(id);
        } else if self.editing == Some(id) {
            self.editing = None;
        }
        self.nodes.insert(id, node)
    }

    /// Remove a single node. Children and the parent's child list are
    ///  left alone.
    pub fn remove(&mut self, id: NodeId) -> Result<Node, FsError> {
        if id == self.root {
            return Err(FsError::RootImmutable);
        }
        let node = self.nodes.remove(&id).ok_or(FsError::NodeNotFound(id))?;
        if self.editing == Some(id) {
            self.editing = None;
        }
        Ok(node)
    }

    /// Number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The node currently being renamed, if any
    pub fn editing(&self) -> Option<NodeId> {
        self.editing
    }

    /// Move the editing flag to `target`, or clear it with `None`.
    ///  Whatever node held the flag before loses it.
    pub fn set_editing(&mut self, target: Option<NodeId>) -> Result<(), FsError> {
        if let Some(id) = target {
            self.get(id)?;
        }
        if let Some(previous) = self.editing.take() {
            if let Some(node) = self.nodes.get_mut(&previous) {
                node.set_editing(false);
            }
        }
        if let Some(id) = target {
            self.get_mut(id)?.set_editing(true);
            self.editing = Some(id);
        }
        Ok(())
    }

    /// Verify the tree shape: a single parentless root folder, parent and
    ///  child links that agree both ways, every node reachable from the
    ///  root (which also rules out cycles), and at most one editing flag.
    pub fn check_invariants(&self) -> Result<(), FsError> {
        let root = self
            .nodes
            .get(&self.root)
            .ok_or_else(|| FsError::Invariant("root is missing".to_string()))?;
        if !root.is_folder() || root.parent().is_some() {
            return Err(FsError::Invariant(
                "root must be a folder without a parent".to_string(),
            ));
        }

        let mut editing = Vec::new();
        for (key, node) in &self.nodes {
            if *key != node.id() {
                return Err(FsError::Invariant(format!(
                    "node {} stored under id {}",
                    node.id(),
                    key
                )));
            }
            if node.is_editing() {
                editing.push(node.id());
            }
            if node.id() == self.root {
                continue;
            }

            let parent_id = node.parent().ok_or_else(|| {
                FsError::Invariant(format!("node {} has no parent", node.id()))
            })?;
            let parent = self.nodes.get(&parent_id).ok_or_else(|| {
                FsError::Invariant(format!(
                    "node {} points at missing parent {}",
                    node.id(),
                    parent_id
                ))
            })?;
            if !parent.is_folder() {
                return Err(FsError::Invariant(format!(
                    "parent {} of node {} is not a folder",
                    parent_id,
                    node.id()
                )));
            }
            let listed = parent
                .children()
                .iter()
                .filter(|child| **child == node.id())
                .count();
            if listed != 1 {
                return Err(FsError::Invariant(format!(
                    "node {} listed {} times under parent {}",
                    node.id(),
                    listed,
                    parent_id
                )));
            }
        }

        match editing.as_slice() {
            [] if self.editing.is_none() => {}
            [id] if self.editing == Some(*id) => {}
            _ => {
                return Err(FsError::Invariant(format!(
                    "editing flags {:?} disagree with tracked editor {:?}",
                    editing, self.editing
                )))
            }
        }

        // Walk down from the root. A child whose parent pointer disagrees
        //  with the list it sits in, or a node seen twice, means the
        //  links are not a tree.
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([self.root]);
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                return Err(FsError::Invariant(format!("node {} reached twice", id)));
            }
            let node = self
                .nodes
                .get(&id)
                .ok_or_else(|| FsError::Invariant(format!("child {} is missing", id)))?;
            for child in node.children() {
                let child_node = self.nodes.get(child).ok_or_else(|| {
                    FsError::Invariant(format!("folder {} lists missing child {}", id, child))
                })?;
                if child_node.parent() != Some(id) {
                    return Err(FsError::Invariant(format!(
                        "folder {} lists child {} whose parent is {:?}",
                        id,
                        child,
                        child_node.parent()
                    )));
                }
                queue.push_back(*child);
            }
        }
        if seen.len() != self.nodes.len() {
            return Err(FsError::Invariant(format!(
                "{} of {} nodes are unreachable from the root",
                self.nodes.len() - seen.len(),
                self.nodes.len()
            )));
        }

        Ok(())
    }
}
