use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::error::FsError;
use super::id::NodeId;
use super::node::Node;
use super::store::NodeStore;

/// One folder or file in a [`TreeSnapshot`], with its children inlined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: NodeId,
    pub name: String,
    pub is_folder: bool,
    pub is_editing: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotNode>,
}

impl SnapshotNode {
    /// Find a node anywhere below (or at) this one
    pub fn find(&self, id: NodeId) -> Option<&SnapshotNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter());
        }
        None
    }

    /// Render as an indented listing, one node per line
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            let marker = if node.is_folder { "/" } else { "" };
            let editing = if node.is_editing { " (editing)" } else { "" };
            out.push_str(&format!(
                "{}{}{} [{}]{}\n",
                "  ".repeat(depth),
                node.name,
                marker,
                node.id,
                editing
            ));
            stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        }
        out
    }
}

// Unlinks children one level at a time so a deep chain drops without
//  recursing once per level.
impl Drop for SnapshotNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Materialized view of the whole tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub root: SnapshotNode,
    pub node_count: usize,
}

impl TreeSnapshot {
    pub fn find(&self, id: NodeId) -> Option<&SnapshotNode> {
        self.root.find(id)
    }
}

/// Read-only queries over a [`NodeStore`]
pub struct TreeNavigator<'a> {
    store: &'a NodeStore,
}

impl<'a> TreeNavigator<'a> {
    pub fn new(store: &'a NodeStore) -> Self {
        Self { store }
    }

    /// The children of a folder, in display order
    pub fn contents(&self, folder: NodeId) -> Result<Vec<Node>, FsError> {
        let folder = self.store.folder(folder)?;
        folder
            .children()
            .iter()
            .map(|child| self.store.get(*child).cloned())
            .collect()
    }

    /// Every node from the root down to `id`, both ends included
    pub fn path_to(&self, id: NodeId) -> Result<Vec<Node>, FsError> {
        let mut path = vec![self.store.get(id)?.clone()];
        let mut cursor = path[0].parent();
        while let Some(parent) = cursor {
            let node = self.store.get(parent)?;
            cursor = node.parent();
            path.push(node.clone());
        }
        path.reverse();
        Ok(path)
    }

    /// Whether `candidate` sits somewhere below `ancestor`.
    ///  A node is not its own descendant.
    pub fn is_descendant(&self, candidate: NodeId, ancestor: NodeId) -> Result<bool, FsError> {
        let mut cursor = self.store.get(candidate)?.parent();
        while let Some(parent) = cursor {
            if parent == ancestor {
                return Ok(true);
            }
            cursor = self.store.get(parent)?.parent();
        }
        Ok(false)
    }

    /// Ids of `id` and everything below it, in pre-order
    pub fn subtree_ids(&self, id: NodeId) -> Result<Vec<NodeId>, FsError> {
        let mut ids = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let node = self.store.get(next)?;
            ids.push(next);
            // reversed so the first child is visited first
            stack.extend(node.children().iter().rev().copied());
        }
        Ok(ids)
    }

    /// Snapshot of the whole tree, built bottom-up so depth costs no stack
    pub fn structure(&self) -> Result<TreeSnapshot, FsError> {
        let root_id = self.store.root_id();
        let order = self.subtree_ids(root_id)?;
        let mut built: HashMap<NodeId, SnapshotNode> = HashMap::with_capacity(order.len());

        // reverse pre-order meets every child before its parent
        for id in order.into_iter().rev() {
            let node = self.store.get(id)?;
            let children = node
                .children()
                .iter()
                .map(|child| {
                    built.remove(child).ok_or_else(|| {
                        FsError::Invariant(format!("child {} of {} listed twice", child, id))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            built.insert(
                id,
                SnapshotNode {
                    id,
                    name: node.name().to_string(),
                    is_folder: node.is_folder(),
                    is_editing: node.is_editing(),
                    children,
                },
            );
        }

        let root = built
            .remove(&root_id)
            .ok_or_else(|| FsError::Invariant("root missing from snapshot".to_string()))?;
        Ok(TreeSnapshot {
            root,
            node_count: self.store.node_count(),
        })
    }
}
