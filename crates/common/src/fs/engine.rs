use std::collections::{HashMap, HashSet};

use super::category::ContentCategory;
use super::clipboard::Clipboard;
use super::config::ManagerConfig;
use super::error::FsError;
use super::id::{IdAllocator, NodeId};
use super::navigator::TreeNavigator;
use super::node::{FilePayload, Node, NodePatch};
use super::store::NodeStore;

/// A file handed over by the host, already read and classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDescriptor {
    pub parent: NodeId,
    pub name: String,
    pub category: ContentCategory,
    pub content: Vec<u8>,
    pub preview: Option<String>,
}

/// The only writer to a [`NodeStore`].
///
/// Every operation runs all of its checks before touching the store, so
/// a failed call leaves nodes, ids and clipboard exactly as they were.
#[derive(Debug, Clone)]
pub struct MutationEngine {
    store: NodeStore,
    ids: IdAllocator,
    clipboard: Clipboard,
    config: ManagerConfig,
}

impl MutationEngine {
    pub fn new(config: ManagerConfig) -> Self {
        Self {
            store: NodeStore::new(config.root_name.clone()),
            ids: IdAllocator::new(),
            clipboard: Clipboard::Empty,
            config,
        }
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub fn clipboard(&self) -> Clipboard {
        self.clipboard
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn navigator(&self) -> TreeNavigator<'_> {
        TreeNavigator::new(&self.store)
    }

    pub fn create_folder(&mut self, parent: NodeId) -> Result<NodeId, FsError> {
        self.store.folder(parent)?;
        let id = self.ids.next();
        let node = Node::new_folder(id, self.config.default_folder_name.clone(), Some(parent));
        self.attach(parent, node)?;
        tracing::debug!(%id, %parent, "created folder");
        Ok(id)
    }

    pub fn create_file(&mut self, parent: NodeId) -> Result<NodeId, FsError> {
        self.store.folder(parent)?;
        let id = self.ids.next();
        let node = Node::new_file(
            id,
            self.config.default_file_name.clone(),
            parent,
            FilePayload::default(),
        );
        self.attach(parent, node)?;
        tracing::debug!(%id, %parent, "created file");
        Ok(id)
    }

    pub fn upload_file(&mut self, upload: UploadDescriptor) -> Result<NodeId, FsError> {
        let UploadDescriptor {
            parent,
            name,
            category,
            content,
            preview,
        } = upload;
        self.store.folder(parent)?;
        let id = self.ids.next();
        let size = content.len();
        let payload = FilePayload::new(category, content, preview);
        self.attach(parent, Node::new_file(id, name, parent, payload))?;
        tracing::debug!(%id, %parent, %category, size, "uploaded file");
        Ok(id)
    }

    // Callers have already checked that `parent` is a folder
    fn attach(&mut self, parent: NodeId, node: Node) -> Result<(), FsError> {
        let id = node.id();
        let children = self
            .store
            .get_mut(parent)?
            .children_mut()
            .ok_or(FsError::NotAFolder(parent))?;
        children.push(id);
        self.store.put(node);
        Ok(())
    }

    /// Rename a node. Ends the edit session if this node was being edited.
    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), FsError> {
        let name = name.into();
        self.store.get_mut(id)?.set_name(name.clone());
        if self.store.editing() == Some(id) {
            self.store.set_editing(None)?;
        }
        tracing::debug!(%id, %name, "renamed node");
        Ok(())
    }

    /// Mark `id` as being renamed, clearing any other edit in progress
    pub fn begin_edit(&mut self, id: NodeId) -> Result<(), FsError> {
        self.store.set_editing(Some(id))?;
        tracing::debug!(%id, "began editing");
        Ok(())
    }

    /// Drop the edit session, if any, without renaming anything
    pub fn cancel_edit(&mut self) -> Option<NodeId> {
        let editing = self.store.editing();
        // clearing never fails: there is no target to look up
        let _ = self.store.set_editing(None);
        editing
    }

    /// Rename whichever node is being edited
    pub fn commit_edit(&mut self, name: impl Into<String>) -> Result<NodeId, FsError> {
        let id = self.store.editing().ok_or(FsError::NoEditSession)?;
        self.rename(id, name)?;
        Ok(id)
    }

    /// Apply a typed patch. The patch variant must match the node's kind,
    ///  and a new child order must be a reordering of the current children.
    ///  A new name ends the edit session on this node, as `rename` does.
    pub fn update(&mut self, id: NodeId, patch: NodePatch) -> Result<(), FsError> {
        let renamed = patch.name().is_some();
        let current = self.store.get(id)?;
        let mut updated = current.clone();

        match patch {
            NodePatch::Folder(patch) => {
                if !current.is_folder() {
                    return Err(FsError::PatchKindMismatch(id));
                }
                if let Some(order) = patch.children {
                    if !is_reordering(current.children(), &order) {
                        return Err(FsError::InvalidChildOrder(id));
                    }
                    if let Some(children) = updated.children_mut() {
                        *children = order;
                    }
                }
                if let Some(name) = patch.name {
                    updated.set_name(name);
                }
            }
            NodePatch::File(patch) => {
                if !current.is_file() {
                    return Err(FsError::PatchKindMismatch(id));
                }
                if let Some(payload) = patch.payload {
                    updated.set_payload(payload);
                }
                if let Some(name) = patch.name {
                    updated.set_name(name);
                }
            }
        }

        self.store.put(updated);
        if renamed && self.store.editing() == Some(id) {
            self.store.set_editing(None)?;
        }
        debug_assert!(self.store.check_invariants().is_ok());
        tracing::debug!(%id, renamed, "updated node");
        Ok(())
    }

    pub fn copy(&mut self, id: NodeId) -> Result<(), FsError> {
        self.store.get(id)?;
        self.clipboard.copy(id);
        tracing::debug!(%id, "copied to clipboard");
        Ok(())
    }

    /// Hold `id` for a move. Nothing is detached until the paste.
    pub fn cut(&mut self, id: NodeId) -> Result<(), FsError> {
        self.store.get(id)?;
        if id == self.store.root_id() {
            return Err(FsError::RootImmutable);
        }
        self.clipboard.cut(id);
        tracing::debug!(%id, "cut to clipboard");
        Ok(())
    }

    /// Paste the clipboard into `destination`.
    ///
    /// Returns the id of the pasted node: a fresh clone for a copy, the
    /// moved node itself for a cut, `None` when the clipboard was empty.
    /// A successful paste empties the clipboard; a failed one keeps it.
    pub fn paste(&mut self, destination: NodeId) -> Result<Option<NodeId>, FsError> {
        self.store.folder(destination)?;
        let held = self.clipboard.take();
        let pasted = match held {
            Clipboard::Empty => return Ok(None),
            Clipboard::HoldingCopy(source) => self.paste_copy(source, destination),
            Clipboard::HoldingCut(source) => self.paste_cut(source, destination),
        };
        match pasted {
            Ok(id) => {
                debug_assert!(self.store.check_invariants().is_ok());
                Ok(Some(id))
            }
            Err(err) => {
                self.clipboard = held;
                Err(err)
            }
        }
    }

    fn paste_copy(&mut self, source: NodeId, destination: NodeId) -> Result<NodeId, FsError> {
        // Collect the whole subtree before attaching anything, so copying a
        //  folder into itself duplicates it once rather than forever.
        let originals = self
            .navigator()
            .subtree_ids(source)?
            .into_iter()
            .map(|id| self.store.get(id).cloned())
            .collect::<Result<Vec<_>, _>>()?;

        let mut fresh: HashMap<NodeId, NodeId> = HashMap::with_capacity(originals.len());
        let mut clones: Vec<Node> = Vec::with_capacity(originals.len());
        let mut position: HashMap<NodeId, usize> = HashMap::with_capacity(originals.len());

        // Pre-order guarantees a parent is cloned before its children, and
        //  siblings are met in their original order.
        for original in &originals {
            let id = self.ids.next();
            fresh.insert(original.id(), id);
            let parent = if original.id() == source {
                destination
            } else {
                let new_parent = original
                    .parent()
                    .and_then(|old_parent| fresh.get(&old_parent).copied())
                    .ok_or_else(|| {
                        FsError::Invariant(format!("parent of {} not cloned", original.id()))
                    })?;
                if let Some(children) = position
                    .get(&new_parent)
                    .and_then(|index| clones[*index].children_mut())
                {
                    children.push(id);
                }
                new_parent
            };
            position.insert(id, clones.len());
            clones.push(original.detached_copy(id, parent));
        }

        let root = fresh[&source];
        let count = clones.len();
        for clone in clones {
            self.store.put(clone);
        }
        if let Some(children) = self.store.get_mut(destination)?.children_mut() {
            children.push(root);
        }
        tracing::debug!(%source, %destination, clone = %root, count, "pasted copy");
        Ok(root)
    }

    fn paste_cut(&mut self, source: NodeId, destination: NodeId) -> Result<NodeId, FsError> {
        let node = self.store.get(source)?;
        let old_parent = node.parent().ok_or(FsError::RootImmutable)?;
        if destination == source || self.navigator().is_descendant(destination, source)? {
            tracing::warn!(%source, %destination, "refused to move a node into itself");
            return Err(FsError::MoveIntoSelf {
                from: source,
                to: destination,
            });
        }

        if let Some(children) = self.store.get_mut(old_parent)?.children_mut() {
            children.retain(|child| *child != source);
        }
        if let Some(children) = self.store.get_mut(destination)?.children_mut() {
            children.push(source);
        }
        self.store.get_mut(source)?.set_parent(Some(destination));
        tracing::debug!(%source, from = %old_parent, to = %destination, "pasted cut");
        Ok(source)
    }
}

impl Default for MutationEngine {
    fn default() -> Self {
        Self::new(ManagerConfig::default())
    }
}

// Same ids, each exactly once, possibly in another order
fn is_reordering(current: &[NodeId], proposed: &[NodeId]) -> bool {
    if current.len() != proposed.len() {
        return false;
    }
    let current: HashSet<_> = current.iter().collect();
    let mut seen = HashSet::with_capacity(proposed.len());
    proposed
        .iter()
        .all(|id| current.contains(id) && seen.insert(*id))
}
