use serde::{Deserialize, Serialize};

use super::category::ContentCategory;
use super::id::NodeId;

/**
 * Nodes
 * =====
 * A node is one entry in the virtual tree, either a folder or a file.
 *  Nodes never hold each other directly; they refer to their parent
 *  and (for folders) their children by id, and the store resolves
 *  those ids. That keeps moves cheap: re-parenting touches two child
 *  lists and one parent pointer, never the subtree below.
 */

// What a file carries. The content is opaque to the tree; the category
//  and preview are decided by whoever uploaded it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilePayload {
    category: ContentCategory,
    content: Vec<u8>,
    preview: Option<String>,
}

impl FilePayload {
    pub fn new(category: ContentCategory, content: Vec<u8>, preview: Option<String>) -> Self {
        Self {
            category,
            content,
            preview,
        }
    }

    pub fn category(&self) -> ContentCategory {
        self.category
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content as UTF-8, if it is valid UTF-8
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Folder { children: Vec<NodeId> },
    File { payload: FilePayload },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    name: String,
    parent: Option<NodeId>,
    #[serde(flatten)]
    kind: NodeKind,
    is_editing: bool,
}

impl Node {
    pub fn new_folder(id: NodeId, name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            id,
            name: name.into(),
            parent,
            kind: NodeKind::Folder {
                children: Vec::new(),
            },
            is_editing: false,
        }
    }

    pub fn new_file(
        id: NodeId,
        name: impl Into<String>,
        parent: NodeId,
        payload: FilePayload,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            parent: Some(parent),
            kind: NodeKind::File { payload },
            is_editing: false,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    /// Check if this is a folder
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    /// Check if this is a file
    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    /// Child ids in display order; empty for files
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Folder { children } => children,
            NodeKind::File { .. } => &[],
        }
    }

    /// Get the payload if this is a file
    pub fn payload(&self) -> Option<&FilePayload> {
        match &self.kind {
            NodeKind::File { payload } => Some(payload),
            NodeKind::Folder { .. } => None,
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub(crate) fn set_editing(&mut self, editing: bool) {
        self.is_editing = editing;
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match &mut self.kind {
            NodeKind::Folder { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    pub(crate) fn set_payload(&mut self, new_payload: FilePayload) -> bool {
        match &mut self.kind {
            NodeKind::File { payload } => {
                *payload = new_payload;
                true
            }
            NodeKind::Folder { .. } => false,
        }
    }

    /// Copy of this node under a new id and parent, with no children
    ///  and no editing flag. Used when duplicating subtrees.
    pub(crate) fn detached_copy(&self, id: NodeId, parent: NodeId) -> Self {
        let kind = match &self.kind {
            NodeKind::Folder { .. } => NodeKind::Folder {
                children: Vec::new(),
            },
            NodeKind::File { payload } => NodeKind::File {
                payload: payload.clone(),
            },
        };
        Self {
            id,
            name: self.name.clone(),
            parent: Some(parent),
            kind,
            is_editing: false,
        }
    }
}

/// Fields of a folder that may be patched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderPatch {
    pub name: Option<String>,
    /// New child order. Must hold exactly the folder's current children.
    pub children: Option<Vec<NodeId>>,
}

/// Fields of a file that may be patched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePatch {
    pub name: Option<String>,
    pub payload: Option<FilePayload>,
}

/// A typed partial update. The variant must match the kind of the node
///  it is applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodePatch {
    Folder(FolderPatch),
    File(FilePatch),
}

impl NodePatch {
    pub fn folder_name(name: impl Into<String>) -> Self {
        NodePatch::Folder(FolderPatch {
            name: Some(name.into()),
            children: None,
        })
    }

    pub fn folder_order(children: Vec<NodeId>) -> Self {
        NodePatch::Folder(FolderPatch {
            name: None,
            children: Some(children),
        })
    }

    pub fn file_name(name: impl Into<String>) -> Self {
        NodePatch::File(FilePatch {
            name: Some(name.into()),
            payload: None,
        })
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            NodePatch::Folder(patch) => patch.name.as_deref(),
            NodePatch::File(patch) => patch.name.as_deref(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_folder_accessors() {
        let folder = Node::new_folder(NodeId::ROOT, "root", None);
        assert!(folder.is_folder());
        assert!(!folder.is_file());
        assert!(folder.children().is_empty());
        assert!(folder.payload().is_none());
        assert_eq!(folder.parent(), None);
    }

    #[test]
    fn test_file_accessors() {
        let payload = FilePayload::new(ContentCategory::Text, b"hello".to_vec(), None);
        let file = Node::new_file(NodeId::new(2), "a.txt", NodeId::ROOT, payload);
        assert!(file.is_file());
        assert!(file.children().is_empty());
        let payload = file.payload().unwrap();
        assert_eq!(payload.text(), Some("hello"));
        assert_eq!(payload.category(), ContentCategory::Text);
        assert_eq!(payload.len(), 5);
    }

    #[test]
    fn test_detached_copy_drops_children_and_flag() {
        let mut folder = Node::new_folder(NodeId::new(2), "A", Some(NodeId::ROOT));
        folder.children_mut().unwrap().push(NodeId::new(3));
        folder.set_editing(true);

        let copy = folder.detached_copy(NodeId::new(9), NodeId::new(5));
        assert_eq!(copy.id(), NodeId::new(9));
        assert_eq!(copy.parent(), Some(NodeId::new(5)));
        assert_eq!(copy.name(), "A");
        assert!(copy.children().is_empty());
        assert!(!copy.is_editing());
    }

    #[test]
    fn test_node_json_shape() {
        let folder = Node::new_folder(NodeId::ROOT, "root", None);
        let json = serde_json::to_value(&folder).unwrap();
        assert_eq!(json["type"], "folder");
        assert_eq!(json["id"], 1);
        assert_eq!(json["children"], serde_json::json!([]));
    }
}
