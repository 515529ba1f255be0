use std::sync::Arc;

use parking_lot::RwLock;

use super::clipboard::Clipboard;
use super::config::ManagerConfig;
use super::engine::{MutationEngine, UploadDescriptor};
use super::error::FsError;
use super::id::NodeId;
use super::navigator::TreeSnapshot;
use super::node::{Node, NodePatch};

/// Shared handle to one virtual file system.
///
/// Cloning the handle is cheap and every clone sees the same tree.
/// Writes hold the lock exclusively for the whole operation; reads
/// share it. Nothing here blocks on anything but the lock.
#[derive(Clone)]
pub struct FileSystemManager(Arc<RwLock<MutationEngine>>);

impl Default for FileSystemManager {
    fn default() -> Self {
        Self::new(ManagerConfig::default())
    }
}

impl std::fmt::Debug for FileSystemManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let engine = self.0.read();
        f.debug_struct("FileSystemManager")
            .field("nodes", &engine.store().node_count())
            .field("clipboard", &engine.clipboard())
            .field("editing", &engine.store().editing())
            .finish()
    }
}

impl FileSystemManager {
    pub fn new(config: ManagerConfig) -> Self {
        tracing::debug!(root = %config.root_name, "file system initialised");
        Self(Arc::new(RwLock::new(MutationEngine::new(config))))
    }

    pub fn root_id(&self) -> NodeId {
        self.0.read().store().root_id()
    }

    pub fn node_count(&self) -> usize {
        self.0.read().store().node_count()
    }

    pub fn clipboard(&self) -> Clipboard {
        self.0.read().clipboard()
    }

    /// The node currently being renamed, if any
    pub fn editing(&self) -> Option<NodeId> {
        self.0.read().store().editing()
    }

    /// Look up a single node
    pub fn get(&self, id: NodeId) -> Result<Node, FsError> {
        self.0.read().store().get(id).cloned()
    }

    pub fn get_contents(&self, folder: NodeId) -> Result<Vec<Node>, FsError> {
        self.0.read().navigator().contents(folder)
    }

    pub fn get_current_path(&self, id: NodeId) -> Result<Vec<Node>, FsError> {
        self.0.read().navigator().path_to(id)
    }

    pub fn get_folder_structure(&self) -> Result<TreeSnapshot, FsError> {
        self.0.read().navigator().structure()
    }

    /// Fetch a file for display
    pub fn open_file(&self, id: NodeId) -> Result<Node, FsError> {
        let engine = self.0.read();
        let node = engine.store().get(id)?;
        if !node.is_file() {
            return Err(FsError::NotAFile(id));
        }
        Ok(node.clone())
    }

    pub fn create_folder(&self, parent: NodeId) -> Result<NodeId, FsError> {
        logged(self.0.write().create_folder(parent), "create_folder")
    }

    pub fn create_file(&self, parent: NodeId) -> Result<NodeId, FsError> {
        logged(self.0.write().create_file(parent), "create_file")
    }

    pub fn upload_file(&self, upload: UploadDescriptor) -> Result<NodeId, FsError> {
        logged(self.0.write().upload_file(upload), "upload_file")
    }

    pub fn copy(&self, id: NodeId) -> Result<(), FsError> {
        logged(self.0.write().copy(id), "copy")
    }

    /// Cut `id` out of `current_folder`, the folder the caller is showing.
    ///  Fails if `id` does not live there.
    pub fn cut(&self, id: NodeId, current_folder: NodeId) -> Result<(), FsError> {
        let mut engine = self.0.write();
        let parent = engine.store().get(id).map(|node| node.parent());
        let result = match parent {
            Ok(parent) if parent != Some(current_folder) => Err(FsError::CutOutsideFolder {
                id,
                folder: current_folder,
            }),
            Ok(_) => engine.cut(id),
            Err(err) => Err(err),
        };
        logged(result, "cut")
    }

    /// Paste the clipboard into `destination` and return its new contents.
    ///  With nothing on the clipboard this just returns the contents.
    pub fn paste(&self, destination: NodeId) -> Result<Vec<Node>, FsError> {
        let mut engine = self.0.write();
        logged(engine.paste(destination), "paste")?;
        engine.navigator().contents(destination)
    }

    pub fn update(&self, id: NodeId, patch: NodePatch) -> Result<(), FsError> {
        logged(self.0.write().update(id, patch), "update")
    }

    pub fn rename(&self, id: NodeId, name: impl Into<String>) -> Result<(), FsError> {
        logged(self.0.write().rename(id, name), "rename")
    }

    pub fn begin_edit(&self, id: NodeId) -> Result<(), FsError> {
        logged(self.0.write().begin_edit(id), "begin_edit")
    }

    pub fn cancel_edit(&self) -> Option<NodeId> {
        self.0.write().cancel_edit()
    }

    pub fn commit_edit(&self, name: impl Into<String>) -> Result<NodeId, FsError> {
        logged(self.0.write().commit_edit(name), "commit_edit")
    }

    /// Run the full invariant check over the current tree
    pub fn check_invariants(&self) -> Result<(), FsError> {
        self.0.read().store().check_invariants()
    }
}

fn logged<T>(result: Result<T, FsError>, op: &'static str) -> Result<T, FsError> {
    if let Err(err) = &result {
        tracing::warn!(op, error = %err, "operation rejected");
    }
    result
}
