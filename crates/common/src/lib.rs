/**
 * Virtual file system types and operations.
 *  - Node storage and identifier allocation
 *  - Navigation (contents, paths, tree snapshots)
 *  - Clipboard and structural mutations
 */
pub mod fs;

pub mod prelude {
    pub use crate::fs::{
        Clipboard, ContentCategory, ErrorKind, FilePatch, FilePayload, FileSystemManager,
        FolderPatch, FsError, ManagerConfig, Node, NodeId, NodeKind, NodePatch, TreeSnapshot,
        UploadDescriptor,
    };
}
