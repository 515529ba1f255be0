//! Virtual file system data structures and operations
//!
//! This module defines the in-memory tree behind the file browser:
//!
//! - **[`Node`]**: a folder or a file, addressed by a [`NodeId`]
//! - **[`NodeStore`]**: owns every node, keyed by id
//! - **[`Clipboard`]**: the single pending copy or cut
//! - **[`FileSystemManager`]**: the shared handle callers operate on
//!
//! # Architecture
//!
//! ## Tree shape
//!
//! Nodes live flat in the store and point at each other by id:
//! ```text
//! root (1, Folder) --children--> [A (2, Folder), notes (4, File)]
//!                                   |
//!                                   +--children--> [photo (3, File)]
//! ```
//! Every non-root node carries a `parent` id, and its parent's `children`
//! list contains it exactly once. Child order is insertion order.
//!
//! ## Writes
//!
//! Only the mutation engine writes to the store. Every operation is checked
//! in full before the first write lands, so a rejected operation leaves the
//! tree exactly as it was.
//!
//! ## Clipboard
//!
//! `cut` does not detach anything. The node is re-parented when the cut is
//! pasted; an abandoned cut leaves the tree alone. `copy` + `paste`
//! duplicates the subtree under fresh ids.

mod category;
mod clipboard;
mod config;
mod engine;
mod error;
mod id;
mod manager;
mod navigator;
mod node;
mod store;

pub use category::ContentCategory;
pub use clipboard::Clipboard;
pub use config::ManagerConfig;
pub use engine::{MutationEngine, UploadDescriptor};
pub use error::{ErrorKind, FsError};
pub use id::{IdAllocator, NodeId};
pub use manager::FileSystemManager;
pub use navigator::{SnapshotNode, TreeNavigator, TreeSnapshot};
pub use node::{FilePatch, FilePayload, FolderPatch, Node, NodeKind, NodePatch};
pub use store::NodeStore;
