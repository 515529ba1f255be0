//! Shared test utilities for file system integration tests
#![allow(dead_code)]

use ::common::fs::{FileSystemManager, ManagerConfig, NodeId};

/// Set up a manager with the default config and return it with its root id
pub fn setup_test_env() -> (FileSystemManager, NodeId) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let fs = FileSystemManager::new(ManagerConfig::default());
    let root = fs.root_id();
    (fs, root)
}

/// Build root -> A -> one file, returning (fs, root, folder A, file)
pub fn setup_folder_with_file() -> (FileSystemManager, NodeId, NodeId, NodeId) {
    let (fs, root) = setup_test_env();
    let folder = fs.create_folder(root).unwrap();
    fs.rename(folder, "A").unwrap();
    let file = fs.create_file(folder).unwrap();
    fs.rename(file, "photo.png").unwrap();
    (fs, root, folder, file)
}

/// Ids of a listing, in order
pub fn ids(nodes: &[::common::fs::Node]) -> Vec<NodeId> {
    nodes.iter().map(|node| node.id()).collect()
}
