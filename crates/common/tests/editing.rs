//! Integration tests for in-place rename sessions and patches

mod common;

use ::common::fs::{ErrorKind, FsError, NodeId, NodePatch};

fn editing_count(fs: &::common::fs::FileSystemManager) -> usize {
    let snapshot = fs.get_folder_structure().unwrap();
    let mut stack = vec![&snapshot.root];
    let mut count = 0;
    while let Some(node) = stack.pop() {
        if node.is_editing {
            count += 1;
        }
        stack.extend(node.children.iter());
    }
    count
}

#[test]
fn test_single_editor() {
    let (fs, root, folder, file) = common::setup_folder_with_file();

    fs.begin_edit(folder).unwrap();
    assert_eq!(fs.editing(), Some(folder));
    assert_eq!(editing_count(&fs), 1);

    fs.begin_edit(file).unwrap();
    assert_eq!(fs.editing(), Some(file));
    assert_eq!(editing_count(&fs), 1);
    assert!(!fs.get(folder).unwrap().is_editing());

    // The listing shows the flag on the item being renamed
    let contents = fs.get_contents(folder).unwrap();
    assert!(contents[0].is_editing());
    assert!(!fs.get_contents(root).unwrap()[0].is_editing());
}

#[test]
fn test_done_editing_renames_and_clears() {
    let (fs, _, folder, _) = common::setup_folder_with_file();

    fs.begin_edit(folder).unwrap();
    assert_eq!(fs.commit_edit("Photos").unwrap(), folder);

    let node = fs.get(folder).unwrap();
    assert_eq!(node.name(), "Photos");
    assert!(!node.is_editing());
    assert_eq!(editing_count(&fs), 0);
}

#[test]
fn test_commit_without_session() {
    let (fs, _) = common::setup_test_env();
    let err = fs.commit_edit("x").unwrap_err();
    assert_eq!(err, FsError::NoEditSession);
    assert_eq!(err.kind(), ErrorKind::InvalidOperation);
}

#[test]
fn test_cancel_keeps_name() {
    let (fs, _, folder, _) = common::setup_folder_with_file();
    fs.begin_edit(folder).unwrap();
    assert_eq!(fs.cancel_edit(), Some(folder));
    assert_eq!(fs.get(folder).unwrap().name(), "A");
    assert_eq!(editing_count(&fs), 0);
}

#[test]
fn test_rename_clears_flag() {
    let (fs, _, folder, _) = common::setup_folder_with_file();
    fs.begin_edit(folder).unwrap();
    fs.rename(folder, "B").unwrap();
    assert_eq!(fs.editing(), None);
}

#[test]
fn test_begin_edit_missing_node() {
    let (fs, root) = common::setup_test_env();
    fs.begin_edit(root).unwrap();
    assert_eq!(
        fs.begin_edit(NodeId::new(31)).unwrap_err(),
        FsError::NodeNotFound(NodeId::new(31))
    );
    // Failed call leaves the existing session in place
    assert_eq!(fs.editing(), Some(root));
}

#[test]
fn test_copy_of_edited_node_is_not_editing() {
    let (fs, root, folder, _) = common::setup_folder_with_file();
    fs.begin_edit(folder).unwrap();
    fs.copy(folder).unwrap();
    let contents = fs.paste(root).unwrap();
    assert!(!contents[1].is_editing());
    assert_eq!(editing_count(&fs), 1);
}

#[test]
fn test_update_name_and_order() {
    let (fs, root, folder, _) = common::setup_folder_with_file();
    let second = fs.create_file(root).unwrap();

    fs.update(folder, NodePatch::folder_name("Docs")).unwrap();
    assert_eq!(fs.get(folder).unwrap().name(), "Docs");

    fs.update(root, NodePatch::folder_order(vec![second, folder]))
        .unwrap();
    assert_eq!(
        common::ids(&fs.get_contents(root).unwrap()),
        vec![second, folder]
    );
    fs.check_invariants().unwrap();
}

#[test]
fn test_update_rejects_foreign_children() {
    let (fs, root, folder, file) = common::setup_folder_with_file();
    let before = fs.get_folder_structure().unwrap();

    // `file` lives in `folder`, not in root
    let err = fs
        .update(root, NodePatch::folder_order(vec![folder, file]))
        .unwrap_err();
    assert_eq!(err, FsError::InvalidChildOrder(root));
    assert_eq!(fs.get_folder_structure().unwrap(), before);
}

#[test]
fn test_update_name_ends_edit_session() {
    let (fs, _root, folder, file) = common::setup_folder_with_file();

    fs.begin_edit(folder).unwrap();
    fs.update(folder, NodePatch::folder_name("Docs")).unwrap();

    assert_eq!(fs.editing(), None);
    let node = fs.get(folder).unwrap();
    assert_eq!(node.name(), "Docs");
    assert!(!node.is_editing());
    assert_eq!(editing_count(&fs), 0);

    // Renaming some other node leaves the session alone
    fs.begin_edit(folder).unwrap();
    fs.update(file, NodePatch::file_name("cover.png")).unwrap();
    assert_eq!(fs.editing(), Some(folder));

    // A pure reorder is not a rename
    fs.update(folder, NodePatch::folder_order(vec![file])).unwrap();
    assert_eq!(fs.editing(), Some(folder));
    fs.check_invariants().unwrap();
}
