//! Randomised operation sequences: the tree must stay valid after every step

mod common;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ::common::fs::{Clipboard, FileSystemManager, NodeId, NodePatch};

fn all_ids(fs: &FileSystemManager) -> (Vec<NodeId>, Vec<NodeId>) {
    let snapshot = fs.get_folder_structure().unwrap();
    let mut folders = Vec::new();
    let mut files = Vec::new();
    let mut stack = vec![&snapshot.root];
    while let Some(node) = stack.pop() {
        if node.is_folder {
            folders.push(node.id);
        } else {
            files.push(node.id);
        }
        stack.extend(node.children.iter());
    }
    (folders, files)
}

fn pick(rng: &mut StdRng, ids: &[NodeId]) -> NodeId {
    ids[rng.random_range(0..ids.len())]
}

fn run_sequence(seed: u64, steps: usize) {
    let (fs, root) = common::setup_test_env();
    let mut rng = StdRng::seed_from_u64(seed);

    for step in 0..steps {
        let (folders, files) = all_ids(&fs);
        let mut every: Vec<NodeId> = folders.iter().chain(files.iter()).copied().collect();
        every.sort();
        let count_before = fs.node_count();
        let clipboard = fs.clipboard();

        match rng.random_range(0..8) {
            0 => {
                fs.create_folder(pick(&mut rng, &folders)).unwrap();
            }
            1 => {
                fs.create_file(pick(&mut rng, &folders)).unwrap();
            }
            2 => {
                let id = pick(&mut rng, &every);
                fs.rename(id, format!("node-{}", step)).unwrap();
            }
            3 => {
                fs.begin_edit(pick(&mut rng, &every)).unwrap();
            }
            4 => {
                // keep the tree from doubling over and over once it is big
                let pool = if count_before > 100 && !files.is_empty() {
                    &files
                } else {
                    &every
                };
                fs.copy(pick(&mut rng, pool)).unwrap();
            }
            5 => {
                let id = pick(&mut rng, &every);
                if id != root {
                    let parent = fs.get(id).unwrap().parent().unwrap();
                    fs.cut(id, parent).unwrap();
                }
            }
            6 => {
                let destination = pick(&mut rng, &folders);
                let before = fs.get_folder_structure().unwrap();
                match (clipboard, fs.paste(destination)) {
                    (Clipboard::HoldingCopy(source), Ok(_)) => {
                        let copied = before.find(source).map(count_nodes).unwrap();
                        assert_eq!(fs.node_count(), count_before + copied);
                        assert!(fs.clipboard().is_empty());
                    }
                    (Clipboard::HoldingCut(source), Ok(contents)) => {
                        assert_eq!(fs.node_count(), count_before);
                        assert!(contents.iter().any(|node| node.id() == source));
                        assert!(fs.clipboard().is_empty());
                    }
                    (Clipboard::HoldingCut(_), Err(_)) => {
                        // rejected moves change nothing
                        assert_eq!(fs.get_folder_structure().unwrap(), before);
                        assert_eq!(fs.clipboard(), clipboard);
                    }
                    (Clipboard::Empty, Ok(_)) => {
                        assert_eq!(fs.get_folder_structure().unwrap(), before);
                    }
                    (held, Err(err)) => panic!("paste of {:?} failed: {}", held, err),
                }
            }
            _ => {
                let folder = pick(&mut rng, &folders);
                let mut order = fs.get(folder).unwrap().children().to_vec();
                order.reverse();
                fs.update(folder, NodePatch::folder_order(order)).unwrap();
            }
        }

        if let Err(err) = fs.check_invariants() {
            panic!("seed {} step {}: {}", seed, step, err);
        }
        assert!(fs.get_folder_structure().unwrap().node_count >= count_before);

        // Every path starts at the root and ends at the node
        let (folders, files) = all_ids(&fs);
        for id in folders.iter().chain(files.iter()) {
            let path = fs.get_current_path(*id).unwrap();
            assert_eq!(path.first().unwrap().id(), root);
            assert_eq!(path.last().unwrap().id(), *id);
        }
    }
}

fn count_nodes(node: &::common::fs::SnapshotNode) -> usize {
    1 + node.children.iter().map(count_nodes).sum::<usize>()
}

#[test]
fn test_random_sequences_keep_invariants() {
    for seed in 0..16 {
        run_sequence(seed, 150);
    }
}
