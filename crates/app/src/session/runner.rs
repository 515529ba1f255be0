use std::fmt;
use std::path::PathBuf;

use common::fs::{
    ContentCategory, FileSystemManager, FsError, Node, NodeId, NodePatch, TreeSnapshot,
};
use serde::Serialize;

use super::script::ScriptCommand;
use super::upload::read_upload;

/// Flat view of a node as a listing shows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub id: NodeId,
    pub name: String,
    pub kind: &'static str,
    pub is_editing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ContentCategory>,
}

impl From<&Node> for Entry {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id(),
            name: node.name().to_string(),
            kind: if node.is_folder() { "folder" } else { "file" },
            is_editing: node.is_editing(),
            category: node.payload().map(|payload| payload.category()),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.kind == "folder" { "/" } else { "" };
        write!(f, "{}{} [{}]", self.name, marker, self.id)?;
        if let Some(category) = self.category {
            write!(f, " <{}>", category)?;
        }
        if self.is_editing {
            write!(f, " (editing)")?;
        }
        Ok(())
    }
}

fn entries(nodes: &[Node]) -> Vec<Entry> {
    nodes.iter().map(Entry::from).collect()
}

/// State change produced by one session command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    ContentsFetched {
        folder: NodeId,
        contents: Vec<Entry>,
        path: Vec<Entry>,
    },
    FolderChanged {
        folder: NodeId,
        path: Vec<Entry>,
        contents: Vec<Entry>,
    },
    PathFetched {
        id: NodeId,
        path: Vec<Entry>,
    },
    StructureFetched {
        tree: TreeSnapshot,
    },
    NewItemCreated {
        item: Entry,
        contents: Vec<Entry>,
        structure: TreeSnapshot,
    },
    ItemCopied {
        id: NodeId,
    },
    ItemCut {
        id: NodeId,
    },
    ItemPasted {
        folder: NodeId,
        source: Option<NodeId>,
        contents: Vec<Entry>,
        structure: TreeSnapshot,
    },
    ItemEditing {
        id: NodeId,
        folder: NodeId,
        contents: Vec<Entry>,
    },
    EditCancelled {
        id: Option<NodeId>,
    },
    ItemRenamed {
        item: Entry,
        contents: Vec<Entry>,
        structure: TreeSnapshot,
    },
    ItemsReordered {
        folder: NodeId,
        contents: Vec<Entry>,
    },
    FileOpened {
        file: Entry,
        size: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        preview: Option<String>,
    },
}

fn write_list(f: &mut fmt::Formatter<'_>, entries: &[Entry]) -> fmt::Result {
    if entries.is_empty() {
        return write!(f, "  (empty)");
    }
    let lines: Vec<String> = entries.iter().map(|entry| format!("  {}", entry)).collect();
    write!(f, "{}", lines.join("\n"))
}

fn join_path(path: &[Entry]) -> String {
    let names: Vec<&str> = path.iter().map(|entry| entry.name.as_str()).collect();
    names.join("/")
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::ContentsFetched { folder, contents, .. } => {
                writeln!(f, "contents of {}:", folder)?;
                write_list(f, contents)
            }
            Event::FolderChanged {
                folder,
                path,
                contents,
            } => {
                writeln!(f, "now in {} [{}]:", join_path(path), folder)?;
                write_list(f, contents)
            }
            Event::PathFetched { id, path } => write!(f, "path of {}: {}", id, join_path(path)),
            Event::StructureFetched { tree } => {
                write!(f, "{}", tree.root.render().trim_end())
            }
            Event::NewItemCreated { item, .. } => write!(f, "created {}", item),
            Event::ItemCopied { id } => write!(f, "copied {}", id),
            Event::ItemCut { id } => write!(f, "cut {}", id),
            Event::ItemPasted { folder, contents, .. } => {
                writeln!(f, "pasted into {}:", folder)?;
                write_list(f, contents)
            }
            Event::ItemEditing { id, contents, .. } => {
                writeln!(f, "editing {}:", id)?;
                write_list(f, contents)
            }
            Event::EditCancelled { id: Some(id) } => write!(f, "cancelled edit of {}", id),
            Event::EditCancelled { id: None } => write!(f, "nothing to cancel"),
            Event::ItemRenamed { item, .. } => write!(f, "renamed {}", item),
            Event::ItemsReordered { folder, contents } => {
                writeln!(f, "reordered {}:", folder)?;
                write_list(f, contents)
            }
            Event::FileOpened {
                file,
                size,
                text,
                preview,
            } => {
                write!(f, "opened {} ({} bytes)", file, size)?;
                if let Some(text) = text {
                    write!(f, "\n{}", text)?;
                } else if let Some(preview) = preview {
                    write!(f, "\npreview: {} chars", preview.len())?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Fs(#[from] FsError),

    #[error(transparent)]
    Upload(#[from] anyhow::Error),
}

/// Drives one [`FileSystemManager`] the way a file browser would
#[derive(Debug)]
pub struct Session {
    fs: FileSystemManager,
    /// Relative upload paths resolve against this directory
    base_dir: PathBuf,
    current: NodeId,
}

impl Session {
    pub fn new(fs: FileSystemManager, base_dir: impl Into<PathBuf>) -> Self {
        let current = fs.root_id();
        Self {
            fs,
            base_dir: base_dir.into(),
            current,
        }
    }

    pub fn fs(&self) -> &FileSystemManager {
        &self.fs
    }

    /// The folder last entered with `cd`
    pub fn current_folder(&self) -> NodeId {
        self.current
    }

    pub async fn execute(&mut self, command: &ScriptCommand) -> Result<Event, SessionError> {
        tracing::debug!(command = command.keyword(), "executing");
        let event = match command {
            ScriptCommand::List(folder) => Event::ContentsFetched {
                folder: *folder,
                contents: entries(&self.fs.get_contents(*folder)?),
                path: entries(&self.fs.get_current_path(*folder)?),
            },
            ScriptCommand::ChangeFolder(folder) => {
                let contents = entries(&self.fs.get_contents(*folder)?);
                let path = entries(&self.fs.get_current_path(*folder)?);
                self.current = *folder;
                Event::FolderChanged {
                    folder: *folder,
                    path,
                    contents,
                }
            }
            ScriptCommand::Path(id) => Event::PathFetched {
                id: *id,
                path: entries(&self.fs.get_current_path(*id)?),
            },
            ScriptCommand::Tree => Event::StructureFetched {
                tree: self.fs.get_folder_structure()?,
            },
            ScriptCommand::MakeFolder(parent) => {
                let id = self.fs.create_folder(*parent)?;
                self.created(id)?
            }
            ScriptCommand::Touch(parent) => {
                let id = self.fs.create_file(*parent)?;
                self.created(id)?
            }
            ScriptCommand::Upload { parent, file } => {
                let path = self.base_dir.join(file);
                let upload = read_upload(*parent, &path).await?;
                let id = self.fs.upload_file(upload)?;
                self.created(id)?
            }
            ScriptCommand::Copy(id) => {
                self.fs.copy(*id)?;
                Event::ItemCopied { id: *id }
            }
            ScriptCommand::Cut { id, folder } => {
                self.fs.cut(*id, *folder)?;
                Event::ItemCut { id: *id }
            }
            ScriptCommand::Paste(folder) => {
                let source = self.fs.clipboard().source();
                let contents = entries(&self.fs.paste(*folder)?);
                Event::ItemPasted {
                    folder: *folder,
                    source,
                    contents,
                    structure: self.fs.get_folder_structure()?,
                }
            }
            ScriptCommand::Edit(id) => {
                self.fs.begin_edit(*id)?;
                let folder = self.listing_folder(*id)?;
                Event::ItemEditing {
                    id: *id,
                    folder,
                    contents: entries(&self.fs.get_contents(folder)?),
                }
            }
            ScriptCommand::Cancel => Event::EditCancelled {
                id: self.fs.cancel_edit(),
            },
            ScriptCommand::Done(name) => {
                let id = self.fs.commit_edit(name.as_str())?;
                self.renamed(id)?
            }
            ScriptCommand::Rename { id, name } => {
                self.fs.rename(*id, name.as_str())?;
                self.renamed(*id)?
            }
            ScriptCommand::Order { folder, children } => {
                self.fs
                    .update(*folder, NodePatch::folder_order(children.clone()))?;
                Event::ItemsReordered {
                    folder: *folder,
                    contents: entries(&self.fs.get_contents(*folder)?),
                }
            }
            ScriptCommand::Open(id) => {
                let node = self.fs.open_file(*id)?;
                let payload = node.payload();
                let text = payload
                    .filter(|payload| payload.category() == ContentCategory::Text)
                    .and_then(|payload| payload.text())
                    .map(str::to_string);
                Event::FileOpened {
                    size: payload.map(|payload| payload.len()).unwrap_or(0),
                    preview: payload
                        .and_then(|payload| payload.preview())
                        .map(str::to_string),
                    text,
                    file: Entry::from(&node),
                }
            }
        };
        Ok(event)
    }

    // The folder whose listing shows `id`. The root lists itself.
    fn listing_folder(&self, id: NodeId) -> Result<NodeId, FsError> {
        Ok(self.fs.get(id)?.parent().unwrap_or(id))
    }

    // Listing of the folder holding `id`, plus the whole tree
    fn views(&self, id: NodeId) -> Result<(Entry, Vec<Entry>, TreeSnapshot), FsError> {
        let item = Entry::from(&self.fs.get(id)?);
        let contents = entries(&self.fs.get_contents(self.listing_folder(id)?)?);
        Ok((item, contents, self.fs.get_folder_structure()?))
    }

    fn created(&self, id: NodeId) -> Result<Event, FsError> {
        let (item, contents, structure) = self.views(id)?;
        Ok(Event::NewItemCreated {
            item,
            contents,
            structure,
        })
    }

    fn renamed(&self, id: NodeId) -> Result<Event, FsError> {
        let (item, contents, structure) = self.views(id)?;
        Ok(Event::ItemRenamed {
            item,
            contents,
            structure,
        })
    }
}
