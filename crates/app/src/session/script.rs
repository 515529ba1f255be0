use std::path::PathBuf;

use common::fs::NodeId;

/// One parsed line of a session script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    List(NodeId),
    ChangeFolder(NodeId),
    Path(NodeId),
    Tree,
    MakeFolder(NodeId),
    Touch(NodeId),
    Upload { parent: NodeId, file: PathBuf },
    Copy(NodeId),
    Cut { id: NodeId, folder: NodeId },
    Paste(NodeId),
    Edit(NodeId),
    Cancel,
    Done(String),
    Rename { id: NodeId, name: String },
    Order { folder: NodeId, children: Vec<NodeId> },
    Open(NodeId),
}

impl ScriptCommand {
    /// The keyword this command was written with
    pub fn keyword(&self) -> &'static str {
        match self {
            ScriptCommand::List(_) => "ls",
            ScriptCommand::ChangeFolder(_) => "cd",
            ScriptCommand::Path(_) => "path",
            ScriptCommand::Tree => "tree",
            ScriptCommand::MakeFolder(_) => "mkdir",
            ScriptCommand::Touch(_) => "touch",
            ScriptCommand::Upload { .. } => "upload",
            ScriptCommand::Copy(_) => "copy",
            ScriptCommand::Cut { .. } => "cut",
            ScriptCommand::Paste(_) => "paste",
            ScriptCommand::Edit(_) => "edit",
            ScriptCommand::Cancel => "cancel",
            ScriptCommand::Done(_) => "done",
            ScriptCommand::Rename { .. } => "rename",
            ScriptCommand::Order { .. } => "order",
            ScriptCommand::Open(_) => "open",
        }
    }
}

/// A command together with the (1-based) line it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: ScriptCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ScriptError {
    pub line: usize,
    pub message: String,
}

/// Parse a whole script, stopping at the first bad line
pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut lines = Vec::new();
    for (index, text) in source.lines().enumerate() {
        let line = index + 1;
        match parse_line(text) {
            Ok(Some(command)) => lines.push(ScriptLine { line, command }),
            Ok(None) => {}
            Err(message) => return Err(ScriptError { line, message }),
        }
    }
    Ok(lines)
}

/// Parse a single line. Blank lines and comments yield `None`.
///
/// A comment is a line starting with `#`, or everything after a lone `#`
/// word, so names like `Track #1` survive.
pub fn parse_line(text: &str) -> Result<Option<ScriptCommand>, String> {
    if text.trim_start().starts_with('#') {
        return Ok(None);
    }
    let mut words = text.split_whitespace().take_while(|word| *word != "#");
    let Some(keyword) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match keyword {
        "ls" => ScriptCommand::List(single_id(keyword, &args)?),
        "cd" => ScriptCommand::ChangeFolder(single_id(keyword, &args)?),
        "path" => ScriptCommand::Path(single_id(keyword, &args)?),
        "tree" => {
            no_args(keyword, &args)?;
            ScriptCommand::Tree
        }
        "mkdir" => ScriptCommand::MakeFolder(single_id(keyword, &args)?),
        "touch" => ScriptCommand::Touch(single_id(keyword, &args)?),
        "upload" => match args.as_slice() {
            [parent, file] => ScriptCommand::Upload {
                parent: parse_id(parent)?,
                file: PathBuf::from(file),
            },
            _ => return Err(usage(keyword, "<parent> <host-file>")),
        },
        "copy" => ScriptCommand::Copy(single_id(keyword, &args)?),
        "cut" => match args.as_slice() {
            [id, folder] => ScriptCommand::Cut {
                id: parse_id(id)?,
                folder: parse_id(folder)?,
            },
            _ => return Err(usage(keyword, "<id> <folder>")),
        },
        "paste" => ScriptCommand::Paste(single_id(keyword, &args)?),
        "edit" => ScriptCommand::Edit(single_id(keyword, &args)?),
        "cancel" => {
            no_args(keyword, &args)?;
            ScriptCommand::Cancel
        }
        "done" => {
            if args.is_empty() {
                return Err(usage(keyword, "<name...>"));
            }
            ScriptCommand::Done(args.join(" "))
        }
        "rename" => match args.split_first() {
            Some((id, name)) if !name.is_empty() => ScriptCommand::Rename {
                id: parse_id(id)?,
                name: name.join(" "),
            },
            _ => return Err(usage(keyword, "<id> <name...>")),
        },
        "order" => match args.split_first() {
            Some((folder, children)) => ScriptCommand::Order {
                folder: parse_id(folder)?,
                children: children
                    .iter()
                    .map(|word| parse_id(word))
                    .collect::<Result<_, _>>()?,
            },
            None => return Err(usage(keyword, "<folder> <id...>")),
        },
        "open" => ScriptCommand::Open(single_id(keyword, &args)?),
        other => return Err(format!("unknown command '{}'", other)),
    };
    Ok(Some(command))
}

fn parse_id(word: &str) -> Result<NodeId, String> {
    if word == "root" {
        return Ok(NodeId::ROOT);
    }
    word.parse()
        .map_err(|_| format!("'{}' is not a node id", word))
}

fn single_id(keyword: &str, args: &[&str]) -> Result<NodeId, String> {
    match args {
        [word] => parse_id(word),
        _ => Err(usage(keyword, "<id>")),
    }
}

fn no_args(keyword: &str, args: &[&str]) -> Result<(), String> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(format!("'{}' takes no arguments", keyword))
    }
}

fn usage(keyword: &str, shape: &str) -> String {
    format!("usage: {} {}", keyword, shape)
}
