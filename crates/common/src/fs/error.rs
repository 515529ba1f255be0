use super::id::NodeId;

/// Broad class of a failure, for callers that only care which bucket
///  an error falls in (e.g. to pick a user-facing message).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The id does not resolve, or resolves to the wrong kind of node
    NotFound,
    /// The operation would break a tree invariant
    InvalidOperation,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FsError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("node is not a folder: {0}")]
    NotAFolder(NodeId),
    #[error("node is not a file: {0}")]
    NotAFile(NodeId),
    #[error("cannot move {from} into {to}: destination is inside source")]
    MoveIntoSelf { from: NodeId, to: NodeId },
    #[error("the root folder cannot be moved")]
    RootImmutable,
    #[error("no item is being edited")]
    NoEditSession,
    #[error("patch does not match the kind of node {0}")]
    PatchKindMismatch(NodeId),
    #[error("new child order for folder {0} must hold exactly its current children")]
    InvalidChildOrder(NodeId),
    #[error("node {id} is not inside folder {folder}")]
    CutOutsideFolder { id: NodeId, folder: NodeId },
    #[error("tree invariant violated: {0}")]
    Invariant(String),
}

impl FsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FsError::NodeNotFound(_) | FsError::NotAFolder(_) => ErrorKind::NotFound,
            FsError::NotAFile(_)
            | FsError::MoveIntoSelf { .. }
            | FsError::RootImmutable
            | FsError::NoEditSession
            | FsError::PatchKindMismatch(_)
            | FsError::InvalidChildOrder(_)
            | FsError::CutOutsideFolder { .. }
            | FsError::Invariant(_) => ErrorKind::InvalidOperation,
        }
    }
}
