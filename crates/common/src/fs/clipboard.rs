use serde::{Deserialize, Serialize};

use super::id::NodeId;

/// The single pending copy or cut.
///
/// A new copy or cut simply replaces whatever was held. Only a
/// successful paste empties it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "source", rename_all = "snake_case")]
pub enum Clipboard {
    #[default]
    Empty,
    HoldingCopy(NodeId),
    HoldingCut(NodeId),
}

impl Clipboard {
    pub fn copy(&mut self, id: NodeId) {
        *self = Clipboard::HoldingCopy(id);
    }

    pub fn cut(&mut self, id: NodeId) {
        *self = Clipboard::HoldingCut(id);
    }

    /// Empty the clipboard, returning what it held
    pub fn take(&mut self) -> Clipboard {
        std::mem::take(self)
    }

    /// The id held, if any
    pub fn source(&self) -> Option<NodeId> {
        match self {
            Clipboard::Empty => None,
            Clipboard::HoldingCopy(id) | Clipboard::HoldingCut(id) => Some(*id),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Clipboard::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_writer_wins() {
        let mut clipboard = Clipboard::default();
        assert!(clipboard.is_empty());

        clipboard.copy(NodeId::new(2));
        assert_eq!(clipboard, Clipboard::HoldingCopy(NodeId::new(2)));

        clipboard.cut(NodeId::new(3));
        assert_eq!(clipboard, Clipboard::HoldingCut(NodeId::new(3)));

        clipboard.copy(NodeId::new(4));
        assert_eq!(clipboard.source(), Some(NodeId::new(4)));
    }

    #[test]
    fn test_take_empties() {
        let mut clipboard = Clipboard::HoldingCut(NodeId::new(5));
        assert_eq!(clipboard.take(), Clipboard::HoldingCut(NodeId::new(5)));
        assert!(clipboard.is_empty());
        assert_eq!(clipboard.take(), Clipboard::Empty);
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&Clipboard::HoldingCopy(NodeId::new(2))).unwrap();
        assert_eq!(json, r#"{"state":"holding_copy","source":2}"#);
        let json = serde_json::to_string(&Clipboard::Empty).unwrap();
        assert_eq!(json, r#"{"state":"empty"}"#);
    }
}
