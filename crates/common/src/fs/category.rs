use std::path::Path;

use mime::Mime;
use serde::{Deserialize, Serialize};

/// Coarse content class of an uploaded file.
///
/// The core never sniffs content itself; hosts classify uploads with
/// [`ContentCategory::from_mime`] or [`ContentCategory::from_path`] and
/// hand the result in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentCategory {
    Image,
    Text,
    #[default]
    Other,
}

impl ContentCategory {
    pub fn from_mime(mime: &Mime) -> Self {
        match mime.type_() {
            mime::IMAGE => ContentCategory::Image,
            mime::TEXT => ContentCategory::Text,
            _ => ContentCategory::Other,
        }
    }

    /// Classify by the MIME type guessed from the path's extension
    pub fn from_path(path: &Path) -> Self {
        mime_guess::from_path(path)
            .first()
            .map(|mime| Self::from_mime(&mime))
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCategory::Image => "image",
            ContentCategory::Text => "text",
            ContentCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_mime() {
        let png: Mime = "image/png".parse().unwrap();
        let html: Mime = "text/html; charset=utf-8".parse().unwrap();
        let json: Mime = "application/json".parse().unwrap();

        assert_eq!(ContentCategory::from_mime(&png), ContentCategory::Image);
        assert_eq!(ContentCategory::from_mime(&html), ContentCategory::Text);
        assert_eq!(ContentCategory::from_mime(&json), ContentCategory::Other);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            ContentCategory::from_path(&PathBuf::from("/pics/cat.jpg")),
            ContentCategory::Image
        );
        assert_eq!(
            ContentCategory::from_path(&PathBuf::from("notes.txt")),
            ContentCategory::Text
        );
        // mime_guess has nothing for unknown extensions or bare names
        assert_eq!(
            ContentCategory::from_path(&PathBuf::from("/test/file.unknownext")),
            ContentCategory::Other
        );
        assert_eq!(
            ContentCategory::from_path(&PathBuf::from("README")),
            ContentCategory::Other
        );
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ContentCategory::Image).unwrap();
        assert_eq!(json, r#""image""#);
        let parsed: ContentCategory = serde_json::from_str(r#""text""#).unwrap();
        assert_eq!(parsed, ContentCategory::Text);
    }
}
