use std::path::Path;

use anyhow::{anyhow, Context};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::fs::{ContentCategory, NodeId, UploadDescriptor};

/// Read a host file into an upload for `parent`.
///
/// The category comes from the MIME type guessed off the extension.
/// Images also carry a `data:` URL so a viewer can show them directly.
pub async fn read_upload(parent: NodeId, path: &Path) -> anyhow::Result<UploadDescriptor> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("upload path {} has no file name", path.display()))?;

    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read upload {}", path.display()))?;

    let category = ContentCategory::from_path(path);
    let preview = match category {
        ContentCategory::Image => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            Some(data_url(mime.essence_str(), &content))
        }
        _ => None,
    };

    tracing::debug!(
        file = %path.display(),
        %category,
        size = content.len(),
        "read upload"
    );

    Ok(UploadDescriptor {
        parent,
        name,
        category,
        content,
        preview,
    })
}

fn data_url(mime: &str, content: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_image_upload_has_preview() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dot.png");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let upload = read_upload(NodeId::ROOT, &path).await.unwrap();
        assert_eq!(upload.name, "dot.png");
        assert_eq!(upload.category, ContentCategory::Image);
        assert_eq!(upload.preview.as_deref(), Some("data:image/png;base64,AQID"));
    }

    #[tokio::test]
    async fn test_text_upload() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let upload = read_upload(NodeId::ROOT, &path).await.unwrap();
        assert_eq!(upload.category, ContentCategory::Text);
        assert_eq!(upload.content, b"hello");
        assert!(upload.preview.is_none());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = read_upload(NodeId::ROOT, &dir.path().join("gone.bin"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to read upload"));
    }
}
