//! Directory enumeration.

use std::path::Path;

use crate::error::ExtractionError;
use crate::types::Document;

/// List the candidate documents directly inside `dir`.
///
/// Only regular files are returned (subdirectories are not descended into).
/// The result is sorted by document id so repeated runs enumerate in the
/// same order. Files with unsupported suffixes are kept and tagged
/// [`ContentKind::Unsupported`](crate::types::ContentKind::Unsupported).
///
/// # Errors
///
/// Returns [`ExtractionError::Io`] if the directory cannot be read.
pub async fn list_documents(dir: &Path) -> Result<Vec<Document>, ExtractionError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| ExtractionError::Io(format!("{}: {e}", dir.display())))?;

    let mut documents = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ExtractionError::Io(format!("{}: {e}", dir.display())))?
    {
        let file_type = match entry.file_type().await {
            Ok(ft) => ft,
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !file_type.is_file() {
            continue;
        }
        if let Some(document) = Document::from_path(entry.path()) {
            documents.push(document);
        }
    }

    documents.sort_by(|a, b| a.id.cmp(&b.id));
    tracing::debug!(dir = %dir.display(), count = documents.len(), "enumerated documents");
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentKind;

    #[tokio::test]
    async fn lists_files_sorted_with_kinds() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("b.pdf"), b"%PDF").expect("write");
        std::fs::write(dir.path().join("a.txt"), b"hello").expect("write");
        std::fs::write(dir.path().join("c.docx"), b"zip").expect("write");
        std::fs::create_dir(dir.path().join("nested")).expect("mkdir");

        let docs = list_documents(dir.path()).await.expect("list");
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a.txt", "b.pdf", "c.docx"]);
        assert_eq!(docs[0].kind, ContentKind::Text);
        assert_eq!(docs[1].kind, ContentKind::Pdf);
        assert_eq!(docs[2].kind, ContentKind::Unsupported);
    }

    #[tokio::test]
    async fn empty_directory_lists_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let docs = list_documents(dir.path()).await.expect("list");
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("does-not-exist");
        let err = list_documents(&missing).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Io(_)));
        assert!(err.to_string().contains("does-not-exist"));
    }
}
