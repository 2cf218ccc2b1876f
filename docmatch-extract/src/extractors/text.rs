//! Plain-text documents.

use std::path::Path;

use crate::error::ExtractionError;

/// Read a text file. Invalid UTF-8 sequences are replaced rather than
/// rejected, so a stray Latin-1 byte does not discard the whole document.
pub async fn read_text(path: &Path) -> Result<String, ExtractionError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ExtractionError::Io(format!("{}: {e}", path.display())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_utf8_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cv.txt");
        std::fs::write(&path, "Python and Data expert").expect("write");
        assert_eq!(read_text(&path).await.expect("read"), "Python and Data expert");
    }

    #[tokio::test]
    async fn invalid_utf8_is_replaced() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("latin1.txt");
        std::fs::write(&path, b"caf\xe9 python").expect("write");
        let text = read_text(&path).await.expect("read");
        assert!(text.ends_with(" python"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_text(&dir.path().join("gone.txt")).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Io(_)));
    }
}
