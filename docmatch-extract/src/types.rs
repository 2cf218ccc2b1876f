//! Core types for enumerated documents and their content kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Content kind inferred from a document's file-name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Plain text (`.txt`).
    Text,
    /// PDF (`.pdf`); selectable text with an OCR fallback per page.
    Pdf,
    /// Raster image (`.jpg`, `.jpeg`, `.png`); always OCR.
    Image,
    /// Any other suffix. Extracts to empty text.
    Unsupported,
}

impl ContentKind {
    /// Infer the content kind from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Self::Unsupported;
        };
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Self::Text,
            "pdf" => Self::Pdf,
            "jpg" | "jpeg" | "png" => Self::Image,
            _ => Self::Unsupported,
        }
    }

    /// Returns the lowercase name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Unsupported => "unsupported",
        }
    }

    /// Whether extracting this kind may require OCR.
    pub fn needs_ocr(&self) -> bool {
        matches!(self, Self::Pdf | Self::Image)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A candidate document discovered during enumeration.
///
/// Immutable once created. `id` is the file name and is unique within a
/// single directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier used as the result key (the file name).
    pub id: String,
    /// Content kind inferred from the suffix.
    pub kind: ContentKind,
    /// Location of the raw document.
    pub path: PathBuf,
}

impl Document {
    /// Build a document from a path, using its file name as the identifier.
    ///
    /// Returns `None` when the path has no file-name component.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let id = path.file_name()?.to_string_lossy().into_owned();
        let kind = ContentKind::from_path(&path);
        Some(Self { id, kind, path })
    }
}
