//! Message types passed between pipeline stages.

/// Text extracted from one document, ready for scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecord {
    /// Document id (file name).
    pub id: String,
    /// Extracted text. Empty when extraction failed.
    pub text: String,
}

/// A group of records handed from ingestion to scoring as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Push order on the transfer channel, starting at 0.
    pub seq: usize,
    /// Records in extraction-completion order. Never empty.
    pub records: Vec<ExtractedRecord>,
}

impl Batch {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A value on the transfer channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    /// Records to score.
    Batch(Batch),
    /// Terminal value: no more batches follow.
    Done,
}
