/*!
 * Document model assembled from paragraph records.
 */

use super::paragraph::ParagraphRecord;

/// Document-level properties written into the package metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// Author recorded as the document creator
    pub creator: String,

    /// Document title
    pub title: String,

    /// Free-form description
    pub description: String,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            creator: "LLBP Generator".to_string(),
            title: "LLBP Briefing".to_string(),
            description: "Generated Lessons Learned and Best Practices Document".to_string(),
        }
    }
}

/// Complete in-memory briefing, ready for encoding.
///
/// Paragraphs keep the order the model produced them in; nothing is
/// reordered, filtered or checked against the requested section layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentModel {
    /// Document metadata
    pub metadata: DocumentMetadata,

    /// Paragraphs in output order
    paragraphs: Vec<ParagraphRecord>,
}

impl DocumentModel {
    /// Wrap an ordered sequence of records with metadata.
    pub fn assemble(paragraphs: Vec<ParagraphRecord>, metadata: DocumentMetadata) -> Self {
        Self { metadata, paragraphs }
    }

    /// Paragraphs in output order.
    pub fn paragraphs(&self) -> &[ParagraphRecord] {
        &self.paragraphs
    }

    /// Number of paragraphs.
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Whether the document has no paragraphs at all.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Texts of the bold section headers, in order.
    pub fn section_titles(&self) -> Vec<&str> {
        self.paragraphs
            .iter()
            .filter(|p| p.bold)
            .map(|p| p.text.as_str())
            .collect()
    }
}
