//! Export output and statistics.

use super::ExportFormat;
use crate::model::Block;
use serde::{Deserialize, Serialize};

/// The product of an export: bytes for binary formats, text for LaTeX.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutput {
    /// Binary document (PDF, DOCX)
    Bytes(Vec<u8>),
    /// UTF-8 source text (LaTeX)
    Text(String),
}

impl ExportOutput {
    /// Borrow the output as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ExportOutput::Bytes(b) => b,
            ExportOutput::Text(s) => s.as_bytes(),
        }
    }

    /// Consume the output into bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            ExportOutput::Bytes(b) => b,
            ExportOutput::Text(s) => s.into_bytes(),
        }
    }

    /// The text, if this is a text output.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ExportOutput::Text(s) => Some(s),
            ExportOutput::Bytes(_) => None,
        }
    }

    /// Output length in bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Check if the output is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An export result with its format and statistics.
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Format that produced the output
    pub format: ExportFormat,

    /// The output
    pub output: ExportOutput,

    /// Statistics
    pub stats: ExportStats,
}

impl ExportResult {
    /// MIME type of the output.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Statistics collected while exporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStats {
    /// Pages produced (page-description output only; 0 elsewhere)
    pub page_count: u32,

    /// Blocks rendered
    pub block_count: u32,

    /// Headings rendered
    pub heading_count: u32,

    /// Paragraphs rendered
    pub paragraph_count: u32,

    /// List items rendered
    pub list_item_count: u32,

    /// Blockquotes rendered
    pub quote_count: u32,

    /// Horizontal rules rendered
    pub rule_count: u32,

    /// Bibliography entries rendered
    pub reference_count: u32,

    /// Whitespace-separated words
    pub word_count: u32,

    /// Non-whitespace characters
    pub char_count: u32,
}

impl ExportStats {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every block of a document body.
    pub fn from_blocks(blocks: &[Block]) -> Self {
        let mut stats = Self::new();
        for block in blocks {
            stats.add_block(block);
        }
        stats
    }

    /// Count one block.
    pub fn add_block(&mut self, block: &Block) {
        self.block_count += 1;
        match block {
            Block::Heading { .. } => self.heading_count += 1,
            Block::Paragraph { .. } => self.paragraph_count += 1,
            Block::ListItem { .. } => self.list_item_count += 1,
            Block::Blockquote { .. } => self.quote_count += 1,
            Block::Rule => self.rule_count += 1,
        }
        for run in block.runs() {
            self.count_text(&run.text);
        }
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ExportStats) {
        self.page_count += other.page_count;
        self.block_count += other.block_count;
        self.heading_count += other.heading_count;
        self.paragraph_count += other.paragraph_count;
        self.list_item_count += other.list_item_count;
        self.quote_count += other.quote_count;
        self.rule_count += other.rule_count;
        self.reference_count += other.reference_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_text() {
        let mut stats = ExportStats::new();
        stats.count_text("Hello, world! This is a test.");
        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.char_count, 24);
    }

    #[test]
    fn test_from_blocks() {
        let stats = ExportStats::from_blocks(&[
            Block::heading("Intro", 1),
            Block::paragraph("Two words"),
            Block::list_item("one", false),
            Block::Rule,
        ]);
        assert_eq!(stats.block_count, 4);
        assert_eq!(stats.heading_count, 1);
        assert_eq!(stats.list_item_count, 1);
        assert_eq!(stats.rule_count, 1);
        assert_eq!(stats.word_count, 4);
    }

    #[test]
    fn test_merge() {
        let mut a = ExportStats {
            page_count: 2,
            word_count: 10,
            ..Default::default()
        };
        let b = ExportStats {
            page_count: 1,
            heading_count: 3,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.page_count, 3);
        assert_eq!(a.heading_count, 3);
        assert_eq!(a.word_count, 10);
    }

    #[test]
    fn test_output_accessors() {
        let text = ExportOutput::Text("\\section{A}".into());
        assert_eq!(text.as_text(), Some("\\section{A}"));
        assert_eq!(text.len(), 11);

        let bytes = ExportOutput::Bytes(vec![1, 2, 3]);
        assert!(bytes.as_text().is_none());
        assert_eq!(bytes.into_bytes(), vec![1, 2, 3]);
    }
}
