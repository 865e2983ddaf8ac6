//! Block and inline run types produced by the markup parser.

use serde::{Deserialize, Serialize};

/// A block-level element of a document body.
///
/// Blocks never nest. Every renderer matches on this enum exhaustively, so a
/// new variant is a compile error in each backend until it is handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A heading of level 1 to 3
    Heading {
        /// Heading level (1-3)
        level: u8,
        /// Inline runs
        runs: Vec<Run>,
    },

    /// A body paragraph
    Paragraph {
        /// Inline runs
        runs: Vec<Run>,
    },

    /// A single-level list item
    ListItem {
        /// Numbered (`true`) or bulleted (`false`)
        ordered: bool,
        /// Inline runs
        runs: Vec<Run>,
    },

    /// A quotation
    Blockquote {
        /// Inline runs
        runs: Vec<Run>,
    },

    /// A horizontal rule
    Rule,
}

impl Block {
    /// Create a heading with a single plain run. The level is clamped to 1..=3.
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        Block::Heading {
            level: level.clamp(1, 3),
            runs: vec![Run::new(text)],
        }
    }

    /// Create a paragraph with a single plain run.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph {
            runs: vec![Run::new(text)],
        }
    }

    /// Create a list item with a single plain run.
    pub fn list_item(text: impl Into<String>, ordered: bool) -> Self {
        Block::ListItem {
            ordered,
            runs: vec![Run::new(text)],
        }
    }

    /// Create a blockquote with a single plain run.
    pub fn blockquote(text: impl Into<String>) -> Self {
        Block::Blockquote {
            runs: vec![Run::new(text)],
        }
    }

    /// Inline runs of the block (empty for rules).
    pub fn runs(&self) -> &[Run] {
        match self {
            Block::Heading { runs, .. }
            | Block::Paragraph { runs }
            | Block::ListItem { runs, .. }
            | Block::Blockquote { runs } => runs,
            Block::Rule => &[],
        }
    }

    /// Concatenated text of all runs.
    pub fn plain_text(&self) -> String {
        self.runs().iter().map(|r| r.text.as_str()).collect()
    }

    /// Heading level, or `None` for other blocks.
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            Block::Heading { level, .. } => Some(*level),
            _ => None,
        }
    }

    /// Check if this is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading { .. })
    }

    /// Check if this is a list item.
    pub fn is_list_item(&self) -> bool {
        matches!(self, Block::ListItem { .. })
    }

    /// Number of whitespace-separated words in the block.
    pub fn word_count(&self) -> usize {
        self.runs()
            .iter()
            .map(|r| r.text.split_whitespace().count())
            .sum()
    }
}

/// A span of text with flattened inline styles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// The text content
    pub text: String,

    /// Bold text
    #[serde(default)]
    pub bold: bool,

    /// Italic text
    #[serde(default)]
    pub italic: bool,

    /// Underlined text
    #[serde(default)]
    pub underline: bool,

    /// Struck-through text
    #[serde(default)]
    pub strike: bool,
}

impl Run {
    /// Create an unstyled run.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create a bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            ..Default::default()
        }
    }

    /// Create an italic run.
    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            italic: true,
            ..Default::default()
        }
    }

    /// Check if any styling is applied.
    pub fn has_styling(&self) -> bool {
        self.bold || self.italic || self.underline || self.strike
    }

    /// Check if two runs carry identical style flags.
    pub fn same_style(&self, other: &Run) -> bool {
        self.bold == other.bold
            && self.italic == other.italic
            && self.underline == other.underline
            && self.strike == other.strike
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_clamped() {
        assert_eq!(Block::heading("Title", 6).heading_level(), Some(3));
        assert_eq!(Block::heading("Title", 0).heading_level(), Some(1));
        assert_eq!(Block::paragraph("x").heading_level(), None);
    }

    #[test]
    fn test_plain_text_concatenates_runs() {
        let block = Block::Paragraph {
            runs: vec![Run::new("Hello "), Run::bold("world"), Run::new("!")],
        };
        assert_eq!(block.plain_text(), "Hello world!");
        assert_eq!(block.word_count(), 2);
    }

    #[test]
    fn test_rule_has_no_runs() {
        assert!(Block::Rule.runs().is_empty());
        assert_eq!(Block::Rule.plain_text(), "");
    }

    #[test]
    fn test_run_styles() {
        assert!(!Run::new("a").has_styling());
        assert!(Run::italic("a").has_styling());
        assert!(Run::bold("a").same_style(&Run::bold("b")));
        assert!(!Run::bold("a").same_style(&Run::italic("a")));
    }

    #[test]
    fn test_block_serde_tagged() {
        let json = serde_json::to_string(&Block::Rule).unwrap();
        assert_eq!(json, r#"{"type":"rule"}"#);

        let block: Block =
            serde_json::from_str(r#"{"type":"list_item","ordered":true,"runs":[{"text":"a"}]}"#)
                .unwrap();
        assert!(block.is_list_item());
    }
}
