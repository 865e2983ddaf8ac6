//! The assembled document handed to every renderer.

use crate::citation::FormattedReference;
use crate::model::{Block, PaperMeta, Run};
use crate::parser;

/// Heading level of generated front- and back-matter headings.
pub const MATTER_HEADING_LEVEL: u8 = 2;

/// One formatted bibliography entry with its cite key.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// Key for `\bibitem`
    pub key: String,
    /// List label such as `[1]`, written only where the output format has
    /// no numbering of its own
    pub label: Option<String>,
    /// Styled reference text without the label
    pub formatted: FormattedReference,
}

impl Reference {
    /// The reference text with its label, if any, in front.
    pub fn labelled(&self) -> FormattedReference {
        match &self.label {
            Some(label) => self.formatted.clone().with_prefix(&format!("{} ", label)),
            None => self.formatted.clone(),
        }
    }
}

/// A document after assembly: title, optional academic front matter,
/// body blocks, and a formatted reference list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manuscript {
    /// Document title
    pub title: String,
    /// Authors, abstract, and keywords
    pub front: Option<PaperMeta>,
    /// Body blocks in reading order
    pub blocks: Vec<Block>,
    /// Reference list in output order
    pub references: Vec<Reference>,
}

impl Manuscript {
    /// A manuscript with body blocks only.
    pub fn new(title: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            title: title.into(),
            blocks,
            ..Default::default()
        }
    }

    /// Abstract text, if the front matter has a non-empty one.
    pub fn abstract_text(&self) -> Option<&str> {
        self.front
            .as_ref()
            .map(|f| f.abstract_text.trim())
            .filter(|t| !t.is_empty())
    }

    /// Keywords, shown only alongside an abstract.
    pub fn keywords(&self) -> &[String] {
        match (&self.front, self.abstract_text()) {
            (Some(front), Some(_)) => &front.keywords,
            _ => &[],
        }
    }

    /// Everything as one block sequence for renderers without native
    /// front matter or bibliography support.
    ///
    /// The abstract becomes an `Abstract` heading and paragraph followed by
    /// a `Keywords:` line; references follow a `References` heading, each
    /// parsed from its markup form.
    pub fn flatten(&self) -> Vec<Block> {
        let mut blocks = Vec::with_capacity(self.blocks.len() + self.references.len() + 4);

        if let Some(abstract_text) = self.abstract_text() {
            blocks.push(Block::heading("Abstract", MATTER_HEADING_LEVEL));
            blocks.push(Block::paragraph(abstract_text));
            if !self.keywords().is_empty() {
                blocks.push(Block::Paragraph {
                    runs: vec![Run::bold("Keywords: "), Run::new(self.keywords().join(", "))],
                });
            }
        }

        blocks.extend(self.blocks.iter().cloned());

        if !self.references.is_empty() {
            blocks.push(Block::heading("References", MATTER_HEADING_LEVEL));
            for reference in &self.references {
                blocks.extend(parser::parse(&format!("<p>{}</p>", reference.labelled().to_markup())));
            }
        }
        blocks
    }
}
