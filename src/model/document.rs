//! Document-level types: the export source and its sections.

use super::{BibliographyEntry, Citation, CitationStyle};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The kind of document being exported. Selects the assembly strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentType {
    /// A single flat draft
    #[default]
    Draft,
    /// A long-form manuscript split into ordered sections
    LongDraft,
    /// An academic paper with sections and a bibliography
    Academic,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentType::Draft => "draft",
            DocumentType::LongDraft => "longDraft",
            DocumentType::Academic => "academic",
        })
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "draft" => Ok(DocumentType::Draft),
            "longdraft" => Ok(DocumentType::LongDraft),
            "academic" | "paper" => Ok(DocumentType::Academic),
            other => Err(format!("Unknown document type: {}", other)),
        }
    }
}

/// One section of a sectioned document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Section {
    /// Section identifier
    pub id: String,

    /// Section title
    pub title: String,

    /// Markup content
    pub content: String,

    /// Explicit sort position
    pub order: i32,

    /// Parent section for nested sections
    pub parent_id: Option<String>,
}

impl Section {
    /// Create a root section.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        order: i32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            order,
            parent_id: None,
        }
    }

    /// Nest this section under `parent_id`.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

/// Nesting depth of each section id (0 = root), following `parent_id`
/// links. Cycles and dangling parents terminate the walk.
pub fn section_depths(sections: &[Section]) -> HashMap<&str, usize> {
    let parents: HashMap<&str, Option<&str>> = sections
        .iter()
        .map(|s| (s.id.as_str(), s.parent_id.as_deref()))
        .collect();

    sections
        .iter()
        .map(|s| {
            let mut depth = 0;
            let mut current = s.parent_id.as_deref();
            while let Some(parent) = current {
                if depth >= sections.len() || !parents.contains_key(parent) {
                    break;
                }
                depth += 1;
                current = parents.get(parent).copied().flatten();
            }
            (s.id.as_str(), depth)
        })
        .collect()
}

/// A paper author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Author {
    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Institutional affiliation
    pub affiliation: Option<String>,
}

impl Author {
    /// Create an author.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            affiliation: None,
        }
    }

    /// "First Last", skipping empty parts.
    pub fn display_name(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Front matter of an academic paper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaperMeta {
    /// Paper authors
    pub authors: Vec<Author>,

    /// Abstract text (plain)
    #[serde(rename = "abstract")]
    pub abstract_text: String,

    /// Keywords
    pub keywords: Vec<String>,
}

/// Everything the export engine needs to know about one document.
///
/// Exactly one of `content` and `sections` must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentSource {
    /// Document title
    pub title: String,

    /// Flat markup content
    pub content: Option<String>,

    /// Ordered sections
    pub sections: Option<Vec<Section>>,

    /// Bibliography entries
    pub bibliography: Vec<BibliographyEntry>,

    /// Citations placed in the document
    pub citations: Vec<Citation>,

    /// Citation style selector
    pub citation_style: Option<CitationStyle>,

    /// Academic front matter
    pub paper: Option<PaperMeta>,
}

impl DocumentSource {
    /// Create a source with flat markup content.
    pub fn flat(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Create a source from ordered sections.
    pub fn sectioned(title: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            title: title.into(),
            sections: Some(sections),
            ..Default::default()
        }
    }

    /// Attach bibliography entries.
    pub fn with_bibliography(mut self, entries: Vec<BibliographyEntry>) -> Self {
        self.bibliography = entries;
        self
    }

    /// Attach citations.
    pub fn with_citations(mut self, citations: Vec<Citation>) -> Self {
        self.citations = citations;
        self
    }

    /// Select the citation style.
    pub fn with_citation_style(mut self, style: CitationStyle) -> Self {
        self.citation_style = Some(style);
        self
    }

    /// Attach academic front matter.
    pub fn with_paper(mut self, paper: PaperMeta) -> Self {
        self.paper = Some(paper);
        self
    }

    /// Check the content invariant.
    pub fn validate(&self) -> Result<()> {
        match (&self.content, &self.sections) {
            (Some(_), Some(_)) => Err(Error::InvalidSource(
                "both flat content and sections were supplied".into(),
            )),
            (None, None) => Err(Error::InvalidSource(
                "neither flat content nor sections were supplied".into(),
            )),
            _ => Ok(()),
        }
    }

    /// Sections sorted by `order`; ties keep their input order.
    pub fn ordered_sections(&self) -> Vec<&Section> {
        let mut sections: Vec<&Section> = self.sections.iter().flatten().collect();
        sections.sort_by_key(|s| s.order);
        sections
    }
}
