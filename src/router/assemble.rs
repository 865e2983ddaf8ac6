//! Assembly strategies: turn a [`DocumentSource`] into a [`Manuscript`].

use crate::citation::{bibliography_references, generate_citation_key, order_by_first_citation};
use crate::error::Result;
use crate::model::{section_depths, Block, DocumentSource, DocumentType, Section};
use crate::parser;
use crate::render::{ExportOptions, Manuscript, Reference, MATTER_HEADING_LEVEL};
use std::collections::HashSet;

/// Build the manuscript for `doc_type`.
///
/// The body comes from the flat content when present, otherwise from the
/// sections sorted by `order`, each introduced by a heading. Academic papers
/// additionally carry their front matter and, when enabled, a reference
/// list formatted in the source's citation style.
pub fn assemble(
    doc_type: DocumentType,
    source: &DocumentSource,
    options: &ExportOptions,
) -> Result<Manuscript> {
    source.validate()?;

    let blocks = match &source.content {
        Some(content) => parser::parse(content),
        None => section_blocks(source),
    };

    let mut manuscript = Manuscript::new(source.title.trim(), blocks);
    if doc_type == DocumentType::Academic {
        manuscript.front = source.paper.clone();
        if options.include_bibliography {
            manuscript.references = references(source);
        }
    }

    log::debug!(
        "Assembled {} document: {} blocks, {} references",
        doc_type,
        manuscript.blocks.len(),
        manuscript.references.len()
    );
    Ok(manuscript)
}

/// Heading level of a section title at nesting `depth`.
pub fn section_heading_level(depth: usize) -> u8 {
    (usize::from(MATTER_HEADING_LEVEL) + depth).min(3) as u8
}

fn section_blocks(source: &DocumentSource) -> Vec<Block> {
    let sections: Vec<Section> = source.sections.iter().flatten().cloned().collect();
    let depths = section_depths(&sections);

    let mut blocks = Vec::new();
    for section in source.ordered_sections() {
        let title = section.title.trim();
        if !title.is_empty() {
            let depth = depths.get(section.id.as_str()).copied().unwrap_or(0);
            blocks.push(Block::heading(title, section_heading_level(depth)));
        }
        blocks.extend(parser::parse(&section.content));
    }
    blocks
}

fn references(source: &DocumentSource) -> Vec<Reference> {
    if source.bibliography.is_empty() {
        return Vec::new();
    }
    let style = source.citation_style.unwrap_or_default();
    let entries = order_by_first_citation(&source.bibliography, &source.citations);

    let mut used = HashSet::new();
    bibliography_references(&entries, style)
        .into_iter()
        .map(|listed| {
            let entry = listed.entry;
            let base = if is_valid_key(&entry.id) {
                entry.id.clone()
            } else {
                generate_citation_key(entry)
            };
            let mut key = base.clone();
            let mut suffix = 2;
            while !used.insert(key.clone()) {
                key = format!("{}-{}", base, suffix);
                suffix += 1;
            }
            Reference {
                key,
                label: listed.label,
                formatted: listed.formatted,
            }
        })
        .collect()
}

fn is_valid_key(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{BibliographyEntry, Citation, CitationStyle, EntryType, PaperMeta};

    fn bib() -> Vec<BibliographyEntry> {
        vec![
            BibliographyEntry::new("zulu", EntryType::Book, "Zed").with_authors(["Zulu, Zack"]),
            BibliographyEntry::new("adams", EntryType::Book, "Aye").with_authors(["Adams, Amy"]),
        ]
    }

    #[test]
    fn test_flat_draft() {
        let source = DocumentSource::flat("T", "<h1>Intro</h1><p>Body</p>");
        let m = assemble(DocumentType::Draft, &source, &ExportOptions::default()).unwrap();
        assert_eq!(m.blocks, vec![Block::heading("Intro", 1), Block::paragraph("Body")]);
        assert!(m.front.is_none());
    }

    #[test]
    fn test_sections_sorted_with_depth_headings() {
        let source = DocumentSource::sectioned(
            "Book",
            vec![
                Section::new("b", "Second", "<p>two</p>", 2),
                Section::new("a", "First", "<p>one</p>", 1),
                Section::new("a1", "Nested", "", 3).with_parent("a"),
            ],
        );
        let m = assemble(DocumentType::LongDraft, &source, &ExportOptions::default()).unwrap();
        assert_eq!(
            m.blocks,
            vec![
                Block::heading("First", 2),
                Block::paragraph("one"),
                Block::heading("Second", 2),
                Block::paragraph("two"),
                Block::heading("Nested", 3),
            ]
        );
    }

    #[test]
    fn test_invalid_source() {
        let err = assemble(DocumentType::Draft, &DocumentSource::default(), &ExportOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSource(_)));
    }

    #[test]
    fn test_academic_bibliography_sorted() {
        let source = DocumentSource::sectioned("P", vec![])
            .with_bibliography(bib())
            .with_paper(PaperMeta::default());
        let m = assemble(DocumentType::Academic, &source, &ExportOptions::default()).unwrap();
        let keys: Vec<_> = m.references.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["adams", "zulu"]);
        assert!(m.front.is_some());
    }

    #[test]
    fn test_ieee_follows_citation_order() {
        let source = DocumentSource::sectioned("P", vec![])
            .with_bibliography(bib())
            .with_citations(vec![Citation::new("c1", "adams", 10), Citation::new("c2", "zulu", 3)])
            .with_citation_style(CitationStyle::Ieee);
        let m = assemble(DocumentType::Academic, &source, &ExportOptions::default()).unwrap();
        assert_eq!(m.references[0].key, "zulu");
        assert_eq!(m.references[0].label.as_deref(), Some("[1]"));
        assert!(m.references[0].formatted.plain_text().starts_with("Z. Zulu"));
        assert!(m.references[0].labelled().plain_text().starts_with("[1] Z. Zulu"));
    }

    #[test]
    fn test_bibliography_disabled_or_not_academic() {
        let source = DocumentSource::sectioned("P", vec![]).with_bibliography(bib());
        let off = ExportOptions::default().with_bibliography(false);
        assert!(assemble(DocumentType::Academic, &source, &off).unwrap().references.is_empty());
        assert!(assemble(DocumentType::LongDraft, &source, &ExportOptions::default())
            .unwrap()
            .references
            .is_empty());
    }

    #[test]
    fn test_invalid_keys_replaced_and_deduplicated() {
        let entries = vec![
            BibliographyEntry::new("has space", EntryType::Book, "A")
                .with_authors(["Smith, J"])
                .with_year(2020),
            BibliographyEntry::new("", EntryType::Book, "B")
                .with_authors(["Smith, K"])
                .with_year(2020),
        ];
        let source = DocumentSource::sectioned("P", vec![]).with_bibliography(entries);
        let m = assemble(DocumentType::Academic, &source, &ExportOptions::default()).unwrap();
        let keys: Vec<_> = m.references.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["Smith2020", "Smith2020-2"]);
    }
}
