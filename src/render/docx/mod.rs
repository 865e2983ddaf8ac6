//! Word-processor (DOCX) renderer.
//!
//! The package is a ZIP of WordprocessingML parts. Pagination is left to
//! the consuming application: headers and footers are native regions and
//! page numbers are `PAGE` / `NUMPAGES` fields. Lengths use twips
//! ([`PT_TO_TWIP`](super::options::PT_TO_TWIP)), font sizes half-points, and
//! line spacing 240ths of a line.

mod body;
mod package;
mod xml;
mod zip;

pub use zip::{read_archive, ZipWriter};

use super::options::ExportOptions;
use super::result::ExportStats;
use crate::error::Result;
use crate::model::Block;
use body::BodyContext;

/// Blockquote left indent (0.5 in).
pub(crate) const QUOTE_INDENT: &str = "720";
/// List item left indent.
pub(crate) const LIST_INDENT: &str = "720";
/// List marker hanging indent.
pub(crate) const LIST_HANGING: &str = "360";
/// Space before and after headings 1-3, in twips.
pub(crate) const HEADING_SPACING: [(&str, &str); 3] = [("400", "200"), ("300", "150"), ("200", "100")];

/// Path of the main document part.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Numbering instances used by list paragraphs. Bullets share one
/// instance; every run of ordered items gets its own so it restarts at 1.
#[derive(Debug, Default)]
pub(crate) struct ListNumbering {
    ordered_runs: u32,
}

impl ListNumbering {
    pub const BULLET_ID: u32 = 1;

    pub fn next_ordered_run(&mut self) -> u32 {
        self.ordered_runs += 1;
        self.current_ordered_id()
    }

    pub fn current_ordered_id(&self) -> u32 {
        Self::BULLET_ID + self.ordered_runs.max(1)
    }

    pub fn ordered_ids(&self) -> impl Iterator<Item = u32> {
        (0..self.ordered_runs).map(|i| Self::BULLET_ID + 1 + i)
    }
}

/// One XML part of the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxPart {
    /// Path inside the archive
    pub path: &'static str,
    /// XML content
    pub xml: String,
}

/// Build every package part in archive order.
pub fn build_parts(blocks: &[Block], title: &str, options: &ExportOptions) -> Result<Vec<DocxPart>> {
    let header_text = options.header();
    let footer_text = options.footer();
    let has_header = header_text.is_some();
    let has_footer = footer_text.is_some() || options.include_page_numbers;

    let ctx = BodyContext {
        title: Some(title.trim()).filter(|t| options.include_title && !t.is_empty()),
        options,
        header: has_header,
        footer: has_footer,
    };

    let mut lists = ListNumbering::default();
    let document = body::document(blocks, &ctx, &mut lists)?;

    let mut parts = vec![
        DocxPart {
            path: "[Content_Types].xml",
            xml: package::content_types(has_header, has_footer)?,
        },
        DocxPart {
            path: "_rels/.rels",
            xml: package::package_rels()?,
        },
        DocxPart {
            path: "docProps/core.xml",
            xml: package::core_properties(title)?,
        },
        DocxPart {
            path: DOCUMENT_PART,
            xml: document,
        },
        DocxPart {
            path: "word/_rels/document.xml.rels",
            xml: package::document_rels(has_header, has_footer)?,
        },
        DocxPart {
            path: "word/styles.xml",
            xml: package::styles(options)?,
        },
        DocxPart {
            path: "word/numbering.xml",
            xml: package::numbering(&lists)?,
        },
    ];
    if let Some(text) = header_text {
        parts.push(DocxPart {
            path: "word/header1.xml",
            xml: body::header(text)?,
        });
    }
    if has_footer {
        parts.push(DocxPart {
            path: "word/footer1.xml",
            xml: body::footer(footer_text, options.include_page_numbers)?,
        });
    }
    Ok(parts)
}

/// Render blocks to a DOCX package.
pub fn to_docx(blocks: &[Block], title: &str, options: &ExportOptions) -> Result<Vec<u8>> {
    to_docx_with_stats(blocks, title, options).map(|(bytes, _)| bytes)
}

/// Render blocks to a DOCX package and collect statistics.
pub fn to_docx_with_stats(
    blocks: &[Block],
    title: &str,
    options: &ExportOptions,
) -> Result<(Vec<u8>, ExportStats)> {
    let parts = build_parts(blocks, title, options)?;

    let mut zip = ZipWriter::new();
    for part in &parts {
        zip.add_file(part.path, part.xml.as_bytes())?;
    }
    let bytes = zip.finish()?;

    log::debug!("Wrote DOCX: {} parts, {} bytes", parts.len(), bytes.len());
    Ok((bytes, ExportStats::from_blocks(blocks)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_without_chrome() {
        let options = ExportOptions::default().with_page_numbers(false);
        let parts = build_parts(&[Block::paragraph("x")], "T", &options).unwrap();
        let paths: Vec<_> = parts.iter().map(|p| p.path).collect();
        assert_eq!(paths[0], "[Content_Types].xml");
        assert!(!paths.contains(&"word/footer1.xml"));
        assert!(!paths.contains(&"word/header1.xml"));
    }

    #[test]
    fn test_parts_with_chrome() {
        let options = ExportOptions::default().with_header("Head");
        let parts = build_parts(&[], "T", &options).unwrap();
        let paths: Vec<_> = parts.iter().map(|p| p.path).collect();
        assert!(paths.contains(&"word/header1.xml"));
        assert!(paths.contains(&"word/footer1.xml"));
    }

    #[test]
    fn test_title_paragraph() {
        let parts = build_parts(&[], "My Title", &ExportOptions::default()).unwrap();
        let document = parts.iter().find(|p| p.path == DOCUMENT_PART).unwrap();
        assert!(document.xml.contains(r#"<w:pStyle w:val="Title"/>"#));
        assert!(document.xml.contains("My Title"));
    }

    #[test]
    fn test_package_round_trip() {
        let bytes = to_docx(&[Block::heading("Intro", 1)], "T", &ExportOptions::default()).unwrap();
        let entries = read_archive(&bytes).unwrap();
        let document = entries.iter().find(|(name, _)| name == DOCUMENT_PART).unwrap();
        assert!(String::from_utf8_lossy(&document.1).contains("Intro"));
    }
}
