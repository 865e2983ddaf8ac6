//! Main document part plus header and footer parts.

use super::package::{FOOTER_RID, HEADER_RID, NS_MAIN};
use super::xml::XmlBuilder;
use super::ListNumbering;
use crate::error::Result;
use crate::model::{Block, Run};
use crate::render::options::{ExportOptions, Margins};

const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Distance of header and footer from the page edge, in twips.
const CHROME_DISTANCE: &str = "720";

pub(crate) struct BodyContext<'a> {
    pub title: Option<&'a str>,
    pub options: &'a ExportOptions,
    pub header: bool,
    pub footer: bool,
}

/// `word/document.xml`. Each block becomes exactly one paragraph.
pub(crate) fn document(
    blocks: &[Block],
    ctx: &BodyContext<'_>,
    lists: &mut ListNumbering,
) -> Result<String> {
    let mut xml = XmlBuilder::new()?;
    xml.start("w:document", &[("xmlns:w", NS_MAIN), ("xmlns:r", NS_RELATIONSHIPS)])?;
    xml.start("w:body", &[])?;

    if let Some(title) = ctx.title {
        xml.start("w:p", &[])?;
        paragraph_style(&mut xml, "Title")?;
        run(&mut xml, &Run::new(title), false)?;
        xml.end("w:p")?;
    }

    let mut previous_ordered = false;
    for block in blocks {
        let ordered = matches!(block, Block::ListItem { ordered: true, .. });
        if ordered && !previous_ordered {
            lists.next_ordered_run();
        }
        previous_ordered = ordered;
        write_block(&mut xml, block, lists)?;
    }

    section_properties(&mut xml, ctx)?;
    xml.end("w:body")?;
    xml.end("w:document")?;
    xml.finish()
}

fn write_block(xml: &mut XmlBuilder, block: &Block, lists: &ListNumbering) -> Result<()> {
    xml.start("w:p", &[])?;
    match block {
        Block::Heading { level, runs } => {
            paragraph_style(xml, &format!("Heading{}", (*level).clamp(1, 3)))?;
            write_runs(xml, runs, false)?;
        }
        Block::Paragraph { runs } => write_runs(xml, runs, false)?,
        Block::ListItem { ordered, runs } => {
            let num_id = if *ordered {
                lists.current_ordered_id()
            } else {
                ListNumbering::BULLET_ID
            };
            xml.start("w:pPr", &[])?;
            xml.empty("w:pStyle", &[("w:val", "ListParagraph")])?;
            xml.start("w:numPr", &[])?;
            xml.empty("w:ilvl", &[("w:val", "0")])?;
            xml.empty("w:numId", &[("w:val", &num_id.to_string())])?;
            xml.end("w:numPr")?;
            xml.end("w:pPr")?;
            write_runs(xml, runs, false)?;
        }
        Block::Blockquote { runs } => {
            paragraph_style(xml, "Quote")?;
            write_runs(xml, runs, true)?;
        }
        Block::Rule => {
            xml.start("w:pPr", &[])?;
            xml.start("w:pBdr", &[])?;
            xml.empty(
                "w:bottom",
                &[("w:val", "single"), ("w:sz", "6"), ("w:space", "1"), ("w:color", "auto")],
            )?;
            xml.end("w:pBdr")?;
            xml.end("w:pPr")?;
        }
    }
    xml.end("w:p")
}

fn paragraph_style(xml: &mut XmlBuilder, style: &str) -> Result<()> {
    xml.start("w:pPr", &[])?;
    xml.empty("w:pStyle", &[("w:val", style)])?;
    xml.end("w:pPr")
}

fn write_runs(xml: &mut XmlBuilder, runs: &[Run], italic: bool) -> Result<()> {
    for r in runs.iter().filter(|r| !r.is_empty()) {
        run(xml, r, italic)?;
    }
    Ok(())
}

fn run(xml: &mut XmlBuilder, run: &Run, force_italic: bool) -> Result<()> {
    xml.start("w:r", &[])?;
    if run.has_styling() || force_italic {
        xml.start("w:rPr", &[])?;
        if run.bold {
            xml.empty("w:b", &[])?;
        }
        if run.italic || force_italic {
            xml.empty("w:i", &[])?;
        }
        if run.underline {
            xml.empty("w:u", &[("w:val", "single")])?;
        }
        if run.strike {
            xml.empty("w:strike", &[])?;
        }
        xml.end("w:rPr")?;
    }
    xml.leaf("w:t", &[("xml:space", "preserve")], &run.text)?;
    xml.end("w:r")
}

fn section_properties(xml: &mut XmlBuilder, ctx: &BodyContext<'_>) -> Result<()> {
    let options = ctx.options;
    let (width, height) = options.page_size.dimensions_twips();
    let twips = |mm: f32| Margins::mm_to_twips(mm).to_string();

    xml.start("w:sectPr", &[])?;
    if ctx.header {
        xml.empty("w:headerReference", &[("w:type", "default"), ("r:id", HEADER_RID)])?;
    }
    if ctx.footer {
        xml.empty("w:footerReference", &[("w:type", "default"), ("r:id", FOOTER_RID)])?;
    }
    xml.empty(
        "w:pgSz",
        &[("w:w", &width.to_string()), ("w:h", &height.to_string())],
    )?;
    xml.empty(
        "w:pgMar",
        &[
            ("w:top", &twips(options.margins.top)),
            ("w:right", &twips(options.margins.right)),
            ("w:bottom", &twips(options.margins.bottom)),
            ("w:left", &twips(options.margins.left)),
            ("w:header", CHROME_DISTANCE),
            ("w:footer", CHROME_DISTANCE),
            ("w:gutter", "0"),
        ],
    )?;
    xml.end("w:sectPr")
}

/// `word/header1.xml`
pub(crate) fn header(text: &str) -> Result<String> {
    let mut xml = XmlBuilder::new()?;
    xml.start("w:hdr", &[("xmlns:w", NS_MAIN)])?;
    xml.start("w:p", &[])?;
    paragraph_style(&mut xml, "Header")?;
    run(&mut xml, &Run::new(text), false)?;
    xml.end("w:p")?;
    xml.end("w:hdr")?;
    xml.finish()
}

/// `word/footer1.xml`. Page numbers are dynamic fields resolved by the
/// consuming application.
pub(crate) fn footer(text: Option<&str>, page_numbers: bool) -> Result<String> {
    let mut xml = XmlBuilder::new()?;
    xml.start("w:ftr", &[("xmlns:w", NS_MAIN)])?;
    xml.start("w:p", &[])?;
    paragraph_style(&mut xml, "Footer")?;

    if let Some(text) = text {
        run(&mut xml, &Run::new(text), false)?;
    }
    if page_numbers {
        let lead = if text.is_some() { " | Page " } else { "Page " };
        run(&mut xml, &Run::new(lead), false)?;
        field(&mut xml, " PAGE ")?;
        run(&mut xml, &Run::new(" of "), false)?;
        field(&mut xml, " NUMPAGES ")?;
    }

    xml.end("w:p")?;
    xml.end("w:ftr")?;
    xml.finish()
}

fn field(xml: &mut XmlBuilder, instruction: &str) -> Result<()> {
    xml.start("w:fldSimple", &[("w:instr", instruction)])?;
    run(xml, &Run::new("1"), false)?;
    xml.end("w:fldSimple")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(blocks: &[Block]) -> String {
        let options = ExportOptions::default();
        let ctx = BodyContext {
            title: None,
            options: &options,
            header: false,
            footer: false,
        };
        document(blocks, &ctx, &mut ListNumbering::default()).unwrap()
    }

    #[test]
    fn test_one_paragraph_per_block() {
        let xml = render(&[
            Block::heading("Intro", 1),
            Block::paragraph("Body"),
            Block::blockquote("Quoted"),
            Block::Rule,
        ]);
        assert_eq!(xml.matches("<w:p>").count(), 4);
        assert!(xml.contains(r#"<w:pStyle w:val="Heading1"/>"#));
        assert!(xml.contains(r#"<w:pStyle w:val="Quote"/>"#));
        assert!(xml.contains("<w:pBdr>"));
    }

    #[test]
    fn test_run_flags() {
        let xml = render(&[Block::Paragraph {
            runs: vec![Run {
                text: "x".into(),
                bold: true,
                underline: true,
                strike: true,
                ..Default::default()
            }],
        }]);
        assert!(xml.contains(r#"<w:rPr><w:b/><w:u w:val="single"/><w:strike/></w:rPr>"#));
        assert!(xml.contains(r#"<w:t xml:space="preserve">x</w:t>"#));
    }

    #[test]
    fn test_blockquote_runs_are_italic() {
        let xml = render(&[Block::blockquote("q")]);
        assert!(xml.contains("<w:rPr><w:i/></w:rPr>"));
    }

    #[test]
    fn test_ordered_runs_get_fresh_numbering() {
        let xml = render(&[
            Block::list_item("a", true),
            Block::list_item("b", true),
            Block::paragraph("break"),
            Block::list_item("c", true),
            Block::list_item("dot", false),
        ]);
        assert_eq!(xml.matches(r#"<w:numId w:val="2"/>"#).count(), 2);
        assert_eq!(xml.matches(r#"<w:numId w:val="3"/>"#).count(), 1);
        assert_eq!(xml.matches(r#"<w:numId w:val="1"/>"#).count(), 1);
    }

    #[test]
    fn test_page_geometry_in_twips() {
        let xml = render(&[]);
        assert!(xml.contains(r#"<w:pgSz w:w="11906" w:h="16838"/>"#));
        assert!(xml.contains(r#"w:top="1440""#));
    }

    #[test]
    fn test_footer_fields() {
        let xml = footer(Some("Draft"), true).unwrap();
        assert!(xml.contains("Draft"));
        assert!(xml.contains(" | Page "));
        assert!(xml.contains(r#"w:instr=" PAGE ""#));
        assert!(xml.contains(r#"w:instr=" NUMPAGES ""#));

        let plain = footer(Some("Draft"), false).unwrap();
        assert!(!plain.contains("fldSimple"));
    }
}
