//! Package-level parts: content types, relationships, styles, numbering,
//! and core properties.

use super::xml::XmlBuilder;
use super::{ListNumbering, HEADING_SPACING};
use crate::error::Result;
use crate::render::options::{ExportOptions, LINE_UNIT};

const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
pub(crate) const NS_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_CORE: &str =
    "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";

const REL_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_NUMBERING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
const REL_HEADER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
const REL_FOOTER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";

const CT_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const CT_NUMBERING: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";
const CT_HEADER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
const CT_FOOTER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";
const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";

/// Relationship id of the header part in `document.xml.rels`.
pub(crate) const HEADER_RID: &str = "rId3";
/// Relationship id of the footer part in `document.xml.rels`.
pub(crate) const FOOTER_RID: &str = "rId4";

/// Heading sizes relative to body text, as in the page layout engine.
const HEADING_SCALE: [f32; 3] = [1.6, 1.3, 1.1];
const TITLE_SCALE: f32 = 1.5;

pub(crate) fn content_types(header: bool, footer: bool) -> Result<String> {
    let mut xml = XmlBuilder::new()?;
    xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    xml.empty(
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    xml.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;

    let mut overrides = vec![
        ("/word/document.xml", CT_MAIN),
        ("/word/styles.xml", CT_STYLES),
        ("/word/numbering.xml", CT_NUMBERING),
        ("/docProps/core.xml", CT_CORE),
    ];
    if header {
        overrides.push(("/word/header1.xml", CT_HEADER));
    }
    if footer {
        overrides.push(("/word/footer1.xml", CT_FOOTER));
    }
    for (part, content_type) in overrides {
        xml.empty("Override", &[("PartName", part), ("ContentType", content_type)])?;
    }
    xml.end("Types")?;
    xml.finish()
}

pub(crate) fn package_rels() -> Result<String> {
    let mut xml = XmlBuilder::new()?;
    xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    xml.empty(
        "Relationship",
        &[("Id", "rId1"), ("Type", REL_DOCUMENT), ("Target", "word/document.xml")],
    )?;
    xml.empty(
        "Relationship",
        &[("Id", "rId2"), ("Type", REL_CORE), ("Target", "docProps/core.xml")],
    )?;
    xml.end("Relationships")?;
    xml.finish()
}

pub(crate) fn document_rels(header: bool, footer: bool) -> Result<String> {
    let mut xml = XmlBuilder::new()?;
    xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    xml.empty(
        "Relationship",
        &[("Id", "rId1"), ("Type", REL_STYLES), ("Target", "styles.xml")],
    )?;
    xml.empty(
        "Relationship",
        &[("Id", "rId2"), ("Type", REL_NUMBERING), ("Target", "numbering.xml")],
    )?;
    if header {
        xml.empty(
            "Relationship",
            &[("Id", HEADER_RID), ("Type", REL_HEADER), ("Target", "header1.xml")],
        )?;
    }
    if footer {
        xml.empty(
            "Relationship",
            &[("Id", FOOTER_RID), ("Type", REL_FOOTER), ("Target", "footer1.xml")],
        )?;
    }
    xml.end("Relationships")?;
    xml.finish()
}

pub(crate) fn core_properties(title: &str) -> Result<String> {
    let mut xml = XmlBuilder::new()?;
    xml.start(
        "cp:coreProperties",
        &[
            ("xmlns:cp", NS_CORE),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
        ],
    )?;
    if !title.trim().is_empty() {
        xml.leaf("dc:title", &[], title.trim())?;
    }
    xml.end("cp:coreProperties")?;
    xml.finish()
}

/// Half-points for a size in points.
fn half_points(pt: f32) -> String {
    ((pt * 2.0).round() as u32).to_string()
}

/// Style sheet: document defaults carry the body font, size, and line
/// spacing so every run and paragraph inherits them.
pub(crate) fn styles(options: &ExportOptions) -> Result<String> {
    let body = options.body_size();
    let font = options.font_family.trim();
    let font = if font.is_empty() { "Times New Roman" } else { font };
    let line = ((options.spacing_factor() * LINE_UNIT).round() as u32).to_string();

    let mut xml = XmlBuilder::new()?;
    xml.start("w:styles", &[("xmlns:w", NS_MAIN)])?;

    xml.start("w:docDefaults", &[])?;
    xml.start("w:rPrDefault", &[])?;
    xml.start("w:rPr", &[])?;
    xml.empty(
        "w:rFonts",
        &[("w:ascii", font), ("w:hAnsi", font), ("w:cs", font), ("w:eastAsia", font)],
    )?;
    xml.empty("w:sz", &[("w:val", &half_points(body))])?;
    xml.empty("w:szCs", &[("w:val", &half_points(body))])?;
    xml.end("w:rPr")?;
    xml.end("w:rPrDefault")?;
    xml.start("w:pPrDefault", &[])?;
    xml.start("w:pPr", &[])?;
    xml.empty(
        "w:spacing",
        &[("w:after", "200"), ("w:line", &line), ("w:lineRule", "auto")],
    )?;
    xml.end("w:pPr")?;
    xml.end("w:pPrDefault")?;
    xml.end("w:docDefaults")?;

    xml.start("w:style", &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")])?;
    xml.empty("w:name", &[("w:val", "Normal")])?;
    xml.empty("w:qFormat", &[])?;
    xml.end("w:style")?;

    heading_style(&mut xml, "Title", "Title", body * TITLE_SCALE, ("0", "400"), true)?;
    for (index, scale) in HEADING_SCALE.iter().enumerate() {
        let level = index + 1;
        let id = format!("Heading{}", level);
        let name = format!("heading {}", level);
        heading_style(&mut xml, &id, &name, body * scale, HEADING_SPACING[index], false)?;
    }

    xml.start("w:style", &[("w:type", "paragraph"), ("w:styleId", "Quote")])?;
    xml.empty("w:name", &[("w:val", "Quote")])?;
    xml.empty("w:basedOn", &[("w:val", "Normal")])?;
    xml.start("w:pPr", &[])?;
    xml.empty("w:spacing", &[("w:before", "200"), ("w:after", "200")])?;
    xml.empty("w:ind", &[("w:left", super::QUOTE_INDENT)])?;
    xml.end("w:pPr")?;
    xml.start("w:rPr", &[])?;
    xml.empty("w:i", &[])?;
    xml.end("w:rPr")?;
    xml.end("w:style")?;

    xml.start("w:style", &[("w:type", "paragraph"), ("w:styleId", "ListParagraph")])?;
    xml.empty("w:name", &[("w:val", "List Paragraph")])?;
    xml.empty("w:basedOn", &[("w:val", "Normal")])?;
    xml.start("w:pPr", &[])?;
    xml.empty("w:spacing", &[("w:after", "60")])?;
    xml.end("w:pPr")?;
    xml.end("w:style")?;

    for (id, name) in [("Header", "header"), ("Footer", "footer")] {
        xml.start("w:style", &[("w:type", "paragraph"), ("w:styleId", id)])?;
        xml.empty("w:name", &[("w:val", name)])?;
        xml.empty("w:basedOn", &[("w:val", "Normal")])?;
        xml.start("w:pPr", &[])?;
        xml.empty("w:jc", &[("w:val", "center")])?;
        xml.end("w:pPr")?;
        xml.start("w:rPr", &[])?;
        xml.empty("w:sz", &[("w:val", &half_points(crate::layout::CHROME_FONT_SIZE))])?;
        xml.end("w:rPr")?;
        xml.end("w:style")?;
    }

    xml.end("w:styles")?;
    xml.finish()
}

fn heading_style(
    xml: &mut XmlBuilder,
    id: &str,
    name: &str,
    size: f32,
    (before, after): (&str, &str),
    centered: bool,
) -> Result<()> {
    xml.start("w:style", &[("w:type", "paragraph"), ("w:styleId", id)])?;
    xml.empty("w:name", &[("w:val", name)])?;
    xml.empty("w:basedOn", &[("w:val", "Normal")])?;
    xml.empty("w:next", &[("w:val", "Normal")])?;
    xml.empty("w:qFormat", &[])?;
    xml.start("w:pPr", &[])?;
    xml.empty("w:keepNext", &[])?;
    xml.empty("w:spacing", &[("w:before", before), ("w:after", after)])?;
    if centered {
        xml.empty("w:jc", &[("w:val", "center")])?;
    }
    if let Some(level) = id.strip_prefix("Heading") {
        let outline = level.parse::<u8>().unwrap_or(1).saturating_sub(1).to_string();
        xml.empty("w:outlineLvl", &[("w:val", &outline)])?;
    }
    xml.end("w:pPr")?;
    xml.start("w:rPr", &[])?;
    xml.empty("w:b", &[])?;
    xml.empty("w:sz", &[("w:val", &half_points(size))])?;
    xml.empty("w:szCs", &[("w:val", &half_points(size))])?;
    xml.end("w:rPr")?;
    xml.end("w:style")?;
    Ok(())
}

/// Numbering part: one bullet definition and one decimal definition, plus
/// a restarting instance for every ordered list run.
pub(crate) fn numbering(lists: &ListNumbering) -> Result<String> {
    let mut xml = XmlBuilder::new()?;
    xml.start("w:numbering", &[("xmlns:w", NS_MAIN)])?;

    for (abstract_id, format, text) in [("0", "bullet", "\u{2022}"), ("1", "decimal", "%1.")] {
        xml.start("w:abstractNum", &[("w:abstractNumId", abstract_id)])?;
        xml.empty("w:multiLevelType", &[("w:val", "singleLevel")])?;
        xml.start("w:lvl", &[("w:ilvl", "0")])?;
        xml.empty("w:start", &[("w:val", "1")])?;
        xml.empty("w:numFmt", &[("w:val", format)])?;
        xml.empty("w:lvlText", &[("w:val", text)])?;
        xml.empty("w:lvlJc", &[("w:val", "left")])?;
        xml.start("w:pPr", &[])?;
        xml.empty(
            "w:ind",
            &[("w:left", super::LIST_INDENT), ("w:hanging", super::LIST_HANGING)],
        )?;
        xml.end("w:pPr")?;
        xml.end("w:lvl")?;
        xml.end("w:abstractNum")?;
    }

    xml.start("w:num", &[("w:numId", &ListNumbering::BULLET_ID.to_string())])?;
    xml.empty("w:abstractNumId", &[("w:val", "0")])?;
    xml.end("w:num")?;

    for num_id in lists.ordered_ids() {
        xml.start("w:num", &[("w:numId", &num_id.to_string())])?;
        xml.empty("w:abstractNumId", &[("w:val", "1")])?;
        xml.start("w:lvlOverride", &[("w:ilvl", "0")])?;
        xml.empty("w:startOverride", &[("w:val", "1")])?;
        xml.end("w:lvlOverride")?;
        xml.end("w:num")?;
    }

    xml.end("w:numbering")?;
    xml.finish()
}
