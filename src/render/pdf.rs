//! Page-description (PDF) renderer.
//!
//! Blocks are paginated by [`crate::layout`] and every page becomes one PDF
//! page object drawn with the four faces of a standard font family. Content
//! streams are Flate-compressed. No timestamps or random ids are written, so
//! the same input always yields the same bytes.

use super::options::ExportOptions;
use super::result::ExportStats;
use crate::error::Result;
use crate::layout::{self, Fragment, LayoutConfig, Page, Stroke};
use crate::model::Block;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::io::Write;
use unicode_normalization::UnicodeNormalization;

const PRODUCER: &str = concat!("quire ", env!("CARGO_PKG_VERSION"));

/// Resource names of the four faces, indexed by `bold as usize | (italic as usize) << 1`.
const FONT_KEYS: [&str; 4] = ["F1", "F2", "F3", "F4"];

/// Build the layout configuration for `title` under `options`.
pub fn layout_config(title: &str, options: &ExportOptions) -> LayoutConfig {
    LayoutConfig {
        geometry: options.geometry(),
        font: options.font(),
        font_size: options.body_size(),
        line_spacing: options.spacing_factor(),
        title: Some(title.trim())
            .filter(|t| options.include_title && !t.is_empty())
            .map(str::to_string),
        center_title: options.center_title,
        header: options.header().map(str::to_string),
        footer: options.footer().map(str::to_string),
        page_numbers: options.include_page_numbers,
    }
}

/// Render blocks to PDF bytes.
pub fn to_pdf(blocks: &[Block], title: &str, options: &ExportOptions) -> Result<Vec<u8>> {
    to_pdf_with_stats(blocks, title, options).map(|(bytes, _)| bytes)
}

/// Render blocks to PDF bytes and collect statistics.
pub fn to_pdf_with_stats(
    blocks: &[Block],
    title: &str,
    options: &ExportOptions,
) -> Result<(Vec<u8>, ExportStats)> {
    let config = layout_config(title, options);
    let pages = layout::layout(blocks, &config);

    let mut stats = ExportStats::from_blocks(blocks);
    stats.page_count = pages.len() as u32;

    let bytes = PdfWriter::new(&config, title).write(&pages)?;
    log::debug!("Wrote PDF: {} pages, {} bytes", pages.len(), bytes.len());
    Ok((bytes, stats))
}

struct PdfWriter<'a> {
    config: &'a LayoutConfig,
    title: &'a str,
    document: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
}

impl<'a> PdfWriter<'a> {
    fn new(config: &'a LayoutConfig, title: &'a str) -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        let resources_id = document.new_object_id();
        Self {
            config,
            title,
            document,
            pages_id,
            resources_id,
        }
    }

    fn write(mut self, pages: &[Page]) -> Result<Vec<u8>> {
        self.write_resources();

        let mut page_ids = Vec::with_capacity(pages.len());
        for page in pages {
            page_ids.push(self.write_page(page)?);
        }

        let kids: Vec<Object> = page_ids.iter().map(|id| Object::from(*id)).collect();
        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_ids.len() as i64,
            }),
        );

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
        };
        if !self.title.trim().is_empty() {
            info.set("Title", text_string(self.title.trim()));
        }
        let info_id = self.document.add_object(info);
        self.document.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        self.document.save_to(&mut bytes)?;
        Ok(bytes)
    }

    fn write_resources(&mut self) {
        let family = self.config.font;
        let mut fonts = lopdf::Dictionary::new();
        for (index, key) in FONT_KEYS.iter().enumerate() {
            let bold = index & 1 == 1;
            let italic = index & 2 == 2;
            let font_id = self.document.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => family.base_font(bold, italic),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(*key, font_id);
        }
        self.document.objects.insert(
            self.resources_id,
            Object::Dictionary(dictionary! { "Font" => fonts }),
        );
    }

    fn write_page(&mut self, page: &Page) -> Result<ObjectId> {
        let geometry = self.config.geometry;
        let mut ctx = PageContext::new(geometry.height);

        if let Some(header) = &page.header {
            ctx.draw_text(header);
        }
        for fragment in &page.fragments {
            ctx.draw_text(fragment);
        }
        for stroke in &page.strokes {
            ctx.draw_stroke(stroke);
        }
        if let Some(footer) = &page.footer {
            ctx.draw_text(footer);
        }

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&ctx.finish().encode()?)?;
        let compressed = encoder.finish()?;
        let content_id = self
            .document
            .add_object(Stream::new(dictionary! { "Filter" => "FlateDecode" }, compressed));

        Ok(self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), geometry.width.into(), geometry.height.into()],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        }))
    }
}

#[derive(Default)]
struct TextState {
    font: Option<&'static str>,
    size: f32,
}

struct PageContext {
    page_height: f32,
    content: Content,
    state: TextState,
}

impl PageContext {
    fn new(page_height: f32) -> Self {
        Self {
            page_height,
            content: Content { operations: vec![] },
            state: TextState::default(),
        }
    }

    fn finish(self) -> Content {
        self.content
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    fn set_font(&mut self, fragment: &Fragment) {
        let key = FONT_KEYS[usize::from(fragment.bold) | usize::from(fragment.italic) << 1];
        if self.state.font != Some(key) || self.state.size != fragment.size {
            self.push("Tf", vec![Object::Name(key.as_bytes().to_vec()), fragment.size.into()]);
            self.state.font = Some(key);
            self.state.size = fragment.size;
        }
    }

    fn draw_text(&mut self, fragment: &Fragment) {
        if fragment.text.trim().is_empty() {
            return;
        }
        let baseline = self.page_height - fragment.y;

        self.push("BT", vec![]);
        self.set_font(fragment);
        self.push("Td", vec![fragment.x.into(), baseline.into()]);
        self.push(
            "Tj",
            vec![Object::String(to_win_ansi(&fragment.text), StringFormat::Literal)],
        );
        self.push("ET", vec![]);

        let thickness = (fragment.size * 0.05).max(0.5);
        if fragment.underline {
            self.draw_line(fragment.x, fragment.x + fragment.width, baseline - fragment.size * 0.12, thickness);
        }
        if fragment.strike {
            self.draw_line(fragment.x, fragment.x + fragment.width, baseline + fragment.size * 0.28, thickness);
        }
    }

    fn draw_stroke(&mut self, stroke: &Stroke) {
        let y = self.page_height - stroke.y;
        self.draw_line(stroke.x1, stroke.x2, y, stroke.thickness);
    }

    fn draw_line(&mut self, x1: f32, x2: f32, y: f32, thickness: f32) {
        self.push("w", vec![thickness.into()]);
        self.push("m", vec![x1.into(), y.into()]);
        self.push("l", vec![x2.into(), y.into()]);
        self.push("S", vec![]);
    }
}

/// Encode text for a WinAnsi-encoded standard font. Characters outside the
/// code page fall back to their unaccented base letter, then to `?`.
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            win_ansi_byte(c)
                .or_else(|| c.nfd().next().and_then(win_ansi_byte))
                .unwrap_or(b'?')
        })
        .collect()
}

fn win_ansi_byte(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x20..=0x7e | 0xa0..=0xff => Some(code as u8),
        _ => Some(match c {
            '\u{20ac}' => 0x80,
            '\u{201a}' => 0x82,
            '\u{0192}' => 0x83,
            '\u{201e}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2020}' => 0x86,
            '\u{2021}' => 0x87,
            '\u{02c6}' => 0x88,
            '\u{2030}' => 0x89,
            '\u{0160}' => 0x8a,
            '\u{2039}' => 0x8b,
            '\u{0152}' => 0x8c,
            '\u{017d}' => 0x8e,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{02dc}' => 0x98,
            '\u{2122}' => 0x99,
            '\u{0161}' => 0x9a,
            '\u{203a}' => 0x9b,
            '\u{0153}' => 0x9c,
            '\u{017e}' => 0x9e,
            '\u{0178}' => 0x9f,
            '\t' | '\n' | '\r' => b' ',
            _ => return None,
        }),
    }
}

/// PDF text string: literal for ASCII, UTF-16BE with byte-order mark otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        Object::string_literal(text)
    } else {
        let mut bytes = vec![0xfe, 0xff];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}
