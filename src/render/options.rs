//! Export options and unit conversions.

use crate::error::{Error, Result};
use crate::layout::{FontFamily, PageGeometry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Points per millimetre.
pub const MM_TO_PT: f32 = 72.0 / 25.4;

/// Twips (1/20 pt) per point, the word-processor length unit.
pub const PT_TO_TWIP: f32 = 20.0;

/// Line-spacing unit of the word-processor format (240ths of a line).
pub const LINE_UNIT: f32 = 240.0;

/// Default margin on every side (one inch).
pub const DEFAULT_MARGIN_MM: f32 = 25.4;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ExportFormat {
    /// Page-description document (PDF)
    #[default]
    Pdf,
    /// Word-processor document (DOCX)
    Docx,
    /// Typesetting source (LaTeX)
    Tex,
}

impl ExportFormat {
    /// All formats.
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Pdf, ExportFormat::Docx, ExportFormat::Tex];

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Tex => "tex",
        }
    }

    /// MIME type of the output.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Tex => "application/x-tex",
        }
    }

    /// Whether the output is text rather than binary.
    pub fn is_text(&self) -> bool {
        matches!(self, ExportFormat::Tex)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" => Ok(ExportFormat::Docx),
            "tex" | "latex" => Ok(ExportFormat::Tex),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for ExportFormat {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Paper size preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// ISO A4, 210 x 297 mm
    #[default]
    A4,
    /// US Letter, 8.5 x 11 in
    Letter,
}

impl PageSize {
    /// Width and height in points.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
        }
    }

    /// Width and height in twips.
    pub fn dimensions_twips(&self) -> (u32, u32) {
        match self {
            PageSize::A4 => (11906, 16838),
            PageSize::Letter => (12240, 15840),
        }
    }

    /// Paper name understood by LaTeX class options.
    pub fn latex_paper(&self) -> &'static str {
        match self {
            PageSize::A4 => "a4paper",
            PageSize::Letter => "letterpaper",
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" | "us-letter" => Ok(PageSize::Letter),
            other => Err(format!("Unknown page size: {}", other)),
        }
    }
}

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Top margin
    pub top: f32,
    /// Right margin
    pub right: f32,
    /// Bottom margin
    pub bottom: f32,
    /// Left margin
    pub left: f32,
}

impl Margins {
    /// The same margin on every side.
    pub fn uniform(mm: f32) -> Self {
        Self {
            top: mm,
            right: mm,
            bottom: mm,
            left: mm,
        }
    }

    /// Convert a millimetre value to twips.
    pub fn mm_to_twips(mm: f32) -> u32 {
        (mm.max(0.0) * MM_TO_PT * PT_TO_TWIP).round() as u32
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(DEFAULT_MARGIN_MM)
    }
}

/// Options controlling an export. Every field has a default, so partial
/// JSON objects deserialize cleanly.
///
/// # Example
///
/// ```
/// use quire::{ExportFormat, ExportOptions, PageSize};
///
/// let options: ExportOptions = serde_json::from_str(r#"{"format":"docx","lineSpacing":2}"#).unwrap();
/// assert_eq!(options.format, ExportFormat::Docx);
/// assert_eq!(options.page_size, PageSize::A4);
/// assert_eq!(options.font_size, 12.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    /// Output format
    pub format: ExportFormat,

    /// Paper size
    pub page_size: PageSize,

    /// Margins in millimetres
    pub margins: Margins,

    /// Line spacing factor: 1, 1.5 or 2
    pub line_spacing: f32,

    /// Requested font family
    pub font_family: String,

    /// Body font size in points
    pub font_size: f32,

    /// Draw the document title
    pub include_title: bool,

    /// Center the title (page-description output)
    pub center_title: bool,

    /// Add `Page X of N` to the footer
    pub include_page_numbers: bool,

    /// Draw a header line
    pub include_header: bool,

    /// Header text
    pub header_text: String,

    /// Draw a footer line
    pub include_footer: bool,

    /// Footer text
    pub footer_text: String,

    /// Append the bibliography to academic papers
    pub include_bibliography: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Pdf,
            page_size: PageSize::A4,
            margins: Margins::default(),
            line_spacing: 1.5,
            font_family: "Times New Roman".to_string(),
            font_size: 12.0,
            include_title: true,
            center_title: true,
            include_page_numbers: true,
            include_header: false,
            header_text: String::new(),
            include_footer: false,
            footer_text: String::new(),
            include_bibliography: true,
        }
    }
}

impl ExportOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a possibly partial JSON options object.
    ///
    /// An unknown `format` string fails with [`Error::UnsupportedFormat`]
    /// rather than a JSON error; blank input yields the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut value: serde_json::Value = serde_json::from_str(json)?;
        let format = match value.as_object_mut().and_then(|obj| obj.remove("format")) {
            Some(serde_json::Value::String(name)) => Some(name.parse::<ExportFormat>()?),
            Some(other) => Some(serde_json::from_value(other)?),
            None => None,
        };
        let mut options: ExportOptions = serde_json::from_value(value)?;
        if let Some(format) = format {
            options.format = format;
        }
        Ok(options)
    }

    /// Set the output format.
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the paper size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    /// Set the margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set the line spacing factor.
    pub fn with_line_spacing(mut self, spacing: f32) -> Self {
        self.line_spacing = spacing;
        self
    }

    /// Set font family and size.
    pub fn with_font(mut self, family: impl Into<String>, size: f32) -> Self {
        self.font_family = family.into();
        self.font_size = size;
        self
    }

    /// Enable or disable the title.
    pub fn with_title(mut self, include: bool) -> Self {
        self.include_title = include;
        self
    }

    /// Enable or disable page numbers.
    pub fn with_page_numbers(mut self, include: bool) -> Self {
        self.include_page_numbers = include;
        self
    }

    /// Set header text and enable the header.
    pub fn with_header(mut self, text: impl Into<String>) -> Self {
        self.include_header = true;
        self.header_text = text.into();
        self
    }

    /// Set footer text and enable the footer.
    pub fn with_footer(mut self, text: impl Into<String>) -> Self {
        self.include_footer = true;
        self.footer_text = text.into();
        self
    }

    /// Enable or disable the bibliography.
    pub fn with_bibliography(mut self, include: bool) -> Self {
        self.include_bibliography = include;
        self
    }

    /// Header text when the header is enabled and non-empty.
    pub fn header(&self) -> Option<&str> {
        Some(self.header_text.trim()).filter(|t| self.include_header && !t.is_empty())
    }

    /// Footer text when the footer is enabled and non-empty.
    pub fn footer(&self) -> Option<&str> {
        Some(self.footer_text.trim()).filter(|t| self.include_footer && !t.is_empty())
    }

    /// Line spacing clamped to a sane range.
    pub fn spacing_factor(&self) -> f32 {
        if self.line_spacing.is_finite() {
            self.line_spacing.clamp(1.0, 3.0)
        } else {
            1.5
        }
    }

    /// Font size clamped to a sane range.
    pub fn body_size(&self) -> f32 {
        if self.font_size.is_finite() {
            self.font_size.clamp(6.0, 72.0)
        } else {
            12.0
        }
    }

    /// Closest standard font family.
    pub fn font(&self) -> FontFamily {
        FontFamily::from_name(&self.font_family)
    }

    /// Page geometry in points.
    pub fn geometry(&self) -> PageGeometry {
        let (width, height) = self.page_size.dimensions_pt();
        let pt = |mm: f32| mm.max(0.0) * MM_TO_PT;
        PageGeometry {
            width,
            height,
            margin_top: pt(self.margins.top),
            margin_right: pt(self.margins.right),
            margin_bottom: pt(self.margins.bottom),
            margin_left: pt(self.margins.left),
        }
    }
}
