//! Pagination and line layout for fixed-page output.
//!
//! [`layout`] wraps blocks into positioned text fragments and breaks them
//! into pages, then stamps header and footer text onto every page in a
//! second pass once the total page count is known. Coordinates are in
//! points, measured from the top-left corner of the page.

mod engine;
mod metrics;

pub use engine::{layout, wrap_runs, WrappedLine};
pub use metrics::FontFamily;

/// Size of header and footer text.
pub const CHROME_FONT_SIZE: f32 = 10.0;

/// Vertical space reserved for a header or footer line.
pub const CHROME_RESERVE: f32 = CHROME_FONT_SIZE * 1.5;

/// Page size and margins in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
    /// Top margin
    pub margin_top: f32,
    /// Right margin
    pub margin_right: f32,
    /// Bottom margin
    pub margin_bottom: f32,
    /// Left margin
    pub margin_left: f32,
}

impl PageGeometry {
    /// Width available between the side margins.
    pub fn content_width(&self) -> f32 {
        (self.width - self.margin_left - self.margin_right).max(1.0)
    }
}

/// Everything the layout engine needs besides the blocks.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Page geometry
    pub geometry: PageGeometry,
    /// Body font family
    pub font: FontFamily,
    /// Body font size in points
    pub font_size: f32,
    /// Line spacing factor (1.0, 1.5, 2.0)
    pub line_spacing: f32,
    /// Title drawn at the top of the first page
    pub title: Option<String>,
    /// Center the title horizontally
    pub center_title: bool,
    /// Header text for every page
    pub header: Option<String>,
    /// Footer text for every page
    pub footer: Option<String>,
    /// Stamp `Page X of N` into the footer
    pub page_numbers: bool,
}

impl LayoutConfig {
    /// Height of one body line.
    pub fn line_height(&self) -> f32 {
        self.font_size * self.line_spacing
    }

    /// Whether pages carry a footer line.
    pub fn has_footer(&self) -> bool {
        self.footer.is_some() || self.page_numbers
    }
}

/// A positioned run of text. `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Left edge
    pub x: f32,
    /// Baseline
    pub y: f32,
    /// Advance width
    pub width: f32,
    /// Font size
    pub size: f32,
    /// Text content
    pub text: String,
    /// Bold face
    pub bold: bool,
    /// Italic face
    pub italic: bool,
    /// Draw an underline
    pub underline: bool,
    /// Draw a strike-through
    pub strike: bool,
}

/// A horizontal line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Start
    pub x1: f32,
    /// End
    pub x2: f32,
    /// Vertical position
    pub y: f32,
    /// Line thickness
    pub thickness: f32,
}

/// One laid-out page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// 1-based page number
    pub number: usize,
    /// Header line, if any
    pub header: Option<Fragment>,
    /// Footer line, if any
    pub footer: Option<Fragment>,
    /// Body fragments in reading order
    pub fragments: Vec<Fragment>,
    /// Horizontal rules
    pub strokes: Vec<Stroke>,
}

impl Page {
    /// Footer text, if the page has a footer.
    pub fn footer_text(&self) -> Option<&str> {
        self.footer.as_ref().map(|f| f.text.as_str())
    }

    /// Check if the body is empty.
    pub fn is_blank(&self) -> bool {
        self.fragments.is_empty() && self.strokes.is_empty()
    }
}
