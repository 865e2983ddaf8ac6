//! Advance widths of the PDF standard fonts.
//!
//! Widths are in 1/1000 em for the printable ASCII range, taken from the
//! standard font metrics. Oblique and italic faces share the upright widths.
//! Accented Latin letters measure as their base letter.

use unicode_normalization::UnicodeNormalization;

/// A standard PDF font family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFamily {
    /// Helvetica (sans-serif)
    Helvetica,
    /// Times (serif)
    #[default]
    Times,
    /// Courier (monospace)
    Courier,
}

impl FontFamily {
    /// Map a requested family name to the closest standard family.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if ["times", "georgia", "garamond", "crimson", "serif", "cambria", "book"]
            .iter()
            .any(|k| lower.contains(k))
            && !lower.contains("sans")
        {
            FontFamily::Times
        } else if ["courier", "mono", "consolas", "code"]
            .iter()
            .any(|k| lower.contains(k))
        {
            FontFamily::Courier
        } else {
            FontFamily::Helvetica
        }
    }

    /// PostScript name of the face with the given style.
    pub fn base_font(self, bold: bool, italic: bool) -> &'static str {
        match (self, bold, italic) {
            (FontFamily::Helvetica, false, false) => "Helvetica",
            (FontFamily::Helvetica, true, false) => "Helvetica-Bold",
            (FontFamily::Helvetica, false, true) => "Helvetica-Oblique",
            (FontFamily::Helvetica, true, true) => "Helvetica-BoldOblique",
            (FontFamily::Times, false, false) => "Times-Roman",
            (FontFamily::Times, true, false) => "Times-Bold",
            (FontFamily::Times, false, true) => "Times-Italic",
            (FontFamily::Times, true, true) => "Times-BoldItalic",
            (FontFamily::Courier, false, false) => "Courier",
            (FontFamily::Courier, true, false) => "Courier-Bold",
            (FontFamily::Courier, false, true) => "Courier-Oblique",
            (FontFamily::Courier, true, true) => "Courier-BoldOblique",
        }
    }

    /// Advance width of `c` in 1/1000 em.
    pub fn char_width(self, c: char, bold: bool) -> u16 {
        if self == FontFamily::Courier {
            return 600;
        }

        let table: &[u16; 95] = match (self, bold) {
            (FontFamily::Helvetica, false) => &HELVETICA,
            (FontFamily::Helvetica, true) => &HELVETICA_BOLD,
            (_, false) => &TIMES_ROMAN,
            (_, true) => &TIMES_BOLD,
        };

        if let Some(w) = ascii_width(table, c) {
            return w;
        }

        match c {
            '\u{2022}' => 350,
            '\u{2013}' => table[('-' as usize) - 32].max(500),
            '\u{2014}' | '\u{2026}' => 1000,
            '\u{2018}' | '\u{2019}' => table[('\'' as usize) - 32].max(222),
            '\u{201c}' | '\u{201d}' => table[('"' as usize) - 32],
            '\u{00a0}' => table[0],
            _ => c
                .nfd()
                .next()
                .and_then(|base| ascii_width(table, base))
                .unwrap_or(self.fallback_width()),
        }
    }

    fn fallback_width(self) -> u16 {
        match self {
            FontFamily::Helvetica => 556,
            FontFamily::Times => 500,
            FontFamily::Courier => 600,
        }
    }

    /// Width of `text` in points at `size`.
    pub fn text_width(self, text: &str, bold: bool, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.char_width(c, bold))).sum();
        units as f32 * size / 1000.0
    }
}

fn ascii_width(table: &[u16; 95], c: char) -> Option<u16> {
    let code = c as u32;
    if (32..=126).contains(&code) {
        Some(table[(code - 32) as usize])
    } else {
        None
    }
}

#[rustfmt::skip]
static HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
static TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
static TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];
