//! Greedy line wrapping and page breaking.

use super::{
    FontFamily, Fragment, LayoutConfig, Page, Stroke, CHROME_FONT_SIZE, CHROME_RESERVE,
};
use crate::model::{Block, Run};

/// Heading size multipliers for levels 1-3.
const HEADING_SCALE: [f32; 3] = [1.6, 1.3, 1.1];

/// Space before headings, as a fraction of the body line height.
const HEADING_SPACE_BEFORE: [f32; 3] = [0.5, 0.3, 0.2];

/// Space after each block, as a fraction of the body line height.
const BLOCK_SPACE_AFTER: f32 = 0.3;

/// Space after list items, as a fraction of the body line height.
const LIST_SPACE_AFTER: f32 = 0.1;

const QUOTE_INDENT: f32 = 20.0;
const LIST_INDENT: f32 = 20.0;
const TITLE_SCALE: f32 = 1.5;
const RULE_THICKNESS: f32 = 0.5;

/// A wrapped line: styled pieces with their measured widths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WrappedLine {
    /// Pieces in order, each with one style
    pub pieces: Vec<(Run, f32)>,
}

impl WrappedLine {
    /// Total advance width.
    pub fn width(&self) -> f32 {
        self.pieces.iter().map(|(_, w)| w).sum()
    }

    /// Concatenated text.
    pub fn text(&self) -> String {
        self.pieces.iter().map(|(r, _)| r.text.as_str()).collect()
    }

    fn push(&mut self, run: Run, width: f32) {
        match self.pieces.last_mut() {
            Some((last, w)) if last.same_style(&run) => {
                last.text.push_str(&run.text);
                *w += width;
            }
            _ => self.pieces.push((run, width)),
        }
    }

    fn trim_end(&mut self, font: FontFamily, size: f32) {
        if let Some((run, width)) = self.pieces.last_mut() {
            let trimmed = run.text.trim_end().len();
            if trimmed < run.text.len() {
                run.text.truncate(trimmed);
                *width = font.text_width(&run.text, run.bold, size);
            }
        }
        self.pieces.retain(|(r, _)| !r.text.is_empty());
    }
}

struct Word {
    run: Run,
    /// Width including the trailing space
    full: f32,
    /// Width without the trailing space
    bare: f32,
}

/// Wrap styled runs greedily to `max_width`. Words wider than a line are
/// split between characters.
pub fn wrap_runs(runs: &[Run], font: FontFamily, size: f32, max_width: f32) -> Vec<WrappedLine> {
    let mut lines = Vec::new();
    let mut line = WrappedLine::default();
    let mut line_width = 0.0;

    let words = runs.iter().flat_map(|run| {
        run.text.split_inclusive(' ').map(move |piece| {
            let word = Run {
                text: piece.to_string(),
                ..run.clone()
            };
            let full = font.text_width(piece, run.bold, size);
            let bare = font.text_width(piece.trim_end(), run.bold, size);
            Word {
                run: word,
                full,
                bare,
            }
        })
    });

    for word in words {
        let blank = word.run.text.trim().is_empty();
        if line.pieces.is_empty() && blank {
            continue;
        }

        if !line.pieces.is_empty() && line_width + word.bare > max_width {
            line.trim_end(font, size);
            lines.push(std::mem::take(&mut line));
            line_width = 0.0;
            if blank {
                continue;
            }
        }

        if line.pieces.is_empty() && word.bare > max_width {
            for (chunk, width) in split_word(&word.run, font, size, max_width) {
                if !line.pieces.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                line.push(chunk, width);
                line_width = width;
            }
            continue;
        }

        line_width += word.full;
        line.push(word.run, word.full);
    }

    line.trim_end(font, size);
    if !line.pieces.is_empty() {
        lines.push(line);
    }
    lines
}

fn split_word(run: &Run, font: FontFamily, size: f32, max_width: f32) -> Vec<(Run, f32)> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut width = 0.0;

    for c in run.text.chars() {
        let w = font.char_width(c, run.bold) as f32 * size / 1000.0;
        if !current.is_empty() && width + w > max_width {
            chunks.push((
                Run {
                    text: std::mem::take(&mut current),
                    ..run.clone()
                },
                width,
            ));
            width = 0.0;
        }
        current.push(c);
        width += w;
    }
    if !current.is_empty() {
        chunks.push((
            Run {
                text: current,
                ..run.clone()
            },
            width,
        ));
    }
    chunks
}

/// Lay out `blocks` into pages and stamp headers and footers.
///
/// Pass 1 breaks the content into pages; pass 2 writes `Page X of N` into
/// every footer using the page count from pass 1.
pub fn layout(blocks: &[Block], config: &LayoutConfig) -> Vec<Page> {
    let mut engine = Engine::new(config);
    if let Some(title) = config.title.as_deref().filter(|t| !t.trim().is_empty()) {
        engine.place_title(title);
    }
    for block in blocks {
        engine.place_block(block);
    }
    let mut pages = engine.finish();
    stamp_chrome(&mut pages, config);

    log::debug!("Laid out {} blocks on {} pages", blocks.len(), pages.len());
    pages
}

struct Engine<'a> {
    config: &'a LayoutConfig,
    pages: Vec<Page>,
    current: Page,
    cursor: f32,
    list_number: usize,
}

impl<'a> Engine<'a> {
    fn new(config: &'a LayoutConfig) -> Self {
        let mut engine = Self {
            config,
            pages: Vec::new(),
            current: Page::default(),
            cursor: 0.0,
            list_number: 0,
        };
        engine.open_page(1);
        engine
    }

    fn body_top(&self) -> f32 {
        let header = if self.config.header.is_some() {
            CHROME_RESERVE
        } else {
            0.0
        };
        self.config.geometry.margin_top + header
    }

    fn body_bottom(&self) -> f32 {
        let footer = if self.config.has_footer() {
            CHROME_RESERVE
        } else {
            0.0
        };
        self.config.geometry.height - self.config.geometry.margin_bottom - footer
    }

    fn open_page(&mut self, number: usize) {
        self.current = Page {
            number,
            ..Page::default()
        };
        self.cursor = self.body_top();
    }

    fn break_page(&mut self) {
        let next = self.current.number + 1;
        let full = std::mem::take(&mut self.current);
        self.pages.push(full);
        self.open_page(next);
    }

    fn ensure_room(&mut self, height: f32) {
        if self.cursor + height > self.body_bottom() && !self.current.is_blank() {
            self.break_page();
        }
    }

    fn add_space(&mut self, space: f32) {
        if !self.current.is_blank() {
            self.cursor += space;
        }
    }

    fn place_title(&mut self, title: &str) {
        let size = self.config.font_size * TITLE_SCALE;
        let line_height = size * self.config.line_spacing;
        let geometry = self.config.geometry;
        let runs = [Run::bold(title.trim())];

        for line in wrap_runs(&runs, self.config.font, size, geometry.content_width()) {
            let x = if self.config.center_title {
                geometry.margin_left + (geometry.content_width() - line.width()).max(0.0) / 2.0
            } else {
                geometry.margin_left
            };
            self.place_line(line, x, size, line_height);
        }
        self.cursor += self.config.line_height();
    }

    fn place_block(&mut self, block: &Block) {
        let body = self.config.font_size;
        let line_height = self.config.line_height();
        let geometry = self.config.geometry;
        let left = geometry.margin_left;
        let width = geometry.content_width();

        if !matches!(block, Block::ListItem { ordered: true, .. }) {
            self.list_number = 0;
        }

        match block {
            Block::Heading { level, runs } => {
                let index = usize::from((*level).clamp(1, 3) - 1);
                let size = body * HEADING_SCALE[index];
                self.add_space(line_height * HEADING_SPACE_BEFORE[index]);
                let runs: Vec<Run> = runs
                    .iter()
                    .map(|r| Run {
                        bold: true,
                        ..r.clone()
                    })
                    .collect();
                self.place_runs(&runs, left, size, width, size * self.config.line_spacing);
                self.cursor += line_height * BLOCK_SPACE_AFTER;
            }
            Block::Paragraph { runs } => {
                self.place_runs(runs, left, body, width, line_height);
                self.cursor += line_height * BLOCK_SPACE_AFTER;
            }
            Block::Blockquote { runs } => {
                let runs: Vec<Run> = runs
                    .iter()
                    .map(|r| Run {
                        italic: true,
                        ..r.clone()
                    })
                    .collect();
                let inner = (width - 2.0 * QUOTE_INDENT).max(1.0);
                self.place_runs(&runs, left + QUOTE_INDENT, body, inner, line_height);
                self.cursor += line_height * BLOCK_SPACE_AFTER;
            }
            Block::ListItem { ordered, runs } => {
                let marker = if *ordered {
                    self.list_number += 1;
                    format!("{}. ", self.list_number)
                } else {
                    "\u{2022} ".to_string()
                };
                self.place_list_item(&marker, runs, left + LIST_INDENT, body, width - LIST_INDENT, line_height);
                self.cursor += line_height * LIST_SPACE_AFTER;
            }
            Block::Rule => {
                self.ensure_room(line_height);
                self.current.strokes.push(Stroke {
                    x1: left,
                    x2: left + width,
                    y: self.cursor + line_height / 2.0,
                    thickness: RULE_THICKNESS,
                });
                self.cursor += line_height;
            }
        }
    }

    fn place_runs(&mut self, runs: &[Run], x: f32, size: f32, width: f32, line_height: f32) {
        for line in wrap_runs(runs, self.config.font, size, width) {
            self.place_line(line, x, size, line_height);
        }
    }

    fn place_list_item(
        &mut self,
        marker: &str,
        runs: &[Run],
        x: f32,
        size: f32,
        width: f32,
        line_height: f32,
    ) {
        let font = self.config.font;
        let marker_width = font.text_width(marker, false, size);
        let lines = wrap_runs(runs, font, size, (width - marker_width).max(1.0));

        for (i, line) in lines.into_iter().enumerate() {
            if i == 0 {
                let mut first = WrappedLine::default();
                first.push(Run::new(marker), marker_width);
                for (run, w) in line.pieces {
                    first.pieces.push((run, w));
                }
                self.place_line(first, x, size, line_height);
            } else {
                self.place_line(line, x + marker_width, size, line_height);
            }
        }
    }

    fn place_line(&mut self, line: WrappedLine, x: f32, size: f32, line_height: f32) {
        self.ensure_room(line_height);
        let baseline = self.cursor + size;
        let mut pen = x;
        for (run, width) in line.pieces {
            self.current.fragments.push(Fragment {
                x: pen,
                y: baseline,
                width,
                size,
                text: run.text,
                bold: run.bold,
                italic: run.italic,
                underline: run.underline,
                strike: run.strike,
            });
            pen += width;
        }
        self.cursor += line_height;
    }

    fn finish(mut self) -> Vec<Page> {
        self.pages.push(self.current);
        self.pages
    }
}

/// Second pass: header and footer text, centered, on every page.
fn stamp_chrome(pages: &mut [Page], config: &LayoutConfig) {
    let total = pages.len();
    let geometry = config.geometry;
    let centered = |text: String, y: f32| {
        let width = config.font.text_width(&text, false, CHROME_FONT_SIZE);
        Fragment {
            x: geometry.margin_left + (geometry.content_width() - width).max(0.0) / 2.0,
            y,
            width,
            size: CHROME_FONT_SIZE,
            text,
            bold: false,
            italic: false,
            underline: false,
            strike: false,
        }
    };

    for page in pages.iter_mut() {
        if let Some(header) = config.header.as_deref() {
            page.header = Some(centered(
                header.to_string(),
                geometry.margin_top + CHROME_FONT_SIZE,
            ));
        }

        let footer = match (config.footer.as_deref(), config.page_numbers) {
            (Some(text), true) => Some(format!("{} | Page {} of {}", text, page.number, total)),
            (Some(text), false) => Some(text.to_string()),
            (None, true) => Some(format!("Page {} of {}", page.number, total)),
            (None, false) => None,
        };
        page.footer = footer.map(|text| {
            centered(
                text,
                geometry.height - geometry.margin_bottom - CHROME_FONT_SIZE * 0.3,
            )
        });
    }
}
