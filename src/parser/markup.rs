//! Allow-list markup walker built on html5ever.

use crate::model::{Block, Run};
use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::collections::BTreeSet;
use unicode_normalization::UnicodeNormalization;

/// Tags that carry no block semantics and are unwrapped in place.
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "cite", "code", "data", "dfn", "font", "kbd", "label", "mark", "q", "samp",
    "small", "span", "sub", "sup", "time", "var", "del", "ins",
];

/// Tags whose content is never text.
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "template", "noscript", "title", "meta", "link", "img", "svg", "iframe",
];

/// Inline style flags accumulated from ancestor tags.
#[derive(Debug, Clone, Copy, Default)]
struct InlineStyle {
    bold: bool,
    italic: bool,
    underline: bool,
    strike: bool,
}

impl InlineStyle {
    fn run(self, text: String) -> Run {
        Run {
            text,
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            strike: self.strike,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Heading(u8),
    Paragraph,
    ListItem(bool),
    Blockquote,
}

#[derive(Debug)]
struct OpenBlock {
    kind: Kind,
    /// Opened by loose text rather than a block tag
    implicit: bool,
    runs: Vec<Run>,
}

impl OpenBlock {
    fn new(kind: Kind, implicit: bool) -> Self {
        Self {
            kind,
            implicit,
            runs: Vec::new(),
        }
    }
}

/// Result of a parse, including the tags that were unwrapped or skipped.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    /// Parsed blocks in document order
    pub blocks: Vec<Block>,

    /// Distinct tag names outside the allow-list
    pub dropped_tags: BTreeSet<String>,
}

/// Parse markup into blocks. Never fails; unsupported markup is unwrapped
/// to its text or dropped.
pub fn parse(markup: &str) -> Vec<Block> {
    parse_with_report(markup).blocks
}

/// Parse markup and report which tags fell outside the allow-list.
pub fn parse_with_report(markup: &str) -> ParseReport {
    if markup.trim().is_empty() {
        return ParseReport::default();
    }

    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(markup);
    let mut collector = Collector::default();
    collector.walk(&dom.document, InlineStyle::default());
    collector.close();

    if !collector.dropped.is_empty() {
        log::warn!(
            "Unwrapped unsupported markup tags: {}",
            collector.dropped.iter().cloned().collect::<Vec<_>>().join(", ")
        );
    }

    ParseReport {
        blocks: collector.blocks,
        dropped_tags: collector.dropped,
    }
}

#[derive(Default)]
struct Collector {
    blocks: Vec<Block>,
    open: Option<OpenBlock>,
    list_ordered: Option<bool>,
    dropped: BTreeSet<String>,
}

impl Collector {
    fn walk(&mut self, handle: &Handle, style: InlineStyle) {
        match handle.data {
            NodeData::Document => self.walk_children(handle, style),
            NodeData::Text { ref contents } => {
                let text = contents.borrow();
                self.push_text(&text, style);
            }
            NodeData::Element { ref name, .. } => {
                let tag: &str = &name.local;
                self.element(tag, handle, style);
            }
            _ => {}
        }
    }

    fn walk_children(&mut self, handle: &Handle, style: InlineStyle) {
        for child in handle.children.borrow().iter() {
            self.walk(child, style);
        }
    }

    fn element(&mut self, tag: &str, handle: &Handle, style: InlineStyle) {
        match tag {
            "html" | "head" | "body" => self.walk_children(handle, style),
            "p" => self.block(Kind::Paragraph, handle, style),
            "h1" => self.block(Kind::Heading(1), handle, style),
            "h2" => self.block(Kind::Heading(2), handle, style),
            "h3" => self.block(Kind::Heading(3), handle, style),
            "blockquote" => self.block(Kind::Blockquote, handle, style),
            "li" => self.list_item(handle, style),
            "ul" | "ol" => {
                self.close_implicit();
                let saved = self.list_ordered.replace(tag == "ol");
                self.walk_children(handle, style);
                self.list_ordered = saved;
            }
            "strong" | "b" => self.walk_children(
                handle,
                InlineStyle {
                    bold: true,
                    ..style
                },
            ),
            "em" | "i" => self.walk_children(
                handle,
                InlineStyle {
                    italic: true,
                    ..style
                },
            ),
            "u" => self.walk_children(
                handle,
                InlineStyle {
                    underline: true,
                    ..style
                },
            ),
            "s" | "strike" => self.walk_children(
                handle,
                InlineStyle {
                    strike: true,
                    ..style
                },
            ),
            "hr" => {
                self.close();
                self.blocks.push(Block::Rule);
            }
            "br" => self.separator(),
            _ if SKIPPED_TAGS.contains(&tag) => {
                self.dropped.insert(tag.to_string());
            }
            _ if INLINE_TAGS.contains(&tag) => {
                self.dropped.insert(tag.to_string());
                self.walk_children(handle, style);
            }
            _ => {
                // Unknown container: unwrap, keeping its text apart from neighbours.
                self.dropped.insert(tag.to_string());
                if self.in_explicit_block() {
                    self.separator();
                    self.walk_children(handle, style);
                    self.separator();
                } else {
                    self.close();
                    self.walk_children(handle, style);
                    self.close();
                }
            }
        }
    }

    fn block(&mut self, kind: Kind, handle: &Handle, style: InlineStyle) {
        if self.in_explicit_block() {
            // Nested block tags merge into the enclosing block.
            self.separator();
            self.walk_children(handle, style);
            self.separator();
            return;
        }

        self.close();
        self.open = Some(OpenBlock::new(kind, false));
        self.walk_children(handle, style);
        self.close();
    }

    fn list_item(&mut self, handle: &Handle, style: InlineStyle) {
        // Nested items are flattened to a single level; the enclosing block
        // resumes after the nested item closes.
        let resume = match self.open.take() {
            Some(outer) if !outer.implicit => {
                let kind = outer.kind;
                self.emit(outer);
                Some(kind)
            }
            Some(outer) => {
                self.emit(outer);
                None
            }
            None => None,
        };

        let ordered = self.list_ordered.unwrap_or(false);
        self.open = Some(OpenBlock::new(Kind::ListItem(ordered), false));
        self.walk_children(handle, style);
        self.close();

        if let Some(kind) = resume {
            self.open = Some(OpenBlock::new(kind, false));
        }
    }

    fn in_explicit_block(&self) -> bool {
        matches!(self.open, Some(ref open) if !open.implicit)
    }

    fn push_text(&mut self, raw: &str, style: InlineStyle) {
        let mut text = collapse_whitespace(raw);
        if text.is_empty() {
            return;
        }

        let open = match self.open {
            Some(ref mut open) => open,
            None => {
                if text.trim().is_empty() {
                    return;
                }
                self.open.insert(OpenBlock::new(Kind::Paragraph, true))
            }
        };

        let ends_with_space = open
            .runs
            .last()
            .map_or(true, |r| r.text.ends_with(' '));
        if ends_with_space && text.starts_with(' ') {
            text.remove(0);
        }
        if text.is_empty() {
            return;
        }

        let run = style.run(text);
        match open.runs.last_mut() {
            Some(last) if last.same_style(&run) => last.text.push_str(&run.text),
            _ => open.runs.push(run),
        }
    }

    fn separator(&mut self) {
        if let Some(ref mut open) = self.open {
            if let Some(last) = open.runs.last_mut() {
                if !last.text.ends_with(' ') {
                    last.text.push(' ');
                }
            }
        }
    }

    fn close_implicit(&mut self) {
        if matches!(self.open, Some(ref open) if open.implicit) {
            self.close();
        }
    }

    fn close(&mut self) {
        if let Some(open) = self.open.take() {
            self.emit(open);
        }
    }

    fn emit(&mut self, open: OpenBlock) {
        let runs = finish_runs(open.runs);
        if runs.is_empty() {
            return;
        }
        let block = match open.kind {
            Kind::Heading(level) => Block::Heading { level, runs },
            Kind::Paragraph => Block::Paragraph { runs },
            Kind::ListItem(ordered) => Block::ListItem { ordered, runs },
            Kind::Blockquote => Block::Blockquote { runs },
        };
        self.blocks.push(block);
    }
}

/// Collapse every whitespace sequence to one space and normalize to NFC.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.nfc() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Trim the block's outer whitespace and drop runs left empty.
fn finish_runs(mut runs: Vec<Run>) -> Vec<Run> {
    if let Some(first) = runs.first_mut() {
        first.text = first.text.trim_start().to_string();
    }
    if let Some(last) = runs.last_mut() {
        last.text = last.text.trim_end().to_string();
    }
    runs.retain(|r| !r.text.is_empty());
    runs
}
