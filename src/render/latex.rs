//! Typesetting-source (LaTeX) renderer.

use super::manuscript::{Manuscript, Reference};
use super::options::ExportOptions;
use super::result::ExportStats;
use crate::citation::Segment;
use crate::error::Result;
use crate::layout::FontFamily;
use crate::model::{Block, Run};

/// Render a manuscript to LaTeX source.
pub fn to_latex(manuscript: &Manuscript, options: &ExportOptions) -> Result<String> {
    to_latex_with_stats(manuscript, options).map(|(source, _)| source)
}

/// Render a manuscript to LaTeX source with statistics.
pub fn to_latex_with_stats(
    manuscript: &Manuscript,
    options: &ExportOptions,
) -> Result<(String, ExportStats)> {
    let mut renderer = LatexRenderer::new(options);
    let source = renderer.render(manuscript);
    log::debug!("Wrote LaTeX: {} bytes", source.len());
    Ok((source, renderer.stats))
}

/// Escape text for LaTeX. The ten special characters become commands or
/// backslash escapes in a single pass.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListEnv {
    Itemize,
    Enumerate,
}

impl ListEnv {
    fn name(self) -> &'static str {
        match self {
            ListEnv::Itemize => "itemize",
            ListEnv::Enumerate => "enumerate",
        }
    }
}

struct LatexRenderer<'a> {
    options: &'a ExportOptions,
    stats: ExportStats,
    current_list: Option<ListEnv>,
}

impl<'a> LatexRenderer<'a> {
    fn new(options: &'a ExportOptions) -> Self {
        Self {
            options,
            stats: ExportStats::new(),
            current_list: None,
        }
    }

    fn render(&mut self, manuscript: &Manuscript) -> String {
        let mut out = String::new();
        self.render_preamble(&mut out, manuscript);

        out.push_str("\\begin{document}\n");
        if self.show_title(manuscript) {
            out.push_str("\\maketitle\n");
            if self.uses_fancy() {
                out.push_str("\\thispagestyle{fancy}\n");
            }
        }
        out.push('\n');

        self.render_front_matter(&mut out, manuscript);

        for block in &manuscript.blocks {
            self.stats.add_block(block);
            self.render_block(&mut out, block);
        }
        self.close_list(&mut out);

        if !manuscript.references.is_empty() {
            self.render_references(&mut out, &manuscript.references);
        }

        out.push_str("\\end{document}\n");
        out
    }

    fn show_title(&self, manuscript: &Manuscript) -> bool {
        self.options.include_title && !manuscript.title.trim().is_empty()
    }

    fn uses_fancy(&self) -> bool {
        self.options.header().is_some()
            || self.options.footer().is_some()
            || self.options.include_page_numbers
    }

    fn render_preamble(&self, out: &mut String, manuscript: &Manuscript) {
        let options = self.options;
        let paper = options.page_size.latex_paper();

        out.push_str(&format!(
            "\\documentclass[{}pt,{}]{{article}}\n",
            class_font_size(options.body_size()),
            paper
        ));
        out.push_str("\\usepackage[utf8]{inputenc}\n");
        out.push_str("\\usepackage[T1]{fontenc}\n");
        match options.font() {
            FontFamily::Times => out.push_str("\\usepackage{mathptmx}\n"),
            FontFamily::Helvetica => {
                out.push_str("\\usepackage{helvet}\n");
                out.push_str("\\renewcommand{\\familydefault}{\\sfdefault}\n");
            }
            FontFamily::Courier => {
                out.push_str("\\usepackage{courier}\n");
                out.push_str("\\renewcommand{\\familydefault}{\\ttdefault}\n");
            }
        }
        out.push_str(&format!(
            "\\usepackage[{},top={}mm,right={}mm,bottom={}mm,left={}mm]{{geometry}}\n",
            paper,
            mm(options.margins.top),
            mm(options.margins.right),
            mm(options.margins.bottom),
            mm(options.margins.left)
        ));
        out.push_str("\\usepackage{setspace}\n");
        out.push_str("\\usepackage[normalem]{ulem}\n");

        if self.uses_fancy() {
            out.push_str("\\usepackage{fancyhdr}\n");
            if options.include_page_numbers {
                out.push_str("\\usepackage{lastpage}\n");
            }
            out.push_str("\\pagestyle{fancy}\n");
            out.push_str("\\fancyhf{}\n");
            out.push_str("\\renewcommand{\\headrulewidth}{0pt}\n");
            if let Some(header) = options.header() {
                out.push_str(&format!("\\fancyhead[C]{{{}}}\n", escape_latex(header)));
            }
            let page = "Page \\thepage\\ of \\pageref{LastPage}";
            let footer = match (options.footer(), options.include_page_numbers) {
                (Some(text), true) => Some(format!("{} \\textbar{{}} {}", escape_latex(text), page)),
                (Some(text), false) => Some(escape_latex(text)),
                (None, true) => Some(page.to_string()),
                (None, false) => None,
            };
            if let Some(footer) = footer {
                out.push_str(&format!("\\fancyfoot[C]{{{}}}\n", footer));
            }
        } else {
            out.push_str("\\pagestyle{empty}\n");
        }

        out.push_str(spacing_command(options.spacing_factor()));
        out.push('\n');

        out.push_str(&format!("\\title{{{}}}\n", escape_latex(manuscript.title.trim())));
        let authors: Vec<String> = manuscript
            .front
            .iter()
            .flat_map(|f| f.authors.iter())
            .filter(|a| !a.display_name().is_empty())
            .map(|a| match a.affiliation.as_deref().map(str::trim) {
                Some(aff) if !aff.is_empty() => {
                    format!("{} \\\\ \\small {}", escape_latex(&a.display_name()), escape_latex(aff))
                }
                _ => escape_latex(&a.display_name()),
            })
            .collect();
        out.push_str(&format!("\\author{{{}}}\n", authors.join(" \\and ")));
        out.push_str("\\date{}\n\n");
    }

    fn render_front_matter(&mut self, out: &mut String, manuscript: &Manuscript) {
        if let Some(abstract_text) = manuscript.abstract_text() {
            out.push_str("\\begin{abstract}\n");
            out.push_str(&escape_latex(abstract_text));
            out.push_str("\n\\end{abstract}\n\n");
            self.stats.count_text(abstract_text);
        }
        let keywords = manuscript.keywords();
        if !keywords.is_empty() {
            let escaped: Vec<String> = keywords.iter().map(|k| escape_latex(k.trim())).collect();
            out.push_str(&format!("\\noindent\\textbf{{Keywords:}} {}\n\n", escaped.join(", ")));
        }
    }

    fn open_list(&mut self, out: &mut String, env: ListEnv) {
        if self.current_list != Some(env) {
            self.close_list(out);
            out.push_str(&format!("\\begin{{{}}}\n", env.name()));
            self.current_list = Some(env);
        }
    }

    fn close_list(&mut self, out: &mut String) {
        if let Some(env) = self.current_list.take() {
            out.push_str(&format!("\\end{{{}}}\n\n", env.name()));
        }
    }

    fn render_block(&mut self, out: &mut String, block: &Block) {
        if let Block::ListItem { ordered, runs } = block {
            let env = if *ordered {
                ListEnv::Enumerate
            } else {
                ListEnv::Itemize
            };
            self.open_list(out, env);
            out.push_str(&format!("\\item {}\n", guard_item_text(render_runs(runs))));
            return;
        }
        self.close_list(out);

        match block {
            Block::Heading { level, runs } => {
                let command = match *level {
                    0 | 1 => "section",
                    2 => "subsection",
                    _ => "subsubsection",
                };
                out.push_str(&format!("\\{}{{{}}}\n\n", command, render_runs(runs)));
            }
            Block::Paragraph { runs } => {
                out.push_str(&render_runs(runs));
                out.push_str("\n\n");
            }
            Block::Blockquote { runs } => {
                out.push_str("\\begin{quote}\n");
                out.push_str(&render_runs(runs));
                out.push_str("\n\\end{quote}\n\n");
            }
            Block::Rule => out.push_str("\\noindent\\rule{\\linewidth}{0.4pt}\n\n"),
            Block::ListItem { .. } => {}
        }
    }

    fn render_references(&mut self, out: &mut String, references: &[Reference]) {
        out.push_str("\\begin{thebibliography}{99}\n");
        for reference in references {
            self.stats.reference_count += 1;
            out.push_str(&format!(
                "\\bibitem{{{}}} {}\n",
                reference.key,
                render_segments(&reference.formatted.segments)
            ));
        }
        out.push_str("\\end{thebibliography}\n\n");
    }
}

/// Inline runs with nested formatting commands: bold outside italic
/// outside underline outside strike-through.
fn render_runs(runs: &[Run]) -> String {
    runs.iter().map(render_run).collect()
}

fn render_run(run: &Run) -> String {
    let mut text = escape_latex(&run.text);
    if run.strike {
        text = format!("\\sout{{{}}}", text);
    }
    if run.underline {
        text = format!("\\underline{{{}}}", text);
    }
    if run.italic {
        text = format!("\\textit{{{}}}", text);
    }
    if run.bold {
        text = format!("\\textbf{{{}}}", text);
    }
    text
}

fn render_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| {
            if s.italic {
                format!("\\textit{{{}}}", escape_latex(&s.text))
            } else {
                escape_latex(&s.text)
            }
        })
        .collect()
}

/// Nearest size the standard article class accepts.
fn class_font_size(size: f32) -> u8 {
    if size < 10.5 {
        10
    } else if size < 11.5 {
        11
    } else {
        12
    }
}

fn spacing_command(factor: f32) -> &'static str {
    if factor >= 1.75 {
        "\\doublespacing"
    } else if factor >= 1.25 {
        "\\onehalfspacing"
    } else {
        "\\singlespacing"
    }
}

fn mm(value: f32) -> String {
    let rounded = (value.max(0.0) * 10.0).round() / 10.0;
    format!("{}", rounded)
}

/// A leading `[` would be read as the optional label of `\item`.
fn guard_item_text(text: String) -> String {
    match text.strip_prefix('[') {
        Some(rest) => format!("{{[}}{}", rest),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, PaperMeta};

    fn render(blocks: Vec<Block>) -> String {
        to_latex(&Manuscript::new("Doc", blocks), &ExportOptions::default()).unwrap()
    }

    #[test]
    fn test_escape_all_specials() {
        assert_eq!(escape_latex("a & b"), "a \\& b");
        assert_eq!(escape_latex("100% #1 $5 x_y {z}"), "100\\% \\#1 \\$5 x\\_y \\{z\\}");
        assert_eq!(escape_latex("~^\\"), "\\textasciitilde{}\\textasciicircum{}\\textbackslash{}");
    }

    #[test]
    fn test_heading_commands() {
        let out = render(vec![
            Block::heading("One", 1),
            Block::heading("Two", 2),
            Block::heading("Three", 3),
        ]);
        assert!(out.contains("\\section{One}"));
        assert!(out.contains("\\subsection{Two}"));
        assert!(out.contains("\\subsubsection{Three}"));
    }

    #[test]
    fn test_list_items_grouped() {
        let out = render(vec![
            Block::list_item("a", false),
            Block::list_item("b", false),
            Block::list_item("one", true),
            Block::paragraph("after"),
        ]);
        assert_eq!(out.matches("\\begin{itemize}").count(), 1);
        assert!(out.contains("\\item a\n\\item b\n\\end{itemize}"));
        assert!(out.contains("\\begin{enumerate}\n\\item one\n\\end{enumerate}"));
        let end = out.find("\\end{enumerate}").unwrap();
        assert!(out.find("after").unwrap() > end);
    }

    #[test]
    fn test_bracket_leading_item_keeps_its_bullet() {
        let manuscript = Manuscript::new(
            "T",
            vec![Block::ListItem {
                ordered: false,
                runs: vec![Run::new("[draft] note")],
            }],
        );
        let out = to_latex(&manuscript, &ExportOptions::default()).unwrap();
        assert!(out.contains("\\item {[}draft] note\n"));
    }

    #[test]
    fn test_nested_inline_order() {
        let run = Run {
            text: "x".into(),
            bold: true,
            italic: true,
            underline: true,
            strike: false,
        };
        assert_eq!(render_run(&run), "\\textbf{\\textit{\\underline{x}}}");
    }

    #[test]
    fn test_preamble_follows_options() {
        let options = ExportOptions::default()
            .with_line_spacing(2.0)
            .with_page_numbers(false)
            .with_font("Arial", 11.0);
        let out = to_latex(&Manuscript::new("T", vec![]), &options).unwrap();
        assert!(out.starts_with("\\documentclass[11pt,a4paper]{article}"));
        assert!(out.contains("\\doublespacing"));
        assert!(out.contains("\\pagestyle{empty}"));
        assert!(out.contains("\\sfdefault"));
        assert!(out.contains("top=25.4mm"));
    }

    #[test]
    fn test_page_numbers_use_lastpage() {
        let options = ExportOptions::default().with_footer("Draft & notes");
        let out = to_latex(&Manuscript::new("T", vec![]), &options).unwrap();
        assert!(out.contains("\\usepackage{lastpage}"));
        assert!(out.contains(
            "\\fancyfoot[C]{Draft \\& notes \\textbar{} Page \\thepage\\ of \\pageref{LastPage}}"
        ));
    }

    #[test]
    fn test_title_toggle() {
        let options = ExportOptions::default().with_title(false);
        let out = to_latex(&Manuscript::new("T", vec![]), &options).unwrap();
        assert!(!out.contains("\\maketitle"));
        assert!(out.contains("\\title{T}"));
    }

    #[test]
    fn test_front_matter() {
        let manuscript = Manuscript {
            title: "Paper".into(),
            front: Some(PaperMeta {
                authors: vec![Author::new("Ada", "Lovelace"), Author::new("Alan", "Turing")],
                abstract_text: "Short & sweet.".into(),
                keywords: vec!["a_b".into(), "c".into()],
            }),
            ..Default::default()
        };
        let out = to_latex(&manuscript, &ExportOptions::default()).unwrap();
        assert!(out.contains("\\author{Ada Lovelace \\and Alan Turing}"));
        assert!(out.contains("\\begin{abstract}\nShort \\& sweet.\n\\end{abstract}"));
        assert!(out.contains("\\textbf{Keywords:} a\\_b, c"));
    }

    #[test]
    fn test_class_font_size() {
        assert_eq!(class_font_size(9.0), 10);
        assert_eq!(class_font_size(11.0), 11);
        assert_eq!(class_font_size(14.0), 12);
    }
}
