//! Integration tests for the typesetting-source (LaTeX) output.

use quire::{
    export, Author, BibliographyEntry, CitationStyle, DocumentSource, DocumentType, EntryType,
    ExportFormat, ExportOptions, PageSize, PaperMeta, Section,
};

fn tex(doc_type: DocumentType, source: &DocumentSource, options: ExportOptions) -> String {
    let output = export(doc_type, source, &options.with_format(ExportFormat::Tex)).unwrap();
    output.as_text().unwrap().to_string()
}

#[test]
fn test_research_and_analysis_scenario() {
    let source = DocumentSource::flat(
        "Research & Analysis",
        "<h1>Intro</h1><p>Para &amp; value</p>",
    );
    let out = tex(DocumentType::Draft, &source, ExportOptions::default());

    assert!(out.contains("\\section{Intro}"));
    assert!(out.contains("Para \\& value"));
    assert!(out.contains("\\title{Research \\& Analysis}"));
}

#[test]
fn test_preamble_follows_options() {
    let options = ExportOptions::default()
        .with_page_size(PageSize::Letter)
        .with_line_spacing(2.0)
        .with_font("Arial", 11.0);
    let out = tex(DocumentType::Draft, &DocumentSource::flat("T", "<p>x</p>"), options);

    assert!(out.starts_with("\\documentclass[11pt,letterpaper]{article}"));
    assert!(out.contains("\\doublespacing"));
    assert!(out.contains("helvet"));
    assert!(out.contains("\\usepackage[letterpaper,top=25.4mm,right=25.4mm"));
}

#[test]
fn test_page_numbers_use_lastpage() {
    let options = ExportOptions::default().with_footer("Draft 2");
    let out = tex(DocumentType::Draft, &DocumentSource::flat("T", "<p>x</p>"), options);
    assert!(out.contains("\\usepackage{lastpage}"));
    assert!(out.contains("Draft 2 \\textbar{} Page \\thepage\\ of \\pageref{LastPage}"));

    let bare = ExportOptions::default().with_page_numbers(false);
    let out = tex(DocumentType::Draft, &DocumentSource::flat("T", "<p>x</p>"), bare);
    assert!(out.contains("\\pagestyle{empty}"));
    assert!(!out.contains("fancyhdr"));
}

#[test]
fn test_special_characters_everywhere() {
    let source = DocumentSource::flat(
        "50% off_sale",
        "<h2>Costs in $ &amp; #</h2><ul><li>a ~ b</li><li>x^2 {y}</li></ul>",
    );
    let out = tex(DocumentType::Draft, &source, ExportOptions::default());

    assert!(out.contains("\\title{50\\% off\\_sale}"));
    assert!(out.contains("\\subsection{Costs in \\$ \\& \\#}"));
    assert!(out.contains("\\item a \\textasciitilde{} b"));
    assert!(out.contains("\\item x\\textasciicircum{}2 \\{y\\}"));
}

#[test]
fn test_inline_styles_nest_in_fixed_order() {
    let source = DocumentSource::flat("T", "<p><u><em><strong>all</strong></em></u></p>");
    let out = tex(DocumentType::Draft, &source, ExportOptions::default());
    assert!(out.contains("\\textbf{\\textit{\\underline{all}}}"));
}

#[test]
fn test_list_runs_become_environments() {
    let source = DocumentSource::flat(
        "T",
        "<ul><li>a</li><li>b</li></ul><ol><li>one</li></ol><p>after</p>",
    );
    let out = tex(DocumentType::Draft, &source, ExportOptions::default());
    assert_eq!(out.matches("\\begin{itemize}").count(), 1);
    assert_eq!(out.matches("\\begin{enumerate}").count(), 1);
    let end = out.find("\\end{enumerate}").unwrap();
    assert!(out.find("after").unwrap() > end);
}

#[test]
fn test_academic_paper_uses_native_environments() {
    let mut first = Author::new("Ada", "Lovelace");
    first.affiliation = Some("Analytical Society".into());
    let paper = PaperMeta {
        authors: vec![first, Author::new("Charles", "Babbage")],
        abstract_text: "Engines & numbers.".into(),
        keywords: vec!["engines".into(), "numbers".into()],
    };
    let source = DocumentSource::sectioned(
        "Notes",
        vec![
            Section::new("m", "Method", "<p>Cite it.</p>", 2),
            Section::new("i", "Introduction", "<p>Hello</p>", 1),
        ],
    )
    .with_paper(paper)
    .with_citation_style(CitationStyle::Mla9)
    .with_bibliography(vec![BibliographyEntry::new("menabrea1842", EntryType::Article, "Sketch")
        .with_authors(["Menabrea, Luigi"])
        .with_year(1842)
        .with_journal("Bibliothèque Universelle")]);

    let out = tex(DocumentType::Academic, &source, ExportOptions::default());

    assert!(out.contains("\\author{Ada Lovelace \\\\ \\small Analytical Society \\and Charles Babbage}"));
    assert!(out.contains("\\begin{abstract}\nEngines \\& numbers.\n\\end{abstract}"));
    assert!(out.contains("\\noindent\\textbf{Keywords:} engines, numbers"));
    assert!(out.find("\\subsection{Introduction}").unwrap() < out.find("\\subsection{Method}").unwrap());
    assert!(out.contains("\\begin{thebibliography}{99}"));
    assert!(out.contains("\\bibitem{menabrea1842}"));
    assert!(out.contains("\\textit{Bibliothèque Universelle"));
    assert!(out.trim_end().ends_with("\\end{document}"));
}

#[test]
fn test_ieee_bibitems_carry_no_second_label() {
    let source = DocumentSource::sectioned(
        "Signals",
        vec![Section::new("i", "Introduction", "<p>Hello</p>", 1)],
    )
    .with_paper(PaperMeta::default())
    .with_citation_style(CitationStyle::Ieee)
    .with_bibliography(vec![
        BibliographyEntry::new("zulu", EntryType::Book, "Zeal").with_authors(["Zulu, Zack"]),
        BibliographyEntry::new("adams", EntryType::Book, "Ardor").with_authors(["Adams, Amy"]),
    ]);

    let out = tex(DocumentType::Academic, &source, ExportOptions::default());
    assert!(out.contains("\\bibitem{zulu} Z. Zulu"));
    assert!(out.contains("\\bibitem{adams} A. Adams"));
    assert!(!out.contains("[1]"));
}

#[test]
fn test_bracket_leading_list_item_is_not_a_label() {
    let source = DocumentSource::flat("T", "<ul><li>[draft] note</li></ul>");
    let out = tex(DocumentType::Draft, &source, ExportOptions::default());
    assert!(out.contains("\\item {[}draft] note"));
}
