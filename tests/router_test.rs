//! Integration tests for the export router.

use std::sync::Arc;
use quire::error::Result;
use quire::render::Manuscript;
use quire::{
    export, export_batch, export_json, export_with_format_str, export_with_stats, DocumentSource, DocumentType,
    Error, ExportFormat, ExportJob, ExportOptions, ExportOutput, ExportStats, Renderer,
    RendererRegistry, Section,
};

/// Mock renderer for testing.
struct MockRenderer {
    format: ExportFormat,
    name: &'static str,
}

impl Renderer for MockRenderer {
    fn format(&self) -> ExportFormat {
        self.format
    }

    fn name(&self) -> &str {
        self.name
    }

    fn render(
        &self,
        manuscript: &Manuscript,
        _options: &ExportOptions,
    ) -> Result<(ExportOutput, ExportStats)> {
        let text = format!("{} rendered {} blocks", self.name, manuscript.blocks.len());
        Ok((ExportOutput::Text(text), ExportStats::from_blocks(&manuscript.blocks)))
    }
}

fn sample() -> DocumentSource {
    DocumentSource::flat("Sample", "<h1>Intro</h1><p>One</p><p>Two</p>")
}

#[test]
fn test_registry_new_is_empty() {
    let registry = RendererRegistry::new();
    assert!(registry.supported_formats().is_empty());
    assert!(!registry.supports(ExportFormat::Pdf));
}

#[test]
fn test_registry_register_replaces() {
    let mut registry = RendererRegistry::with_defaults();
    registry.register(Arc::new(MockRenderer {
        format: ExportFormat::Tex,
        name: "mock",
    }));

    let options = ExportOptions::default().with_format(ExportFormat::Tex);
    let result = registry.export(DocumentType::Draft, &sample(), &options).unwrap();
    assert_eq!(result.output.as_text(), Some("mock rendered 3 blocks"));
    assert_eq!(result.stats.heading_count, 1);
    assert_eq!(result.stats.paragraph_count, 2);
}

#[test]
fn test_unsupported_format_message() {
    let err = export_with_format_str(
        DocumentType::Draft,
        &sample(),
        &ExportOptions::default(),
        "odt",
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Unsupported export format: odt");
}

#[test]
fn test_partial_options_json_fills_defaults() {
    let options: ExportOptions =
        serde_json::from_str(r#"{"format":"docx","lineSpacing":2}"#).unwrap();
    assert_eq!(options.format, ExportFormat::Docx);
    assert_eq!(options.line_spacing, 2.0);
    assert_eq!(options.font_size, 12.0);
    assert!(options.include_page_numbers);

}

#[test]
fn test_json_export_rejects_unknown_format() {
    let source = r#"{"title":"T","content":"<p>x</p>"}"#;
    let err = export_json(DocumentType::Draft, source, r#"{"format":"rtf"}"#).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(ref name) if name == "rtf"));

    let output = export_json(DocumentType::Draft, source, r#"{"format":"tex"}"#).unwrap();
    assert!(output.as_text().unwrap().contains("\\begin{document}"));
}

#[test]
fn test_exports_are_idempotent() {
    let source = DocumentSource::sectioned(
        "Book",
        vec![
            Section::new("1", "Opening", "<p>It began <em>quietly</em>.</p>", 1),
            Section::new("2", "Middle", "<ol><li>a</li><li>b</li></ol><hr>", 2),
        ],
    );
    for format in ExportFormat::ALL {
        let options = ExportOptions::default()
            .with_format(format)
            .with_header("Running head")
            .with_footer("Draft");
        let first = export(DocumentType::LongDraft, &source, &options).unwrap();
        let second = export(DocumentType::LongDraft, &source, &options).unwrap();
        assert_eq!(first, second, "{} output differs between runs", format);
    }
}

#[test]
fn test_heading_survives_every_format() {
    let source = DocumentSource::flat("T", "<h2>Methodology</h2><p>Body</p>");
    for format in ExportFormat::ALL {
        let options = ExportOptions::default().with_format(format);
        let output = export(DocumentType::Draft, &source, &options).unwrap();
        let haystack = match format {
            ExportFormat::Tex => output.as_text().unwrap().to_string(),
            ExportFormat::Docx => {
                let parts = quire::render::docx::read_archive(output.as_bytes()).unwrap();
                let (_, xml) = parts
                    .into_iter()
                    .find(|(name, _)| name == "word/document.xml")
                    .unwrap();
                String::from_utf8(xml).unwrap()
            }
            ExportFormat::Pdf => {
                let doc = lopdf::Document::load_mem(output.as_bytes()).unwrap();
                let page = *doc.get_pages().get(&1).unwrap();
                String::from_utf8_lossy(&doc.get_page_content(page).unwrap()).into_owned()
            }
        };
        assert!(haystack.contains("Methodology"), "heading missing from {}", format);
    }
}

#[test]
fn test_batch_results_match_single_exports() {
    let jobs: Vec<ExportJob> = ExportFormat::ALL
        .into_iter()
        .map(|f| {
            ExportJob::new(
                DocumentType::Draft,
                sample(),
                ExportOptions::default().with_format(f),
            )
        })
        .collect();

    let results = export_batch(&jobs);
    for (job, result) in jobs.iter().zip(results) {
        let result = result.unwrap();
        let single = export_with_stats(job.doc_type, &job.source, &job.options).unwrap();
        assert_eq!(result.format, job.options.format);
        assert_eq!(result.output, single.output);
        assert_eq!(result.stats, single.stats);
    }
}

#[test]
fn test_both_content_and_sections_rejected() {
    let mut source = sample();
    source.sections = Some(vec![Section::new("1", "S", "<p>x</p>", 1)]);
    let err = export(DocumentType::Draft, &source, &ExportOptions::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidSource(_)));
}
