//! Export router: assembly strategy plus renderer dispatch.
//!
//! Renderers are plugged into a [`RendererRegistry`] keyed by
//! [`ExportFormat`]. The free functions use the default registry with the
//! three built-in renderers.
//!
//! # Example
//!
//! ```
//! use quire::{export, DocumentSource, DocumentType, ExportFormat, ExportOptions};
//!
//! let source = DocumentSource::flat("Notes", "<h1>Intro</h1><p>Hello</p>");
//! let options = ExportOptions::default().with_format(ExportFormat::Tex);
//! let output = export(DocumentType::Draft, &source, &options).unwrap();
//! assert!(output.as_text().unwrap().contains("\\section{Intro}"));
//! ```

mod assemble;
mod renderers;

pub use assemble::{assemble, section_heading_level};
pub use renderers::{DocxRenderer, PdfRenderer, TexRenderer};

use crate::error::{Error, Result};
use crate::model::{DocumentSource, DocumentType};
use crate::render::{ExportFormat, ExportOptions, ExportOutput, ExportResult, ExportStats, Manuscript};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// An output encoder for one format.
///
/// Implementations must be pure: the same manuscript and options always
/// produce the same output.
pub trait Renderer: Send + Sync {
    /// The format this renderer produces.
    fn format(&self) -> ExportFormat;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Render a manuscript.
    fn render(
        &self,
        manuscript: &Manuscript,
        options: &ExportOptions,
    ) -> Result<(ExportOutput, ExportStats)>;
}

/// Registry of renderers by output format.
pub struct RendererRegistry {
    renderers: HashMap<ExportFormat, Arc<dyn Renderer>>,
}

impl RendererRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Create a registry with the PDF, DOCX, and LaTeX renderers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfRenderer));
        registry.register(Arc::new(DocxRenderer));
        registry.register(Arc::new(TexRenderer));
        registry
    }

    /// Register a renderer, replacing any previous one for its format.
    pub fn register(&mut self, renderer: Arc<dyn Renderer>) {
        self.renderers.insert(renderer.format(), renderer);
    }

    /// Renderer for `format`.
    pub fn get(&self, format: ExportFormat) -> Option<Arc<dyn Renderer>> {
        self.renderers.get(&format).cloned()
    }

    /// Check if a format has a renderer.
    pub fn supports(&self, format: ExportFormat) -> bool {
        self.renderers.contains_key(&format)
    }

    /// Registered formats in a stable order.
    pub fn supported_formats(&self) -> Vec<ExportFormat> {
        ExportFormat::ALL
            .into_iter()
            .filter(|f| self.supports(*f))
            .collect()
    }

    /// Assemble and render a document in `options.format`.
    pub fn export(
        &self,
        doc_type: DocumentType,
        source: &DocumentSource,
        options: &ExportOptions,
    ) -> Result<ExportResult> {
        let renderer = self
            .get(options.format)
            .ok_or_else(|| Error::UnsupportedFormat(options.format.to_string()))?;
        let manuscript = assemble(doc_type, source, options)?;
        let (output, stats) = renderer.render(&manuscript, options)?;

        log::debug!(
            "Exported {} as {} with {}: {} bytes",
            doc_type,
            options.format,
            renderer.name(),
            output.len()
        );
        Ok(ExportResult {
            format: options.format,
            output,
            stats,
        })
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_registry() -> &'static RendererRegistry {
    static REGISTRY: OnceLock<RendererRegistry> = OnceLock::new();
    REGISTRY.get_or_init(RendererRegistry::with_defaults)
}

/// Export a document with the default renderers.
pub fn export(
    doc_type: DocumentType,
    source: &DocumentSource,
    options: &ExportOptions,
) -> Result<ExportOutput> {
    export_with_stats(doc_type, source, options).map(|r| r.output)
}

/// Export a document and return statistics alongside the output.
pub fn export_with_stats(
    doc_type: DocumentType,
    source: &DocumentSource,
    options: &ExportOptions,
) -> Result<ExportResult> {
    default_registry().export(doc_type, source, options)
}

/// Export with the format given as an untyped string, overriding
/// `options.format`. Anything other than `pdf`, `docx`, `tex` (or `latex`)
/// fails with [`Error::UnsupportedFormat`].
pub fn export_with_format_str(
    doc_type: DocumentType,
    source: &DocumentSource,
    options: &ExportOptions,
    format: &str,
) -> Result<ExportOutput> {
    let format: ExportFormat = format.parse()?;
    let options = options.clone().with_format(format);
    export(doc_type, source, &options)
}

/// Export from JSON: the source object and a possibly partial options
/// object. Missing option fields take their defaults; an unknown format
/// fails with [`Error::UnsupportedFormat`].
pub fn export_json(doc_type: DocumentType, source: &str, options: &str) -> Result<ExportOutput> {
    let source: DocumentSource = serde_json::from_str(source)?;
    let options = ExportOptions::from_json(options)?;
    export(doc_type, &source, &options)
}

/// One unit of work for [`export_batch`].
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Assembly strategy
    pub doc_type: DocumentType,
    /// Document content
    pub source: DocumentSource,
    /// Export options
    pub options: ExportOptions,
}

impl ExportJob {
    /// Create a job.
    pub fn new(doc_type: DocumentType, source: DocumentSource, options: ExportOptions) -> Self {
        Self {
            doc_type,
            source,
            options,
        }
    }
}

/// Run independent exports in parallel. Results keep the input order and
/// one failure does not affect the others.
pub fn export_batch(jobs: &[ExportJob]) -> Vec<Result<ExportResult>> {
    jobs.par_iter()
        .map(|job| export_with_stats(job.doc_type, &job.source, &job.options))
        .collect()
}
