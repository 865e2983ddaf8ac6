//! # quire
//!
//! Deterministic document export for Rust.
//!
//! This library turns a semantic document (a title plus rich-text markup,
//! either flat or split into ordered sections, with an optional bibliography)
//! into a paginated PDF, a Word-compatible DOCX package, or LaTeX source.
//!
//! ## Quick Start
//!
//! ```
//! use quire::{export, DocumentSource, DocumentType, ExportFormat, ExportOptions, PageSize};
//!
//! fn main() -> quire::Result<()> {
//!     let source = DocumentSource::flat(
//!         "Research & Analysis",
//!         "<h1>Intro</h1><p>Para &amp; value</p>",
//!     );
//!     let options = ExportOptions::new()
//!         .with_format(ExportFormat::Tex)
//!         .with_page_size(PageSize::Letter);
//!
//!     let output = export(DocumentType::Draft, &source, &options)?;
//!     let tex = output.as_text().unwrap_or_default();
//!     assert!(tex.contains("\\title{Research \\& Analysis}"));
//!     assert!(tex.contains("Para \\& value"));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Three encoders**: PDF (via `lopdf`), DOCX (`quick-xml` parts in a ZIP
//!   container), LaTeX
//! - **Pagination**: greedy word wrap with standard-font metrics and
//!   "Page X of N" footers
//! - **Citations**: APA 7, MLA 9, Chicago, Harvard, IEEE; BibTeX import and
//!   optional DOI lookup (feature `doi`)
//! - **Deterministic**: the same input always produces identical bytes
//! - **Batch export**: independent documents rendered in parallel with Rayon

pub mod citation;
pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod persist;
pub mod render;
pub mod router;

// Re-export commonly used types
pub use detect::{detect_format, detect_format_from_path};
pub use error::{Error, Result};
pub use model::{
    Author, BibliographyEntry, Block, Citation, CitationStyle, DocumentSource, DocumentType,
    EntryType, PaperMeta, Run, Section,
};
pub use persist::{save_export, suggested_filename, DownloadSink, ExportSink, PickerSink};
pub use render::{
    ExportFormat, ExportOptions, ExportOutput, ExportResult, ExportStats, Margins, PageSize,
};
pub use router::{
    export, export_batch, export_json, export_with_format_str, export_with_stats, ExportJob,
    Renderer, RendererRegistry,
};

use std::fs;
use std::path::{Path, PathBuf};

/// Export a document and write it into `dir` under its suggested file name.
///
/// # Example
///
/// ```no_run
/// use quire::{export_to_dir, DocumentSource, DocumentType, ExportOptions};
///
/// let source = DocumentSource::flat("Notes", "<p>Hello</p>");
/// let path = export_to_dir(DocumentType::Draft, &source, &ExportOptions::default(), "out")?;
/// println!("{}", path.display());
/// # Ok::<(), quire::Error>(())
/// ```
pub fn export_to_dir<P: AsRef<Path>>(
    doc_type: DocumentType,
    source: &DocumentSource,
    options: &ExportOptions,
    dir: P,
) -> Result<PathBuf> {
    let output = export(doc_type, source, options)?;
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(suggested_filename(&source.title, options.format));
    fs::write(&path, output.as_bytes())?;
    Ok(path)
}

/// Builder for configuring and running exports.
///
/// # Example
///
/// ```
/// use quire::{DocumentSource, ExportFormat, Quire};
///
/// let result = Quire::new()
///     .with_format(ExportFormat::Docx)
///     .with_page_numbers(false)
///     .export(&DocumentSource::flat("Notes", "<p>Hello</p>"))?;
/// assert!(result.output.as_bytes().starts_with(b"PK"));
/// # Ok::<(), quire::Error>(())
/// ```
pub struct Quire {
    doc_type: DocumentType,
    options: ExportOptions,
    registry: Option<RendererRegistry>,
}

impl Quire {
    /// Create a builder for drafts with default options.
    pub fn new() -> Self {
        Self {
            doc_type: DocumentType::Draft,
            options: ExportOptions::default(),
            registry: None,
        }
    }

    /// Set the assembly strategy.
    pub fn with_document_type(mut self, doc_type: DocumentType) -> Self {
        self.doc_type = doc_type;
        self
    }

    /// Replace all options.
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.options = self.options.with_format(format);
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.options = self.options.with_page_size(size);
        self
    }

    /// Enable or disable page numbers.
    pub fn with_page_numbers(mut self, enabled: bool) -> Self {
        self.options = self.options.with_page_numbers(enabled);
        self
    }

    /// Use a custom renderer registry instead of the built-in one.
    pub fn with_registry(mut self, registry: RendererRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Current options.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Export a document.
    pub fn export(&self, source: &DocumentSource) -> Result<ExportResult> {
        match &self.registry {
            Some(registry) => registry.export(self.doc_type, source, &self.options),
            None => export_with_stats(self.doc_type, source, &self.options),
        }
    }

    /// Export a document and hand it to `sink` under its suggested name.
    /// `Ok(None)` means the user cancelled.
    pub fn save(&self, source: &DocumentSource, sink: &dyn ExportSink) -> Result<Option<String>> {
        let result = self.export(source)?;
        let filename = suggested_filename(&source.title, result.format);
        save_export(&result.output, &filename, sink)
    }
}

impl Default for Quire {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builder_defaults() {
        let quire = Quire::default();
        assert_eq!(quire.options().format, ExportFormat::Pdf);
    }

    #[test]
    fn test_builder_save_to_downloads() {
        let dir = TempDir::new().unwrap();
        let sink = DownloadSink::new(dir.path());
        let saved = Quire::new()
            .with_format(ExportFormat::Tex)
            .save(&DocumentSource::flat("Field Notes", "<p>x</p>"), &sink)
            .unwrap();
        assert_eq!(saved.as_deref(), Some("field-notes.tex"));
        assert!(dir.path().join("field-notes.tex").exists());
    }

    #[test]
    fn test_export_to_dir_round_trips_through_detect() {
        let dir = TempDir::new().unwrap();
        let options = ExportOptions::default().with_format(ExportFormat::Docx);
        let path = export_to_dir(
            DocumentType::Draft,
            &DocumentSource::flat("Memo", "<p>x</p>"),
            &options,
            dir.path(),
        )
        .unwrap();
        assert!(path.ends_with("memo.docx"));
        assert_eq!(detect_format_from_path(&path).unwrap(), Some(ExportFormat::Docx));
    }
}
