//! The built-in renderers.

use super::Renderer;
use crate::error::Result;
use crate::render::{
    to_docx_with_stats, to_latex_with_stats, to_pdf_with_stats, ExportFormat, ExportOptions,
    ExportOutput, ExportStats, Manuscript,
};

/// Paginated PDF through the layout engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl Renderer for PdfRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn render(
        &self,
        manuscript: &Manuscript,
        options: &ExportOptions,
    ) -> Result<(ExportOutput, ExportStats)> {
        let blocks = manuscript.flatten();
        let (bytes, mut stats) = to_pdf_with_stats(&blocks, &manuscript.title, options)?;
        stats.reference_count = manuscript.references.len() as u32;
        Ok((ExportOutput::Bytes(bytes), stats))
    }
}

/// Reflowable DOCX package.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxRenderer;

impl Renderer for DocxRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Docx
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn render(
        &self,
        manuscript: &Manuscript,
        options: &ExportOptions,
    ) -> Result<(ExportOutput, ExportStats)> {
        let blocks = manuscript.flatten();
        let (bytes, mut stats) = to_docx_with_stats(&blocks, &manuscript.title, options)?;
        stats.reference_count = manuscript.references.len() as u32;
        Ok((ExportOutput::Bytes(bytes), stats))
    }
}

/// LaTeX source with native abstract and bibliography environments.
#[derive(Debug, Clone, Copy, Default)]
pub struct TexRenderer;

impl Renderer for TexRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Tex
    }

    fn name(&self) -> &str {
        "latex"
    }

    fn render(
        &self,
        manuscript: &Manuscript,
        options: &ExportOptions,
    ) -> Result<(ExportOutput, ExportStats)> {
        let (source, stats) = to_latex_with_stats(manuscript, options)?;
        Ok((ExportOutput::Text(source), stats))
    }
}
