//! Output renderers: PDF, DOCX, and LaTeX.

pub mod docx;
mod latex;
mod manuscript;
mod options;
mod pdf;
mod result;

pub use docx::{build_parts, to_docx, to_docx_with_stats, DocxPart};
pub use latex::{escape_latex, to_latex, to_latex_with_stats};
pub use manuscript::{Manuscript, Reference, MATTER_HEADING_LEVEL};
pub use options::{
    ExportFormat, ExportOptions, Margins, PageSize, DEFAULT_MARGIN_MM, LINE_UNIT, MM_TO_PT,
    PT_TO_TWIP,
};
pub use pdf::{layout_config, to_pdf, to_pdf_with_stats, to_win_ansi};
pub use result::{ExportOutput, ExportResult, ExportStats};
