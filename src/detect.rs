//! Output format sniffing.
//!
//! Recognises exported files by their leading bytes: `%PDF-` for PDF, a ZIP
//! local header containing `word/document.xml` for DOCX, and a
//! `\documentclass` line for LaTeX.

use crate::render::docx::{read_archive, DOCUMENT_PART};
use crate::render::ExportFormat;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const PDF_MAGIC: &[u8] = b"%PDF-";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const LATEX_MARKER: &str = "\\documentclass";

/// How much of a text file is searched for the LaTeX marker.
const TEXT_SNIFF_LEN: usize = 4096;

/// Detect the export format of a buffer.
///
/// # Example
///
/// ```
/// use quire::detect::detect_format;
/// use quire::ExportFormat;
///
/// assert_eq!(detect_format(b"%PDF-1.7\n"), Some(ExportFormat::Pdf));
/// assert_eq!(detect_format(b"plain words"), None);
/// ```
pub fn detect_format(data: &[u8]) -> Option<ExportFormat> {
    if data.starts_with(PDF_MAGIC) {
        return Some(ExportFormat::Pdf);
    }
    if data.starts_with(ZIP_MAGIC) {
        return is_docx(data).then_some(ExportFormat::Docx);
    }
    is_latex(data).then_some(ExportFormat::Tex)
}

/// Detect the export format of a file.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> crate::Result<Option<ExportFormat>> {
    let mut data = Vec::new();
    File::open(path)?.read_to_end(&mut data)?;
    Ok(detect_format(&data))
}

/// PDF version from the header line, e.g. `"1.7"`.
pub fn pdf_version(data: &[u8]) -> Option<String> {
    let rest = data.strip_prefix(PDF_MAGIC)?;
    let version: Vec<u8> = rest.iter().take(3).copied().collect();
    match version.as_slice() {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Some(String::from_utf8_lossy(&version).into_owned())
        }
        _ => None,
    }
}

fn is_docx(data: &[u8]) -> bool {
    read_archive(data)
        .map(|entries| entries.iter().any(|(name, _)| name == DOCUMENT_PART))
        .unwrap_or(false)
}

fn is_latex(data: &[u8]) -> bool {
    let head = &data[..data.len().min(TEXT_SNIFF_LEN)];
    let text = String::from_utf8_lossy(head);
    text.lines()
        .map(str::trim_start)
        .filter(|line| !line.is_empty() && !line.starts_with('%'))
        .take(1)
        .any(|line| line.starts_with(LATEX_MARKER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::docx::ZipWriter;

    #[test]
    fn test_detect_pdf() {
        assert_eq!(detect_format(b"%PDF-1.7\n%\xe2\xe3"), Some(ExportFormat::Pdf));
        assert_eq!(pdf_version(b"%PDF-1.7\n"), Some("1.7".to_string()));
        assert_eq!(pdf_version(b"%PDF-x"), None);
    }

    #[test]
    fn test_detect_latex() {
        let source = b"% generated\n\n\\documentclass[12pt]{article}\n";
        assert_eq!(detect_format(source), Some(ExportFormat::Tex));
        assert_eq!(detect_format(b"Some prose \\documentclass"), None);
    }

    #[test]
    fn test_zip_without_document_is_not_docx() {
        let mut zip = ZipWriter::new();
        zip.add_file("mimetype", b"application/epub+zip").unwrap();
        let bytes = zip.finish().unwrap();
        assert_eq!(detect_format(&bytes), None);

        let mut zip = ZipWriter::new();
        zip.add_file(DOCUMENT_PART, b"<w:document/>").unwrap();
        let bytes = zip.finish().unwrap();
        assert_eq!(detect_format(&bytes), Some(ExportFormat::Docx));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(detect_format(b""), None);
        assert_eq!(detect_format(b"<!DOCTYPE html>"), None);
    }
}
