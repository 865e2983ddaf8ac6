//! Persistence adapter.
//!
//! Exported output is handed to an [`ExportSink`]. [`PickerSink`] asks a
//! [`LocationPrompt`] where to write and returns the resolved path;
//! [`DownloadSink`] drops the file into a downloads directory and returns
//! the file name. A cancelled prompt is `Ok(None)`, never an error.

use crate::error::Result;
use crate::render::{ExportFormat, ExportOutput};
use std::fs;
use std::path::{Path, PathBuf};

const UNTITLED: &str = "untitled";

/// File name for an export: the slugified title plus the format extension.
///
/// ```
/// use quire::{persist::suggested_filename, ExportFormat};
///
/// assert_eq!(suggested_filename("Research & Analysis", ExportFormat::Tex), "research-analysis.tex");
/// assert_eq!(suggested_filename("  ", ExportFormat::Pdf), "untitled.pdf");
/// ```
pub fn suggested_filename(title: &str, format: ExportFormat) -> String {
    let stem = slug::slugify(title.trim());
    let stem = if stem.is_empty() { UNTITLED } else { stem.as_str() };
    format!("{}.{}", stem, format.extension())
}

/// Somewhere exported bytes can be written.
pub trait ExportSink {
    /// Write `data` under the suggested `filename`.
    ///
    /// Returns the location the caller should report to the user, or `None`
    /// when the user declined to choose one.
    fn save(&self, data: &[u8], filename: &str) -> Result<Option<String>>;
}

/// Write an export through `sink`.
pub fn save_export(
    output: &ExportOutput,
    filename: &str,
    sink: &dyn ExportSink,
) -> Result<Option<String>> {
    let saved = sink.save(output.as_bytes(), filename)?;
    match &saved {
        Some(location) => log::debug!("Saved {} bytes to {}", output.len(), location),
        None => log::debug!("Save of {} cancelled", filename),
    }
    Ok(saved)
}

/// Asks the user for a save location.
pub trait LocationPrompt {
    /// Path chosen for `suggested`, or `None` on cancel.
    fn choose(&self, suggested: &str) -> Option<PathBuf>;
}

impl<F> LocationPrompt for F
where
    F: Fn(&str) -> Option<PathBuf>,
{
    fn choose(&self, suggested: &str) -> Option<PathBuf> {
        self(suggested)
    }
}

/// Sink backed by a native file picker.
pub struct PickerSink<P: LocationPrompt> {
    prompt: P,
}

impl<P: LocationPrompt> PickerSink<P> {
    /// Create a sink around a prompt.
    pub fn new(prompt: P) -> Self {
        Self { prompt }
    }
}

impl<P: LocationPrompt> ExportSink for PickerSink<P> {
    fn save(&self, data: &[u8], filename: &str) -> Result<Option<String>> {
        let Some(path) = self.prompt.choose(filename) else {
            return Ok(None);
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, data)?;
        let resolved = fs::canonicalize(&path).unwrap_or(path);
        Ok(Some(resolved.display().to_string()))
    }
}

/// Sink that saves into a downloads directory without asking.
#[derive(Debug, Clone)]
pub struct DownloadSink {
    dir: PathBuf,
}

impl DownloadSink {
    /// Save into `dir`, creating it on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DownloadSink {
    fn save(&self, data: &[u8], filename: &str) -> Result<Option<String>> {
        // Only the final component is honoured.
        let name = Path::new(filename)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED.to_string());
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(&name), data)?;
        Ok(Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_suggested_filename() {
        assert_eq!(suggested_filename("My Paper", ExportFormat::Docx), "my-paper.docx");
        assert_eq!(suggested_filename("", ExportFormat::Tex), "untitled.tex");
    }

    #[test]
    fn test_download_sink_returns_filename() {
        let dir = TempDir::new().unwrap();
        let sink = DownloadSink::new(dir.path().join("downloads"));
        let output = ExportOutput::Text("\\documentclass{article}".into());

        let saved = save_export(&output, "paper.tex", &sink).unwrap();
        assert_eq!(saved.as_deref(), Some("paper.tex"));
        let written = fs::read_to_string(dir.path().join("downloads/paper.tex")).unwrap();
        assert_eq!(written, "\\documentclass{article}");
    }

    #[test]
    fn test_download_sink_strips_directories() {
        let dir = TempDir::new().unwrap();
        let sink = DownloadSink::new(dir.path());
        let saved = sink.save(b"x", "../escape.pdf").unwrap();
        assert_eq!(saved.as_deref(), Some("escape.pdf"));
        assert!(dir.path().join("escape.pdf").exists());
    }

    #[test]
    fn test_picker_sink_writes_chosen_path() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out").join("chosen.pdf");
        let chosen = target.clone();
        let sink = PickerSink::new(move |_: &str| Some(chosen.clone()));

        let output = ExportOutput::Bytes(b"%PDF-1.7".to_vec());
        let saved = save_export(&output, "suggested.pdf", &sink).unwrap().unwrap();
        assert!(saved.ends_with("chosen.pdf"));
        assert_eq!(fs::read(&target).unwrap(), b"%PDF-1.7");
    }

    #[test]
    fn test_picker_cancel_is_none() {
        let sink = PickerSink::new(|_: &str| -> Option<PathBuf> { None });
        let output = ExportOutput::Bytes(vec![1, 2, 3]);
        assert_eq!(save_export(&output, "x.pdf", &sink).unwrap(), None);
    }
}
