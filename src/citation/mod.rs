//! Citation style engine.
//!
//! Formats bibliography entries as in-text citations and reference-list
//! entries in APA 7, MLA 9, Chicago author-date, Harvard, and IEEE. Styles
//! are rows of a static rule table ([`style::STYLE_TABLE`]). Formatting never
//! fails: entries with missing fields degrade to deterministic fallbacks.
//!
//! # Example
//!
//! ```
//! use quire::citation::{format_bibliography, format_in_text};
//! use quire::{BibliographyEntry, CitationStyle, EntryType};
//!
//! let entry = BibliographyEntry::new("e1", EntryType::Book, "Tides")
//!     .with_authors(["Adams, Amy"])
//!     .with_year(2001);
//!
//! assert_eq!(format_in_text(&entry, CitationStyle::Apa7, None), "(Adams, 2001)");
//! assert!(format_bibliography(&[entry], CitationStyle::Apa7).starts_with("<p>"));
//! ```

mod bibtex;
pub mod doi;
mod format;
mod names;
mod registry;
mod sort;
pub mod style;

pub use bibtex::parse_bibtex;
pub use doi::{clean_doi, entry_from_csl_json};
#[cfg(feature = "doi")]
pub use doi::{fetch_doi, fetch_doi_blocking, fetch_doi_from};
pub use format::{escape_markup, year_label, FormattedReference, Segment};
pub use names::Name;
pub use registry::{order_by_first_citation, CitationRegistry};
pub use sort::{sort_by_author, sort_by_year, sort_for_style};

use crate::model::{BibliographyEntry, CitationStyle};
use style::{rules, InTextForm};

/// In-text citation for a single entry. Numeric styles render as `[1]`
/// here; use [`CitationRegistry`] for document-wide numbering.
pub fn format_in_text(
    entry: &BibliographyEntry,
    style: CitationStyle,
    page_numbers: Option<&str>,
) -> String {
    format::in_text(entry, rules(style), 1, page_numbers)
}

/// Reference-list entry as styled segments.
pub fn format_reference(entry: &BibliographyEntry, style: CitationStyle) -> FormattedReference {
    format::reference(entry, rules(style))
}

/// Reference-list entry as plain text.
pub fn format_bibliography_entry(entry: &BibliographyEntry, style: CitationStyle) -> String {
    format_reference(entry, style).plain_text()
}

/// One entry of a formatted reference list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListedReference<'a> {
    /// Source entry
    pub entry: &'a BibliographyEntry,
    /// List label such as `[1]` for numeric styles
    pub label: Option<String>,
    /// Styled reference text without the label
    pub formatted: FormattedReference,
}

impl ListedReference<'_> {
    /// The reference text with its label, if any, in front.
    pub fn labelled(&self) -> FormattedReference {
        match &self.label {
            Some(label) => self.formatted.clone().with_prefix(&format!("{} ", label)),
            None => self.formatted.clone(),
        }
    }
}

/// Every entry formatted in reference-list order. Numeric styles are
/// labelled `[n]` in input order.
pub fn bibliography_references(
    entries: &[BibliographyEntry],
    style: CitationStyle,
) -> Vec<ListedReference<'_>> {
    let numeric = rules(style).in_text == InTextForm::Numeric;
    sort_for_style(entries, style)
        .into_iter()
        .enumerate()
        .map(|(i, entry)| ListedReference {
            entry,
            label: numeric.then(|| format!("[{}]", i + 1)),
            formatted: format_reference(entry, style),
        })
        .collect()
}

/// Full bibliography as markup, one `<p>` per entry. Empty input yields an
/// empty string.
pub fn format_bibliography(entries: &[BibliographyEntry], style: CitationStyle) -> String {
    bibliography_references(entries, style)
        .iter()
        .map(|r| format!("<p>{}</p>", r.labelled().to_markup()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Citation key `<Surname><Year>`, e.g. `Smith2020`. Entries without
/// authors use `Unknown`.
pub fn generate_citation_key(entry: &BibliographyEntry) -> String {
    let surname = names::first_family(&entry.authors)
        .and_then(|family| family.split_whitespace().last().map(str::to_string))
        .unwrap_or_else(|| format::UNKNOWN_AUTHOR.to_string());
    let year = entry.year.map(|y| y.to_string()).unwrap_or_default();
    format!("{}{}", surname, year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntryType;

    #[test]
    fn test_citation_key() {
        let entry = BibliographyEntry::new("x", EntryType::Book, "T")
            .with_authors(["van Dyke, Dick"])
            .with_year(2020);
        assert_eq!(generate_citation_key(&entry), "Dyke2020");

        let natural = BibliographyEntry::new("y", EntryType::Book, "T").with_authors(["John Smith"]);
        assert_eq!(generate_citation_key(&natural), "Smith");

        let anon = BibliographyEntry::new("z", EntryType::Book, "T").with_year(1999);
        assert_eq!(generate_citation_key(&anon), "Unknown1999");
    }

    #[test]
    fn test_ieee_bibliography_numbered_in_input_order() {
        let entries = vec![
            BibliographyEntry::new("z", EntryType::Book, "Zed").with_authors(["Zulu, Zack"]),
            BibliographyEntry::new("a", EntryType::Book, "Aye").with_authors(["Adams, Amy"]),
        ];
        let refs = bibliography_references(&entries, CitationStyle::Ieee);
        assert_eq!(refs[0].entry.id, "z");
        assert_eq!(refs[0].label.as_deref(), Some("[1]"));
        assert!(refs[0].formatted.plain_text().starts_with("Z. Zulu"));
        assert!(refs[1].labelled().plain_text().starts_with("[2] A. Adams"));
    }

    #[test]
    fn test_empty_bibliography() {
        assert_eq!(format_bibliography(&[], CitationStyle::Mla9), "");
    }
}
