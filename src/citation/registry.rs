//! Citation numbering and in-text resolution for one document.

use super::format::in_text;
use super::sort::sort_for_style;
use super::style::{rules, SortOrder};
use crate::model::{BibliographyEntry, Citation, CitationStyle};
use std::collections::HashMap;

/// Entries reordered by the first position at which each is cited. Uncited
/// entries follow in their original order.
pub fn order_by_first_citation(
    entries: &[BibliographyEntry],
    citations: &[Citation],
) -> Vec<BibliographyEntry> {
    let first_seen = first_positions(citations);
    let mut ordered: Vec<(usize, &BibliographyEntry)> = entries.iter().enumerate().collect();
    ordered.sort_by_key(|(index, entry)| {
        match first_seen.get(entry.id.as_str()) {
            Some(&position) => (0, position, *index),
            None => (1, 0, *index),
        }
    });
    ordered.into_iter().map(|(_, e)| e.clone()).collect()
}

fn first_positions(citations: &[Citation]) -> HashMap<&str, usize> {
    let mut first: HashMap<&str, usize> = HashMap::new();
    for citation in citations {
        first
            .entry(citation.bibliography_entry_id.as_str())
            .and_modify(|p| *p = (*p).min(citation.position_in_document))
            .or_insert(citation.position_in_document);
    }
    first
}

/// Resolves citations against a bibliography in a given style.
///
/// Numbers are assigned by first appearance, so `[1]` is always the
/// earliest-cited work.
#[derive(Debug, Clone)]
pub struct CitationRegistry {
    style: CitationStyle,
    entries: Vec<BibliographyEntry>,
    numbers: HashMap<String, usize>,
}

impl CitationRegistry {
    /// Build a registry for `entries` cited by `citations`.
    pub fn new(entries: &[BibliographyEntry], citations: &[Citation], style: CitationStyle) -> Self {
        let entries = order_by_first_citation(entries, citations);
        let numbers = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i + 1))
            .collect();
        Self {
            style,
            entries,
            numbers,
        }
    }

    /// The style this registry formats in.
    pub fn style(&self) -> CitationStyle {
        self.style
    }

    /// Citation-order number of an entry.
    pub fn number_of(&self, entry_id: &str) -> Option<usize> {
        self.numbers.get(entry_id).copied()
    }

    /// Look up an entry by id.
    pub fn entry(&self, entry_id: &str) -> Option<&BibliographyEntry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }

    /// In-text form of a citation, or `None` when it references an entry
    /// that is not in the bibliography.
    pub fn in_text(&self, citation: &Citation) -> Option<String> {
        let entry = self.entry(&citation.bibliography_entry_id)?;
        let number = self.number_of(&entry.id).unwrap_or(1);
        Some(in_text(
            entry,
            rules(self.style),
            number,
            citation.page_numbers.as_deref(),
        ))
    }

    /// Entries in reference-list order for this style.
    pub fn reference_order(&self) -> Vec<&BibliographyEntry> {
        match rules(self.style).sort {
            SortOrder::CitationOrder => self.entries.iter().collect(),
            SortOrder::Alphabetical => sort_for_style(&self.entries, self.style),
        }
    }
}
