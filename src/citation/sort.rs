//! Bibliography ordering.

use super::names::first_family;
use super::style::{rules, SortOrder};
use crate::model::{BibliographyEntry, CitationStyle};
use std::cmp::Ordering;

/// Sort key: first author's surname, falling back to the title for
/// anonymous works.
fn author_key(entry: &BibliographyEntry) -> String {
    first_family(&entry.authors)
        .unwrap_or_else(|| entry.title.trim().to_string())
        .to_lowercase()
}

fn compare_author_year(a: &BibliographyEntry, b: &BibliographyEntry) -> Ordering {
    author_key(a)
        .cmp(&author_key(b))
        .then_with(|| a.year.unwrap_or(i32::MAX).cmp(&b.year.unwrap_or(i32::MAX)))
}

/// Entries in the order a style's reference list prints them. Citation-order
/// styles keep the input order, which callers arrange by first citation.
pub fn sort_for_style(entries: &[BibliographyEntry], style: CitationStyle) -> Vec<&BibliographyEntry> {
    let mut sorted: Vec<&BibliographyEntry> = entries.iter().collect();
    if rules(style).sort == SortOrder::Alphabetical {
        sorted.sort_by(|a, b| compare_author_year(a, b));
    }
    sorted
}

/// Alphabetical by first author surname (case-insensitive), then year.
pub fn sort_by_author(entries: &[BibliographyEntry]) -> Vec<BibliographyEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(compare_author_year);
    sorted
}

/// Newest first; entries without a year go last.
pub fn sort_by_year(entries: &[BibliographyEntry]) -> Vec<BibliographyEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.year.unwrap_or(0).cmp(&a.year.unwrap_or(0)));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntryType;

    fn entry(id: &str, author: &str, year: i32) -> BibliographyEntry {
        BibliographyEntry::new(id, EntryType::Book, id)
            .with_authors([author])
            .with_year(year)
    }

    fn ids(entries: &[&BibliographyEntry]) -> Vec<String> {
        entries.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn test_alphabetical_case_insensitive_with_year_tiebreak() {
        let entries = vec![
            entry("z", "Zulu, Zack", 2001),
            entry("a2", "adams, Amy", 2010),
            entry("a1", "Adams, Amy", 2005),
        ];
        assert_eq!(
            ids(&sort_for_style(&entries, CitationStyle::Apa7)),
            ["a1", "a2", "z"]
        );
    }

    #[test]
    fn test_ieee_keeps_input_order() {
        let entries = vec![entry("z", "Zulu, Zack", 2001), entry("a", "Adams, Amy", 2005)];
        assert_eq!(ids(&sort_for_style(&entries, CitationStyle::Ieee)), ["z", "a"]);
    }

    #[test]
    fn test_anonymous_sorted_by_title() {
        let entries = vec![
            entry("m", "Miller, M", 2000),
            BibliographyEntry::new("anon", EntryType::Other, "Beta report"),
        ];
        assert_eq!(
            ids(&sort_for_style(&entries, CitationStyle::Harvard)),
            ["anon", "m"]
        );
    }

    #[test]
    fn test_sort_by_year_newest_first() {
        let entries = vec![
            entry("old", "A, A", 1990),
            BibliographyEntry::new("none", EntryType::Other, "x"),
            entry("new", "B, B", 2020),
        ];
        let sorted: Vec<_> = sort_by_year(&entries).into_iter().map(|e| e.id).collect();
        assert_eq!(sorted, ["new", "old", "none"]);
    }
}
