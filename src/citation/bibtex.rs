//! BibTeX import via `biblatex`.

use crate::error::{Error, Result};
use crate::model::{BibliographyEntry, EntryType};
use biblatex::{Bibliography, Chunk, Entry};
use chrono::NaiveDate;

/// Parse BibTeX source into bibliography entries. Entry keys become ids.
///
/// # Example
///
/// ```
/// let entries = quire::citation::parse_bibtex(
///     "@book{adams2001, author = {Adams, Amy}, title = {Tides}, year = {2001}}",
/// ).unwrap();
/// assert_eq!(entries[0].id, "adams2001");
/// ```
pub fn parse_bibtex(source: &str) -> Result<Vec<BibliographyEntry>> {
    let bibliography = Bibliography::parse(source).map_err(|e| Error::BibTex(e.to_string()))?;

    let entries: Vec<BibliographyEntry> = bibliography.iter().map(convert_entry).collect();
    if entries.is_empty() && !source.trim().is_empty() {
        return Err(Error::BibTex("no entries found".into()));
    }

    log::debug!("Parsed {} BibTeX entries", entries.len());
    Ok(entries)
}

fn convert_entry(entry: &Entry) -> BibliographyEntry {
    let field_str = |key: &str| {
        entry
            .fields
            .get(key)
            .map(|f| {
                f.iter()
                    .map(|c| match &c.v {
                        Chunk::Normal(s) | Chunk::Verbatim(s) => s.as_str(),
                        _ => "",
                    })
                    .collect::<String>()
            })
            .map(|s| s.trim().replace("--", "\u{2013}"))
            .filter(|s| !s.is_empty())
    };

    let raw_type = entry.entry_type.to_string().to_lowercase();
    let entry_type = map_entry_type(&raw_type, field_str("url").is_some());

    let authors: Vec<String> = entry
        .author()
        .map(|persons| {
            persons
                .iter()
                .map(|p| {
                    let family = if p.prefix.is_empty() {
                        p.name.clone()
                    } else {
                        format!("{} {}", p.prefix, p.name)
                    };
                    if p.given_name.is_empty() {
                        family
                    } else {
                        format!("{}, {}", family, p.given_name)
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    if authors.is_empty() {
        log::warn!("BibTeX entry '{}' has no authors", entry.key);
    }

    let title = field_str("title").unwrap_or_else(|| "Untitled".to_string());
    let year = field_str("year")
        .or_else(|| field_str("date"))
        .and_then(|d| d.get(..4).and_then(|y| y.parse::<i32>().ok()));

    let journal = match entry_type {
        EntryType::Chapter | EntryType::Conference => {
            field_str("booktitle").or_else(|| field_str("journal"))
        }
        _ => field_str("journal").or_else(|| field_str("journaltitle")),
    };

    let publisher = field_str("publisher")
        .or_else(|| field_str("school"))
        .or_else(|| field_str("institution"));

    BibliographyEntry {
        id: entry.key.clone(),
        entry_type,
        authors,
        title,
        year,
        journal,
        volume: field_str("volume"),
        issue: field_str("number").or_else(|| field_str("issue")),
        pages: field_str("pages"),
        publisher,
        doi: field_str("doi"),
        url: field_str("url"),
        accessed: field_str("urldate")
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
    }
}

fn map_entry_type(raw: &str, has_url: bool) -> EntryType {
    match raw {
        "article" => EntryType::Article,
        "book" | "mvbook" => EntryType::Book,
        "inbook" | "incollection" => EntryType::Chapter,
        "inproceedings" | "conference" => EntryType::Conference,
        "online" | "www" => EntryType::Website,
        "misc" if has_url => EntryType::Website,
        "phdthesis" | "mastersthesis" | "thesis" => EntryType::Thesis,
        _ => EntryType::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
@article{adams2020,
  author = {Adams, Amy and Baker, Bob},
  title = {Deep Work},
  journal = {Journal of Focus},
  year = {2020},
  volume = {12},
  number = {3},
  pages = {45--67},
  doi = {10.1000/focus}
}

@phdthesis{cole2019,
  author = {Cy Cole},
  title = {On Tides},
  school = {Harbour University},
  year = {2019}
}

@misc{site,
  title = {Homepage},
  url = {https://example.org},
  urldate = {2024-03-05}
}
"#;

    #[test]
    fn test_parse_entries() {
        let entries = parse_bibtex(SAMPLE).unwrap();
        assert_eq!(entries.len(), 3);

        let article = entries.iter().find(|e| e.id == "adams2020").unwrap();
        assert_eq!(article.entry_type, EntryType::Article);
        assert_eq!(article.authors, ["Adams, Amy", "Baker, Bob"]);
        assert_eq!(article.year, Some(2020));
        assert_eq!(article.journal.as_deref(), Some("Journal of Focus"));
        assert_eq!(article.issue.as_deref(), Some("3"));
        assert_eq!(article.doi.as_deref(), Some("10.1000/focus"));
    }

    #[test]
    fn test_thesis_and_website_mapping() {
        let entries = parse_bibtex(SAMPLE).unwrap();
        let thesis = entries.iter().find(|e| e.id == "cole2019").unwrap();
        assert_eq!(thesis.entry_type, EntryType::Thesis);
        assert_eq!(thesis.publisher.as_deref(), Some("Harbour University"));
        assert_eq!(thesis.authors, ["Cole, Cy"]);

        let site = entries.iter().find(|e| e.id == "site").unwrap();
        assert_eq!(site.entry_type, EntryType::Website);
        assert!(site.authors.is_empty());
        assert_eq!(site.accessed, NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn test_type_mapping() {
        assert_eq!(map_entry_type("incollection", false), EntryType::Chapter);
        assert_eq!(map_entry_type("inproceedings", false), EntryType::Conference);
        assert_eq!(map_entry_type("misc", false), EntryType::Other);
        assert_eq!(map_entry_type("techreport", true), EntryType::Other);
    }

    #[test]
    fn test_malformed_bibtex() {
        assert!(matches!(
            parse_bibtex("@article{broken, title = {unterminated"),
            Err(Error::BibTex(_))
        ));
        assert!(parse_bibtex("   ").unwrap().is_empty());
    }
}
