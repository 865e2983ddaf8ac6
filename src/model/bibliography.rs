//! Bibliography entries, citations, and citation styles.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of cited work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Journal article
    Article,
    /// Book
    Book,
    /// Chapter in an edited book
    Chapter,
    /// Conference paper
    Conference,
    /// Web page
    Website,
    /// Thesis or dissertation
    Thesis,
    /// Anything else
    #[default]
    Other,
}

impl EntryType {
    /// Whether the work is published inside a container (journal, book,
    /// proceedings) whose title is rendered separately.
    pub fn is_component(&self) -> bool {
        matches!(
            self,
            EntryType::Article | EntryType::Chapter | EntryType::Conference
        )
    }
}

/// A single reference in a bibliography.
///
/// Authors are stored as display strings, normally `"Last, First"`;
/// `"First Last"` is also understood.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BibliographyEntry {
    /// Stable identifier
    pub id: String,

    /// Kind of work
    #[serde(rename = "type")]
    pub entry_type: EntryType,

    /// Ordered author list
    pub authors: Vec<String>,

    /// Title of the work
    pub title: String,

    /// Publication year
    pub year: Option<i32>,

    /// Journal, book, or proceedings title
    pub journal: Option<String>,

    /// Volume
    pub volume: Option<String>,

    /// Issue or number
    pub issue: Option<String>,

    /// Page range
    pub pages: Option<String>,

    /// Publisher or institution
    pub publisher: Option<String>,

    /// DOI without resolver prefix
    pub doi: Option<String>,

    /// URL
    pub url: Option<String>,

    /// Date a web resource was accessed
    pub accessed: Option<NaiveDate>,
}

impl BibliographyEntry {
    /// Create an entry with the given id, type, and title.
    pub fn new(id: impl Into<String>, entry_type: EntryType, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entry_type,
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the author list.
    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the publication year.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Set the container (journal) title.
    pub fn with_journal(mut self, journal: impl Into<String>) -> Self {
        self.journal = Some(journal.into());
        self
    }

    /// Set volume and issue.
    pub fn with_volume_issue(mut self, volume: impl Into<String>, issue: Option<&str>) -> Self {
        self.volume = Some(volume.into());
        self.issue = issue.map(str::to_string);
        self
    }

    /// Set the page range.
    pub fn with_pages(mut self, pages: impl Into<String>) -> Self {
        self.pages = Some(pages.into());
        self
    }

    /// Set the publisher.
    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    /// Set the DOI.
    pub fn with_doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }

    /// Set the URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// A reference from a position in a paper to a bibliography entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    /// Citation identifier
    pub id: String,

    /// Id of the cited [`BibliographyEntry`]
    pub bibliography_entry_id: String,

    /// Cited page or page range
    #[serde(default)]
    pub page_numbers: Option<String>,

    /// Position in the document, used for citation-order numbering
    #[serde(default)]
    pub position_in_document: usize,
}

impl Citation {
    /// Create a citation of `entry_id` at `position`.
    pub fn new(id: impl Into<String>, entry_id: impl Into<String>, position: usize) -> Self {
        Self {
            id: id.into(),
            bibliography_entry_id: entry_id.into(),
            page_numbers: None,
            position_in_document: position,
        }
    }

    /// Attach cited pages.
    pub fn with_pages(mut self, pages: impl Into<String>) -> Self {
        self.page_numbers = Some(pages.into());
        self
    }
}

/// Supported citation styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    /// APA 7th edition
    #[default]
    Apa7,
    /// MLA 9th edition
    Mla9,
    /// Chicago author-date
    Chicago,
    /// Harvard
    Harvard,
    /// IEEE (numbered)
    Ieee,
}

impl CitationStyle {
    /// All styles in declaration order.
    pub const ALL: [CitationStyle; 5] = [
        CitationStyle::Apa7,
        CitationStyle::Mla9,
        CitationStyle::Chicago,
        CitationStyle::Harvard,
        CitationStyle::Ieee,
    ];

    /// Style identifier as used in serialized data.
    pub fn as_str(&self) -> &'static str {
        match self {
            CitationStyle::Apa7 => "apa7",
            CitationStyle::Mla9 => "mla9",
            CitationStyle::Chicago => "chicago",
            CitationStyle::Harvard => "harvard",
            CitationStyle::Ieee => "ieee",
        }
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CitationStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apa7" | "apa" => Ok(CitationStyle::Apa7),
            "mla9" | "mla" => Ok(CitationStyle::Mla9),
            "chicago" | "chicago-author-date" => Ok(CitationStyle::Chicago),
            "harvard" => Ok(CitationStyle::Harvard),
            "ieee" => Ok(CitationStyle::Ieee),
            other => Err(format!("Unknown citation style: {}", other)),
        }
    }
}
