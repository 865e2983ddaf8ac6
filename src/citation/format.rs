//! In-text and reference-list formatting driven by [`StyleRules`].

use super::names::{parse_names, Name};
use super::style::{
    AccessedForm, InTextForm, LocatorForm, NameForm, StyleRules, YearPlacement,
};
use crate::model::BibliographyEntry;

/// Fallback author label for entries without authors.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// A stretch of reference text with one italic flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segment {
    /// The text
    pub text: String,
    /// Rendered in italics
    pub italic: bool,
}

/// A formatted reference-list entry, kept as styled segments so each
/// renderer can emit its own italics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedReference {
    /// Segments in reading order
    pub segments: Vec<Segment>,
}

impl FormattedReference {
    fn push(&mut self, text: impl Into<String>, italic: bool) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(last) if last.italic == italic => last.text.push_str(&text),
            _ => self.segments.push(Segment { text, italic }),
        }
    }

    /// Push punctuation, dropping a leading period that would double one
    /// already ending the text.
    fn push_punct(&mut self, punct: &str) {
        let ends_terminal = self
            .last_char()
            .is_some_and(|c| matches!(c, '.' | '?' | '!'));
        let punct = match punct.strip_prefix('.') {
            Some(rest) if ends_terminal => rest,
            _ => punct,
        };
        self.push(punct, false);
    }

    fn append(&mut self, other: FormattedReference) {
        for seg in other.segments {
            self.push(seg.text, seg.italic);
        }
    }

    fn last_char(&self) -> Option<char> {
        self.segments.last().and_then(|s| s.text.chars().last())
    }

    /// Prepend plain text, e.g. an IEEE `[n] ` label.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        match self.segments.first_mut() {
            Some(first) if !first.italic => first.text.insert_str(0, prefix),
            _ => self.segments.insert(
                0,
                Segment {
                    text: prefix.to_string(),
                    italic: false,
                },
            ),
        }
        self
    }

    /// Text without styling.
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Escaped markup with `<em>` around italic segments.
    pub fn to_markup(&self) -> String {
        self.segments
            .iter()
            .map(|s| {
                let text = escape_markup(&s.text);
                if s.italic {
                    format!("<em>{}</em>", text)
                } else {
                    text
                }
            })
            .collect()
    }
}

/// Escape text for inclusion in markup.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// `2020`, or `n.d.` when the year is unknown.
pub fn year_label(year: Option<i32>) -> String {
    year.map_or_else(|| "n.d.".to_string(), |y| y.to_string())
}

/// In-text citation. `number` is the citation-order number for numeric
/// styles and is ignored otherwise.
pub fn in_text(
    entry: &BibliographyEntry,
    rules: &StyleRules,
    number: usize,
    page_numbers: Option<&str>,
) -> String {
    let base = match rules.in_text {
        InTextForm::Numeric => format!("[{}]", number),
        form => {
            let names = parse_names(&entry.authors);
            if names.is_empty() {
                format!("({})", UNKNOWN_AUTHOR)
            } else {
                let authors = in_text_authors(&names, rules);
                match form {
                    InTextForm::AuthorYear { separator } => {
                        format!("({}{}{})", authors, separator, year_label(entry.year))
                    }
                    _ => format!("({})", authors),
                }
            }
        }
    };
    append_pages(base, page_numbers)
}

fn in_text_authors(names: &[Name], rules: &StyleRules) -> String {
    let families: Vec<&str> = names.iter().map(|n| n.family.as_str()).collect();
    match families.as_slice() {
        [] => UNKNOWN_AUTHOR.to_string(),
        [one] => one.to_string(),
        [first, ..] if families.len() >= rules.et_al_min => format!("{} et al.", first),
        [a, b] => format!("{}{}{}", a, rules.pair_joiner, b),
        [init @ .., last] => format!("{}{}{}", init.join(", "), rules.series_joiner, last),
    }
}

/// Insert `, p. n` (or `pp.` for ranges) before the closing bracket.
fn append_pages(citation: String, page_numbers: Option<&str>) -> String {
    let pages = match page_numbers.map(str::trim) {
        Some(p) if !p.is_empty() => p,
        _ => return citation,
    };
    let label = if pages.contains(['-', '\u{2013}', ',']) {
        "pp."
    } else {
        "p."
    };

    match citation.chars().last() {
        Some(close @ (')' | ']')) => {
            let body = &citation[..citation.len() - close.len_utf8()];
            format!("{}, {} {}{}", body, label, pages, close)
        }
        _ => format!("{} ({} {})", citation, label, pages),
    }
}

/// Full reference-list entry.
pub fn reference(entry: &BibliographyEntry, rules: &StyleRules) -> FormattedReference {
    let mut out = FormattedReference::default();
    let title = match entry.title.trim() {
        "" => "Untitled",
        t => t,
    };

    let names = parse_names(&entry.authors);
    if names.is_empty() {
        out.push(format!("{}. {}", UNKNOWN_AUTHOR, title), false);
        out.push_punct(".");
        return out;
    }

    out.push(reference_authors(&names, rules), false);
    match rules.year {
        YearPlacement::AfterAuthors { open, close } => {
            out.push_punct(open);
            out.push(year_label(entry.year), false);
            out.push(close, false);
        }
        YearPlacement::Trailing => {
            out.push_punct(rules.authors_end);
            out.push(" ", false);
        }
    }

    let details = detail_pieces(entry, rules);
    let title_end = if details.is_empty() {
        "."
    } else {
        rules.title_end
    };

    match rules.component_quotes {
        Some((open, close)) if entry.entry_type.is_component() => {
            out.push(format!("{}{}", open, title), false);
            if rules.punct_inside_quotes {
                out.push_punct(title_end);
                out.push(close, false);
            } else {
                out.push(close, false);
                out.push(title_end, false);
            }
        }
        _ => {
            out.push(title, !entry.entry_type.is_component());
            out.push_punct(title_end);
        }
    }

    let detail_count = details.len();
    for (i, piece) in details.into_iter().enumerate() {
        out.push(if i == 0 { " " } else { ", " }, false);
        out.append(piece);
        if i + 1 == detail_count {
            out.push_punct(".");
        }
    }

    append_access_and_link(&mut out, entry, rules);
    out
}

fn reference_authors(names: &[Name], rules: &StyleRules) -> String {
    let rendered: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(i, n)| match rules.name_form {
            NameForm::InvertedInitials => n.inverted_initials(),
            NameForm::FirstInverted if i == 0 => n.inverted_full(),
            NameForm::FirstInverted => n.natural(),
            NameForm::LeadingInitials => n.leading_initials(),
        })
        .collect();

    if let Some(min) = rules.reference_et_al_min {
        if rendered.len() >= min {
            return format!("{}, et al.", rendered[0]);
        }
    }

    match rendered.as_slice() {
        [] => UNKNOWN_AUTHOR.to_string(),
        [one] => one.clone(),
        [a, b] => format!("{}{}{}", a, rules.reference_pair_joiner, b),
        [init @ .., last] => format!(
            "{}{}{}",
            init.join(", "),
            rules.reference_series_joiner,
            last
        ),
    }
}

fn detail_pieces(entry: &BibliographyEntry, rules: &StyleRules) -> Vec<FormattedReference> {
    let mut pieces = Vec::new();
    fn field(v: &Option<String>) -> Option<&str> {
        v.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    if let Some(container) = field(&entry.journal) {
        let mut head = FormattedReference::default();
        head.push(container, true);

        let volume = field(&entry.volume);
        let issue = field(&entry.issue);
        let pages = field(&entry.pages);

        match rules.locator {
            LocatorForm::Compact { pages_prefix } => {
                pieces.push(head);
                if let Some(volume) = volume {
                    let mut piece = FormattedReference::default();
                    piece.push(volume, false);
                    if let Some(issue) = issue {
                        piece.push(format!("({})", issue), false);
                    }
                    pieces.push(piece);
                }
                if let Some(pages) = pages {
                    pieces.push(plain(format!("{}{}", pages_prefix, pages)));
                }
            }
            LocatorForm::Labeled => {
                pieces.push(head);
                if let Some(volume) = volume {
                    pieces.push(plain(format!("vol. {}", volume)));
                }
                if let Some(issue) = issue {
                    pieces.push(plain(format!("no. {}", issue)));
                }
                if let Some(pages) = pages {
                    pieces.push(plain(format!("{} {}", page_label(pages), pages)));
                }
            }
            LocatorForm::Colon => {
                if let Some(volume) = volume {
                    head.push(format!(" {}", volume), false);
                }
                if let Some(issue) = issue {
                    head.push(format!(" ({})", issue), false);
                }
                if let Some(pages) = pages {
                    head.push(format!(": {}", pages), false);
                }
                pieces.push(head);
            }
        }
    }

    if let Some(publisher) = field(&entry.publisher) {
        pieces.push(plain(publisher));
    }

    if rules.year == YearPlacement::Trailing {
        pieces.push(plain(year_label(entry.year)));
    }

    pieces
}

fn append_access_and_link(out: &mut FormattedReference, entry: &BibliographyEntry, rules: &StyleRules) {
    let url = entry.url.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let doi = entry.doi.as_deref().map(str::trim).filter(|s| !s.is_empty());

    if let Some(date) = entry.accessed.filter(|_| entry.entry_type == crate::model::EntryType::Website) {
        let date = date.format("%B %-d, %Y").to_string();
        match (rules.accessed, url) {
            (AccessedForm::Retrieved, Some(url)) if doi.is_none() => {
                out.push(format!(" Retrieved {}, from {}", date, url), false);
                return;
            }
            _ => out.push(format!(" Accessed {}.", date), false),
        }
    }

    if let Some(doi) = doi {
        out.push(format!(" https://doi.org/{}", doi), false);
    } else if let Some(url) = url {
        out.push(format!(" {}", url), false);
    }
}

fn plain(text: impl Into<String>) -> FormattedReference {
    let mut piece = FormattedReference::default();
    piece.push(text, false);
    piece
}

fn page_label(pages: &str) -> &'static str {
    if pages.contains(['-', '\u{2013}', ',']) {
        "pp."
    } else {
        "p."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::citation::style::rules;
    use crate::model::{CitationStyle, EntryType};

    fn article() -> BibliographyEntry {
        BibliographyEntry::new("a1", EntryType::Article, "Deep work")
            .with_authors(["Adams, Amy", "Baker, Bob"])
            .with_year(2020)
            .with_journal("Journal of Focus")
            .with_volume_issue("12", Some("3"))
            .with_pages("45-67")
    }

    #[test]
    fn test_in_text_author_year() {
        let entry = article();
        let apa = rules(CitationStyle::Apa7);
        assert_eq!(in_text(&entry, apa, 1, None), "(Adams & Baker, 2020)");
        assert_eq!(
            in_text(&entry, apa, 1, Some("50")),
            "(Adams & Baker, 2020, p. 50)"
        );
        assert_eq!(
            in_text(&entry, rules(CitationStyle::Chicago), 1, Some("45-50")),
            "(Adams and Baker 2020, pp. 45-50)"
        );
    }

    #[test]
    fn test_in_text_et_al_thresholds() {
        let entry = article().with_authors(["Adams, A", "Baker, B", "Cole, C"]);
        assert_eq!(
            in_text(&entry, rules(CitationStyle::Apa7), 1, None),
            "(Adams et al., 2020)"
        );
        assert_eq!(
            in_text(&entry, rules(CitationStyle::Mla9), 1, None),
            "(Adams et al.)"
        );
        assert_eq!(
            in_text(&entry, rules(CitationStyle::Harvard), 1, None),
            "(Adams, Baker and Cole, 2020)"
        );
    }

    #[test]
    fn test_in_text_numeric() {
        let entry = article();
        let ieee = rules(CitationStyle::Ieee);
        assert_eq!(in_text(&entry, ieee, 4, None), "[4]");
        assert_eq!(in_text(&entry, ieee, 4, Some("7")), "[4, p. 7]");
    }

    #[test]
    fn test_missing_authors_fallback() {
        let entry = BibliographyEntry::new("x", EntryType::Book, "Anonymous Work").with_year(1999);
        for style in CitationStyle::ALL {
            let rules = rules(style);
            assert_eq!(reference(&entry, rules).plain_text(), "Unknown. Anonymous Work.");
            if style != CitationStyle::Ieee {
                assert_eq!(in_text(&entry, rules, 1, None), "(Unknown)");
            }
        }
    }

    #[test]
    fn test_apa_article_reference() {
        let text = reference(&article().with_doi("10.1/xyz"), rules(CitationStyle::Apa7));
        assert_eq!(
            text.plain_text(),
            "Adams, A., & Baker, B. (2020). Deep work. Journal of Focus, 12(3), 45-67. https://doi.org/10.1/xyz"
        );
        assert!(text.segments.iter().any(|s| s.italic && s.text == "Journal of Focus"));
    }

    #[test]
    fn test_mla_article_reference() {
        let text = reference(&article(), rules(CitationStyle::Mla9)).plain_text();
        assert_eq!(
            text,
            "Adams, Amy, and Bob Baker. \u{201c}Deep work.\u{201d} Journal of Focus, vol. 12, no. 3, pp. 45-67, 2020."
        );
    }

    #[test]
    fn test_chicago_and_harvard_article_reference() {
        let chicago = reference(&article(), rules(CitationStyle::Chicago)).plain_text();
        assert_eq!(
            chicago,
            "Adams, Amy, and Bob Baker. 2020. \u{201c}Deep work.\u{201d} Journal of Focus 12 (3): 45-67."
        );

        let harvard = reference(&article(), rules(CitationStyle::Harvard)).plain_text();
        assert_eq!(
            harvard,
            "Adams, A. and Baker, B. (2020) \u{2018}Deep work\u{2019}, Journal of Focus, 12(3), pp. 45-67."
        );
    }

    #[test]
    fn test_ieee_article_reference() {
        let text = reference(&article(), rules(CitationStyle::Ieee)).plain_text();
        assert_eq!(
            text,
            "A. Adams and B. Baker, \u{201c}Deep work,\u{201d} Journal of Focus, vol. 12, no. 3, pp. 45-67, 2020."
        );
    }

    #[test]
    fn test_book_title_italic() {
        let book = BibliographyEntry::new("b", EntryType::Book, "The Book")
            .with_authors(["Zulu, Zack"])
            .with_publisher("Press");
        let formatted = reference(&book, rules(CitationStyle::Apa7));
        assert_eq!(formatted.plain_text(), "Zulu, Z. (n.d.). The Book. Press.");
        assert!(formatted.segments.iter().any(|s| s.italic && s.text == "The Book"));
        assert_eq!(
            formatted.to_markup(),
            "Zulu, Z. (n.d.). <em>The Book</em>. Press."
        );
    }

    #[test]
    fn test_website_accessed() {
        let mut site = BibliographyEntry::new("w", EntryType::Website, "Home")
            .with_authors(["Web, Wanda"])
            .with_year(2023)
            .with_url("https://example.org");
        site.accessed = chrono::NaiveDate::from_ymd_opt(2024, 3, 5);

        let apa = reference(&site, rules(CitationStyle::Apa7)).plain_text();
        assert!(apa.ends_with("Retrieved March 5, 2024, from https://example.org"));

        let mla = reference(&site, rules(CitationStyle::Mla9)).plain_text();
        assert!(mla.contains("Accessed March 5, 2024. https://example.org"));
    }

    #[test]
    fn test_markup_escaped() {
        let entry = BibliographyEntry::new("e", EntryType::Book, "Cats & <Dogs>")
            .with_authors(["Smith, J"]);
        let markup = reference(&entry, rules(CitationStyle::Apa7)).to_markup();
        assert!(markup.contains("<em>Cats &amp; &lt;Dogs&gt;</em>"));
    }

    #[test]
    fn test_prefix() {
        let formatted = reference(&article(), rules(CitationStyle::Ieee)).with_prefix("[1] ");
        assert!(formatted.plain_text().starts_with("[1] A. Adams"));
    }
}
