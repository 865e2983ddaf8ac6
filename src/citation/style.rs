//! Static per-style rendering rules.
//!
//! Each citation style is a row in [`STYLE_TABLE`]. The formatter reads the
//! row and never branches on the style identifier itself, so adding a style
//! means adding a row.

use crate::model::CitationStyle;

/// Shape of the in-text citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InTextForm {
    /// `(Author<sep>Year)`
    AuthorYear {
        /// Separator between author and year
        separator: &'static str,
    },
    /// `(Author)`
    AuthorOnly,
    /// `[n]`
    Numeric,
}

/// How each author is written in the reference list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameForm {
    /// `Adams, A. B.` for every author
    InvertedInitials,
    /// `Adams, Amy` for the first author, `Bob Baker` for the rest
    FirstInverted,
    /// `A. B. Adams` for every author
    LeadingInitials,
}

/// Where the year goes in the reference list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearPlacement {
    /// Directly after the authors, wrapped in `open`/`close`
    AfterAuthors {
        /// Text before the year
        open: &'static str,
        /// Text after the year
        close: &'static str,
    },
    /// Last detail before the closing period
    Trailing,
}

/// How volume, issue and pages follow the container title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorForm {
    /// `12(3), pp. 45-67` with a style-specific pages prefix
    Compact {
        /// Prefix before the page range
        pages_prefix: &'static str,
    },
    /// `vol. 12, no. 3, pp. 45-67`
    Labeled,
    /// `12 (3): 45-67`, attached to the container without a comma
    Colon,
}

/// How access dates of web resources are introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessedForm {
    /// `Retrieved March 5, 2024, from <url>`
    Retrieved,
    /// `Accessed March 5, 2024.`
    Accessed,
}

/// Bibliography sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// First author surname, then year ascending
    Alphabetical,
    /// Input (first citation) order
    CitationOrder,
}

/// One row of the style table.
#[derive(Debug, Clone, Copy)]
pub struct StyleRules {
    /// Style identifier
    pub style: CitationStyle,
    /// In-text citation shape
    pub in_text: InTextForm,
    /// Author count at which in-text citations collapse to `First et al.`
    pub et_al_min: usize,
    /// Joiner between two in-text surnames
    pub pair_joiner: &'static str,
    /// Joiner before the last of three or more in-text surnames
    pub series_joiner: &'static str,
    /// Reference-list name form
    pub name_form: NameForm,
    /// Joiner between exactly two reference-list authors
    pub reference_pair_joiner: &'static str,
    /// Joiner before the last of three or more reference-list authors
    pub reference_series_joiner: &'static str,
    /// Author count at which the reference list collapses to `First, et al.`
    pub reference_et_al_min: Option<usize>,
    /// Punctuation closing the author list when the year does not follow it
    pub authors_end: &'static str,
    /// Year placement
    pub year: YearPlacement,
    /// Quote marks around component titles (articles, chapters, papers)
    pub component_quotes: Option<(&'static str, &'static str)>,
    /// Punctuation after the title
    pub title_end: &'static str,
    /// Whether the title punctuation sits inside the quote marks
    pub punct_inside_quotes: bool,
    /// Locator form
    pub locator: LocatorForm,
    /// Access-date wording
    pub accessed: AccessedForm,
    /// Bibliography order
    pub sort: SortOrder,
}

/// Rules for every supported style.
pub static STYLE_TABLE: [StyleRules; 5] = [
    StyleRules {
        style: CitationStyle::Apa7,
        in_text: InTextForm::AuthorYear { separator: ", " },
        et_al_min: 3,
        pair_joiner: " & ",
        series_joiner: ", & ",
        name_form: NameForm::InvertedInitials,
        reference_pair_joiner: ", & ",
        reference_series_joiner: ", & ",
        reference_et_al_min: None,
        authors_end: ".",
        year: YearPlacement::AfterAuthors {
            open: " (",
            close: "). ",
        },
        component_quotes: None,
        title_end: ".",
        punct_inside_quotes: false,
        locator: LocatorForm::Compact { pages_prefix: "" },
        accessed: AccessedForm::Retrieved,
        sort: SortOrder::Alphabetical,
    },
    StyleRules {
        style: CitationStyle::Mla9,
        in_text: InTextForm::AuthorOnly,
        et_al_min: 3,
        pair_joiner: " and ",
        series_joiner: ", and ",
        name_form: NameForm::FirstInverted,
        reference_pair_joiner: ", and ",
        reference_series_joiner: ", and ",
        reference_et_al_min: Some(3),
        authors_end: ".",
        year: YearPlacement::Trailing,
        component_quotes: Some(("\u{201c}", "\u{201d}")),
        title_end: ".",
        punct_inside_quotes: true,
        locator: LocatorForm::Labeled,
        accessed: AccessedForm::Accessed,
        sort: SortOrder::Alphabetical,
    },
    StyleRules {
        style: CitationStyle::Chicago,
        in_text: InTextForm::AuthorYear { separator: " " },
        et_al_min: 4,
        pair_joiner: " and ",
        series_joiner: ", and ",
        name_form: NameForm::FirstInverted,
        reference_pair_joiner: ", and ",
        reference_series_joiner: ", and ",
        reference_et_al_min: None,
        authors_end: ".",
        year: YearPlacement::AfterAuthors {
            open: ". ",
            close: ". ",
        },
        component_quotes: Some(("\u{201c}", "\u{201d}")),
        title_end: ".",
        punct_inside_quotes: true,
        locator: LocatorForm::Colon,
        accessed: AccessedForm::Accessed,
        sort: SortOrder::Alphabetical,
    },
    StyleRules {
        style: CitationStyle::Harvard,
        in_text: InTextForm::AuthorYear { separator: ", " },
        et_al_min: 4,
        pair_joiner: " and ",
        series_joiner: " and ",
        name_form: NameForm::InvertedInitials,
        reference_pair_joiner: " and ",
        reference_series_joiner: " and ",
        reference_et_al_min: None,
        authors_end: ".",
        year: YearPlacement::AfterAuthors {
            open: " (",
            close: ") ",
        },
        component_quotes: Some(("\u{2018}", "\u{2019}")),
        title_end: ",",
        punct_inside_quotes: false,
        locator: LocatorForm::Compact {
            pages_prefix: "pp. ",
        },
        accessed: AccessedForm::Accessed,
        sort: SortOrder::Alphabetical,
    },
    StyleRules {
        style: CitationStyle::Ieee,
        in_text: InTextForm::Numeric,
        et_al_min: 3,
        pair_joiner: " and ",
        series_joiner: ", and ",
        name_form: NameForm::LeadingInitials,
        reference_pair_joiner: " and ",
        reference_series_joiner: ", and ",
        reference_et_al_min: None,
        authors_end: ",",
        year: YearPlacement::Trailing,
        component_quotes: Some(("\u{201c}", "\u{201d}")),
        title_end: ",",
        punct_inside_quotes: true,
        locator: LocatorForm::Labeled,
        accessed: AccessedForm::Accessed,
        sort: SortOrder::CitationOrder,
    },
];

/// Look up the rules for `style`.
pub fn rules(style: CitationStyle) -> &'static StyleRules {
    STYLE_TABLE
        .iter()
        .find(|r| r.style == style)
        .unwrap_or(&STYLE_TABLE[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_style_has_a_row() {
        for style in CitationStyle::ALL {
            assert_eq!(rules(style).style, style);
        }
    }

    #[test]
    fn test_only_ieee_is_numeric() {
        for row in &STYLE_TABLE {
            let numeric = row.in_text == InTextForm::Numeric;
            assert_eq!(numeric, row.sort == SortOrder::CitationOrder);
        }
    }
}
