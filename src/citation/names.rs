//! Author name splitting and rendering.

/// A personal name split into family and given parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    /// Family name (surname)
    pub family: String,
    /// Given names, possibly empty
    pub given: String,
}

impl Name {
    /// Parse `"Last, First"` or `"First Last"`. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Some((family, given)) = raw.split_once(',') {
            let family = family.trim();
            if !family.is_empty() {
                return Some(Self {
                    family: family.to_string(),
                    given: given.trim().to_string(),
                });
            }
        }

        let cleaned = raw.replace(',', " ");
        let mut parts: Vec<&str> = cleaned.split_whitespace().collect();
        let family = parts.pop()?.to_string();
        Some(Self {
            family,
            given: parts.join(" "),
        })
    }

    /// Given names reduced to initials: `"Jean-Paul Amy"` becomes `"J.-P. A."`.
    pub fn initials(&self) -> String {
        self.given
            .split_whitespace()
            .map(|token| {
                token
                    .split('-')
                    .filter_map(|part| part.chars().next())
                    .map(|c| format!("{}.", c.to_uppercase()))
                    .collect::<Vec<_>>()
                    .join("-")
            })
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `"Family, G."`
    pub fn inverted_initials(&self) -> String {
        let initials = self.initials();
        if initials.is_empty() {
            self.family.clone()
        } else {
            format!("{}, {}", self.family, initials)
        }
    }

    /// `"Family, Given"`
    pub fn inverted_full(&self) -> String {
        if self.given.is_empty() {
            self.family.clone()
        } else {
            format!("{}, {}", self.family, self.given)
        }
    }

    /// `"Given Family"`
    pub fn natural(&self) -> String {
        if self.given.is_empty() {
            self.family.clone()
        } else {
            format!("{} {}", self.given, self.family)
        }
    }

    /// `"G. Family"`
    pub fn leading_initials(&self) -> String {
        let initials = self.initials();
        if initials.is_empty() {
            self.family.clone()
        } else {
            format!("{} {}", initials, self.family)
        }
    }
}

/// Parse every non-blank author string.
pub fn parse_names(authors: &[String]) -> Vec<Name> {
    authors.iter().filter_map(|a| Name::parse(a)).collect()
}

/// Family name of the first author, if any.
pub fn first_family(authors: &[String]) -> Option<String> {
    authors.iter().find_map(|a| Name::parse(a)).map(|n| n.family)
}
