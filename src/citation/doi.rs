//! DOI metadata lookup.
//!
//! The network request lives behind the `doi` feature; prefix cleaning and
//! the CSL-JSON mapping are always available.

use crate::error::{Error, Result};
use crate::model::{BibliographyEntry, EntryType};
use serde_json::Value;

/// DOI resolver base URL.
pub const DOI_RESOLVER: &str = "https://doi.org/";

/// Content type requested from the resolver.
pub const CSL_JSON_MIME: &str = "application/vnd.citationstyles.csl+json";

const DOI_PREFIXES: &[&str] = &[
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi:",
];

/// Strip resolver URL and `doi:` prefixes (case-insensitive).
pub fn clean_doi(doi: &str) -> Result<String> {
    let mut cleaned = doi.trim();
    for prefix in DOI_PREFIXES {
        if cleaned.len() >= prefix.len()
            && cleaned.is_char_boundary(prefix.len())
            && cleaned[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            cleaned = cleaned[prefix.len()..].trim();
            break;
        }
    }
    if cleaned.is_empty() {
        return Err(Error::InvalidDoi);
    }
    Ok(cleaned.to_string())
}

/// Map a CSL-JSON record to a bibliography entry. The cleaned DOI is used as
/// the entry id.
pub fn entry_from_csl_json(doi: &str, data: &Value) -> BibliographyEntry {
    let text = |key: &str| value_text(data.get(key)?);

    let authors = data
        .get("author")
        .and_then(Value::as_array)
        .map(|people| {
            people
                .iter()
                .map(|p| {
                    let family = p.get("family").and_then(Value::as_str);
                    let given = p.get("given").and_then(Value::as_str);
                    match (family, given) {
                        (Some(f), Some(g)) => format!("{}, {}", f, g),
                        (Some(f), None) => f.to_string(),
                        (None, Some(g)) => g.to_string(),
                        (None, None) => p
                            .get("literal")
                            .and_then(Value::as_str)
                            .unwrap_or("Unknown")
                            .to_string(),
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    let year = data
        .pointer("/issued/date-parts/0/0")
        .and_then(|y| y.as_i64().or_else(|| y.as_str().and_then(|s| s.parse().ok())))
        .and_then(|y| i32::try_from(y).ok());

    let entry_type = match data.get("type").and_then(Value::as_str).unwrap_or("article") {
        "article-journal" | "article" | "article-magazine" | "article-newspaper" => {
            EntryType::Article
        }
        "book" => EntryType::Book,
        "chapter" => EntryType::Chapter,
        "paper-conference" => EntryType::Conference,
        "webpage" => EntryType::Website,
        "thesis" => EntryType::Thesis,
        _ => EntryType::Other,
    };

    BibliographyEntry {
        id: doi.to_string(),
        entry_type,
        authors,
        title: text("title").unwrap_or_else(|| "Untitled".to_string()),
        year,
        journal: text("container-title"),
        volume: text("volume"),
        issue: text("issue"),
        pages: text("page"),
        publisher: text("publisher"),
        doi: Some(doi.to_string()),
        url: text("URL"),
        accessed: None,
    }
}

/// Strings, numbers, and the first element of string arrays.
fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => return items.first().and_then(value_text),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Fetch metadata for `doi` from the public resolver.
#[cfg(feature = "doi")]
pub async fn fetch_doi(doi: &str) -> Result<BibliographyEntry> {
    let client = reqwest::Client::new();
    fetch_doi_from(&client, DOI_RESOLVER, doi).await
}

/// Fetch metadata for `doi` from `resolver` (a base URL ending in `/`).
#[cfg(feature = "doi")]
pub async fn fetch_doi_from(
    client: &reqwest::Client,
    resolver: &str,
    doi: &str,
) -> Result<BibliographyEntry> {
    let doi = clean_doi(doi)?;
    let url = format!("{}{}", resolver, doi);
    log::debug!("Resolving DOI {}", url);

    let response = client
        .get(&url)
        .header(reqwest::header::ACCEPT, CSL_JSON_MIME)
        .send()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(Error::DoiNotFound);
    }
    if !status.is_success() {
        return Err(Error::DoiHttp(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default().to_string(),
        ));
    }

    let body = response
        .text()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;
    let data: Value = serde_json::from_str(&body)?;
    Ok(entry_from_csl_json(&doi, &data))
}

/// Blocking wrapper around [`fetch_doi`] on a private current-thread runtime.
#[cfg(feature = "doi")]
pub fn fetch_doi_blocking(doi: &str) -> Result<BibliographyEntry> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(fetch_doi(doi))
}
