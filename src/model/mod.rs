//! Document model types for export.
//!
//! This module defines the format-agnostic representation that bridges the
//! host application's data and the output renderers. Everything here is
//! constructed fresh per export call.

mod bibliography;
mod block;
mod document;

pub use bibliography::{BibliographyEntry, Citation, CitationStyle, EntryType};
pub use block::{Block, Run};
pub use document::{section_depths, Author, DocumentSource, DocumentType, PaperMeta, Section};
