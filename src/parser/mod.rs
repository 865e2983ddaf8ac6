//! Rich-content markup parsing.
//!
//! Turns the constrained markup produced by the editor into a flat sequence of
//! [`Block`](crate::model::Block)s. Parsing is lenient: tags outside the
//! allow-list are unwrapped to their text and never reported as errors.

mod markup;

pub use markup::{parse, parse_with_report, ParseReport};
