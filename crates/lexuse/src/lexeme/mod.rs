//! Lexical data fetched from the knowledge graph.
//!
//! A [`LexicalForm`] is one inflected variant of a lexical entry and is the
//! unit the curation workflow draws, searches for and excludes. A
//! [`Sense`] is one meaning of the entry a usage example can demonstrate.

mod form;
mod sense;

pub use form::LexicalForm;
pub use sense::Sense;
