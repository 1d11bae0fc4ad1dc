//! Utilities.

pub mod document;

pub use document::read_document;
