//! Parameter extraction: structured values from free text.

pub mod extractor;
pub mod value_objects;
pub mod vocabulary;
