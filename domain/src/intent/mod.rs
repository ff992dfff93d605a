//! Intent classification: the intent set, the trained text model and the
//! keyword fallback.

pub mod classifier;
pub mod entities;
pub mod keywords;
pub mod text_model;
pub mod training;
