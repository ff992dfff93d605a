//! Language detector adapters

mod backend_detector;
mod script_detector;

pub use backend_detector::BackendLanguageDetector;
pub use script_detector::ScriptLanguageDetector;
