//! Agent domain: identities, payloads, tagged results and the shared
//! model-or-heuristic predictor.

pub mod entities;
pub mod predictor;
pub mod result;
