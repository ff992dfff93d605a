//! Response domain: the final answer object and English templates.

pub mod entities;
pub mod template;
