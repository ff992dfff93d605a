//! Response output formatting

pub mod console;
