//! Library entry for docframe-cli used by integration tests and embedding.

pub mod commands;
pub mod config;

// Re-export commands for convenience
pub use commands::*;
