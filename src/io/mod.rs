//! CSV input/output.

pub mod export;
pub mod ingest;
