// Ingestion pipeline: bytes -> decoded sheet -> validated findings

pub mod ingestion;
pub mod processing;

pub use ingestion::{ingest, IngestOptions};
pub use processing::parser;
