//! Muster ingestion and the read-only aggregations over the record store.

pub mod aggregate;
pub mod export;
pub mod ingest;
