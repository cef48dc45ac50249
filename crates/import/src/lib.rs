//! Bulk loader of block files into block and transaction tables.

pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod ingest;
pub mod mapper;
pub mod pipeline;
mod progress;


pub use config::{ImportConfig, Magic};
pub use error::{ImportError, Stage};
pub use ingest::{BatchIngestor, IngestCounts, WriteMode};
pub use pipeline::{FileFailure, FileReport, Pipeline, RunSummary};
