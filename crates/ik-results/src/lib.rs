//! ik-results: query tables, run cache and batch run service.

pub mod hash;
pub mod run_service;
pub mod store;
pub mod table;
pub mod types;

pub use hash::compute_run_id;
pub use run_service::{BatchRequest, BatchResponse, RunTimingSummary, run_batch};
pub use store::RunStore;
pub use table::{format_rows, format_table, parse_queries, status_tag};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },

    #[error("Query line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Project error: {0}")]
    Project(#[from] ik_project::ProjectError),
}
