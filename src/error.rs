use std::path::PathBuf;
use thiserror::Error;

/// Failure modes of one pipeline run. Source and connection errors are fatal;
/// schema and load errors roll back their in-flight transaction before
/// surfacing here.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("source file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("failed to read source CSV: {0}")]
    SourceParse(#[from] csv::Error),

    #[error("could not connect to postgres: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("schema setup failed: {0}")]
    Schema(#[source] sqlx::Error),

    #[error("bulk load failed: {0}")]
    Load(#[source] sqlx::Error),
}
