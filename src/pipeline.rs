use sqlx::postgres::PgConnection;
use sqlx::Connection;
use tracing::{info, warn};

use crate::config::EtlConfig;
use crate::error::EtlError;
use crate::record::ProductRecord;
use crate::{extract, load, transform};

/// Row counts from one completed run. `presented` counts rows handed to the
/// store; conflict-skipped duplicates from earlier runs are not subtracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineReport {
    pub extracted: usize,
    pub cleaned: usize,
    pub presented: usize,
}

/// Run the full pipeline: extract -> normalize -> clean -> load.
///
/// The first failing stage aborts the run; the store connection, once open,
/// is closed on every exit path. No retries, no partial commits.
pub async fn run(cfg: &EtlConfig) -> Result<PipelineReport, EtlError> {
    info!(path = %cfg.source_path.display(), "[1/3] extracting");
    let raw = extract::extract(&cfg.source_path)?;
    let extracted = raw.len();

    info!("[2/3] transforming");
    let canonical = transform::normalize(&raw);
    let records = if cfg.skip_clean {
        canonical
    } else {
        transform::clean(canonical)
    };
    let cleaned = records.len();

    info!("[3/3] loading");
    let mut conn = load::connect(&cfg.db).await?;
    let outcome = load_stage(&mut conn, &records, cfg.batch_size).await;
    if let Err(err) = conn.close().await {
        warn!(error = %err, "connection close failed");
    }
    let presented = outcome?;

    Ok(PipelineReport {
        extracted,
        cleaned,
        presented,
    })
}

async fn load_stage(
    conn: &mut PgConnection,
    records: &[ProductRecord],
    batch_size: usize,
) -> Result<usize, EtlError> {
    load::ensure_schema(conn).await?;
    load::load_batch(conn, records, batch_size).await
}
