use sqlx::postgres::PgConnection;
use sqlx::{Connection, Postgres, QueryBuilder};
use tracing::{debug, info};

use crate::config::DbConfig;
use crate::error::EtlError;
use crate::record::{ProductRecord, CANONICAL_COLUMNS};

pub const TABLE_NAME: &str = "gymshark_products";

// Natural key makes ON CONFLICT DO NOTHING actually skip re-runs; the original
// table had no uniqueness constraint at all, so the conflict clause never fired.
const CREATE_TABLE_SQL: &str = "\
CREATE TABLE IF NOT EXISTS gymshark_products (
    id SERIAL PRIMARY KEY,
    title TEXT,
    product_type TEXT,
    vendor TEXT,
    tags TEXT,
    handle TEXT,
    variant_title TEXT,
    sku TEXT,
    price NUMERIC,
    image_src TEXT,
    CONSTRAINT gymshark_products_natural_key UNIQUE (handle, variant_title, sku)
)";

const COLUMN_EXISTS_SQL: &str = "\
SELECT EXISTS (
    SELECT 1 FROM information_schema.columns
    WHERE table_name = $1 AND column_name = $2
)";

/// Open the single connection a pipeline run writes through. Writes are never
/// autocommitted; every statement below runs inside an explicit transaction.
pub async fn connect(cfg: &DbConfig) -> Result<PgConnection, EtlError> {
    let conn = PgConnection::connect_with(&cfg.connect_options())
        .await
        .map_err(EtlError::Connection)?;
    info!(host = %cfg.host, dbname = %cfg.dbname, "connected to postgres");
    Ok(conn)
}

/// Create the target table if absent, then additively repair it: any canonical
/// column missing from an existing table is added via ALTER TABLE. Columns are
/// never dropped or renamed. One transaction; rolled back on any failure.
pub async fn ensure_schema(conn: &mut PgConnection) -> Result<(), EtlError> {
    let mut tx = conn.begin().await.map_err(EtlError::Schema)?;

    sqlx::query(CREATE_TABLE_SQL)
        .execute(&mut *tx)
        .await
        .map_err(EtlError::Schema)?;

    for col in CANONICAL_COLUMNS {
        let present: bool = sqlx::query_scalar(COLUMN_EXISTS_SQL)
            .bind(TABLE_NAME)
            .bind(col)
            .fetch_one(&mut *tx)
            .await
            .map_err(EtlError::Schema)?;
        if !present {
            info!(column = col, "adding missing column");
            sqlx::query(&alter_column_sql(col))
                .execute(&mut *tx)
                .await
                .map_err(EtlError::Schema)?;
        }
    }

    tx.commit().await.map_err(EtlError::Schema)?;
    info!(table = TABLE_NAME, "table ready");
    Ok(())
}

// Postgres caps bind parameters at 65535 per statement, nine binds per row.
const MAX_ROWS_PER_STATEMENT: usize = 65535 / CANONICAL_COLUMNS.len();

/// Bulk-insert records in chunks of at most `batch_size`, one multi-row
/// conflict-skipping statement per chunk, all inside a single transaction.
/// Any failure rolls the whole call back. Returns the number of rows
/// presented for insertion; conflict-skipped rows are not subtracted.
/// `batch_size` is clamped to the per-statement bind-parameter cap.
pub async fn load_batch(
    conn: &mut PgConnection,
    records: &[ProductRecord],
    batch_size: usize,
) -> Result<usize, EtlError> {
    if records.is_empty() {
        info!("no rows to insert");
        return Ok(0);
    }

    let mut tx = conn.begin().await.map_err(EtlError::Load)?;
    let mut through = 0usize;
    for chunk in batches(records, batch_size) {
        let mut qb = insert_builder(chunk);
        // Arity varies per chunk; don't pollute the prepared-statement cache.
        qb.build()
            .persistent(false)
            .execute(&mut *tx)
            .await
            .map_err(EtlError::Load)?;
        through += chunk.len();
        debug!(through, total = records.len(), "inserted batch");
    }
    tx.commit().await.map_err(EtlError::Load)?;

    info!(rows = records.len(), table = TABLE_NAME, "bulk insert committed");
    Ok(records.len())
}

fn insert_builder(chunk: &[ProductRecord]) -> QueryBuilder<'_, Postgres> {
    let mut qb = QueryBuilder::new(
        "INSERT INTO gymshark_products \
         (title, product_type, vendor, tags, handle, variant_title, sku, price, image_src) ",
    );
    qb.push_values(chunk, |mut b, rec| {
        b.push_bind(&rec.title)
            .push_bind(&rec.product_type)
            .push_bind(&rec.vendor)
            .push_bind(&rec.tags)
            .push_bind(&rec.handle)
            .push_bind(&rec.variant_title)
            .push_bind(&rec.sku)
            .push_bind(&rec.price)
            .push_bind(&rec.image_src);
    });
    qb.push(" ON CONFLICT DO NOTHING");
    qb
}

fn batches(records: &[ProductRecord], batch_size: usize) -> std::slice::Chunks<'_, ProductRecord> {
    records.chunks(batch_size.clamp(1, MAX_ROWS_PER_STATEMENT))
}

fn alter_column_sql(col: &str) -> String {
    format!("ALTER TABLE {TABLE_NAME} ADD COLUMN {col} {}", column_type(col))
}

fn column_type(col: &str) -> &'static str {
    match col {
        "price" => "NUMERIC",
        _ => "TEXT",
    }
}
