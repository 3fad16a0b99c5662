use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gymshark_etl::config::{DbConfig, EtlConfig, DEFAULT_BATCH_SIZE};
use gymshark_etl::error::EtlError;
use gymshark_etl::pipeline;
use gymshark_etl::util::env as env_util;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gymshark-etl", version, about = "Gymshark product catalog ETL")]
struct Cli {
    /// Path to the product catalog CSV (falls back to CSV_PATH env)
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Rows per bulk insert statement (falls back to BATCH_SIZE env)
    #[arg(long)]
    batch_size: Option<usize>,
    /// Load normalized rows without the quality filter
    #[arg(long, default_value_t = false)]
    skip_clean: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_util::init_env();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let cfg = EtlConfig {
        db: DbConfig::from_env(),
        source_path: cli.csv.unwrap_or_else(|| {
            PathBuf::from(env_util::env_or("CSV_PATH", "gymshark_products.csv"))
        }),
        batch_size: cli
            .batch_size
            .unwrap_or_else(|| env_util::env_parse("BATCH_SIZE", DEFAULT_BATCH_SIZE)),
        skip_clean: cli.skip_clean,
    };

    info!("starting ETL pipeline");
    match pipeline::run(&cfg).await {
        Ok(report) => {
            info!(
                extracted = report.extracted,
                cleaned = report.cleaned,
                presented = report.presented,
                "ETL pipeline completed"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "ETL pipeline failed");
            match err {
                EtlError::SourceNotFound { .. }
                | EtlError::SourceParse(_)
                | EtlError::Connection(_) => ExitCode::from(1),
                EtlError::Schema(_) | EtlError::Load(_) => ExitCode::from(2),
            }
        }
    }
}
