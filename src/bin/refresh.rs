//! One scoring pass for every configured series, then exit
//!
//! Exits non-zero when any series exhausted all of its sources; the last
//! known score is still printed for it.
//!
//! Writes the same state as `api-server`; do not point both at one store.

use dotenvy::dotenv;
use sentiment_gauge::core::bootstrap::pipeline_from_env;
use sentiment_gauge::error::EngineError;
use sentiment_gauge::logging;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    logging::init_logging();

    let pipeline = pipeline_from_env(None).await?;
    let mut exhausted = 0usize;

    for series in pipeline.series_names() {
        match pipeline.run(&series).await {
            Ok(report) => {
                if let Some(warning) = &report.warning {
                    warn!(series = %series, warning = ?warning, "Score rejected, previous kept");
                }
                println!(
                    "{}: {} ({}) via {}",
                    series,
                    report.score(),
                    report.composite.mood.label(),
                    report.source.as_str()
                );
            }
            Err(EngineError::AllSourcesExhausted { last_known, .. }) => {
                exhausted += 1;
                println!("{}: {} (stale)", series, last_known);
            }
            Err(e) => {
                error!(series = %series, error = %e, "Scoring pass failed");
                return Err(e.into());
            }
        }
    }

    info!(exhausted = exhausted, "Refresh complete");
    if exhausted > 0 {
        std::process::exit(1);
    }
    Ok(())
}
