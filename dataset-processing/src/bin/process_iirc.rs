use anyhow::Context;
use common::utils::config::get_config;
use dataset_processing::{iirc, seeded_rng};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = fmt()
        .with_env_filter(EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();

    let config = get_config().context("loading configuration")?;
    let mut rng = seeded_rng();

    let stats = iirc::run(&config, &mut rng).context("normalizing IIRC dataset")?;
    info!(
        high_confidence = stats.high_confidence,
        total = stats.total,
        "Finished IIRC normalization"
    );

    Ok(())
}
