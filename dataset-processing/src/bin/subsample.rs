use anyhow::Context;
use common::utils::config::get_config;
use dataset_processing::{args, seeded_rng, subsample};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = fmt()
        .with_env_filter(EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();

    let args = args::parse();
    let config = get_config().context("loading configuration")?;
    let mut rng = seeded_rng();

    subsample::run(&config, args.dataset_name, args.set_name, &mut rng).with_context(|| {
        format!(
            "subsampling {} {} set",
            args.dataset_name.label(),
            args.set_name
        )
    })?;

    Ok(())
}
