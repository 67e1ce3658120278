use std::env;

use anyhow::{Context, Result};
use twincube::AppConfig;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let seed = match env::var("TWINCUBE_SEED") {
        Ok(value) => Some(
            value
                .parse::<u64>()
                .with_context(|| format!("TWINCUBE_SEED must be an unsigned integer, got {value:?}"))?,
        ),
        Err(_) => None,
    };
    if let Some(seed) = seed {
        tracing::info!(seed, "using fixed color seed");
    }

    twincube::run(AppConfig::new().title("Twin Cubes").seed(seed))?;
    Ok(())
}
