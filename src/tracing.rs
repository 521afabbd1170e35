use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

/// Sets up the global tracing subscriber with a fmt formatter and env filter.
///
/// `default_filter` applies when `RUST_LOG` is unset. Batch jobs pass
/// `compact = true` so per-item progress lines stay on one row; the site
/// server keeps file/line locations.
pub fn init_tracing(default_filter: &str, compact: bool) -> Result<(), anyhow::Error> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let builder = SubscriberBuilder::default().with_env_filter(filter);
    let result = if compact {
        builder.with_target(false).compact().try_init()
    } else {
        builder
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .try_init()
    };
    result.map_err(|e| anyhow::anyhow!("failed to initialize tracing: {}", e))
}
