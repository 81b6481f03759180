//! Tracing setup for test binaries.

use crate::config::{LogFormat, SelectionConfig};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

const DEFAULT_FILTER: &str = "env_guard=debug,env_tests=debug";

/// Install a test-friendly subscriber.
///
/// Filter precedence: `config.log_filter`, then `RUST_LOG`, then the crate
/// defaults. Output is plain text unless `config.log_format` asks for JSON.
/// Safe to call from every test; only the first call installs.
pub fn init_test_tracing(config: &SelectionConfig) {
    let filter = match &config.log_filter {
        Some(filter) => tracing_subscriber::EnvFilter::new(filter),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| DEFAULT_FILTER.into()),
    };

    // Another test may have installed the global subscriber already
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(config.log_format))
        .try_init();
}

fn fmt_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'span> LookupSpan<'span>,
{
    match format {
        LogFormat::Text => tracing_subscriber::fmt::layer().with_test_writer().boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_test_writer()
            .boxed(),
    }
}
